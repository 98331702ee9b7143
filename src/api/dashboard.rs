use actix_web::{HttpResponse, web};
use chrono::{Datelike, Utc};
use serde_json::{Map, Value, json};
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::status::{EmployeeStatus, RecordStatus, WorkMode};

#[derive(serde::Serialize, ToSchema)]
pub struct AdminStats {
    #[schema(example = 12)]
    pub total_employees: i64,
    #[schema(example = 5)]
    pub connected_employees: i64,
    #[schema(example = 7)]
    pub remote_employees: i64,
    #[schema(example = 9)]
    pub records_today: i64,
}

#[derive(serde::Serialize, ToSchema)]
pub struct EmployeeStats {
    #[schema(example = "connected")]
    pub current_status: String,
    #[schema(example = 1)]
    pub records_today: i64,
    #[schema(example = 132.5)]
    pub hours_this_month: f64,
}

/// Dashboard statistics
///
/// Admins get org-wide counters; employees get their own status, today's
/// record count and the hours completed this month.
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Role-dependent statistics", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn stats(auth: AuthUser, pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    if auth.is_admin() {
        let data = admin_stats(pool.get_ref()).await?;
        Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
    } else {
        let data = employee_stats(pool.get_ref(), auth.user_id).await?;
        Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
    }
}

async fn admin_stats(pool: &MySqlPool) -> Result<AdminStats, ApiError> {
    let total_employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;

    let connected_employees: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE status = ?")
            .bind(EmployeeStatus::Connected.to_string())
            .fetch_one(pool)
            .await?;

    let remote_employees: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE work_mode = ?")
            .bind(WorkMode::Remote.to_string())
            .fetch_one(pool)
            .await?;

    let records_today: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM time_records WHERE date = ?")
        .bind(Utc::now().date_naive())
        .fetch_one(pool)
        .await?;

    Ok(AdminStats {
        total_employees,
        connected_employees,
        remote_employees,
        records_today,
    })
}

async fn employee_stats(pool: &MySqlPool, user_id: u64) -> Result<EmployeeStats, ApiError> {
    let employee: Option<(u64, String)> =
        sqlx::query_as("SELECT id, status FROM employees WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let Some((employee_id, current_status)) = employee else {
        return Ok(EmployeeStats {
            current_status: EmployeeStatus::Disconnected.to_string(),
            records_today: 0,
            hours_this_month: 0.0,
        });
    };

    let today = Utc::now().date_naive();
    let month_start = today.with_day(1).unwrap_or(today);

    let records_today: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM time_records WHERE employee_id = ? AND date = ?",
    )
    .bind(employee_id)
    .bind(today)
    .fetch_one(pool)
    .await?;

    let hours: Option<f64> = sqlx::query_scalar(
        r#"
        SELECT SUM(hours_worked) FROM time_records
        WHERE employee_id = ? AND date >= ? AND status = ?
        "#,
    )
    .bind(employee_id)
    .bind(month_start)
    .bind(RecordStatus::Completed.to_string())
    .fetch_one(pool)
    .await?;

    Ok(EmployeeStats {
        current_status,
        records_today,
        hours_this_month: (hours.unwrap_or(0.0) * 100.0).round() / 100.0,
    })
}

/// Chart data (admin)
///
/// Employee counts grouped by work mode and by department.
#[utoipa::path(
    get,
    path = "/api/dashboard/charts",
    responses(
        (status = 200, description = "Aggregated employee counts", body = Object, example = json!({
            "success": true,
            "data": {
                "work_modes": { "remote": 7, "onsite": 3, "hybrid": 2 },
                "departments": { "Engineering": 8, "Sales": 4 }
            }
        })),
        (status = 403, description = "Admin only"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn charts(auth: AuthUser, pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let work_modes = group_count(pool.get_ref(), "work_mode").await?;
    let departments = group_count(pool.get_ref(), "department").await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "work_modes": work_modes,
            "departments": departments,
        }
    })))
}

async fn group_count(pool: &MySqlPool, column: &str) -> Result<Value, ApiError> {
    // column names come from the two call sites above, never from input
    let sql = format!("SELECT {column}, COUNT(*) FROM employees GROUP BY {column}");

    let rows: Vec<(String, i64)> = sqlx::query_as(&sql).fetch_all(pool).await?;

    let mut map = Map::new();
    for (key, count) in rows {
        map.insert(key, Value::from(count));
    }
    Ok(Value::Object(map))
}
