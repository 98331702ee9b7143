use actix_web::{HttpResponse, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::status::{EmployeeStatus, RecordStatus};
use crate::model::time_record::TimeRecord;
use crate::utils::time::worked_hours;

/// Resolves the caller's employee row. Every session operation is keyed by
/// employee id, not account id.
pub(crate) async fn resolve_employee_id(pool: &MySqlPool, user_id: u64) -> Result<u64, ApiError> {
    sqlx::query_scalar("SELECT id FROM employees WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee profile not found".into()))
}

/// True when an insert failed because a concurrent check-in won the slot:
/// either the unique key fired (SQLSTATE 23000) or InnoDB picked this
/// transaction as the deadlock victim under gap-lock contention (40001).
/// Both mean the same thing to the caller: an active session already exists.
fn lost_check_in_race(sqlstate: Option<&str>) -> bool {
    matches!(sqlstate, Some("23000") | Some("40001"))
}

/// Check-in endpoint
///
/// Opens today's work session. The active-record lookup and the insert run
/// in one transaction with the row locked, and the unique key on
/// (employee_id, date, active_slot) backstops the same invariant in the
/// database, so two concurrent check-ins cannot both succeed.
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    responses(
        (status = 200, description = "Checked in", body = Object, example = json!({
            "success": true,
            "message": "Checked in at 09:00:00 UTC",
            "record_id": 42
        })),
        (status = 404, description = "No employee profile"),
        (status = 409, description = "Active session already exists today"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = resolve_employee_id(pool.get_ref(), auth.user_id).await?;

    let now = Utc::now();
    let today = now.date_naive();

    let mut tx = pool.begin().await?;

    let existing: Option<u64> = sqlx::query_scalar(
        r#"
        SELECT id FROM time_records
        WHERE employee_id = ? AND date = ? AND status = ?
        FOR UPDATE
        "#,
    )
    .bind(employee_id)
    .bind(today)
    .bind(RecordStatus::Active.to_string())
    .fetch_optional(&mut *tx)
    .await?;

    if existing.is_some() {
        return Err(ApiError::Conflict(
            "You already have an active session today".into(),
        ));
    }

    let inserted = sqlx::query(
        r#"
        INSERT INTO time_records (employee_id, date, clock_in, status)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(today)
    .bind(now)
    .bind(RecordStatus::Active.to_string())
    .execute(&mut *tx)
    .await;

    let record_id = match inserted {
        Ok(res) => res.last_insert_id(),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if lost_check_in_race(db_err.code().as_deref()) {
                    return Err(ApiError::Conflict(
                        "You already have an active session today".into(),
                    ));
                }
            }
            return Err(e.into());
        }
    };

    sqlx::query("UPDATE employees SET status = ?, last_seen = ? WHERE id = ?")
        .bind(EmployeeStatus::Connected.to_string())
        .bind(now)
        .bind(employee_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(employee_id, record_id, "check-in");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("Checked in at {}", now.format("%H:%M:%S UTC")),
        "record_id": record_id
    })))
}

/// Check-out endpoint
///
/// Closes the newest active session for today (same date scoping as
/// check-in). A clock-out instant earlier than the clock-in is rejected
/// before anything is written.
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    responses(
        (status = 200, description = "Checked out", body = Object, example = json!({
            "success": true,
            "message": "Checked out at 17:30:00 UTC. You worked 8.5 hours",
            "hours_worked": 8.5
        })),
        (status = 404, description = "No active check-in"),
        (status = 400, description = "Clock-out earlier than clock-in"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = resolve_employee_id(pool.get_ref(), auth.user_id).await?;

    let now = Utc::now();
    let today = now.date_naive();

    let mut tx = pool.begin().await?;

    let active: Option<(u64, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT id, clock_in FROM time_records
        WHERE employee_id = ? AND date = ? AND status = ?
        ORDER BY clock_in DESC
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(employee_id)
    .bind(today)
    .bind(RecordStatus::Active.to_string())
    .fetch_optional(&mut *tx)
    .await?;

    let Some((record_id, clock_in)) = active else {
        return Err(ApiError::NotFound("No active check-in found".into()));
    };

    let hours = worked_hours(clock_in, now)?;

    sqlx::query(
        r#"
        UPDATE time_records
        SET clock_out = ?, hours_worked = ?, status = ?
        WHERE id = ?
        "#,
    )
    .bind(now)
    .bind(hours)
    .bind(RecordStatus::Completed.to_string())
    .bind(record_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE employees SET status = ?, last_seen = ? WHERE id = ?")
        .bind(EmployeeStatus::Disconnected.to_string())
        .bind(now)
        .bind(employee_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(employee_id, record_id, hours, "check-out");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!(
            "Checked out at {}. You worked {} hours",
            now.format("%H:%M:%S UTC"),
            hours
        ),
        "hours_worked": hours
    })))
}

/// Own records for today
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Today's time records, newest first", body = Object),
        (status = 404, description = "No employee profile"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today_records(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = resolve_employee_id(pool.get_ref(), auth.user_id).await?;

    let records = sqlx::query_as::<_, TimeRecord>(
        r#"
        SELECT id, employee_id, date, clock_in, clock_out, hours_worked, status, notes
        FROM time_records
        WHERE employee_id = ? AND date = ?
        ORDER BY clock_in DESC
        "#,
    )
    .bind(employee_id)
    .bind(Utc::now().date_naive())
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": records
    })))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecordsQuery {
    /// Restrict to one employee
    pub employee_id: Option<u64>,
    /// Restrict to one calendar day (UTC)
    pub date: Option<NaiveDate>,
}

/// A time record joined with employee and account metadata for the admin
/// listing.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRow {
    pub id: u64,
    pub employee_id: u64,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = String, format = "date-time")]
    pub clock_in: DateTime<Utc>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub clock_out: Option<DateTime<Utc>>,
    pub hours_worked: Option<f64>,
    pub status: String,
    pub notes: Option<String>,
    pub employee_name: String,
    pub department: String,
    pub username: String,
}

/// All records (admin)
#[utoipa::path(
    get,
    path = "/api/attendance/records",
    params(RecordsQuery),
    responses(
        (status = 200, description = "Joined records, newest first, capped at 1000 rows", body = Object),
        (status = 403, description = "Admin only"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn all_records(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<RecordsQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let mut conditions = Vec::new();
    if query.employee_id.is_some() {
        conditions.push("tr.employee_id = ?");
    }
    if query.date.is_some() {
        conditions.push("tr.date = ?");
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        r#"
        SELECT tr.id, tr.employee_id, tr.date, tr.clock_in, tr.clock_out,
               tr.hours_worked, tr.status, tr.notes,
               e.name AS employee_name, e.department, u.username
        FROM time_records tr
        JOIN employees e ON e.id = tr.employee_id
        JOIN users u ON u.id = e.user_id
        {}
        ORDER BY tr.date DESC, tr.clock_in DESC
        LIMIT 1000
        "#,
        where_clause
    );
    debug!(sql = %sql, filter = ?query, "fetching attendance records");

    let mut q = sqlx::query_as::<_, AttendanceRow>(&sql);
    if let Some(employee_id) = query.employee_id {
        q = q.bind(employee_id);
    }
    if let Some(date) = query.date {
        q = q.bind(date);
    }

    let rows = q.fetch_all(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": rows
    })))
}

/// Every employee joined with their latest session today; the record
/// columns stay null for employees who have not checked in yet.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeHours {
    pub id: u64,
    pub name: String,
    pub department: String,
    pub work_mode: String,
    pub status: String,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub last_seen: Option<DateTime<Utc>>,
    pub username: String,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub clock_in: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub clock_out: Option<DateTime<Utc>>,
    pub hours_worked: Option<f64>,
    pub record_status: Option<String>,
}

/// Roster with today's hours (admin)
///
/// Unlike the records listing, this starts from the employee table, so
/// employees without a session today still appear.
#[utoipa::path(
    get,
    path = "/api/attendance/employees-with-hours",
    responses(
        (status = 200, description = "All employees with today's entry/exit/hours, ordered by name", body = Object),
        (status = 403, description = "Admin only"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn employees_with_hours(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let rows = sqlx::query_as::<_, EmployeeHours>(
        r#"
        SELECT e.id, e.name, e.department, e.work_mode, e.status, e.last_seen,
               u.username,
               tr.clock_in, tr.clock_out, tr.hours_worked,
               tr.status AS record_status
        FROM employees e
        JOIN users u ON u.id = e.user_id
        LEFT JOIN time_records tr ON tr.id = (
            SELECT tr2.id FROM time_records tr2
            WHERE tr2.employee_id = e.id AND tr2.date = ?
            ORDER BY tr2.clock_in DESC
            LIMIT 1
        )
        ORDER BY e.name
        "#,
    )
    .bind(Utc::now().date_naive())
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": rows
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn race_loser_sqlstates_map_to_conflict() {
        assert!(lost_check_in_race(Some("23000")));
        assert!(lost_check_in_race(Some("40001")));
        assert!(!lost_check_in_race(Some("HY000")));
        assert!(!lost_check_in_race(None));
    }

    #[test]
    fn recordless_employee_serializes_with_null_hours() {
        let row = EmployeeHours {
            id: 1,
            name: "Juan Perez".into(),
            department: "Engineering".into(),
            work_mode: "remote".into(),
            status: "disconnected".into(),
            last_seen: None,
            username: "juan.perez".into(),
            clock_in: None,
            clock_out: None,
            hours_worked: None,
            record_status: None,
        };

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["name"], "Juan Perez");
        assert_eq!(value["clock_in"], serde_json::Value::Null);
        assert_eq!(value["hours_worked"], serde_json::Value::Null);
        assert_eq!(value["record_status"], serde_json::Value::Null);
    }
}
