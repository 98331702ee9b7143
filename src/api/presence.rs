use actix_web::{HttpResponse, web};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::debug;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::presence::effective_status;
use crate::model::status::{EmployeeStatus, PresenceStatus};

/// Mark caller online
///
/// Upsert keyed on the account id; calling twice only refreshes the
/// activity timestamp.
#[utoipa::path(
    post,
    path = "/api/presence/online",
    responses(
        (status = 200, description = "Marked online", body = Object, example = json!({"success": true})),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Presence"
)]
pub async fn mark_online(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    sqlx::query(
        r#"
        INSERT INTO presence (user_id, display_name, status, last_activity)
        VALUES (?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            display_name = VALUES(display_name),
            status = VALUES(status),
            last_activity = VALUES(last_activity)
        "#,
    )
    .bind(auth.user_id)
    .bind(&auth.name)
    .bind(PresenceStatus::Online.to_string())
    .bind(Utc::now())
    .execute(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Mark caller offline
///
/// Called on logout or tab close; not guaranteed to run, which is why
/// presence reads also apply the staleness threshold.
#[utoipa::path(
    post,
    path = "/api/presence/offline",
    responses(
        (status = 200, description = "Marked offline", body = Object, example = json!({"success": true})),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Presence"
)]
pub async fn mark_offline(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    sqlx::query("UPDATE presence SET status = ?, last_activity = ? WHERE user_id = ?")
        .bind(PresenceStatus::Offline.to_string())
        .bind(Utc::now())
        .bind(auth.user_id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Heartbeat
///
/// Refreshes the activity timestamp only; never changes status.
#[utoipa::path(
    post,
    path = "/api/presence/heartbeat",
    responses(
        (status = 200, description = "Activity refreshed", body = Object, example = json!({"success": true})),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Presence"
)]
pub async fn heartbeat(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    sqlx::query("UPDATE presence SET last_activity = ? WHERE user_id = ?")
        .bind(Utc::now())
        .bind(auth.user_id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[derive(sqlx::FromRow)]
struct PresenceJoinRow {
    user_id: u64,
    display_name: String,
    status: String,
    last_activity: DateTime<Utc>,
    employee_status: Option<String>,
}

/// Presence row as reported to readers, carrying the attendance-derived
/// check-in status next to the liveness signal.
#[derive(Serialize, ToSchema)]
pub struct PresenceEntry {
    #[schema(example = 7)]
    pub user_id: u64,
    #[schema(example = "Juan Perez")]
    pub display_name: String,
    #[schema(example = "online")]
    pub status: String,
    #[schema(example = "2024-01-01T12:00:00Z", value_type = String, format = "date-time")]
    pub last_activity: DateTime<Utc>,
    #[schema(example = "connected")]
    pub check_in_status: String,
}

/// List presence
///
/// Joins each account's attendance status (defaulting to disconnected when
/// no employee row exists) and applies the staleness threshold: a stored
/// `online` whose heartbeat stopped reads as offline without a write.
#[utoipa::path(
    get,
    path = "/api/presence",
    responses(
        (status = 200, description = "Presence list ordered by name", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Presence"
)]
pub async fn list_presence(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, PresenceJoinRow>(
        r#"
        SELECT p.user_id, p.display_name, p.status, p.last_activity,
               e.status AS employee_status
        FROM presence p
        LEFT JOIN employees e ON e.user_id = p.user_id
        ORDER BY p.display_name
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;

    let now = Utc::now();
    let stale_after = Duration::seconds(config.presence_stale_secs);

    let entries: Vec<PresenceEntry> = rows
        .into_iter()
        .map(|row| PresenceEntry {
            user_id: row.user_id,
            display_name: row.display_name,
            status: effective_status(&row.status, row.last_activity, now, stale_after).to_string(),
            last_activity: row.last_activity,
            check_in_status: row
                .employee_status
                .unwrap_or_else(|| EmployeeStatus::Disconnected.to_string()),
        })
        .collect();

    debug!(count = entries.len(), "presence listed");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": entries
    })))
}
