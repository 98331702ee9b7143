use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

use crate::auth::auth::AuthUser;
use crate::auth::jwt::generate_token;
use crate::auth::password::verify_password;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::status::{EmployeeStatus, PresenceStatus, RecordStatus};
use crate::models::{LoginReqDto, UserSql};
use crate::utils::time::today_utc;

#[derive(Serialize)]
struct LoginUser {
    id: u64,
    username: String,
    name: String,
    email: String,
    role: u8,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    message: String,
    token: String,
    user: LoginUser,
}

#[instrument(name = "auth_login", skip(pool, config, body), fields(username = %body.username))]
pub async fn login(
    body: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".into(),
        ));
    }

    let db_user = sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, username, password_hash, full_name, email, role_id
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(body.username.trim())
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".into()))?;

    if verify_password(&body.password, &db_user.password_hash).is_err() {
        info!(user_id = db_user.id, "password mismatch");
        return Err(ApiError::Unauthorized(
            "Invalid username or password".into(),
        ));
    }

    let token = generate_token(
        db_user.id,
        db_user.username.clone(),
        db_user.full_name.clone(),
        db_user.role_id,
        &config.jwt_secret,
        config.token_ttl,
    );

    // non-fatal
    if let Err(e) = sqlx::query("UPDATE users SET last_login_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(db_user.id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to update last_login_at");
    }

    sync_employee_status(pool.get_ref(), db_user.id).await?;

    info!(user_id = db_user.id, "login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        message: "Login successful".into(),
        token,
        user: LoginUser {
            id: db_user.id,
            username: db_user.username,
            name: db_user.full_name,
            email: db_user.email,
            role: db_user.role_id,
        },
    }))
}

/// Re-derives the employee's connected/disconnected flag on login: connected
/// only while an active time record exists for today.
async fn sync_employee_status(pool: &MySqlPool, user_id: u64) -> Result<(), ApiError> {
    let employee_id: Option<u64> =
        sqlx::query_scalar("SELECT id FROM employees WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let Some(employee_id) = employee_id else {
        debug!(user_id, "no employee profile, skipping status sync");
        return Ok(());
    };

    let active: Option<u64> = sqlx::query_scalar(
        r#"
        SELECT id FROM time_records
        WHERE employee_id = ? AND date = ? AND status = ?
        LIMIT 1
        "#,
    )
    .bind(employee_id)
    .bind(today_utc())
    .bind(RecordStatus::Active.to_string())
    .fetch_optional(pool)
    .await?;

    let status = if active.is_some() {
        EmployeeStatus::Connected
    } else {
        EmployeeStatus::Disconnected
    };

    sqlx::query("UPDATE employees SET status = ?, last_seen = ? WHERE id = ?")
        .bind(status.to_string())
        .bind(Utc::now())
        .bind(employee_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn verify(auth: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "user": {
            "id": auth.user_id,
            "username": auth.username,
            "name": auth.name,
            "role": auth.role.id(),
        }
    }))
}

/// Marks the caller disconnected and their presence offline. Best-effort:
/// clients that vanish without calling this are caught by the lazy
/// staleness check on presence reads.
pub async fn logout(auth: AuthUser, pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let now = Utc::now();

    sqlx::query("UPDATE employees SET status = ?, last_seen = ? WHERE user_id = ?")
        .bind(EmployeeStatus::Disconnected.to_string())
        .bind(now)
        .bind(auth.user_id)
        .execute(pool.get_ref())
        .await?;

    sqlx::query("UPDATE presence SET status = ?, last_activity = ? WHERE user_id = ?")
        .bind(PresenceStatus::Offline.to_string())
        .bind(now)
        .bind(auth.user_id)
        .execute(pool.get_ref())
        .await?;

    info!(user_id = auth.user_id, "logout");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Logged out"
    })))
}
