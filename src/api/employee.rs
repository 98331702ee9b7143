use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::password::hash_password;
use crate::error::ApiError;
use crate::model::employee::Employee;
use crate::model::status::WorkMode;

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Juan Perez")]
    pub name: String,
    #[schema(example = "Engineering")]
    pub department: Option<String>,
    #[schema(example = "remote")]
    pub work_mode: Option<WorkMode>,
    #[schema(example = "juan.perez")]
    pub username: String,
    #[schema(example = "juan.perez@company.com", format = "email")]
    pub email: String,
    #[schema(example = "secret")]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub department: Option<String>,
    pub work_mode: Option<WorkMode>,
    #[schema(format = "email")]
    pub email: Option<String>,
}

/// Employee row joined with its account.
#[derive(serde::Serialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub employee: Employee,
    pub username: String,
    pub email: String,
    pub role: u8,
}

/// Normalizes an optional update field: absent stays absent, but a
/// whitespace-only value is rejected instead of overwriting the stored
/// value with an empty string.
fn trimmed_non_empty<'a>(
    value: Option<&'a str>,
    field: &str,
) -> Result<Option<&'a str>, ApiError> {
    match value.map(str::trim) {
        Some("") => Err(ApiError::BadRequest(format!("{field} cannot be empty"))),
        other => Ok(other),
    }
}

const DETAIL_COLUMNS: &str = r#"
    e.id, e.user_id, e.name, e.department, e.work_mode, e.status,
    e.last_seen, e.created_at,
    u.username, u.email, u.role_id AS role
"#;

/// List employees (admin)
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, newest first", body = Object),
        (status = 403, description = "Admin only"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let sql = format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM employees e
        JOIN users u ON u.id = e.user_id
        ORDER BY e.created_at DESC
        "#
    );

    let employees = sqlx::query_as::<_, EmployeeDetail>(&sql)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": employees
    })))
}

/// Get one employee
///
/// Admins can read anyone; everyone else only their own profile.
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeDetail),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let sql = format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM employees e
        JOIN users u ON u.id = e.user_id
        WHERE e.id = ?
        "#
    );

    let detail = sqlx::query_as::<_, EmployeeDetail>(&sql)
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".into()))?;

    if !auth.is_admin() && detail.employee.user_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "You cannot view this employee".into(),
        ));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": detail
    })))
}

/// Create employee (admin)
///
/// Provisions the account row and the employee row together; either both
/// exist afterwards or neither does.
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "success": true,
            "message": "Employee created"
        })),
        (status = 400, description = "Missing required fields"),
        (status = 409, description = "Username or email already exists"),
        (status = 403, description = "Admin only"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    body: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let name = body.name.trim();
    let username = body.username.trim().to_lowercase();
    let email = body.email.trim();

    if name.is_empty() || username.is_empty() || email.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Name, username, email and password are required".into(),
        ));
    }

    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? OR email = ?)",
    )
    .bind(&username)
    .bind(email)
    .fetch_one(pool.get_ref())
    .await?;

    if taken {
        return Err(ApiError::Conflict(
            "Username or email already exists".into(),
        ));
    }

    let hashed = hash_password(&body.password);
    let department = body.department.as_deref().unwrap_or("General");
    let work_mode = body.work_mode.unwrap_or(WorkMode::Onsite);

    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO users (username, password_hash, full_name, email, role_id)
        VALUES (?, ?, ?, ?, 2)
        "#,
    )
    .bind(&username)
    .bind(&hashed)
    .bind(name)
    .bind(email)
    .execute(&mut *tx)
    .await;

    let user_id = match inserted {
        Ok(res) => res.last_insert_id(),
        Err(e) => {
            // Unique-key race on username
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Err(ApiError::Conflict(
                        "Username or email already exists".into(),
                    ));
                }
            }
            return Err(e.into());
        }
    };

    sqlx::query(
        r#"
        INSERT INTO employees (user_id, name, department, work_mode)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(department)
    .bind(work_mode.to_string())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(user_id, "employee created");

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Employee created"
    })))
}

/// Update employee
///
/// Admins can edit anyone; everyone else only their own profile.
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Object, example = json!({
            "success": true,
            "message": "Employee updated"
        })),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let owner_id: u64 = sqlx::query_scalar("SELECT user_id FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".into()))?;

    if !auth.is_admin() && owner_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "You cannot edit this employee".into(),
        ));
    }

    let name = trimmed_non_empty(body.name.as_deref(), "name")?;
    let department = trimmed_non_empty(body.department.as_deref(), "department")?;
    let email = trimmed_non_empty(body.email.as_deref(), "email")?;

    // Both tables move in one transaction; a failed email write must not
    // leave the profile half-updated.
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE employees
        SET name = COALESCE(?, name),
            department = COALESCE(?, department),
            work_mode = COALESCE(?, work_mode)
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(department)
    .bind(body.work_mode.map(|m| m.to_string()))
    .bind(employee_id)
    .execute(&mut *tx)
    .await?;

    if let Some(email) = email {
        sqlx::query("UPDATE users SET email = ? WHERE id = ?")
            .bind(email)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Employee updated"
    })))
}

/// Delete employee (admin)
///
/// Removes the account; the employee row, time records, presence and chat
/// history follow via ON DELETE CASCADE.
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deleted", body = Object, example = json!({
            "success": true,
            "message": "Employee deleted"
        })),
        (status = 404, description = "Employee not found"),
        (status = 403, description = "Admin only"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;
    let employee_id = path.into_inner();

    let owner_id: u64 = sqlx::query_scalar("SELECT user_id FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".into()))?;

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(owner_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "failed to delete employee");
            ApiError::Internal
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Employee not found".into()));
    }

    info!(employee_id, owner_id, "employee deleted");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Employee deleted"
    })))
}

/// Search employees (admin)
#[utoipa::path(
    get,
    path = "/api/employees/search/{query}",
    params(("query", Path, description = "Matched against name, department and username")),
    responses(
        (status = 200, description = "Matching employees ordered by name", body = Object),
        (status = 403, description = "Admin only"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn search_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let like = format!("%{}%", path.into_inner());

    let sql = format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM employees e
        JOIN users u ON u.id = e.user_id
        WHERE e.name LIKE ? OR e.department LIKE ? OR u.username LIKE ?
        ORDER BY e.name
        "#
    );

    let employees = sqlx::query_as::<_, EmployeeDetail>(&sql)
        .bind(&like)
        .bind(&like)
        .bind(&like)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": employees
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_fields_are_trimmed() {
        assert_eq!(
            trimmed_non_empty(Some("  Juan Perez "), "name").unwrap(),
            Some("Juan Perez")
        );
    }

    #[test]
    fn absent_update_fields_pass_through() {
        assert_eq!(trimmed_non_empty(None, "name").unwrap(), None);
    }

    #[test]
    fn whitespace_only_update_is_rejected() {
        let err = trimmed_non_empty(Some("   "), "name").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "name cannot be empty"));

        assert!(trimmed_non_empty(Some(""), "email").is_err());
    }
}
