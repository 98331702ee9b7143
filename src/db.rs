use anyhow::Result;
use sqlx::MySqlPool;
use tracing::info;

use crate::auth::password::hash_password;

pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPool::connect(database_url)
        .await
        .expect("Failed to connect to database")
}

/// Idempotent startup DDL.
///
/// `active_slot` is a stored generated column that is 1 while a record is
/// active and NULL otherwise; the unique key over (employee_id, date,
/// active_slot) therefore rejects a second active session per employee and
/// day at the database level while letting any number of completed rows
/// coexist (NULLs never collide in a unique key).
const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        username VARCHAR(64) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        full_name VARCHAR(128) NOT NULL,
        email VARCHAR(128) NOT NULL,
        role_id TINYINT UNSIGNED NOT NULL DEFAULT 2,
        created_at TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
        last_login_at TIMESTAMP(3) NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        user_id BIGINT UNSIGNED NOT NULL UNIQUE,
        name VARCHAR(128) NOT NULL,
        department VARCHAR(64) NOT NULL DEFAULT 'General',
        work_mode VARCHAR(16) NOT NULL DEFAULT 'onsite',
        status VARCHAR(16) NOT NULL DEFAULT 'disconnected',
        last_seen TIMESTAMP(3) NULL,
        created_at TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
        CONSTRAINT fk_employees_user
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS time_records (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        employee_id BIGINT UNSIGNED NOT NULL,
        date DATE NOT NULL,
        clock_in TIMESTAMP(3) NOT NULL,
        clock_out TIMESTAMP(3) NULL,
        hours_worked DOUBLE NULL,
        status VARCHAR(16) NOT NULL DEFAULT 'active',
        notes TEXT NULL,
        active_slot TINYINT GENERATED ALWAYS AS (IF(status = 'active', 1, NULL)) STORED,
        UNIQUE KEY uq_active_session (employee_id, date, active_slot),
        KEY idx_time_records_day (employee_id, date),
        CONSTRAINT fk_time_records_employee
            FOREIGN KEY (employee_id) REFERENCES employees (id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS presence (
        user_id BIGINT UNSIGNED PRIMARY KEY,
        display_name VARCHAR(128) NOT NULL,
        status VARCHAR(16) NOT NULL DEFAULT 'offline',
        last_activity TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
        CONSTRAINT fk_presence_user
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS chat_messages (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        user_id BIGINT UNSIGNED NOT NULL,
        display_name VARCHAR(128) NOT NULL,
        message TEXT NOT NULL,
        created_at TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
        KEY idx_chat_created (created_at),
        CONSTRAINT fk_chat_user
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
    )
    "#,
];

pub async fn ensure_schema(pool: &MySqlPool) -> Result<()> {
    for ddl in DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    info!("Schema ready");
    Ok(())
}

/// Creates the default admin account on an empty installation.
pub async fn seed_admin(pool: &MySqlPool) -> Result<()> {
    let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role_id = 1")
        .fetch_one(pool)
        .await?;

    if admins > 0 {
        return Ok(());
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let hashed = hash_password(&password);

    sqlx::query(
        r#"
        INSERT INTO users (username, password_hash, full_name, email, role_id)
        VALUES (?, ?, ?, ?, 1)
        "#,
    )
    .bind("admin")
    .bind(hashed)
    .bind("Administrator")
    .bind("admin@localhost")
    .execute(pool)
    .await?;

    info!("Seeded default admin account");
    Ok(())
}
