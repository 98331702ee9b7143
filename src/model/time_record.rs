use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One check-in attempt. Created on check-in with `status = active`;
/// check-out fills `clock_out` and `hours_worked` and moves it to
/// `completed`. Several completed rows may share a date, but the database
/// rejects a second active row per (employee, date).
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct TimeRecord {
    #[schema(example = 42)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    /// UTC calendar day of the session.
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "2024-01-01T09:00:00Z", value_type = String, format = "date-time")]
    pub clock_in: DateTime<Utc>,

    #[schema(example = "2024-01-01T17:30:00Z", value_type = Option<String>, format = "date-time")]
    pub clock_out: Option<DateTime<Utc>>,

    /// Hours between clock-in and clock-out, 2-decimal precision.
    #[schema(example = 8.5)]
    pub hours_worked: Option<f64>,

    #[schema(example = "completed")]
    pub status: String,

    pub notes: Option<String>,
}
