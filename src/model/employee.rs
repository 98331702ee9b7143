use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "user_id": 7,
        "name": "Juan Perez",
        "department": "Engineering",
        "work_mode": "remote",
        "status": "disconnected",
        "last_seen": "2024-01-01T17:30:00Z",
        "created_at": "2023-06-01T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    /// Owning account. Exactly one employee row per account.
    #[schema(example = 7)]
    pub user_id: u64,

    #[schema(example = "Juan Perez")]
    pub name: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "remote")]
    pub work_mode: String,

    #[schema(example = "disconnected")]
    pub status: String,

    #[schema(example = "2024-01-01T17:30:00Z", value_type = Option<String>, format = "date-time")]
    pub last_seen: Option<DateTime<Utc>>,

    #[schema(example = "2023-06-01T09:00:00Z", value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
