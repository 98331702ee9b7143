use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ChatMessage {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 7)]
    pub user_id: u64,

    /// Sender name snapshotted at send time.
    #[schema(example = "Juan Perez")]
    pub display_name: String,

    #[schema(example = "Good morning!")]
    pub message: String,

    #[schema(example = "2024-01-01T09:05:00Z", value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
