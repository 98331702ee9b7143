use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::chat_message::ChatMessage;

const HISTORY_LIMIT: i64 = 100;

#[derive(Deserialize, ToSchema)]
pub struct PostMessage {
    #[schema(example = "Good morning!")]
    pub message: String,
}

/// Send a chat message
#[utoipa::path(
    post,
    path = "/api/chat/messages",
    request_body = PostMessage,
    responses(
        (status = 200, description = "Message stored", body = Object),
        (status = 400, description = "Empty message"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Chat"
)]
pub async fn post_message(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    body: web::Json<PostMessage>,
) -> Result<HttpResponse, ApiError> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".into()));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO chat_messages (user_id, display_name, message)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(auth.user_id)
    .bind(&auth.name)
    .bind(message)
    .execute(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "id": result.last_insert_id(),
            "user_id": auth.user_id,
            "display_name": auth.name,
            "message": message,
        }
    })))
}

/// Message history
///
/// The newest 100 messages, returned oldest-first for display.
#[utoipa::path(
    get,
    path = "/api/chat/messages",
    responses(
        (status = 200, description = "Chronological message history", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Chat"
)]
pub async fn list_messages(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let mut messages = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, user_id, display_name, message, created_at
        FROM chat_messages
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(HISTORY_LIMIT)
    .fetch_all(pool.get_ref())
    .await?;

    messages.reverse();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": messages
    })))
}
