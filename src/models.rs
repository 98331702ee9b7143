use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "juan.perez")]
    pub username: String,
    #[schema(example = "secret")]
    pub password: String,
}

#[derive(FromRow)]
pub struct UserSql {
    pub id: u64, // matches BIGINT UNSIGNED
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub email: String,
    pub role_id: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// Username.
    pub sub: String,
    /// Display name; presence and chat snapshot this.
    pub name: String,
    /// Role id, see model::role::Role.
    pub role: u8,
    pub exp: usize,
    pub jti: String,
}
