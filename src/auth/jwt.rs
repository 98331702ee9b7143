use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::models::Claims;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

pub fn generate_token(
    user_id: u64,
    username: String,
    name: String,
    role: u8,
    secret: &str,
    ttl: usize,
) -> String {
    let claims = Claims {
        user_id,
        sub: username,
        name,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = generate_token(7, "juan.perez".into(), "Juan Perez".into(), 2, "s3cret", 60);
        let claims = verify_token(&token, "s3cret").unwrap();

        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.sub, "juan.perez");
        assert_eq!(claims.name, "Juan Perez");
        assert_eq!(claims.role, 2);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_token(7, "juan.perez".into(), "Juan Perez".into(), 2, "s3cret", 60);
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = generate_token(7, "juan.perez".into(), "Juan Perez".into(), 2, "s3cret", 60);
        let mut tampered = token.clone();
        tampered.truncate(token.len() - 2);
        assert!(verify_token(&tampered, "s3cret").is_err());
    }

    #[test]
    fn tokens_get_unique_ids() {
        let a = verify_token(
            &generate_token(7, "a".into(), "A".into(), 2, "s3cret", 60),
            "s3cret",
        )
        .unwrap();
        let b = verify_token(
            &generate_token(7, "a".into(), "A".into(), 2, "s3cret", 60),
            "s3cret",
        )
        .unwrap();
        assert_ne!(a.jti, b.jti);
    }
}
