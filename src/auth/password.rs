use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

pub fn hash_password(password: &str) -> String {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

pub fn verify_password(password: &str, hashed: &str) -> Result<(), argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let parsed = PasswordHash::new(hashed)?;

    argon2.verify_password(password.as_bytes(), &parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hashed = hash_password("secret");
        assert!(verify_password("secret", &hashed).is_ok());
        assert!(verify_password("not-the-secret", &hashed).is_err());
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash_password("secret"), hash_password("secret"));
    }

    #[test]
    fn garbage_hash_is_rejected() {
        assert!(verify_password("secret", "not-a-phc-string").is_err());
    }
}
