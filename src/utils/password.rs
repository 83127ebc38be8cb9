//! 密码哈希工具模块
//!
//! Argon2id hashing for the admin secret and account passwords.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::BiolinkError;

#[derive(Debug)]
pub enum PasswordError {
    Hash(String),
    MalformedHash(String),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hash(msg) => write!(f, "Password hash error: {}", msg),
            Self::MalformedHash(msg) => write!(f, "Malformed password hash: {}", msg),
        }
    }
}

impl std::error::Error for PasswordError {}

impl From<PasswordError> for BiolinkError {
    fn from(err: PasswordError) -> Self {
        BiolinkError::config(err.to_string())
    }
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// `Ok(false)` on mismatch, `Err` only when `hash` itself is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn is_argon2_hash(s: &str) -> bool {
    s.starts_with("$argon2")
}

/// 配置中的密钥：已哈希则原样保留，明文则哈希
pub fn prepare_secret(raw: &str) -> Result<String, PasswordError> {
    if is_argon2_hash(raw) {
        PasswordHash::new(raw).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        Ok(raw.to_string())
    } else {
        hash_password(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();

        assert!(is_argon2_hash(&hash));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_prepare_secret_keeps_existing_hash() {
        let hash = hash_password("admin").unwrap();
        assert_eq!(prepare_secret(&hash).unwrap(), hash);

        let fresh = prepare_secret("admin").unwrap();
        assert_ne!(fresh, "admin");
        assert!(verify_password("admin", &fresh).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("x", "$argon2id$garbage").is_err());
        assert!(prepare_secret("$argon2id$garbage").is_err());
    }
}
