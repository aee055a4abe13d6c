//! Password hashing and the logged-in session.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

use crate::models::User;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user and wrong password share one message.
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Only administrators can {0}")]
    AdminRequired(&'static str),
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub is_admin: bool,
}

impl Session {
    pub fn require_admin(&self, action: &'static str) -> Result<(), AuthError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AuthError::AdminRequired(action))
        }
    }
}

/// Checks `password` against the looked-up account.
pub fn authenticate(user: Option<User>, password: &str) -> Result<Session, AuthError> {
    let user = user.ok_or(AuthError::InvalidCredentials)?;
    if !verify_password(password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(Session {
        user_id: user.id,
        username: user.username,
        full_name: user.full_name,
        is_admin: user.is_admin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(password: &str, is_admin: bool) -> User {
        User {
            id: 3,
            username: "nadia".to_string(),
            password_hash: hash_password(password).expect("hashes"),
            full_name: "Nadia Aoun".to_string(),
            is_admin,
        }
    }

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let first = hash_password("s3cret").unwrap();
        let second = hash_password("s3cret").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert!(verify_password("s3cret", &first));
        assert!(!verify_password("S3cret", &first));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "plain-text"));
    }

    #[test]
    fn login_builds_session_from_user() {
        let session = authenticate(Some(account("pw", true)), "pw").expect("login succeeds");
        assert_eq!(session.user_id, 3);
        assert_eq!(session.username, "nadia");
        assert!(session.is_admin);
    }

    #[test]
    fn unknown_user_and_wrong_password_look_the_same() {
        let missing = authenticate(None, "pw").unwrap_err();
        let wrong = authenticate(Some(account("pw", false)), "nope").unwrap_err();
        assert_eq!(missing.to_string(), wrong.to_string());
    }

    #[test]
    fn deletes_are_admin_only() {
        let clerk = authenticate(Some(account("pw", false)), "pw").unwrap();
        let err = clerk.require_admin("delete contracts").unwrap_err();
        assert_eq!(err.to_string(), "Only administrators can delete contracts");

        let admin = authenticate(Some(account("pw", true)), "pw").unwrap();
        assert!(admin.require_admin("delete contracts").is_ok());
    }
}
