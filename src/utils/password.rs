//! Password hashing with Argon2id.
//!
//! Request handling goes through [`spawn_hash_password`] and
//! [`spawn_verify_password`], which run on tokio's blocking pool. The sync
//! functions are for the admin CLI and tests.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde_json::json;
use std::sync::LazyLock;
use tokio::task::{JoinError, spawn_blocking};

use crate::error::AppError;

/// Hashes a password into a PHC string (`$argon2id$v=19$...`).
///
/// # Errors
///
/// Returns [`AppError::Internal`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AppError::internal("Failed to hash password", json!({}))
        })
}

/// Checks `password` against a stored PHC hash.
///
/// A malformed stored hash is treated as a mismatch.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hashed) else {
        tracing::warn!("Stored password hash is malformed");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Stand-in hash checked when the account does not exist, so a login for an
/// unknown email costs as much as one with a wrong password.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("no-such-account").unwrap_or_default());

fn join_error(e: JoinError) -> AppError {
    tracing::error!(error = %e, "Password task failed");
    AppError::internal("Password check failed", json!({}))
}

/// [`hash_password`] on the blocking pool.
pub async fn spawn_hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    spawn_blocking(move || hash_password(&password))
        .await
        .map_err(join_error)?
}

/// [`verify_password`] on the blocking pool.
///
/// With `hashed = None` the password is checked against a dummy hash and the
/// result is always `false`.
pub async fn spawn_verify_password(password: &str, hashed: Option<&str>) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hashed = hashed.map(str::to_owned);

    spawn_blocking(move || match hashed {
        Some(hashed) => verify_password(&password, &hashed),
        None => {
            let _ = verify_password(&password, &DUMMY_HASH);
            false
        }
    })
    .await
    .map_err(join_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret-pass").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("wrong-pass", &hash));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let a = hash_password("repeat").unwrap();
        let b = hash_password("repeat").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-hash"));
    }

    #[tokio::test]
    async fn test_spawned_hash_and_verify() {
        let hash = spawn_hash_password("s3cret-pass").await.unwrap();

        assert!(spawn_verify_password("s3cret-pass", Some(&hash)).await.unwrap());
        assert!(!spawn_verify_password("other", Some(&hash)).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_account_checks_a_real_hash() {
        assert!(DUMMY_HASH.starts_with("$argon2id$"));
        assert!(!spawn_verify_password("no-such-account", None).await.unwrap());
    }
}
