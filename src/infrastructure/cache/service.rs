//! Cache service trait and error types.

use crate::domain::entities::User;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache of authenticated users, keyed by email.
///
/// Every authenticated request resolves the token's subject to a [`User`];
/// the cache spares a database round-trip for repeat callers.
///
/// Implementations must be thread-safe and fail open: a broken cache degrades
/// to database lookups instead of failing requests.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a cached user by email.
    ///
    /// A cached user carries no credentials: `hashed_password` is empty and
    /// `refresh_token` is `None`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(user))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_user(&self, email: &str) -> CacheResult<Option<User>>;

    /// Stores a user with optional TTL.
    ///
    /// `ttl_seconds = None` uses the implementation's default TTL.
    async fn set_user(&self, user: &User, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes a cached user.
    ///
    /// Called whenever the stored row changes (avatar, password, role),
    /// including role and confirmation changes made by the `admin` CLI.
    async fn invalidate_user(&self, email: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
