//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User, UserRole};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user accounts.
///
/// Emails are stored normalized (see [`crate::domain::entities::normalize_email`]);
/// lookups by email are case-insensitive.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_users.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by database ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Finds a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Finds a user by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the username or email is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Marks the user's email as confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this email.
    async fn confirm_email(&self, email: &str) -> Result<(), AppError>;

    /// Replaces the avatar URL and returns the updated user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this email.
    async fn update_avatar(&self, email: &str, url: &str) -> Result<User, AppError>;

    /// Stores (or clears, with `None`) the user's current refresh token.
    async fn update_refresh_token(
        &self,
        user_id: i64,
        refresh_token: Option<String>,
    ) -> Result<(), AppError>;

    /// Replaces the password hash.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this email.
    async fn update_password(&self, email: &str, hashed_password: &str) -> Result<(), AppError>;

    /// Changes the user's role and returns the updated user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this email.
    async fn set_role(&self, email: &str, role: UserRole) -> Result<User, AppError>;

    /// Lists users ordered by ID.
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, AppError>;

    /// Checks database connectivity.
    async fn ping(&self) -> Result<(), AppError>;
}
