//! Repository trait for contacts.

use crate::domain::entities::{BirthdayWindow, Contact, ContactData};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for a user's contacts.
///
/// Every operation takes the owner's `user_id` and only ever touches rows
/// belonging to that user. A contact owned by someone else is reported
/// exactly like a missing one.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgContactRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_contacts.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Lists the user's contacts ordered by ID.
    async fn list(&self, user_id: i64, skip: i64, limit: i64) -> Result<Vec<Contact>, AppError>;

    /// Finds one of the user's contacts.
    async fn find_by_id(&self, id: i64, user_id: i64) -> Result<Option<Contact>, AppError>;

    /// Creates a contact owned by `user_id`.
    async fn create(&self, user_id: i64, data: ContactData) -> Result<Contact, AppError>;

    /// Replaces all writable fields of a contact.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(contact))` with the updated row
    /// - `Ok(None)` if the user has no contact with this ID
    async fn update(
        &self,
        id: i64,
        user_id: i64,
        data: ContactData,
    ) -> Result<Option<Contact>, AppError>;

    /// Deletes a contact and returns the removed row.
    async fn delete(&self, id: i64, user_id: i64) -> Result<Option<Contact>, AppError>;

    /// Case-insensitive substring search over first name, last name and email.
    ///
    /// Wildcard characters in `text` are matched literally.
    async fn search(
        &self,
        user_id: i64,
        text: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Contact>, AppError>;

    /// Contacts whose birthday (month and day) falls into `window`.
    async fn upcoming_birthdays(
        &self,
        user_id: i64,
        window: BirthdayWindow,
    ) -> Result<Vec<Contact>, AppError>;
}
