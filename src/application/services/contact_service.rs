//! Contact management service.

use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{BirthdayWindow, Contact, ContactData};
use crate::domain::repositories::ContactRepository;
use crate::error::AppError;

fn contact_not_found(id: i64) -> AppError {
    AppError::not_found("Contact not found", json!({ "contact_id": id }))
}

/// Service for a user's contacts.
///
/// Every call is scoped to the owner's ID.
pub struct ContactService<R: ContactRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ContactRepository + ?Sized> ContactService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn list_contacts(
        &self,
        user_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Contact>, AppError> {
        self.repository.list(user_id, skip, limit).await
    }

    pub async fn search_contacts(
        &self,
        user_id: i64,
        text: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Contact>, AppError> {
        self.repository.search(user_id, text, skip, limit).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user has no contact with this ID.
    pub async fn get_contact(&self, id: i64, user_id: i64) -> Result<Contact, AppError> {
        self.repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| contact_not_found(id))
    }

    pub async fn create_contact(&self, user_id: i64, data: ContactData) -> Result<Contact, AppError> {
        self.repository.create(user_id, data).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user has no contact with this ID.
    pub async fn update_contact(
        &self,
        id: i64,
        user_id: i64,
        data: ContactData,
    ) -> Result<Contact, AppError> {
        self.repository
            .update(id, user_id, data)
            .await?
            .ok_or_else(|| contact_not_found(id))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user has no contact with this ID.
    pub async fn remove_contact(&self, id: i64, user_id: i64) -> Result<Contact, AppError> {
        self.repository
            .delete(id, user_id)
            .await?
            .ok_or_else(|| contact_not_found(id))
    }

    /// Contacts with a birthday between `today` and `today + days`.
    pub async fn upcoming_birthdays(
        &self,
        user_id: i64,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<Contact>, AppError> {
        let window = BirthdayWindow::starting(today, days);
        self.repository.upcoming_birthdays(user_id, window).await
    }
}
