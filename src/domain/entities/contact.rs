//! Contact entity owned by a user.

use chrono::{DateTime, NaiveDate, Utc};

/// An address book entry.
///
/// Every contact belongs to exactly one user (`user_id`); repositories never
/// return a contact to anyone else.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub description: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable contact fields, used for both create and full update.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub description: Option<String>,
}
