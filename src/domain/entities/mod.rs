//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs live next to the entity
//! they produce (`NewUser`, `ContactData`).
//!
//! - [`User`] / [`UserRole`] - Registered accounts and their access level
//! - [`Contact`] - Address book entries owned by a user
//! - [`BirthdayWindow`] - Month/day range used for upcoming-birthday lookups

pub mod birthday;
pub mod contact;
pub mod user;

pub use birthday::{BirthdayWindow, month_day};
pub use contact::{Contact, ContactData};
pub use user::{NewUser, User, UserRole, normalize_email};
