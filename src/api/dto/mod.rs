//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod auth;
pub mod contacts;
pub mod health;
pub mod pagination;
pub mod users;

use serde::{Deserialize, Deserializer};

/// Deserializes a string with surrounding whitespace removed, so length
/// rules apply to what is stored.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}
