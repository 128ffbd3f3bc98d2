//! Helper functions shared across layers.
//!
//! - [`password`] - Argon2 password hashing and verification
//! - [`gravatar`] - Default avatar URLs
//! - [`like`] - Escaping for SQL `LIKE` patterns

pub mod gravatar;
pub mod like;
pub mod password;
