//! DTOs for user endpoints.

use serde::Serialize;

use crate::domain::entities::{User, UserRole};

/// Public view of a user; never exposes the password hash or refresh token.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub confirmed: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
            role: user.role,
            confirmed: user.confirmed,
        }
    }
}
