//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod contacts;
pub mod health;
pub mod users;

pub use auth::{
    change_password_handler, confirmed_email_handler, login_handler, refresh_token_handler,
    register_handler, request_email_handler, reset_password_handler,
};
pub use contacts::{
    create_contact_handler, delete_contact_handler, get_contact_handler, list_contacts_handler,
    search_contacts_handler, update_contact_handler, upcoming_birthdays_handler,
};
pub use health::{health_handler, root_handler};
pub use users::{list_users_handler, me_handler, update_avatar_handler};
