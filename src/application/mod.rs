//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers. They are generic over the repository so tests can plug in
//! `mockall` mocks, while [`crate::state::AppState`] holds them over trait
//! objects.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Registration, login and email flows
//! - [`services::token_service::TokenService`] - JWT issuing and verification
//! - [`services::user_service::UserService`] - Profile updates and user listings
//! - [`services::contact_service::ContactService`] - Contacts, search and birthdays

pub mod services;
