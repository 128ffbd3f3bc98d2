//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Statements
//! are checked at runtime, so the crate builds without a live database.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - User accounts, credentials and roles
//! - [`PgContactRepository`] - Contacts, search and upcoming birthdays

pub mod pg_contact_repository;
pub mod pg_user_repository;

pub use pg_contact_repository::PgContactRepository;
pub use pg_user_repository::PgUserRepository;
