//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access; concrete PostgreSQL implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - User accounts, credentials and roles
//! - [`ContactRepository`] - Per-user contacts, search and birthdays
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod contact_repository;
pub mod user_repository;

pub use contact_repository::ContactRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use contact_repository::MockContactRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
