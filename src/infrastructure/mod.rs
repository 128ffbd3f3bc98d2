//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for persistence, caching, mail and file storage.
//!
//! # Modules
//!
//! - [`cache`] - User cache (Redis and no-op implementations)
//! - [`mail`] - Email rendering and delivery
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`storage`] - Avatar image storage

pub mod cache;
pub mod mail;
pub mod persistence;
pub mod storage;
