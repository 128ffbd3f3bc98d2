//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`email_event`] - Outgoing email model
//! - [`email_worker`] - Asynchronous email delivery worker
//!
//! Repository traits define contracts implemented by the infrastructure layer;
//! business rules live in [`crate::application::services`].
//!
//! # Email Flow
//!
//! 1. An auth handler creates an [`email_event::EmailEvent`] with a signed token
//! 2. The event is pushed to a bounded channel (non-blocking)
//! 3. [`email_worker::run_email_worker`] renders it and delivers it with retries

pub mod email_event;
pub mod email_worker;
pub mod entities;
pub mod repositories;
