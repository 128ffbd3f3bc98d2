//! Request middleware.
//!
//! - [`auth`]: bearer token check that puts the [`User`](crate::domain::entities::User)
//!   into request extensions, plus [`require_role`](auth::require_role)
//! - [`rate_limit`]: per-IP limiter in front of `/api/users/me`
//! - [`tracing`]: request spans that log the path without the query string

pub mod auth;
pub mod rate_limit;
pub mod tracing;
