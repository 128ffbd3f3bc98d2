//! HTTP surface of the contacts service.
//!
//! Three route groups live under `/api`:
//!
//! - `/api/auth`: registration, login, token refresh, email confirmation and password reset
//! - `/api/users`: the current account, avatar upload and the moderator user list
//! - `/api/contacts`: the caller's address book, search and upcoming birthdays
//!
//! Request bodies are parsed into [`dto`] types through the [`extract`]
//! wrappers, validated, and passed to the
//! application services by [`handlers`].

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
