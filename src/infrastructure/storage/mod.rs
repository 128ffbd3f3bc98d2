//! Avatar image storage.
//!
//! - [`LocalAvatarStorage`] - Files on local disk, served under `/avatars`

mod local;
mod service;

pub use local::LocalAvatarStorage;
pub use service::AvatarStorage;
#[cfg(test)]
pub use service::MockAvatarStorage;
