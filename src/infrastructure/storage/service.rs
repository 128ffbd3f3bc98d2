//! Avatar storage trait.

use async_trait::async_trait;

use crate::error::AppError;

/// Persists uploaded avatar images and returns their public URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvatarStorage: Send + Sync {
    /// Stores `bytes` for the user named `owner`.
    ///
    /// # Returns
    ///
    /// Absolute URL at which the image can be fetched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for unsupported image types.
    async fn store(
        &self,
        owner: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AppError>;

    /// Deletes an avatar previously returned by [`Self::store`].
    ///
    /// URLs this storage did not hand out (such as Gravatar defaults) and
    /// files that are already gone are ignored.
    async fn remove(&self, url: &str) -> Result<(), AppError>;
}
