//! Local filesystem avatar storage.

use async_trait::async_trait;
use serde_json::json;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, error};
use uuid::Uuid;

use super::service::AvatarStorage;
use crate::error::AppError;

/// Writes avatars into a directory that the router serves at `/avatars`.
///
/// Files are named `{username}-{uuid}.{ext}`; a new upload never overwrites
/// a previous one. The replaced file is removed once the account points at
/// the new URL.
pub struct LocalAvatarStorage {
    dir: PathBuf,
    base_url: String,
}

impl LocalAvatarStorage {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// File name behind one of our own avatar URLs.
    fn file_name_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        let name = url
            .strip_prefix(self.base_url.as_str())?
            .strip_prefix("/avatars/")?;
        let plain = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !name.starts_with('.');
        plain.then_some(name)
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Keeps file names predictable whatever the username contains.
fn sanitize(owner: &str) -> String {
    owner
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[async_trait]
impl AvatarStorage for LocalAvatarStorage {
    async fn store(
        &self,
        owner: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        let ext = extension_for(content_type).ok_or_else(|| {
            AppError::bad_request(
                "Unsupported image type",
                json!({ "content_type": content_type, "allowed": ["image/png", "image/jpeg", "image/gif", "image/webp"] }),
            )
        })?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            error!(error = %e, dir = %self.dir.display(), "Failed to create avatar directory");
            AppError::internal("Failed to store avatar", json!({}))
        })?;

        let file_name = format!("{}-{}.{}", sanitize(owner), Uuid::new_v4().simple(), ext);
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            error!(error = %e, path = %path.display(), "Failed to write avatar");
            AppError::internal("Failed to store avatar", json!({}))
        })?;

        debug!(owner, file = %file_name, size = bytes.len(), "Avatar stored");

        Ok(format!("{}/avatars/{}", self.base_url, file_name))
    }

    async fn remove(&self, url: &str) -> Result<(), AppError> {
        let Some(file_name) = self.file_name_of(url) else {
            return Ok(());
        };
        let path = self.dir.join(file_name);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(file = %file_name, "Avatar removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!(error = %e, path = %path.display(), "Failed to remove avatar");
                Err(AppError::internal("Failed to remove avatar", json!({})))
            }
        }
    }
}
