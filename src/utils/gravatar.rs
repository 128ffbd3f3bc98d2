//! Default avatars from Gravatar.

use sha2::{Digest, Sha256};

const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar";

/// Gravatar image URL for `email`.
///
/// The hash is taken over the trimmed, lowercased address. `d=identicon`
/// makes Gravatar generate an image for addresses without an account.
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!("{}/{}?d=identicon", GRAVATAR_BASE, hex::encode(digest))
}
