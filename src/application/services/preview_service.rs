//! Preview token authentication.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashSet;

use crate::pipeline::context::{Claim, Principal};

type HmacSha256 = Hmac<Sha256>;

/// Grants preview claims to holders of a configured preview token.
///
/// Tokens are never configured in clear text: the service only knows their
/// HMAC-SHA256 hashes, keyed by a server-side signing secret. Use
/// `admin token hash <token>` to produce the hash for `PREVIEW_TOKEN_HASHES`.
pub struct PreviewService {
    signing_secret: String,
    token_hashes: HashSet<String>,
}

impl PreviewService {
    /// Creates a new preview service.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key; must match the value used when hashing tokens
    /// - `token_hashes` - lowercase hex hashes of the accepted tokens
    pub fn new(signing_secret: String, token_hashes: impl IntoIterator<Item = String>) -> Self {
        Self {
            signing_secret,
            token_hashes: token_hashes
                .into_iter()
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// A service that accepts no tokens.
    pub fn disabled() -> Self {
        Self::new(String::new(), Vec::new())
    }

    /// Hashes a raw token with HMAC-SHA256 using the signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn hash_token(signing_secret: &str, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Resolves the principal for an optional bearer token.
    ///
    /// A recognized token yields both preview claims; a missing or unknown
    /// token yields an anonymous principal. The public site never rejects a
    /// request because of a bad token.
    pub fn principal_for(&self, token: Option<&str>) -> Principal {
        match token {
            Some(token) if self.is_valid(token) => {
                Principal::with_claims([Claim::PagePreview, Claim::PostPreview])
            }
            _ => Principal::anonymous(),
        }
    }

    fn is_valid(&self, token: &str) -> bool {
        if self.token_hashes.is_empty() || self.signing_secret.is_empty() {
            return false;
        }
        let hash = Self::hash_token(&self.signing_secret, token);
        self.token_hashes.contains(&hash)
    }
}
