//! HMAC-SHA256 and SHA-256 primitives.
//!
//! Every function here is stateless: a fresh hasher is created per call and
//! nothing is shared between verifications.

use std::fmt;

use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// A 32-byte HMAC key derived from provider credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Derive a key as SHA-256 over the concatenation of `parts`.
    pub fn derive(parts: &[&[u8]]) -> Self {
        Self(sha256_digest(parts))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

/// SHA-256 over the concatenation of `parts`.
pub fn sha256_digest(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Generate a lowercase hex HMAC-SHA256 of `message` keyed by `key`
pub fn generate_signature(key: &SecretKey, message: &[u8]) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Exact string comparison that does not exit early on the first differing byte.
pub fn signatures_match(supplied: &str, expected: &str) -> bool {
    supplied.as_bytes().ct_eq(expected.as_bytes()).into()
}
