//! Payload login verification: a detached MAC over a base64 JSON payload.

use base64::{
    Engine,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD},
};
use tracing::debug;

use crate::{
    config::LoginConfig,
    error::{ConfigError, CredentialError, VerifyError},
    models::{LoginPayload, PayloadUser},
    utils::{
        credential::BotToken,
        hmac::{SecretKey, generate_signature, signatures_match},
        query::{parse_request_url, query_param},
    },
};

pub const HASH_PARAM: &str = "hash";
pub const PAYLOAD_PARAM: &str = "payload";

/// Verifies requests carrying `hash` and `payload` query parameters.
///
/// The signing key is `SHA-256(bot_token || public_identifier)` and the MAC
/// is computed over the payload exactly as it appears in the request, before
/// base64 decoding.
#[derive(Debug, Clone)]
pub struct PayloadVerifier {
    token: BotToken,
    key: SecretKey,
}

impl PayloadVerifier {
    pub fn new(config: &LoginConfig) -> Result<Self, ConfigError> {
        let public_identifier = config
            .public_identifier
            .as_deref()
            .ok_or(ConfigError::Missing {
                name: "publicIdentifier",
            })?;

        Self::from_credentials(config.credential.clone(), public_identifier)
    }

    pub fn from_credentials(
        token: impl Into<String>,
        public_identifier: &str,
    ) -> Result<Self, ConfigError> {
        let token = BotToken::new(token);
        if token.is_empty() {
            return Err(ConfigError::Missing { name: "credential" });
        }
        if public_identifier.is_empty() {
            return Err(ConfigError::Missing {
                name: "publicIdentifier",
            });
        }

        let key = SecretKey::derive(&[token.as_bytes(), public_identifier.as_bytes()]);
        Ok(Self { token, key })
    }

    pub fn bot_id(&self) -> Result<u64, CredentialError> {
        self.token.bot_id()
    }

    /// The hash the provider would have produced for the encoded `payload`.
    pub fn compute_hash(&self, payload: &str) -> Result<String, VerifyError> {
        // HMAC accepts keys of any length, so this cannot fail for a 32-byte key
        generate_signature(&self.key, payload.as_bytes()).map_err(|_| VerifyError::InvalidHash)
    }

    /// Verify `request_url` and return only the user it vouches for.
    pub fn verify(&self, request_url: &str) -> Result<PayloadUser, VerifyError> {
        self.verify_payload(request_url).map(|payload| payload.user)
    }

    /// Verify `request_url` and return the whole decoded payload.
    pub fn verify_payload(&self, request_url: &str) -> Result<LoginPayload, VerifyError> {
        let url = parse_request_url(request_url).map_err(|e| {
            debug!(error = %e, "Login request URL could not be parsed");
            VerifyError::MissingRequiredParameters
        })?;

        let (Some(hash), Some(encoded)) =
            (query_param(&url, HASH_PARAM), query_param(&url, PAYLOAD_PARAM))
        else {
            debug!("Login request lacks hash or payload parameter");
            return Err(VerifyError::MissingRequiredParameters);
        };

        let payload = decode_payload(&encoded)?;

        let expected = self.compute_hash(&encoded)?;
        if !signatures_match(&hash, &expected) {
            debug!(user_id = payload.user.id, "Rejecting payload with mismatched hash");
            return Err(VerifyError::InvalidHash);
        }

        Ok(payload)
    }
}

/// Decode a base64 (standard or URL-safe, padded or not) JSON login payload.
pub fn decode_payload(encoded: &str) -> Result<LoginPayload, VerifyError> {
    let bytes = [STANDARD, URL_SAFE, STANDARD_NO_PAD, URL_SAFE_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(encoded).ok())
        .ok_or_else(|| VerifyError::malformed_payload("payload is not valid base64"))?;

    serde_json::from_slice(&bytes).map_err(|e| {
        VerifyError::malformed_payload(format!("payload is not a login record: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = "eyJ1c2VyIjp7ImlkIjo0MiwiZmlyc3RfbmFtZSI6Ikl2YW4iLCJ1c2VybmFtZSI6InJlYWN0eSJ9LCJhdXRoX2RhdGUiOjE3MDAwMDAwMDB9";
    const PAYLOAD_HASH: &str = "10f89b903ae4c80c8ce90f703699860541f87743914b20a24376a974835cc875";

    fn verifier() -> PayloadVerifier {
        PayloadVerifier::from_credentials("123456:ABC", "pub-key-1").unwrap()
    }

    #[test]
    fn test_compute_hash_matches_known_vector() {
        assert_eq!(verifier().compute_hash(PAYLOAD).unwrap(), PAYLOAD_HASH);
    }

    #[test]
    fn test_key_depends_on_public_identifier() {
        let other = PayloadVerifier::from_credentials("123456:ABC", "pub-key-2").unwrap();
        assert_ne!(other.compute_hash(PAYLOAD).unwrap(), PAYLOAD_HASH);
    }

    #[test]
    fn test_decode_payload() {
        let payload = decode_payload(PAYLOAD).unwrap();
        assert_eq!(payload.user.id, 42);
        assert_eq!(payload.user.first_name, "Ivan");
        assert_eq!(payload.auth_date, Some(1700000000));
    }

    #[test]
    fn test_decode_payload_unpadded() {
        // "eyJ1c2VyIjp7ImlkIjoxLCJmaXJzdF9uYW1lIjoiQSJ9fQ" is {"user":{"id":1,"first_name":"A"}}
        let payload = decode_payload("eyJ1c2VyIjp7ImlkIjoxLCJmaXJzdF9uYW1lIjoiQSJ9fQ").unwrap();
        assert_eq!(payload.user.id, 1);
    }

    #[test]
    fn test_decode_payload_errors() {
        assert_eq!(
            decode_payload("%%%").unwrap_err(),
            VerifyError::malformed_payload("payload is not valid base64")
        );
        // base64 of "not json at all"
        assert_eq!(
            decode_payload("bm90IGpzb24gYXQgYWxs").unwrap_err().code(),
            "MALFORMED_PAYLOAD"
        );
    }

    #[test]
    fn test_missing_public_identifier() {
        assert_eq!(
            PayloadVerifier::from_credentials("123456:ABC", "").unwrap_err(),
            ConfigError::Missing {
                name: "publicIdentifier"
            }
        );
        assert!(PayloadVerifier::new(&LoginConfig::new("123456:ABC")).is_err());
    }
}
