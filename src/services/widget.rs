//! Login Widget verification: a MAC over discrete signed fields.

use chrono::Utc;
use tracing::debug;

use crate::{
    config::LoginConfig,
    error::{ConfigError, CredentialError, VerifyError},
    models::IdentityClaim,
    utils::{
        credential::BotToken,
        hmac::{SecretKey, generate_signature, signatures_match},
    },
};

/// Verifies Login Widget callbacks.
///
/// The signing key is `SHA-256(bot_token)`; the MAC is HMAC-SHA256 over the
/// claim's data-check-string. The verifier is immutable once built and can be
/// shared between threads.
#[derive(Debug, Clone)]
pub struct WidgetVerifier {
    token: BotToken,
    key: SecretKey,
    freshness_window: Option<u64>,
}

impl WidgetVerifier {
    /// Build a verifier from configuration. Only the credential and the
    /// freshness window are used.
    pub fn new(config: &LoginConfig) -> Result<Self, ConfigError> {
        Self::from_token(config.credential.clone(), config.freshness_window())
    }

    pub fn from_token(
        token: impl Into<String>,
        freshness_window: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let token = BotToken::new(token);
        if token.is_empty() {
            return Err(ConfigError::Missing { name: "credential" });
        }

        let key = SecretKey::derive(&[token.as_bytes()]);
        Ok(Self {
            token,
            key,
            freshness_window: freshness_window.filter(|seconds| *seconds > 0),
        })
    }

    pub fn bot_id(&self) -> Result<u64, CredentialError> {
        self.token.bot_id()
    }

    pub fn freshness_window(&self) -> Option<u64> {
        self.freshness_window
    }

    /// The hash the provider would have produced for `claim`.
    pub fn compute_hash(&self, claim: &IdentityClaim) -> Result<String, VerifyError> {
        // HMAC accepts keys of any length, so this cannot fail for a 32-byte key
        generate_signature(&self.key, claim.data_check_string().as_bytes())
            .map_err(|_| VerifyError::InvalidHash)
    }

    /// Verify `claim` against the current wall-clock time.
    pub fn verify(&self, claim: IdentityClaim) -> Result<IdentityClaim, VerifyError> {
        self.verify_at(claim, Utc::now().timestamp())
    }

    /// Verify `claim` as of `now` (seconds since the Unix epoch).
    ///
    /// An expired claim is rejected before any MAC is computed. On success the
    /// claim is returned unchanged, `hash` included.
    pub fn verify_at(&self, claim: IdentityClaim, now: i64) -> Result<IdentityClaim, VerifyError> {
        if let Some(window) = self.freshness_window {
            let expires_at = claim
                .auth_date
                .saturating_add(i64::try_from(window).unwrap_or(i64::MAX));

            if expires_at < now {
                debug!(
                    user_id = claim.id,
                    auth_date = claim.auth_date,
                    window_seconds = window,
                    now,
                    "Rejecting expired login data"
                );
                return Err(VerifyError::ExpiredHash {
                    auth_date: claim.auth_date,
                    window_seconds: window,
                });
            }
        }

        let expected = self.compute_hash(&claim)?;
        if !signatures_match(&claim.hash, &expected) {
            debug!(user_id = claim.id, "Rejecting login data with mismatched hash");
            return Err(VerifyError::InvalidHash);
        }

        Ok(claim)
    }

    /// Verify a widget redirect whose query string carries the signed fields.
    pub fn verify_redirect_at(
        &self,
        request_url: &str,
        now: i64,
    ) -> Result<IdentityClaim, VerifyError> {
        let claim = IdentityClaim::from_redirect_url(request_url)?;
        self.verify_at(claim, now)
    }
}
