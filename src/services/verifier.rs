//! The login verification capability and its configured strategies.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::{LoginConfig, LoginMode},
    error::{ConfigError, CredentialError, VerifyError},
    models::{IdentityClaim, PayloadUser},
    services::{payload::PayloadVerifier, widget::WidgetVerifier},
    utils::query::{parse_request_url, query_param},
};

/// Untrusted login data as it reaches the backend.
#[derive(Debug, Clone)]
pub enum LoginRequest {
    /// The callback or redirect URL, with login data in its query string.
    Url(String),
    /// Widget fields already parsed from a callback body.
    Callback(IdentityClaim),
    /// A raw widget JSON callback body, parsed during verification.
    Json(String),
}

impl LoginRequest {
    /// The account id the request claims to be, before any verification.
    ///
    /// Only meaningful for audit trails of rejected logins. Payload requests
    /// carry the id inside the signed payload and yield `None`.
    pub fn claimed_user_id(&self) -> Option<i64> {
        match self {
            LoginRequest::Callback(claim) => Some(claim.id),
            LoginRequest::Json(body) => serde_json::from_str::<serde_json::Value>(body)
                .ok()?
                .get("id")?
                .as_i64(),
            LoginRequest::Url(url) => query_param(&parse_request_url(url).ok()?, "id")?
                .parse()
                .ok(),
        }
    }
}

/// Identity that passed verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerifiedLogin {
    /// The full widget claim, `hash` included.
    Widget(IdentityClaim),
    /// The user object from a verified payload.
    Payload(PayloadUser),
}

impl VerifiedLogin {
    pub fn user_id(&self) -> i64 {
        match self {
            VerifiedLogin::Widget(claim) => claim.id,
            VerifiedLogin::Payload(user) => user.id,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            VerifiedLogin::Widget(claim) => claim.username(),
            VerifiedLogin::Payload(user) => user.username.as_deref(),
        }
    }
}

/// A login protocol strategy.
///
/// Implementations hold no per-call state; one instance may serve concurrent
/// callers.
pub trait LoginVerifier: Send + Sync {
    fn mode(&self) -> LoginMode;

    fn bot_id(&self) -> Result<u64, CredentialError>;

    /// Verify `request` as of `now` (seconds since the Unix epoch).
    fn verify_login_at(&self, request: LoginRequest, now: i64)
    -> Result<VerifiedLogin, VerifyError>;

    /// Verify `request`, reading the wall clock once.
    fn verify_login(&self, request: LoginRequest) -> Result<VerifiedLogin, VerifyError> {
        self.verify_login_at(request, Utc::now().timestamp())
    }
}

impl LoginVerifier for WidgetVerifier {
    fn mode(&self) -> LoginMode {
        LoginMode::Widget
    }

    fn bot_id(&self) -> Result<u64, CredentialError> {
        WidgetVerifier::bot_id(self)
    }

    fn verify_login_at(
        &self,
        request: LoginRequest,
        now: i64,
    ) -> Result<VerifiedLogin, VerifyError> {
        let claim = match request {
            LoginRequest::Callback(claim) => self.verify_at(claim, now)?,
            LoginRequest::Url(url) => self.verify_redirect_at(&url, now)?,
            LoginRequest::Json(body) => self.verify_at(IdentityClaim::from_json(&body)?, now)?,
        };
        Ok(VerifiedLogin::Widget(claim))
    }
}

impl LoginVerifier for PayloadVerifier {
    fn mode(&self) -> LoginMode {
        LoginMode::Payload
    }

    fn bot_id(&self) -> Result<u64, CredentialError> {
        PayloadVerifier::bot_id(self)
    }

    fn verify_login_at(
        &self,
        request: LoginRequest,
        _now: i64,
    ) -> Result<VerifiedLogin, VerifyError> {
        match request {
            LoginRequest::Url(url) => self.verify(&url).map(VerifiedLogin::Payload),
            LoginRequest::Callback(_) | LoginRequest::Json(_) => {
                debug!("Payload login received widget fields instead of a request URL");
                Err(VerifyError::MissingRequiredParameters)
            }
        }
    }
}

/// Build the strategy selected by `config.mode`.
pub fn build_verifier(config: &LoginConfig) -> Result<Box<dyn LoginVerifier>, ConfigError> {
    config.validate()?;

    Ok(match config.mode {
        LoginMode::Widget => Box::new(WidgetVerifier::new(config)?),
        LoginMode::Payload => Box::new(PayloadVerifier::new(config)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_verifier_selects_mode() {
        let widget = build_verifier(&LoginConfig::new("123456:ABC")).unwrap();
        assert_eq!(widget.mode(), LoginMode::Widget);

        let payload = build_verifier(
            &LoginConfig::new("123456:ABC")
                .with_mode(LoginMode::Payload)
                .with_public_identifier("pub-key-1"),
        )
        .unwrap();
        assert_eq!(payload.mode(), LoginMode::Payload);
        assert_eq!(payload.bot_id(), Ok(123456));
    }

    #[test]
    fn test_build_verifier_fails_fast() {
        assert!(build_verifier(&LoginConfig::new("")).is_err());
        assert!(
            build_verifier(&LoginConfig::new("123456:ABC").with_mode(LoginMode::Payload)).is_err()
        );
    }

    #[test]
    fn test_payload_mode_rejects_callback_fields() {
        let verifier = PayloadVerifier::from_credentials("123456:ABC", "pub-key-1").unwrap();
        let claim = IdentityClaim::new(1, "Ivan", 1700000000, "abc");
        assert_eq!(
            verifier.verify_login_at(LoginRequest::Callback(claim), 0),
            Err(VerifyError::MissingRequiredParameters)
        );
    }

    #[test]
    fn test_widget_json_body_is_parsed_and_verified() {
        let verifier = build_verifier(&LoginConfig::new("123456:ABC")).unwrap();
        let body = r#"{"id":1,"first_name":"Ivan","auth_date":1700000000,
            "hash":"81981b5c8714a5f22bb00d6c0f0e97f8078b4c3508db41a52c4f0105b75acb35"}"#;

        let login = verifier
            .verify_login_at(LoginRequest::Json(body.to_string()), 1700000000)
            .unwrap();
        assert_eq!(login.user_id(), 1);

        let err = verifier
            .verify_login_at(LoginRequest::Json("{not json".to_string()), 1700000000)
            .unwrap_err();
        assert_eq!(err.code(), "MALFORMED_CLAIM");
    }

    #[test]
    fn test_claimed_user_id() {
        let claim = IdentityClaim::new(7, "Ivan", 1700000000, "abc");
        assert_eq!(LoginRequest::Callback(claim).claimed_user_id(), Some(7));
        assert_eq!(
            LoginRequest::Json(r#"{"id":8,"first_name":"Ivan"}"#.to_string()).claimed_user_id(),
            Some(8)
        );
        assert_eq!(
            LoginRequest::Url("/auth?id=9&hash=x".to_string()).claimed_user_id(),
            Some(9)
        );
        assert_eq!(
            LoginRequest::Url("/auth?hash=x&payload=y".to_string()).claimed_user_id(),
            None
        );
        assert_eq!(LoginRequest::Json("garbage".to_string()).claimed_user_id(), None);
    }

    #[test]
    fn test_verifier_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WidgetVerifier>();
        assert_send_sync::<PayloadVerifier>();
        assert_send_sync::<Box<dyn LoginVerifier>>();
    }
}
