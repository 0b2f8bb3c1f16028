//! Login service: the configured verifier plus audit logging and metrics.

use std::time::Instant;

use chrono::Utc;

use crate::{
    config::{LoginConfig, LoginMode},
    error::{ConfigError, CredentialError, VerifyError},
    models::{
        CommandResponse,
        audit::{LoginAuditEvent, LoginEventOutcome, LoginEventType},
    },
    services::{
        metrics::VerifierMetrics,
        verifier::{LoginRequest, LoginVerifier, VerifiedLogin, build_verifier},
    },
    telemetry::redact_credentials,
};

/// Entry point for verifying logins.
///
/// Wraps one [`LoginVerifier`] and records an audit event (and, when
/// attached, metrics) for every decision.
pub struct LoginService {
    verifier: Box<dyn LoginVerifier>,
    metrics: Option<VerifierMetrics>,
}

impl LoginService {
    pub fn new(verifier: Box<dyn LoginVerifier>) -> Self {
        Self {
            verifier,
            metrics: None,
        }
    }

    /// Build the service for the strategy selected in `config`.
    pub fn from_config(config: &LoginConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(build_verifier(config)?))
    }

    pub fn with_metrics(mut self, metrics: VerifierMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn metrics(&self) -> Option<&VerifierMetrics> {
        self.metrics.as_ref()
    }

    pub fn mode(&self) -> LoginMode {
        self.verifier.mode()
    }

    pub fn bot_id(&self) -> Result<u64, CredentialError> {
        self.verifier.bot_id()
    }

    /// Verify `request` and return the decision as a response envelope.
    pub fn handle(&self, request: LoginRequest) -> CommandResponse<VerifiedLogin> {
        self.verify(request).into()
    }

    /// Verify `request` against the current wall-clock time.
    pub fn verify(&self, request: LoginRequest) -> Result<VerifiedLogin, VerifyError> {
        self.verify_at(request, Utc::now().timestamp())
    }

    /// Verify `request` as of `now` (seconds since the Unix epoch).
    pub fn verify_at(&self, request: LoginRequest, now: i64) -> Result<VerifiedLogin, VerifyError> {
        let claimed_user_id = request.claimed_user_id();

        let started = Instant::now();
        let result = self.verifier.verify_login_at(request, now);
        let elapsed = started.elapsed();

        let mode = self.verifier.mode();
        audit_event(mode, &result, claimed_user_id).log();

        let outcome = match &result {
            Ok(_) => "success",
            Err(error) => error.code(),
        };
        if let Some(metrics) = &self.metrics {
            metrics.record_verification(mode, outcome, elapsed);
        }

        result
    }
}

/// Audit record for one decision. Rejections carry the id the request
/// claimed, so forged logins show which account was targeted.
fn audit_event(
    mode: LoginMode,
    result: &Result<VerifiedLogin, VerifyError>,
    claimed_user_id: Option<i64>,
) -> LoginAuditEvent {
    let event_type = match mode {
        LoginMode::Widget => LoginEventType::WidgetLogin,
        LoginMode::Payload => LoginEventType::PayloadLogin,
    };

    match result {
        Ok(login) => LoginAuditEvent::new(event_type, LoginEventOutcome::Success)
            .with_user_id(Some(login.user_id()))
            .with_username(login.username().map(str::to_string)),
        Err(error) => LoginAuditEvent::new(event_type, LoginEventOutcome::Failure)
            .with_user_id(claimed_user_id)
            .with_failure_code(Some(error.code()))
            .with_detail(Some(redact_credentials(&error.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IdentityClaim;

    const HASH: &str = "81981b5c8714a5f22bb00d6c0f0e97f8078b4c3508db41a52c4f0105b75acb35";

    #[test]
    fn test_handle_success_and_failure() {
        let service = LoginService::from_config(&LoginConfig::new("123456:ABC")).unwrap();

        let ok = service.handle(LoginRequest::Callback(IdentityClaim::new(
            1,
            "Ivan",
            1700000000,
            HASH,
        )));
        assert!(ok.is_success);
        assert_eq!(ok.data.map(|login| login.user_id()), Some(1));

        let rejected = service.handle(LoginRequest::Callback(IdentityClaim::new(
            1,
            "Ivann",
            1700000000,
            HASH,
        )));
        assert!(!rejected.is_success);
        assert_eq!(rejected.message.as_deref(), Some("INVALID_HASH"));
    }

    #[test]
    fn test_metrics_are_recorded() {
        let service = LoginService::from_config(&LoginConfig::new("123456:ABC"))
            .unwrap()
            .with_metrics(VerifierMetrics::new().unwrap());

        let _ = service.verify_at(
            LoginRequest::Callback(IdentityClaim::new(1, "Ivan", 1700000000, HASH)),
            1700000000,
        );
        let _ = service.verify_at(LoginRequest::Url("/auth?id=1".to_string()), 1700000000);

        let metrics = service.metrics().unwrap();
        let counter = |outcome: &str| {
            metrics
                .login_verifications_total
                .with_label_values(&["widget", outcome])
                .get()
        };
        assert_eq!(counter("success"), 1.0);
        assert_eq!(counter("MALFORMED_CLAIM"), 1.0);
    }

    #[test]
    fn test_malformed_json_body_is_recorded() {
        let service = LoginService::from_config(&LoginConfig::new("123456:ABC"))
            .unwrap()
            .with_metrics(VerifierMetrics::new().unwrap());

        let response = service.handle(LoginRequest::Json("{\"id\": [1]}".to_string()));
        assert_eq!(response.message.as_deref(), Some("MALFORMED_CLAIM"));

        let metrics = service.metrics().unwrap();
        assert_eq!(
            metrics
                .login_verifications_total
                .with_label_values(&["widget", "MALFORMED_CLAIM"])
                .get(),
            1.0
        );
    }

    #[test]
    fn test_failure_audit_names_targeted_account() {
        let forged = IdentityClaim::new(6734228260, "Ivann", 1700000000, HASH);
        let request = LoginRequest::Callback(forged);
        let claimed = request.claimed_user_id();

        let service = LoginService::from_config(&LoginConfig::new("123456:ABC")).unwrap();
        let result = service.verify_at(request, 1700000000);
        assert_eq!(result, Err(VerifyError::InvalidHash));

        let event = audit_event(LoginMode::Widget, &result, claimed);
        assert_eq!(event.outcome, LoginEventOutcome::Failure);
        assert_eq!(event.user_id, Some(6734228260));
        assert_eq!(event.failure_code.as_deref(), Some("INVALID_HASH"));
    }
}
