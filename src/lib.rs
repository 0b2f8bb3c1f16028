//! Telegram Login - verification of Telegram login callbacks
//!
//! A backend receiving a login callback gets identity fields it cannot trust
//! until their hash is checked against the bot's credentials. This crate
//! makes that accept/reject decision, synchronously and without I/O:
//! - Login Widget callbacks: HMAC-SHA256 over the sorted `key=value` fields,
//!   keyed by `SHA-256(bot_token)`, with an optional freshness window
//! - Payload logins: HMAC-SHA256 over a base64 payload, keyed by
//!   `SHA-256(bot_token || public_identifier)`
//! - Structured audit logging and Prometheus metrics per decision
//!
//! ## Architecture
//!
//! - `config/` - `LoginConfig` and environment loading
//! - `models/` - claims, payloads, response envelope, audit events
//! - `services/` - the `LoginVerifier` strategies and `LoginService`
//! - `utils/` - hashing, canonicalization, token and URL helpers
//! - `telemetry` - logging setup and redaction
//!
//! ## Quick Start
//!
//! ```
//! use telegram_login::{IdentityClaim, LoginConfig, LoginRequest, LoginService};
//!
//! let service = LoginService::from_config(&LoginConfig::new("123456:ABC")).unwrap();
//! let claim = IdentityClaim::new(
//!     1,
//!     "Ivan",
//!     1700000000,
//!     "81981b5c8714a5f22bb00d6c0f0e97f8078b4c3508db41a52c4f0105b75acb35",
//! );
//!
//! let response = service.handle(LoginRequest::Callback(claim));
//! assert!(response.is_success);
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use config::{LoginConfig, LoginMode};
pub use error::{ConfigError, CredentialError, VerifyError, codes};
pub use models::{
    CommandResponse, FieldValue, IdentityClaim, LoginAuditEvent, LoginEventOutcome,
    LoginEventType, LoginPayload, PayloadUser,
};
pub use services::{
    LoginRequest, LoginService, LoginVerifier, PayloadVerifier, VerifiedLogin, VerifierMetrics,
    WidgetVerifier, build_verifier,
};
pub use telemetry::{LogConfig, LogFormat, init_logging, redact_credentials};
pub use utils::BotToken;
