//! Error types for login verification and configuration.

use thiserror::Error;

/// Stable failure codes carried in the `message` field of a response.
pub mod codes {
    pub const INVALID_HASH: &str = "INVALID_HASH";
    pub const EXPIRED_HASH: &str = "EXPIRED_HASH";
    pub const MISSING_REQUIRED_PARAMETERS: &str = "MISSING_REQUIRED_PARAMETERS";
    pub const MALFORMED_PAYLOAD: &str = "MALFORMED_PAYLOAD";
    pub const MALFORMED_CLAIM: &str = "MALFORMED_CLAIM";
}

/// Reasons a presented login is rejected.
///
/// Every variant is an expected outcome the caller handles; none of them
/// indicates a fault in the verifier itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The supplied hash does not match the one computed from the data.
    #[error("Invalid hash")]
    InvalidHash,

    /// The auth date is older than the configured freshness window.
    #[error("Hash expired: auth date {auth_date} is older than {window_seconds}s")]
    ExpiredHash { auth_date: i64, window_seconds: u64 },

    /// The request lacks the `hash` or `payload` query parameter.
    #[error("Missing required parameters: hash and payload")]
    MissingRequiredParameters,

    /// The `payload` parameter is not base64-encoded JSON with a `user` object.
    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    /// Login data could not be read into a claim.
    #[error("Malformed login data: {message}")]
    MalformedClaim { message: String },
}

impl VerifyError {
    /// Stable code for this failure, suitable for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            VerifyError::InvalidHash => codes::INVALID_HASH,
            VerifyError::ExpiredHash { .. } => codes::EXPIRED_HASH,
            VerifyError::MissingRequiredParameters => codes::MISSING_REQUIRED_PARAMETERS,
            VerifyError::MalformedPayload { .. } => codes::MALFORMED_PAYLOAD,
            VerifyError::MalformedClaim { .. } => codes::MALFORMED_CLAIM,
        }
    }

    pub(crate) fn malformed_claim(message: impl Into<String>) -> Self {
        VerifyError::MalformedClaim {
            message: message.into(),
        }
    }

    pub(crate) fn malformed_payload(message: impl Into<String>) -> Self {
        VerifyError::MalformedPayload {
            message: message.into(),
        }
    }
}

/// Configuration errors raised while building a verifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {name}")]
    Missing { name: &'static str },

    #[error("Invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Errors from interpreting the bot token format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Malformed bot token: expected `<digits>:<secret>`")]
    MalformedToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(VerifyError::InvalidHash.code(), "INVALID_HASH");
        assert_eq!(
            VerifyError::ExpiredHash {
                auth_date: 1,
                window_seconds: 2
            }
            .code(),
            "EXPIRED_HASH"
        );
        assert_eq!(
            VerifyError::MissingRequiredParameters.code(),
            "MISSING_REQUIRED_PARAMETERS"
        );
        assert_eq!(
            VerifyError::malformed_payload("bad base64").code(),
            "MALFORMED_PAYLOAD"
        );
        assert_eq!(VerifyError::malformed_claim("no id").code(), "MALFORMED_CLAIM");
    }

    #[test]
    fn test_display_includes_context() {
        let err = VerifyError::ExpiredHash {
            auth_date: 1700000000,
            window_seconds: 2000,
        };
        let text = err.to_string();
        assert!(text.contains("1700000000"));
        assert!(text.contains("2000s"));

        let err = ConfigError::Missing {
            name: "TELEGRAM_BOT_TOKEN",
        };
        assert_eq!(
            err.to_string(),
            "Missing required configuration: TELEGRAM_BOT_TOKEN"
        );
    }
}
