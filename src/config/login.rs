//! Login verification configuration.

use std::{env, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_AUTH_MAX_AGE: &str = "TELEGRAM_AUTH_MAX_AGE";
pub const ENV_PUBLIC_IDENTIFIER: &str = "TELEGRAM_PUBLIC_IDENTIFIER";
pub const ENV_LOGIN_MODE: &str = "TELEGRAM_LOGIN_MODE";

/// Which login protocol a deployment verifies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMode {
    /// Discrete signed fields from the Login Widget.
    #[default]
    Widget,
    /// A base64 payload with a detached hash, keyed by two credentials.
    Payload,
}

impl LoginMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginMode::Widget => "widget",
            LoginMode::Payload => "payload",
        }
    }
}

impl fmt::Display for LoginMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoginMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "widget" => Ok(LoginMode::Widget),
            "payload" => Ok(LoginMode::Payload),
            other => Err(ConfigError::Invalid {
                name: ENV_LOGIN_MODE,
                message: format!("unknown login mode `{other}`, expected `widget` or `payload`"),
            }),
        }
    }
}

/// Configuration for login verification
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginConfig {
    /// Bot token issued by the provider
    #[serde(skip_serializing)]
    pub credential: String,
    /// Maximum age of `auth_date` in seconds; `None` or `0` disables the check
    #[serde(default)]
    pub freshness_window_seconds: Option<u64>,
    /// Provider-issued public identifier, required in payload mode
    #[serde(default)]
    pub public_identifier: Option<String>,
    #[serde(default)]
    pub mode: LoginMode,
}

impl LoginConfig {
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            freshness_window_seconds: None,
            public_identifier: None,
            mode: LoginMode::Widget,
        }
    }

    pub fn with_freshness_window(mut self, seconds: u64) -> Self {
        self.freshness_window_seconds = Some(seconds);
        self
    }

    pub fn with_public_identifier(mut self, public_identifier: impl Into<String>) -> Self {
        self.public_identifier = Some(public_identifier.into());
        self
    }

    pub fn with_mode(mut self, mode: LoginMode) -> Self {
        self.mode = mode;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// The bot token is required. Unlike other settings, a freshness window
    /// that fails to parse is an error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let credential = env::var(ENV_BOT_TOKEN)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing {
                name: ENV_BOT_TOKEN,
            })?;

        let freshness_window_seconds = env::var(ENV_AUTH_MAX_AGE)
            .ok()
            .map(|v| {
                v.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: ENV_AUTH_MAX_AGE,
                    message: e.to_string(),
                })
            })
            .transpose()?;

        let public_identifier = env::var(ENV_PUBLIC_IDENTIFIER)
            .ok()
            .filter(|v| !v.is_empty());

        let mode = env::var(ENV_LOGIN_MODE)
            .ok()
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or_default();

        let config = Self {
            credential,
            freshness_window_seconds,
            public_identifier,
            mode,
        };
        config.validate()?;
        Ok(config)
    }

    /// Freshness window in seconds, if enabled.
    pub fn freshness_window(&self) -> Option<u64> {
        self.freshness_window_seconds.filter(|seconds| *seconds > 0)
    }

    /// Check that everything the configured mode needs is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credential.is_empty() {
            return Err(ConfigError::Missing {
                name: "credential",
            });
        }

        if self.mode == LoginMode::Payload
            && self
                .public_identifier
                .as_deref()
                .is_none_or(str::is_empty)
        {
            return Err(ConfigError::Missing {
                name: "publicIdentifier",
            });
        }

        Ok(())
    }
}

impl fmt::Debug for LoginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginConfig")
            .field("credential", &"[REDACTED]")
            .field("freshness_window_seconds", &self.freshness_window_seconds)
            .field("public_identifier", &self.public_identifier)
            .field("mode", &self.mode)
            .finish()
    }
}
