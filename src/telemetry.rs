//! Logging setup and log redaction.

use std::{env, sync::LazyLock};

use regex::Regex;
use tracing_subscriber::EnvFilter;

/// Output format of the tracing subscriber
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub format: LogFormat,
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "info".to_string(),
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let format = match env::var("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let filter = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self { format, filter }
    }
}

/// Install a global tracing subscriber writing to stderr.
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_new(&config.filter)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    }
}

/// Bot tokens: a numeric bot id, a colon, and a long secret
static BOT_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{5,}:[A-Za-z0-9_-]{20,}").expect("bot token pattern is valid")
});

/// Redact bot tokens from log messages
pub fn redact_credentials(input: &str) -> String {
    BOT_TOKEN_PATTERN
        .replace_all(input, "[REDACTED]")
        .into_owned()
}
