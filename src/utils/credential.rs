//! Bot token handling.

use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::error::CredentialError;

static BOT_TOKEN_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(.+)$").expect("bot token pattern is valid")
});

/// The shared secret issued by the identity provider to a bot.
///
/// The token is opaque to the verifier apart from [`BotToken::bot_id`]. It is
/// never printed: `Debug` shows only the bot id prefix when one is present.
#[derive(Clone, PartialEq, Eq)]
pub struct BotToken(String);

impl BotToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric bot id preceding the `:` in a `<digits>:<secret>` token.
    pub fn bot_id(&self) -> Result<u64, CredentialError> {
        let captures = BOT_TOKEN_SHAPE
            .captures(&self.0)
            .ok_or(CredentialError::MalformedToken)?;

        captures[1]
            .parse()
            .map_err(|_| CredentialError::MalformedToken)
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bot_id() {
            Ok(id) => write!(f, "BotToken({id}:[REDACTED])"),
            Err(_) => f.write_str("BotToken([REDACTED])"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_id_extraction() {
        let token = BotToken::new("7737759018:AAG3BnKJKNh8XVeZ69tdYW0KZ3N9pWhqZK0");
        assert_eq!(token.bot_id(), Ok(7737759018));

        assert_eq!(BotToken::new("123456:ABC").bot_id(), Ok(123456));
    }

    #[test]
    fn test_bot_id_rejects_malformed_tokens() {
        for raw in ["", "ABC", ":ABC", "12a:ABC", "123456:", "123456", "-1:ABC"] {
            assert_eq!(
                BotToken::new(raw).bot_id(),
                Err(CredentialError::MalformedToken),
                "token {raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_bot_id_overflow_is_malformed() {
        let token = BotToken::new("99999999999999999999999:ABC");
        assert_eq!(token.bot_id(), Err(CredentialError::MalformedToken));
    }

    #[test]
    fn test_debug_hides_secret() {
        let token = BotToken::new("123456:SuperSecretPart");
        let debug = format!("{token:?}");
        assert!(!debug.contains("SuperSecretPart"));
        assert!(debug.contains("123456"));

        let debug = format!("{:?}", BotToken::new("opaque-secret"));
        assert!(!debug.contains("opaque-secret"));
    }
}
