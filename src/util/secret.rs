//! Bot token wrapper
//!
//! Keeps the Discord bot token out of debug output, logs and error messages.

use serde::Deserialize;
use std::fmt;

/// Scheme prefix of the bot `Authorization` header
const BOT_SCHEME: &str = "Bot ";

/// A secret that never prints its value.
///
/// `Debug` and `Display` show `[REDACTED]`. The value is only reachable
/// through [`expose_secret`](Self::expose_secret) or the header built by
/// [`bot_authorization`](Self::bot_authorization).
///
/// Tokens are stored trimmed and without a `Bot ` prefix, so a value copied
/// straight from a header works too.
///
/// ```ignore
/// let token = SecretString::new("Bot MTA1.abc");
/// assert_eq!(token.expose_secret(), "MTA1.abc");
/// assert_eq!(token.bot_authorization(), "Bot MTA1.abc");
/// ```
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: impl Into<String>) -> Self {
        let s = s.into();
        let trimmed = s.trim();
        let token = trimmed.strip_prefix(BOT_SCHEME).unwrap_or(trimmed).trim();
        Self(token.to_string())
    }

    /// The raw token
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bot_authorization(&self) -> String {
        format!("{}{}", BOT_SCHEME, self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // Best effort; copies made elsewhere are not cleared
        self.0.clear();
        self.0.shrink_to_fit();
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_output() {
        let token = SecretString::new("MTA1.secret");
        assert_eq!(format!("{:?}", token), "[REDACTED]");
        assert_eq!(format!("{}", token), "[REDACTED]");
    }

    #[test]
    fn test_bot_prefix_stripped() {
        let token = SecretString::new("  Bot MTA1.secret\n");
        assert_eq!(token.expose_secret(), "MTA1.secret");
        assert_eq!(token.bot_authorization(), "Bot MTA1.secret");
    }

    #[test]
    fn test_blank_token_is_empty() {
        assert!(SecretString::new("   ").is_empty());
        assert!(SecretString::new("").is_empty());
    }

    #[test]
    fn test_deserialize() {
        let token: SecretString = serde_json::from_str(r#""test-token""#).unwrap();
        assert_eq!(token.expose_secret(), "test-token");
    }
}
