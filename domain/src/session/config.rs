//! Session construction parameters

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account id of the bot a session acts for.
pub type BotId = i64;

/// Default gateway port.
pub const DEFAULT_PORT: u16 = 8080;

/// Auth key a freshly installed gateway ships with.
pub const DEFAULT_AUTH_KEY: &str = "SupreSecureAuthKey";

/// Placeholder bot account.
pub const DEFAULT_BOT_ID: BotId = 123456;

/// Parameters a session is constructed with.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Port the gateway listens on.
    ///
    /// Informational for the session itself, which only logs it; requests
    /// go wherever the transport was built to send them. Build the
    /// transport from this value to keep the two in agreement.
    pub port: u16,
    /// Secret used to obtain a session key.
    pub auth_key: String,
    /// Bot account the session is bound to.
    pub bot_id: BotId,
}

impl SessionConfig {
    pub fn new(port: u16, auth_key: impl Into<String>, bot_id: BotId) -> Self {
        Self {
            port,
            auth_key: auth_key.into(),
            bot_id,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT, DEFAULT_AUTH_KEY, DEFAULT_BOT_ID)
    }
}

// Keep the auth key out of logs.
impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("port", &self.port)
            .field("auth_key", &"***")
            .field("bot_id", &self.bot_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.auth_key, "SupreSecureAuthKey");
        assert_eq!(config.bot_id, 123456);
    }

    #[test]
    fn test_debug_redacts_auth_key() {
        let config = SessionConfig::new(9000, "hunter2", 1);
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("9000"));
    }
}
