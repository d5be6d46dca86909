//! Gateway connection settings (`[gateway]` section)

use mirai_domain::{BotId, SessionConfig};
use serde::{Deserialize, Serialize};

/// Host assumed when none is configured
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Raw gateway configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// Host the gateway listens on
    pub host: String,
    /// HTTP port of the gateway
    pub port: u16,
    /// Shared secret configured on the gateway
    pub auth_key: String,
    /// Bot account the session binds to
    pub bot_id: BotId,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            host: DEFAULT_HOST.to_string(),
            port: session.port,
            auth_key: session.auth_key,
            bot_id: session.bot_id,
        }
    }
}

impl FileGatewayConfig {
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig::new(self.port, self.auth_key.clone(), self.bot_id)
    }
}
