//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to library types on demand.

mod bot;
mod gateway;
mod listen;
mod poller;

pub use bot::FileBotConfig;
pub use gateway::{DEFAULT_HOST, FileGatewayConfig};
pub use listen::FileListenConfig;
pub use poller::FilePollerConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("poller.interval_ms cannot be 0")]
    ZeroInterval,

    #[error("poller.batch_size cannot be 0")]
    ZeroBatchSize,

    #[error("gateway.auth_key cannot be empty")]
    EmptyAuthKey,

    #[error("gateway.host cannot be empty")]
    EmptyHost,

    #[error("listen.scope: unknown value '{0}' (expected \"all\", \"friend\" or \"group\")")]
    InvalidListenScope(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Gateway endpoint and credentials
    pub gateway: FileGatewayConfig,
    /// Poll loop settings
    pub poller: FilePollerConfig,
    /// Which message kinds reach listeners
    pub listen: FileListenConfig,
    /// Bundled bot behavior
    pub bot: FileBotConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.gateway.host.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyHost);
        }
        if self.gateway.auth_key.is_empty() {
            issues.push(ConfigValidationError::EmptyAuthKey);
        }
        if self.poller.interval_ms == 0 {
            issues.push(ConfigValidationError::ZeroInterval);
        }
        if self.poller.batch_size == 0 {
            issues.push(ConfigValidationError::ZeroBatchSize);
        }
        if self.listen.parse_scope().is_err() {
            issues.push(ConfigValidationError::InvalidListenScope(
                self.listen.scope.clone(),
            ));
        }

        issues
    }
}
