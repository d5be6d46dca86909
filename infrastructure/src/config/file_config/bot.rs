//! Bot behavior settings (`[bot]` section)

use serde::{Deserialize, Serialize};

/// Raw bot behavior configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBotConfig {
    /// Echo every admitted message back to where it came from
    pub echo: bool,
    /// Echo as a quote-reply when the message can be quoted
    pub quote: bool,
}
