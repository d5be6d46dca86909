//! Listen scope setting (`[listen]` section)

use mirai_domain::{DomainError, ListenScope};
use serde::{Deserialize, Serialize};

/// Raw listen configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileListenConfig {
    /// `"all"`, `"friend"` or `"group"`
    pub scope: String,
}

impl Default for FileListenConfig {
    fn default() -> Self {
        Self {
            scope: ListenScope::default().to_string(),
        }
    }
}

impl FileListenConfig {
    pub fn parse_scope(&self) -> Result<ListenScope, DomainError> {
        self.scope.parse()
    }
}
