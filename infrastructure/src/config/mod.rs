//! Configuration file loading for mirai-bot
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed `MIRAI_` (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./mirai.toml` or `./.mirai.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/mirai-bot/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_HOST, FileBotConfig, FileConfig, FileGatewayConfig,
    FileListenConfig, FilePollerConfig,
};
pub use loader::{ConfigLoader, ConfigSources};
