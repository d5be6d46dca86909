//! Infrastructure layer for mirai-bot
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gateway;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigSources, ConfigValidationError, FileBotConfig, FileConfig,
    FileGatewayConfig, FileListenConfig, FilePollerConfig,
};
pub use gateway::{
    error::{HttpTransportError, Result},
    transport::HttpTransport,
};
