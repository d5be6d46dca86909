//! Application configuration
//!
//! Parameters that control the use cases at runtime. Loading them from files
//! is an infrastructure concern.

mod poller_params;

pub use poller_params::PollerParams;
