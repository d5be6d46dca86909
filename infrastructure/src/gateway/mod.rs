//! HTTP gateway adapter
//!
//! Implements [`GatewayTransport`](mirai_application::GatewayTransport)
//! against the gateway's HTTP+JSON API.

pub mod error;
pub mod protocol;
pub mod transport;
