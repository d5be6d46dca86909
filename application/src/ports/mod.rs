//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters and embedding
//! applications implement.

pub mod gateway_transport;
pub mod message_listener;
