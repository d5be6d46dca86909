//! Application layer for mirai-bot
//!
//! This crate contains the session lifecycle, the polling loop, outbound
//! message composition and the port definitions adapters implement.
//! It depends only on the domain layer.

pub mod config;
pub mod events;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::PollerParams;
pub use events::signal_bus::{SignalBus, SignalCallback};
pub use ports::{
    gateway_transport::{AuthReply, DeliveryReceipt, GatewayTransport, StatusReply, TransportError},
    message_listener::{FnListener, MessageListener},
};
pub use use_cases::event_poller::TickReport;
pub use use_cases::message_composer::{ComposeError, MessageComposer};
pub use use_cases::session_manager::{SessionError, SessionManager};
