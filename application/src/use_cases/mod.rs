//! Use cases: session lifecycle, polling and outbound composition.

pub mod event_poller;
pub mod message_composer;
pub mod session_manager;
