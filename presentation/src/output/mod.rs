//! Console output for inbound messages and lifecycle events

pub mod console;
