//! Process-local lifecycle events

pub mod signal_bus;
