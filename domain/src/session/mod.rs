//! Session lifecycle domain types

pub mod config;
pub mod signal;
pub mod state;
