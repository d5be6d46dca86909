//! Messages, message chains and listen scopes

pub mod component;
pub mod entities;
pub mod outbound;
pub mod scope;
