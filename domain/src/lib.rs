//! Domain layer for mirai-bot
//!
//! This crate contains the entities and value objects shared by every other
//! layer. It performs no I/O and knows nothing about how the gateway is
//! reached.
//!
//! # Core Concepts
//!
//! ## Message chain
//!
//! Every inbound or outbound message carries a [`MessageChain`]: an ordered
//! list of [`MessageComponent`]s. The first component of an inbound chain is
//! usually a `Source` component whose `uid` identifies the message, which is
//! what a quote-reply references.
//!
//! ## Session lifecycle
//!
//! A session moves `Pending → Authenticated → Verified → Released`, with a
//! terminal `Failed` branch. [`SessionState`] carries the session key only in
//! the states where the gateway has issued one, so a key can never be read
//! before authentication succeeds.

pub mod core;
pub mod message;
pub mod session;

// Re-export commonly used types
pub use core::error::DomainError;
pub use message::{
    component::{MessageChain, MessageComponent, QuoteId},
    entities::{Friend, Group, GroupMember, Message, MessageKind},
    outbound::{OutboundMessage, SendTarget},
    scope::ListenScope,
};
pub use session::{
    config::{BotId, SessionConfig},
    signal::Signal,
    state::{SessionKey, SessionOperation, SessionPhase, SessionState},
};
