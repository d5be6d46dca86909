//! Outbound message value objects

use crate::message::component::{MessageChain, QuoteId};
use crate::message::entities::Message;
use std::fmt;

/// Where an outbound message is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendTarget {
    /// A friend, by account id.
    Friend(i64),
    /// A group, by group id.
    Group(i64),
}

impl SendTarget {
    /// Resolve the reply target of an inbound message.
    ///
    /// Friend messages answer the sender, group messages answer the group.
    /// Other event kinds have no target.
    pub fn from_message(message: &Message) -> Option<Self> {
        match message {
            Message::Friend { sender, .. } => Some(Self::Friend(sender.id)),
            Message::Group { sender, .. } => Some(Self::Group(sender.group.id)),
            Message::Other { .. } => None,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Friend(id) | Self::Group(id) => *id,
        }
    }
}

impl fmt::Display for SendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Friend(id) => write!(f, "friend:{}", id),
            Self::Group(id) => write!(f, "group:{}", id),
        }
    }
}

/// A fully resolved send request.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub target: SendTarget,
    pub chain: MessageChain,
    /// Earlier message this one quotes, if any.
    pub quote: Option<QuoteId>,
}

impl OutboundMessage {
    pub fn new(target: SendTarget, chain: MessageChain) -> Self {
        Self {
            target,
            chain,
            quote: None,
        }
    }

    pub fn quoting(mut self, quote: QuoteId) -> Self {
        self.quote = Some(quote);
        self
    }

    pub fn is_quoted(&self) -> bool {
        self.quote.is_some()
    }
}
