//! Listen scope: which inbound message kinds reach listeners.

use crate::core::error::DomainError;
use crate::message::entities::{Message, MessageKind};
use std::fmt;
use std::str::FromStr;

/// Set of message kinds dispatched to listeners.
///
/// Only friend and group messages can be admitted; other event kinds are
/// never dispatched. The default admits both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenScope {
    friend: bool,
    group: bool,
}

impl ListenScope {
    /// `{FriendMessage}`
    pub fn friends() -> Self {
        Self {
            friend: true,
            group: false,
        }
    }

    /// `{GroupMessage}`
    pub fn groups() -> Self {
        Self {
            friend: false,
            group: true,
        }
    }

    /// `{FriendMessage, GroupMessage}`
    pub fn all() -> Self {
        Self {
            friend: true,
            group: true,
        }
    }

    pub fn admits_kind(&self, kind: MessageKind) -> bool {
        match kind {
            MessageKind::Friend => self.friend,
            MessageKind::Group => self.group,
            MessageKind::Other => false,
        }
    }

    pub fn admits(&self, message: &Message) -> bool {
        self.admits_kind(message.kind())
    }
}

impl Default for ListenScope {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for ListenScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::all()),
            "friend" => Ok(Self::friends()),
            "group" => Ok(Self::groups()),
            _ => Err(DomainError::InvalidListenScope(s.to_string())),
        }
    }
}

impl fmt::Display for ListenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match (self.friend, self.group) {
            (true, true) => "all",
            (true, false) => "friend",
            (false, true) => "group",
            (false, false) => "none",
        };
        write!(f, "{}", name)
    }
}
