//! Lifecycle signals

use crate::core::error::DomainError;
use std::fmt;
use std::str::FromStr;

/// Lifecycle event emitted by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Authentication succeeded and a session key was issued.
    Authed,
    /// The session key was bound to the bot account.
    Verified,
    /// The session key was released.
    Released,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Authed, Signal::Verified, Signal::Released];

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Authed => "authed",
            Signal::Verified => "verified",
            Signal::Released => "released",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Signal {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signal::ALL
            .into_iter()
            .find(|signal| signal.as_str() == s)
            .ok_or_else(|| DomainError::UnknownSignal(s.to_string()))
    }
}
