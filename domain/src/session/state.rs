//! Session state machine.
//!
//! ```text
//! Pending ──authenticate──▶ Authenticated ──verify──▶ Verified
//!    │                          │    │                   │
//!    └──────▶ Failed ◀──────────┘    └─────release───────┴──▶ Released
//! ```
//!
//! The session key lives inside the `Authenticated` and `Verified` variants,
//! so it exists exactly while the gateway considers the session open.

use crate::core::error::DomainError;
use std::fmt;

/// Opaque token issued by the gateway after authentication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle phase without the attached key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Pending,
    Authenticated,
    Verified,
    Released,
    Failed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Pending => "pending",
            SessionPhase::Authenticated => "authenticated",
            SessionPhase::Verified => "verified",
            SessionPhase::Released => "released",
            SessionPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operations gated by the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionOperation {
    Authenticate,
    Verify,
    Release,
    Fetch,
    Send,
}

impl fmt::Display for SessionOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionOperation::Authenticate => "authenticate",
            SessionOperation::Verify => "verify",
            SessionOperation::Release => "release",
            SessionOperation::Fetch => "fetch messages",
            SessionOperation::Send => "send messages",
        };
        write!(f, "{}", name)
    }
}

/// Current state of a gateway session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Pending,
    Authenticated {
        key: SessionKey,
    },
    Verified {
        key: SessionKey,
    },
    Released,
    Failed,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Pending => SessionPhase::Pending,
            SessionState::Authenticated { .. } => SessionPhase::Authenticated,
            SessionState::Verified { .. } => SessionPhase::Verified,
            SessionState::Released => SessionPhase::Released,
            SessionState::Failed => SessionPhase::Failed,
        }
    }

    /// The session key, present only while authenticated or verified.
    pub fn session_key(&self) -> Option<&SessionKey> {
        match self {
            SessionState::Authenticated { key } | SessionState::Verified { key } => Some(key),
            _ => None,
        }
    }

    /// Whether the gateway considers the session open.
    pub fn is_active(&self) -> bool {
        self.session_key().is_some()
    }

    pub fn permits(&self, operation: SessionOperation) -> bool {
        match operation {
            SessionOperation::Authenticate => matches!(self, SessionState::Pending),
            SessionOperation::Verify => matches!(self, SessionState::Authenticated { .. }),
            SessionOperation::Release | SessionOperation::Fetch | SessionOperation::Send => {
                self.is_active()
            }
        }
    }

    /// Fail with [`DomainError::IllegalState`] unless `operation` is permitted.
    pub fn ensure(&self, operation: SessionOperation) -> Result<(), DomainError> {
        if self.permits(operation) {
            Ok(())
        } else {
            Err(DomainError::IllegalState {
                operation,
                phase: self.phase(),
            })
        }
    }

    /// Session key for `operation`, or the lifecycle error explaining why
    /// there is none.
    pub fn key_for(&self, operation: SessionOperation) -> Result<&SessionKey, DomainError> {
        self.ensure(operation)?;
        self.session_key().ok_or(DomainError::IllegalState {
            operation,
            phase: self.phase(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SessionKey {
        SessionKey::new("abc")
    }

    #[test]
    fn test_key_only_in_active_states() {
        assert!(SessionState::Pending.session_key().is_none());
        assert_eq!(
            SessionState::Authenticated { key: key() }.session_key(),
            Some(&key())
        );
        assert_eq!(SessionState::Verified { key: key() }.session_key(), Some(&key()));
        assert!(SessionState::Released.session_key().is_none());
        assert!(SessionState::Failed.session_key().is_none());
    }

    #[test]
    fn test_pending_only_permits_authenticate() {
        let state = SessionState::Pending;
        assert!(state.permits(SessionOperation::Authenticate));
        assert!(!state.permits(SessionOperation::Verify));
        assert!(!state.permits(SessionOperation::Release));
        assert!(!state.permits(SessionOperation::Fetch));
        assert!(!state.permits(SessionOperation::Send));
    }

    #[test]
    fn test_verify_requires_authenticated() {
        assert!(SessionState::Authenticated { key: key() }.permits(SessionOperation::Verify));
        assert!(!SessionState::Verified { key: key() }.permits(SessionOperation::Verify));
    }

    #[test]
    fn test_terminal_states_permit_nothing() {
        for state in [SessionState::Released, SessionState::Failed] {
            for op in [
                SessionOperation::Authenticate,
                SessionOperation::Verify,
                SessionOperation::Release,
                SessionOperation::Fetch,
                SessionOperation::Send,
            ] {
                assert!(!state.permits(op), "{:?} should reject {:?}", state, op);
            }
        }
    }

    #[test]
    fn test_ensure_reports_phase() {
        let err = SessionState::Released
            .ensure(SessionOperation::Release)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::IllegalState {
                operation: SessionOperation::Release,
                phase: SessionPhase::Released,
            }
        );
    }

    #[test]
    fn test_key_for_send() {
        let state = SessionState::Verified { key: key() };
        assert_eq!(state.key_for(SessionOperation::Send).unwrap().as_str(), "abc");
        assert!(SessionState::Pending.key_for(SessionOperation::Send).is_err());
    }
}
