//! Domain error types

use crate::session::state::{SessionOperation, SessionPhase};
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid listen scope '{0}': expected \"all\", \"friend\" or \"group\"")]
    InvalidListenScope(String),

    #[error("Unknown signal: {0}")]
    UnknownSignal(String),

    #[error("Cannot {operation} while session is {phase}")]
    IllegalState {
        operation: SessionOperation,
        phase: SessionPhase,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_state_display() {
        let error = DomainError::IllegalState {
            operation: SessionOperation::Verify,
            phase: SessionPhase::Released,
        };
        assert_eq!(error.to_string(), "Cannot verify while session is released");
    }

    #[test]
    fn test_invalid_scope_display() {
        let error = DomainError::InvalidListenScope("private".to_string());
        assert!(error.to_string().contains("private"));
    }
}
