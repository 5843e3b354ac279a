//! Domain error types

use crate::mode::Mode;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Marker phrase '{phrase}' maps to both {existing} and {conflicting}")]
    DuplicateMarker {
        phrase: String,
        existing: Mode,
        conflicting: Mode,
    },

    #[error("Marker phrase must not be empty")]
    EmptyMarker,

    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    #[error(
        "Cached mode state is ahead of history: last applied turn {last_applied}, history has {history_len} turns"
    )]
    StateAheadOfHistory {
        last_applied: usize,
        history_len: usize,
    },
}

impl DomainError {
    /// Check if this error is a configuration problem (as opposed to a state defect)
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DomainError::DuplicateMarker { .. }
                | DomainError::EmptyMarker
                | DomainError::InvalidMode(_)
        )
    }
}
