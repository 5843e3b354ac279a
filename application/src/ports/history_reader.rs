//! Conversation history reader port
//!
//! Read-only access to the turns of a conversation, supplied by whatever
//! persists the conversation itself.

use async_trait::async_trait;
use phasekeeper_domain::{ConversationHistory, ConversationId};
use thiserror::Error;

/// Errors that can occur while reading history
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Conversation not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Malformed turn at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Port for loading a conversation's history
#[async_trait]
pub trait HistoryReader: Send + Sync {
    async fn read(&self, id: &ConversationId) -> Result<ConversationHistory, HistoryError>;
}
