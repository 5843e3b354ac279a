//! Mode state persistence port
//!
//! The store keeps the latest [`AgentModeState`] next to each conversation.
//! Retry and backoff are the adapter's business; the step controller reports
//! any failure to its caller unchanged.

use async_trait::async_trait;
use phasekeeper_domain::{AgentModeState, ConversationId};
use thiserror::Error;

/// Errors that can occur in a state store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store error: {0}")]
    Other(String),
}

/// Persistence for per-conversation mode state
#[async_trait]
pub trait ModeStateStore: Send + Sync {
    /// Load the stored state, if any
    async fn load(&self, id: &ConversationId) -> Result<Option<AgentModeState>, StoreError>;

    /// Store the state, replacing any previous value
    async fn save(&self, id: &ConversationId, state: &AgentModeState) -> Result<(), StoreError>;

    /// Drop the stored state when the conversation ends
    async fn remove(&self, id: &ConversationId) -> Result<(), StoreError>;
}

/// Store that keeps nothing, for tests and one-shot runs
pub struct NoStateStore;

#[async_trait]
impl ModeStateStore for NoStateStore {
    async fn load(&self, _id: &ConversationId) -> Result<Option<AgentModeState>, StoreError> {
        Ok(None)
    }

    async fn save(&self, _id: &ConversationId, _state: &AgentModeState) -> Result<(), StoreError> {
        Ok(())
    }

    async fn remove(&self, _id: &ConversationId) -> Result<(), StoreError> {
        Ok(())
    }
}
