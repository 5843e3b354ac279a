//! In-process mode state store

use async_trait::async_trait;
use phasekeeper_application::ports::state_store::{ModeStateStore, StoreError};
use phasekeeper_domain::{AgentModeState, ConversationId};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Store keeping every conversation's state in memory
#[derive(Default)]
pub struct InMemoryStateStore {
    states: RwLock<HashMap<ConversationId, AgentModeState>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }
}

#[async_trait]
impl ModeStateStore for InMemoryStateStore {
    async fn load(&self, id: &ConversationId) -> Result<Option<AgentModeState>, StoreError> {
        Ok(self.states.read().await.get(id).copied())
    }

    async fn save(&self, id: &ConversationId, state: &AgentModeState) -> Result<(), StoreError> {
        self.states.write().await.insert(id.clone(), *state);
        Ok(())
    }

    async fn remove(&self, id: &ConversationId) -> Result<(), StoreError> {
        self.states.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasekeeper_domain::Mode;

    #[tokio::test]
    async fn test_save_load_remove() {
        let store = InMemoryStateStore::new();
        let id = ConversationId::new("conv-1");
        assert_eq!(store.load(&id).await.unwrap(), None);

        let state = AgentModeState {
            current_mode: Mode::Execution,
            last_applied_turn: Some(3),
        };
        store.save(&id, &state).await.unwrap();
        assert_eq!(store.load(&id).await.unwrap(), Some(state));
        assert_eq!(store.len().await, 1);

        store.remove(&id).await.unwrap();
        assert_eq!(store.load(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_replaces_previous_state() {
        let store = InMemoryStateStore::new();
        let id = ConversationId::new("conv-1");
        store
            .save(&id, &AgentModeState::new(Mode::Planning))
            .await
            .unwrap();
        store
            .save(&id, &AgentModeState::new(Mode::Completion))
            .await
            .unwrap();
        assert_eq!(
            store.load(&id).await.unwrap().unwrap().current_mode,
            Mode::Completion
        );
    }
}
