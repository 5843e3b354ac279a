//! Live conversation sessions
//!
//! Keeps the cached [`AgentModeState`] of every live conversation and makes
//! sure steps of one conversation run one at a time, while different
//! conversations step in parallel. Each conversation has its own slot behind a
//! `tokio::sync::Mutex`; the slot is only written after a step has fully
//! succeeded. Ending a conversation closes its slot, so a step that raced
//! with [`ConversationSessions::end`] cannot write the state back.

use super::step_controller::{StepController, StepError, StepInput, StepOutput};
use crate::ports::state_store::ModeStateStore;
use phasekeeper_domain::{AgentModeState, ConversationHistory, ConversationId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct SlotState {
    state: Option<AgentModeState>,
    ended: bool,
}

type Slot = Arc<tokio::sync::Mutex<SlotState>>;

/// Registry of live conversations sharing one [`StepController`]
pub struct ConversationSessions<S: ModeStateStore + 'static> {
    controller: Arc<StepController<S>>,
    slots: Mutex<HashMap<ConversationId, Slot>>,
}

impl<S: ModeStateStore + 'static> ConversationSessions<S> {
    pub fn new(controller: Arc<StepController<S>>) -> Self {
        Self {
            controller,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn controller(&self) -> &Arc<StepController<S>> {
        &self.controller
    }

    fn slot(&self, id: &ConversationId) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(id.clone()).or_default())
    }

    /// Seed a conversation with previously persisted state.
    ///
    /// Has no effect on a conversation that already holds state.
    pub async fn resume(&self, id: &ConversationId, state: AgentModeState) {
        let slot = self.slot(id);
        let mut cached = slot.lock().await;
        if !cached.ended && cached.state.is_none() {
            debug!("Resuming conversation {} in mode {}", id, state.current_mode);
            cached.state = Some(state);
        }
    }

    /// Run one step for `id`, waiting for any step already in flight on the
    /// same conversation.
    pub async fn step(
        &self,
        id: &ConversationId,
        history: &ConversationHistory,
    ) -> Result<StepOutput, StepError> {
        self.step_cancellable(id, history, &CancellationToken::new())
            .await
    }

    /// Like [`step`](Self::step), aborting when `cancel` fires.
    ///
    /// A cancelled step leaves the cached state as it was before the call.
    pub async fn step_cancellable(
        &self,
        id: &ConversationId,
        history: &ConversationHistory,
        cancel: &CancellationToken,
    ) -> Result<StepOutput, StepError> {
        self.step_in_slot(self.slot(id), id, history, cancel).await
    }

    async fn step_in_slot(
        &self,
        slot: Slot,
        id: &ConversationId,
        history: &ConversationHistory,
        cancel: &CancellationToken,
    ) -> Result<StepOutput, StepError> {
        let mut cached = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StepError::Cancelled),
            guard = slot.lock() => guard,
        };
        if cached.ended {
            return Err(StepError::ConversationEnded(id.clone()));
        }

        let input = StepInput::new(id, history).with_cached(cached.state);
        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Step for conversation {} cancelled, mode state left unchanged", id);
                return Err(StepError::Cancelled);
            }
            result = self.controller.step(input) => result?,
        };

        cached.state = Some(output.state);
        debug!(
            "Conversation {} committed mode {}",
            id, output.state.current_mode
        );
        Ok(output)
    }

    /// Cached state of a live conversation, waiting for an in-flight step.
    pub async fn state(&self, id: &ConversationId) -> Option<AgentModeState> {
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.get(id).cloned()
        }?;
        slot.lock().await.state
    }

    /// Number of live conversations
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard a conversation's state, locally and in the store.
    pub async fn end(&self, id: &ConversationId) -> Result<(), StepError> {
        let removed = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        if let Some(slot) = removed {
            // Waits for an in-flight step; later holders of the slot see it closed
            let mut cached = slot.lock().await;
            cached.ended = true;
            cached.state = None;
        }
        self.controller.store().remove(id).await?;
        info!("Conversation {} ended", id);
        Ok(())
    }
}
