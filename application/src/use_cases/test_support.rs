//! Mock ports shared by the use case tests.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::mode_handler::{HandlerContext, HandlerError, HandlerRegistry, ModeHandler};
use crate::ports::state_store::{ModeStateStore, StoreError};
use async_trait::async_trait;
use phasekeeper_domain::{Action, AgentModeState, ConversationId, Mode, ModeTransition};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// What a handler was called with
#[derive(Debug, Clone)]
pub struct SeenCall {
    pub mode: Mode,
    pub instructions: String,
    pub history_len: usize,
    pub transition: Option<ModeTransition>,
}

/// Handler that records its calls and echoes the mode back
pub struct RecordingHandler {
    mode: Mode,
    calls: Arc<Mutex<Vec<SeenCall>>>,
    fail: bool,
}

impl RecordingHandler {
    pub fn new(mode: Mode, calls: Arc<Mutex<Vec<SeenCall>>>) -> Self {
        Self {
            mode,
            calls,
            fail: false,
        }
    }

    pub fn failing(mode: Mode, calls: Arc<Mutex<Vec<SeenCall>>>) -> Self {
        Self {
            mode,
            calls,
            fail: true,
        }
    }
}

#[async_trait]
impl ModeHandler for RecordingHandler {
    fn mode(&self) -> Mode {
        self.mode
    }

    async fn handle(&self, context: &HandlerContext<'_>) -> Result<Action, HandlerError> {
        self.calls.lock().unwrap().push(SeenCall {
            mode: context.mode,
            instructions: context.instructions.to_string(),
            history_len: context.history.len(),
            transition: context.transition,
        });
        if self.fail {
            return Err(HandlerError::Failed("model unavailable".to_string()));
        }
        Ok(Action::new(
            self.mode,
            context.template,
            json!({ "conversation": context.conversation_id.as_str() }),
        ))
    }
}

/// Registry with a recording handler for every mode, sharing one call log
pub fn recording_registry() -> (HandlerRegistry, Arc<Mutex<Vec<SeenCall>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = Mode::ALL.into_iter().fold(HandlerRegistry::new(), |r, m| {
        r.register(Arc::new(RecordingHandler::new(m, Arc::clone(&calls))))
    });
    (registry, calls)
}

/// In-memory store that counts saves and can be told to fail
#[derive(Default)]
pub struct MockStore {
    pub states: Mutex<HashMap<ConversationId, AgentModeState>>,
    pub saves: Mutex<usize>,
    pub fail_saves: bool,
}

impl MockStore {
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    pub fn stored(&self, id: &ConversationId) -> Option<AgentModeState> {
        self.states.lock().unwrap().get(id).copied()
    }
}

#[async_trait]
impl ModeStateStore for MockStore {
    async fn load(&self, id: &ConversationId) -> Result<Option<AgentModeState>, StoreError> {
        Ok(self.stored(id))
    }

    async fn save(&self, id: &ConversationId, state: &AgentModeState) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Io("disk full".to_string()));
        }
        *self.saves.lock().unwrap() += 1;
        self.states.lock().unwrap().insert(id.clone(), *state);
        Ok(())
    }

    async fn remove(&self, id: &ConversationId) -> Result<(), StoreError> {
        self.states.lock().unwrap().remove(id);
        Ok(())
    }
}

/// Logger that keeps event types in order
#[derive(Default)]
pub struct RecordingLogger {
    pub events: Mutex<Vec<&'static str>>,
}

impl RecordingLogger {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events.lock().unwrap().push(event.event_type);
    }
}
