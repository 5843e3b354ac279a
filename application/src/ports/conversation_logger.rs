//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording mode-control events
//! (restores, transitions, completed steps) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures a
//! machine-readable record of how each conversation's mode evolved (JSONL).

use phasekeeper_domain::{Action, AgentModeState, ConversationId, ModeTransition};
use serde_json::{Value, json};

/// A structured conversation event for logging.
///
/// Each event has a type string and a JSON payload containing event-specific
/// fields. The adapter adds the timestamp when writing.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier (e.g., "mode_restored", "mode_transition").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// State rebuilt from history on cold start or resume.
    pub fn mode_restored(id: &ConversationId, state: &AgentModeState, turns: usize) -> Self {
        Self::new(
            "mode_restored",
            json!({
                "conversation_id": id.as_str(),
                "mode": state.current_mode,
                "last_applied_turn": state.last_applied_turn,
                "turns": turns,
            }),
        )
    }

    pub fn mode_transition(id: &ConversationId, transition: &ModeTransition) -> Self {
        Self::new(
            "mode_transition",
            json!({
                "conversation_id": id.as_str(),
                "from": transition.from,
                "to": transition.to,
                "turn_index": transition.turn_index,
            }),
        )
    }

    pub fn step_completed(id: &ConversationId, state: &AgentModeState, action: &Action) -> Self {
        Self::new(
            "step_completed",
            json!({
                "conversation_id": id.as_str(),
                "mode": state.current_mode,
                "template": action.template,
                "intent": action.intent,
            }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is synchronous and infallible so that a logging problem
/// never fails a step.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasekeeper_domain::Mode;

    #[test]
    fn test_transition_event_payload() {
        let id = ConversationId::new("conv-7");
        let event = ConversationEvent::mode_transition(
            &id,
            &ModeTransition {
                from: Mode::Planning,
                to: Mode::Execution,
                turn_index: 3,
            },
        );
        assert_eq!(event.event_type, "mode_transition");
        assert_eq!(event.payload["conversation_id"], "conv-7");
        assert_eq!(event.payload["from"], "planning");
        assert_eq!(event.payload["to"], "execution");
        assert_eq!(event.payload["turn_index"], 3);
    }

    #[test]
    fn test_restored_event_payload() {
        let id = ConversationId::new("conv-1");
        let state = AgentModeState::new(Mode::Planning);
        let event = ConversationEvent::mode_restored(&id, &state, 0);
        assert_eq!(event.payload["mode"], "planning");
        assert!(event.payload["last_applied_turn"].is_null());
        assert_eq!(event.payload["turns"], 0);
    }
}
