//! Per-conversation mode state.

use crate::mode::Mode;
use crate::mode::transition::{ModeTransition, TransitionPolicy};
use serde::{Deserialize, Serialize};

/// Minimal record of where a conversation stands.
///
/// Everything here can be recomputed from history; holding on to it between
/// steps only saves the replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentModeState {
    pub current_mode: Mode,
    /// Index of the last agent turn already run through the detector
    pub last_applied_turn: Option<usize>,
}

impl AgentModeState {
    /// Fresh state for a conversation with nothing applied yet.
    pub fn new(mode: Mode) -> Self {
        Self {
            current_mode: mode,
            last_applied_turn: None,
        }
    }

    /// Whether the turn at `index` has not been applied yet.
    pub fn is_pending(&self, index: usize) -> bool {
        self.last_applied_turn.is_none_or(|last| index > last)
    }

    /// Record that the agent turn at `turn_index` was scanned and apply the
    /// detection result under `policy`.
    pub fn apply(
        &mut self,
        turn_index: usize,
        detected: Option<Mode>,
        policy: &TransitionPolicy,
    ) -> Option<ModeTransition> {
        self.last_applied_turn = Some(turn_index);
        let to = policy.resolve(self.current_mode, detected)?;
        let transition = ModeTransition {
            from: self.current_mode,
            to,
            turn_index,
        };
        self.current_mode = to;
        Some(transition)
    }
}
