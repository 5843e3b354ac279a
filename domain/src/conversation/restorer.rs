//! Rebuilding mode state from conversation history.
//!
//! [`StateRestorer`] replays agent turns through the [`ModeDetector`] under a
//! [`TransitionPolicy`]. Nothing is mutated besides the returned value, so
//! replaying the same history always yields the same result.

use super::entities::{ConversationHistory, Role};
use super::state::AgentModeState;
use crate::core::error::DomainError;
use crate::marker::detector::ModeDetector;
use crate::mode::Mode;
use crate::mode::transition::{ModeTransition, TransitionPolicy};
use serde::Serialize;

/// Mode in effect after one turn of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrajectoryStep {
    pub turn_index: usize,
    pub role: Role,
    pub mode: Mode,
    pub transition: Option<ModeTransition>,
}

/// Replays history to compute the current mode.
#[derive(Debug, Clone, Default)]
pub struct StateRestorer {
    detector: ModeDetector,
    policy: TransitionPolicy,
}

impl StateRestorer {
    pub fn new(detector: ModeDetector, policy: TransitionPolicy) -> Self {
        Self { detector, policy }
    }

    pub fn detector(&self) -> &ModeDetector {
        &self.detector
    }

    pub fn policy(&self) -> &TransitionPolicy {
        &self.policy
    }

    /// Mode in effect at the end of `history`.
    ///
    /// Returns `default_mode` when the history holds no agent turns.
    pub fn restore(&self, history: &ConversationHistory, default_mode: Mode) -> Mode {
        self.restore_state(history, default_mode).current_mode
    }

    /// Full state at the end of `history`.
    pub fn restore_state(
        &self,
        history: &ConversationHistory,
        default_mode: Mode,
    ) -> AgentModeState {
        let mut state = AgentModeState::new(default_mode);
        self.replay_pending(&mut state, history);
        state
    }

    /// Bring a previously computed state up to date with `history`.
    ///
    /// Only agent turns after `state.last_applied_turn` are scanned. The
    /// result equals `restore_state` over the same history as long as `state`
    /// itself came from a prefix of it.
    pub fn advance(
        &self,
        state: AgentModeState,
        history: &ConversationHistory,
    ) -> Result<(AgentModeState, Vec<ModeTransition>), DomainError> {
        if let Some(last) = state.last_applied_turn
            && last >= history.len()
        {
            return Err(DomainError::StateAheadOfHistory {
                last_applied: last,
                history_len: history.len(),
            });
        }

        let mut state = state;
        let transitions = self.replay_pending(&mut state, history);
        Ok((state, transitions))
    }

    /// Per-turn replay, for diagnostics.
    pub fn trajectory(
        &self,
        history: &ConversationHistory,
        default_mode: Mode,
    ) -> Vec<TrajectoryStep> {
        let mut state = AgentModeState::new(default_mode);
        history
            .turns()
            .iter()
            .enumerate()
            .map(|(index, turn)| {
                let transition = if turn.role.is_agent() {
                    let detected = self.detector.detect(&turn.content);
                    state.apply(index, detected, &self.policy)
                } else {
                    None
                };
                TrajectoryStep {
                    turn_index: index,
                    role: turn.role,
                    mode: state.current_mode,
                    transition,
                }
            })
            .collect()
    }

    fn replay_pending(
        &self,
        state: &mut AgentModeState,
        history: &ConversationHistory,
    ) -> Vec<ModeTransition> {
        let mut transitions = Vec::new();
        for (index, turn) in history.turns().iter().enumerate() {
            if !turn.role.is_agent() || !state.is_pending(index) {
                continue;
            }
            let detected = self.detector.detect(&turn.content);
            if let Some(t) = state.apply(index, detected, &self.policy) {
                transitions.push(t);
            }
        }
        transitions
    }
}
