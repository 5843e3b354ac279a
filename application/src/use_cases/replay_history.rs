//! Replay history use case
//!
//! Recomputes a conversation's mode from its full history without dispatching
//! anything. Used for resume diagnostics and for the `replay`/`restore`
//! commands.

use crate::config::ModeConfig;
use crate::ports::history_reader::{HistoryError, HistoryReader};
use phasekeeper_domain::{
    AgentModeState, ConversationHistory, ConversationId, ModeTransition, StateRestorer,
    TrajectoryStep,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during replay
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Failed to read history: {0}")]
    History(#[from] HistoryError),
}

/// Result of replaying a history
#[derive(Debug, Clone)]
pub struct ReplayOutput {
    /// Mode after every turn
    pub trajectory: Vec<TrajectoryStep>,
    /// State at the end of the history
    pub state: AgentModeState,
    pub turns: usize,
}

impl ReplayOutput {
    /// Transitions in the order they happened
    pub fn transitions(&self) -> Vec<ModeTransition> {
        self.trajectory.iter().filter_map(|s| s.transition).collect()
    }
}

/// Use case for replaying a conversation's history
pub struct ReplayHistoryUseCase {
    config: ModeConfig,
    restorer: StateRestorer,
    reader: Option<Arc<dyn HistoryReader>>,
}

impl ReplayHistoryUseCase {
    pub fn new(config: ModeConfig) -> Self {
        Self {
            restorer: config.restorer(),
            config,
            reader: None,
        }
    }

    pub fn with_reader(mut self, reader: Arc<dyn HistoryReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Replay an in-memory history
    pub fn replay(&self, history: &ConversationHistory) -> ReplayOutput {
        let trajectory = self.restorer.trajectory(history, self.config.default_mode);
        let state = self
            .restorer
            .restore_state(history, self.config.default_mode);
        debug!(
            "Replayed {} turns, final mode {}",
            history.len(),
            state.current_mode
        );
        ReplayOutput {
            trajectory,
            state,
            turns: history.len(),
        }
    }

    /// Load a conversation through the configured reader and replay it
    pub async fn execute(&self, id: &ConversationId) -> Result<ReplayOutput, ReplayError> {
        let reader = self
            .reader
            .as_ref()
            .ok_or_else(|| HistoryError::NotFound(id.to_string()))?;
        let history = reader.read(id).await?;
        Ok(self.replay(&history))
    }
}
