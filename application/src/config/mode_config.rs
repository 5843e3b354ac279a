//! Mode control configuration.
//!
//! [`ModeConfig`] is loaded once at process start and shared by every
//! conversation. All of it is read-only after construction.

use phasekeeper_domain::{MarkerDictionary, Mode, ModeDetector, StateRestorer, TransitionPolicy};
use std::sync::Arc;

/// Runtime configuration for the step controller.
#[derive(Debug, Clone)]
pub struct ModeConfig {
    /// Mode used when a history holds no agent turns.
    pub default_mode: Mode,
    /// Marker phrases, shared between conversations.
    pub markers: Arc<MarkerDictionary>,
    /// Allowed mode changes.
    pub transitions: TransitionPolicy,
    /// Recompute the mode from history on every step and fail on mismatch
    /// with the cached state.
    pub verify_cached_state: bool,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::Planning,
            markers: Arc::new(MarkerDictionary::baseline()),
            transitions: TransitionPolicy::default(),
            verify_cached_state: false,
        }
    }
}

impl ModeConfig {
    // ==================== Builder Methods ====================

    pub fn with_default_mode(mut self, mode: Mode) -> Self {
        self.default_mode = mode;
        self
    }

    pub fn with_markers(mut self, markers: MarkerDictionary) -> Self {
        self.markers = Arc::new(markers);
        self
    }

    pub fn with_transitions(mut self, transitions: TransitionPolicy) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn with_verify_cached_state(mut self, verify: bool) -> Self {
        self.verify_cached_state = verify;
        self
    }

    // ==================== Derived Components ====================

    pub fn detector(&self) -> ModeDetector {
        ModeDetector::new(Arc::clone(&self.markers))
    }

    pub fn restorer(&self) -> StateRestorer {
        StateRestorer::new(self.detector(), self.transitions.clone())
    }
}
