//! Mode transition rules.
//!
//! A detected target mode only takes effect when it differs from the current
//! mode and the edge between them is allowed. The baseline policy allows the
//! forward edges of the progression; backward edges such as
//! `Completion -> Planning` (plan revision) have to be added explicitly.

use super::Mode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A mode change that was applied while processing a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTransition {
    pub from: Mode,
    pub to: Mode,
    /// History index of the agent turn that carried the marker
    pub turn_index: usize,
}

impl std::fmt::Display for ModeTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} (turn {})", self.from, self.to, self.turn_index)
    }
}

/// Set of allowed `(from, to)` edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPolicy {
    edges: BTreeSet<(Mode, Mode)>,
}

impl TransitionPolicy {
    /// Forward edges only: Planning -> Execution -> Completion, plus the
    /// Planning -> Completion shortcut. Completion has no outbound edge.
    pub fn forward_only() -> Self {
        let mut edges = BTreeSet::new();
        for from in Mode::ALL {
            for to in Mode::ALL {
                if from.precedes(to) {
                    edges.insert((from, to));
                }
            }
        }
        Self { edges }
    }

    /// Allow an additional edge. Self-edges are ignored.
    pub fn with_edge(mut self, from: Mode, to: Mode) -> Self {
        if from != to {
            self.edges.insert((from, to));
        }
        self
    }

    pub fn allows(&self, from: Mode, to: Mode) -> bool {
        self.edges.contains(&(from, to))
    }

    /// Resolve a detection result against the current mode.
    ///
    /// Returns the new mode when a change applies, `None` otherwise.
    pub fn resolve(&self, current: Mode, detected: Option<Mode>) -> Option<Mode> {
        let target = detected?;
        (target != current && self.allows(current, target)).then_some(target)
    }

    /// Allowed edges in `(from, to)` order.
    pub fn edges(&self) -> impl Iterator<Item = (Mode, Mode)> + '_ {
        self.edges.iter().copied()
    }

    /// Whether any edge leaves `mode`.
    pub fn has_outbound(&self, mode: Mode) -> bool {
        self.edges.iter().any(|(from, _)| *from == mode)
    }

    /// Whether any edge enters `mode`.
    pub fn has_inbound(&self, mode: Mode) -> bool {
        self.edges.iter().any(|(_, to)| *to == mode)
    }
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::forward_only()
    }
}
