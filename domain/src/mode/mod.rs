//! Operating modes of the agent.
//!
//! - [`Mode`]: the closed set of phases a conversation moves through
//! - [`transition::TransitionPolicy`]: which mode changes are allowed
//! - [`transition::ModeTransition`]: record of an applied change

pub mod transition;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The agent's operating phase.
///
/// Variants are declared in progression order, so the derived `Ord` reads
/// `Planning < Execution < Completion`. The ordering is used for display and
/// for marker precedence; it does not constrain transitions on its own.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Gathering requirements and presenting a plan
    #[default]
    Planning,
    /// Carrying out the agreed plan with tools
    Execution,
    /// Summarizing and wrapping up
    Completion,
}

impl Mode {
    /// All modes in progression order.
    pub const ALL: [Mode; 3] = [Mode::Planning, Mode::Execution, Mode::Completion];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Planning => "planning",
            Mode::Execution => "execution",
            Mode::Completion => "completion",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Planning => "Planning",
            Mode::Execution => "Execution",
            Mode::Completion => "Completion",
        }
    }

    /// Position of this mode in the progression (0-based).
    pub fn stage(&self) -> usize {
        match self {
            Mode::Planning => 0,
            Mode::Execution => 1,
            Mode::Completion => 2,
        }
    }

    /// Whether `other` comes later in the progression than `self`.
    pub fn precedes(&self, other: Mode) -> bool {
        self.stage() < other.stage()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planning" | "plan" => Ok(Mode::Planning),
            "execution" | "execute" | "exec" | "development" => Ok(Mode::Execution),
            "completion" | "complete" | "done" => Ok(Mode::Completion),
            _ => Err(format!("Invalid Mode: {}", s)),
        }
    }
}
