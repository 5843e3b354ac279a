//! Domain layer for phasekeeper
//!
//! This crate contains the mode-control logic of a conversational coding
//! agent. It has no dependencies on infrastructure or presentation concerns
//! and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Modes
//!
//! A conversation moves through three modes:
//!
//! - **Planning** (default): gather requirements, present a plan
//! - **Execution**: carry out the plan with tools
//! - **Completion**: summarize and wrap up
//!
//! ## Markers
//!
//! The agent announces a mode change by writing a marker phrase such as
//! "Moving to Development". The [`ModeDetector`] finds these phrases; the
//! [`StateRestorer`] replays a whole history to recompute the current mode,
//! so the mode never needs its own source of truth.

pub mod action;
pub mod conversation;
pub mod core;
pub mod marker;
pub mod mode;
pub mod prompt;

// Re-export commonly used types
pub use action::{Action, ActionIntent};
pub use conversation::{
    entities::{ConversationHistory, ConversationId, Role, Turn},
    restorer::{StateRestorer, TrajectoryStep},
    state::AgentModeState,
};
pub use crate::core::error::DomainError;
pub use crate::core::validation::{ConfigIssue, ConfigIssueCode, Severity};
pub use marker::{
    detector::ModeDetector,
    dictionary::{DEVELOPMENT_COMPLETE, MOVING_TO_DEVELOPMENT, MarkerDictionary, MarkerPhrase},
};
pub use mode::{
    Mode,
    transition::{ModeTransition, TransitionPolicy},
};
pub use prompt::{PromptSelector, PromptTemplate, TemplateId};
