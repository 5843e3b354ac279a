//! Actions produced by mode handlers.
//!
//! The payload belongs to the execution subsystem; this layer only tags it
//! with the mode that produced it.

use crate::mode::Mode;
use crate::prompt::TemplateId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What kind of next move a mode biases toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionIntent {
    /// Ask questions, present a plan
    GatherRequirements,
    /// Call tools to carry out work
    InvokeTools,
    /// Summarize and finish
    Summarize,
}

impl ActionIntent {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Planning => ActionIntent::GatherRequirements,
            Mode::Execution => ActionIntent::InvokeTools,
            Mode::Completion => ActionIntent::Summarize,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionIntent::GatherRequirements => "gather_requirements",
            ActionIntent::InvokeTools => "invoke_tools",
            ActionIntent::Summarize => "summarize",
        }
    }
}

impl std::fmt::Display for ActionIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Next action for the execution subsystem, tagged with its producing mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub mode: Mode,
    pub intent: ActionIntent,
    pub template: TemplateId,
    pub payload: Value,
}

impl Action {
    /// Action carrying the default intent for `mode`.
    pub fn new(mode: Mode, template: TemplateId, payload: Value) -> Self {
        Self {
            mode,
            intent: ActionIntent::for_mode(mode),
            template,
            payload,
        }
    }

    pub fn with_intent(mut self, intent: ActionIntent) -> Self {
        self.intent = intent;
        self
    }

    /// Whether this action ends the task.
    pub fn is_finish(&self) -> bool {
        self.mode == Mode::Completion && self.intent == ActionIntent::Summarize
    }
}
