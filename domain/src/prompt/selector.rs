//! Mode → instruction template mapping.

use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an instruction template.
///
/// Resolved to full text by a template repository; the core never reads the
/// contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    PlanningPrompt,
    /// Execution uses the general system prompt
    SystemPrompt,
    CompletionPrompt,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [
        TemplateId::PlanningPrompt,
        TemplateId::SystemPrompt,
        TemplateId::CompletionPrompt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::PlanningPrompt => "planning_prompt",
            TemplateId::SystemPrompt => "system_prompt",
            TemplateId::CompletionPrompt => "completion_prompt",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TemplateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planning_prompt" => Ok(TemplateId::PlanningPrompt),
            "system_prompt" => Ok(TemplateId::SystemPrompt),
            "completion_prompt" => Ok(TemplateId::CompletionPrompt),
            _ => Err(format!("Invalid TemplateId: {}", s)),
        }
    }
}

/// Picks the instruction template for a mode.
pub struct PromptSelector;

impl PromptSelector {
    pub fn select(mode: Mode) -> TemplateId {
        match mode {
            Mode::Planning => TemplateId::PlanningPrompt,
            Mode::Execution => TemplateId::SystemPrompt,
            Mode::Completion => TemplateId::CompletionPrompt,
        }
    }
}
