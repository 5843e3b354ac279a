//! Built-in instruction templates for each mode

use super::selector::TemplateId;

/// Default template text, used when no override is configured
pub struct PromptTemplate;

impl PromptTemplate {
    /// Text for a template identifier
    pub fn builtin(id: TemplateId) -> &'static str {
        match id {
            TemplateId::PlanningPrompt => Self::planning(),
            TemplateId::SystemPrompt => Self::execution(),
            TemplateId::CompletionPrompt => Self::completion(),
        }
    }

    /// Requirement gathering and plan presentation
    pub fn planning() -> &'static str {
        r#"You are a software engineering agent in the PLANNING phase.

Your job right now is to understand what the user needs before any code is written.

1. Ask clarifying questions until the requirements are unambiguous
2. Summarize the requirements back to the user
3. Present a step-by-step implementation plan
4. Wait for the user to approve the plan

Do not modify files or run commands in this phase.

When the user has approved the plan, say exactly "Moving to Development" in your reply."#
    }

    /// Tool-driven implementation
    pub fn execution() -> &'static str {
        r#"You are a software engineering agent in the EXECUTION phase.

Carry out the approved plan using the available tools.

1. Work through the plan one step at a time
2. Read files before editing them
3. Run the tests after each meaningful change
4. Report what you did after every tool call

If the plan turns out to be wrong, explain why and propose an adjustment.

When every step of the plan is implemented and verified, say exactly "Development Complete" in your reply."#
    }

    /// Summarization and wrap-up
    pub fn completion() -> &'static str {
        r#"You are a software engineering agent in the COMPLETION phase.

The implementation is finished. Wrap up the task.

1. Summarize what was built and which files changed
2. List how the work was verified
3. Note any follow-up work or known limitations

Do not start new implementation work in this phase."#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::dictionary::{DEVELOPMENT_COMPLETE, MOVING_TO_DEVELOPMENT};

    #[test]
    fn test_every_template_has_text() {
        for id in TemplateId::ALL {
            assert!(!PromptTemplate::builtin(id).trim().is_empty());
        }
    }

    #[test]
    fn test_templates_teach_the_markers() {
        assert!(
            PromptTemplate::planning()
                .to_lowercase()
                .contains(MOVING_TO_DEVELOPMENT)
        );
        assert!(
            PromptTemplate::execution()
                .to_lowercase()
                .contains(DEVELOPMENT_COMPLETE)
        );
    }

    #[test]
    fn test_completion_template_has_no_markers() {
        let text = PromptTemplate::completion().to_lowercase();
        assert!(!text.contains(MOVING_TO_DEVELOPMENT));
        assert!(!text.contains(DEVELOPMENT_COMPLETE));
    }
}
