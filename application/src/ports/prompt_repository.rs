//! Prompt template repository port
//!
//! Resolves a [`TemplateId`] to the full instruction text. The core passes the
//! text through to the handler without interpreting it.

use phasekeeper_domain::{PromptTemplate, TemplateId};
use thiserror::Error;

/// Errors that can occur while resolving a template
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(TemplateId),

    #[error("Could not read template {id}: {message}")]
    Io { id: TemplateId, message: String },
}

/// Source of instruction texts
pub trait PromptTemplateRepository: Send + Sync {
    fn load(&self, id: TemplateId) -> Result<String, TemplateError>;
}

/// Repository backed by the built-in texts
pub struct BuiltinTemplates;

impl PromptTemplateRepository for BuiltinTemplates {
    fn load(&self, id: TemplateId) -> Result<String, TemplateError> {
        Ok(PromptTemplate::builtin(id).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_resolve_every_id() {
        for id in TemplateId::ALL {
            let text = BuiltinTemplates.load(id).unwrap();
            assert_eq!(text, PromptTemplate::builtin(id));
        }
    }

    #[test]
    fn test_error_display() {
        let err = TemplateError::Io {
            id: TemplateId::SystemPrompt,
            message: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Could not read template system_prompt: permission denied"
        );
    }
}
