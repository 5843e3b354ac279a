//! Directory-backed prompt templates.
//!
//! Looks for `<dir>/<template id>.md` (e.g. `planning_prompt.md`) and falls
//! back to the built-in text when the file is absent.

use phasekeeper_application::ports::prompt_repository::{
    PromptTemplateRepository, TemplateError,
};
use phasekeeper_domain::{PromptTemplate, TemplateId};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prompt templates read from a directory
pub struct FsPromptRepository {
    dir: Option<PathBuf>,
}

impl FsPromptRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Repository serving the built-in texts only
    pub fn builtin() -> Self {
        Self { dir: None }
    }

    pub fn from_config(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::new(dir),
            None => Self::builtin(),
        }
    }

    pub fn template_path(&self, id: TemplateId) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.md", id.as_str())))
    }
}

impl PromptTemplateRepository for FsPromptRepository {
    fn load(&self, id: TemplateId) -> Result<String, TemplateError> {
        let Some(path) = self.template_path(id) else {
            return Ok(PromptTemplate::builtin(id).to_string());
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => {
                debug!("Loaded template {} from {}", id, path.display());
                Ok(text)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No override for template {}, using built-in", id);
                Ok(PromptTemplate::builtin(id).to_string())
            }
            Err(e) => Err(TemplateError::Io {
                id,
                message: format!("{}: {}", path.display(), e),
            }),
        }
    }
}
