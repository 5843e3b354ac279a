//! Prompt configuration from TOML (`[prompts]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw prompt configuration from TOML
///
/// ```toml
/// [prompts]
/// template_dir = "~/.config/phasekeeper/prompts"   # holds planning_prompt.md, ...
/// ```
///
/// Templates missing from the directory fall back to the built-in texts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptsConfig {
    pub template_dir: Option<PathBuf>,
}
