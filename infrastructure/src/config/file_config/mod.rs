//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Mode names are kept as strings here and parsed during validation, so an
//! unknown name is reported with its field instead of failing deserialization.

mod agent;
mod logging;
mod markers;
mod prompts;
mod state;
mod transitions;

pub use agent::FileAgentConfig;
pub use logging::FileLoggingConfig;
pub use markers::{FileMarkerEntry, FileMarkersConfig};
pub use prompts::FilePromptsConfig;
pub use state::FileStateConfig;
pub use transitions::{FileTransitionEdge, FileTransitionsConfig};

use super::error::ConfigError;
use phasekeeper_application::ModeConfig;
use phasekeeper_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Default mode and step behavior
    pub agent: FileAgentConfig,
    /// Marker phrases
    pub markers: FileMarkersConfig,
    /// Extra allowed mode changes
    pub transitions: FileTransitionsConfig,
    /// Prompt template overrides
    pub prompts: FilePromptsConfig,
    /// Mode state persistence
    pub state: FileStateConfig,
    /// Structured conversation log
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let (markers, marker_issues) = self.markers.parse_dictionary();
        let (transitions, transition_issues) = self.transitions.parse_policy();
        issues.extend(self.agent.parse_default_mode().1);
        issues.extend(marker_issues);
        issues.extend(transition_issues);
        issues.extend(markers::unreachable_markers(&markers, &transitions));

        if let Some(dir) = &self.prompts.template_dir
            && !dir.is_dir()
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingDirectory {
                    field: "prompts.template_dir".to_string(),
                    path: dir.display().to_string(),
                },
                format!(
                    "prompts.template_dir: {} does not exist, using built-in templates",
                    dir.display()
                ),
            ));
        }

        issues
    }

    /// Build the runtime [`ModeConfig`].
    ///
    /// Fails when validation reports any error; warnings are resolved to
    /// their fallback values.
    pub fn to_mode_config(&self) -> Result<ModeConfig, ConfigError> {
        let (default_mode, mut issues) = self.agent.parse_default_mode();
        let (markers, marker_issues) = self.markers.parse_dictionary();
        let (transitions, transition_issues) = self.transitions.parse_policy();
        issues.extend(marker_issues);
        issues.extend(transition_issues);

        let errors: Vec<ConfigIssue> = issues.into_iter().filter(|i| i.is_error()).collect();
        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }

        Ok(ModeConfig::default()
            .with_default_mode(default_mode)
            .with_markers(markers)
            .with_transitions(transitions)
            .with_verify_cached_state(self.agent.verify_cached_state))
    }
}
