//! Agent configuration from TOML (`[agent]` section)

use phasekeeper_domain::{ConfigIssue, ConfigIssueCode, Mode};
use serde::{Deserialize, Serialize};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// default_mode = "planning"        # "planning", "execution", "completion"
/// verify_cached_state = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Mode used for conversations without agent output
    pub default_mode: String,
    /// Recompute the mode from history on every step
    pub verify_cached_state: bool,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::default().as_str().to_string(),
            verify_cached_state: false,
        }
    }
}

impl FileAgentConfig {
    /// Parse default_mode into a Mode, returning a warning on failure.
    pub fn parse_default_mode(&self) -> (Mode, Vec<ConfigIssue>) {
        match self.default_mode.parse::<Mode>() {
            Ok(mode) => (mode, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "agent.default_mode".to_string(),
                        value: self.default_mode.clone(),
                        valid_values: valid_modes(),
                    },
                    format!(
                        "agent.default_mode: unknown value '{}', falling back to '{}'",
                        self.default_mode,
                        Mode::default()
                    ),
                );
                (Mode::default(), vec![issue])
            }
        }
    }
}

pub(super) fn valid_modes() -> Vec<String> {
    Mode::ALL.iter().map(|m| m.as_str().to_string()).collect()
}
