//! Transition configuration from TOML (`[transitions]` section)

use super::agent::valid_modes;
use phasekeeper_domain::{ConfigIssue, ConfigIssueCode, Mode, TransitionPolicy};
use serde::{Deserialize, Serialize};

/// An extra allowed mode change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTransitionEdge {
    pub from: String,
    pub to: String,
}

/// Raw transition configuration from TOML
///
/// The forward edges (planning -> execution -> completion, and planning ->
/// completion) are always allowed. `extra` adds more, for example plan
/// revision:
///
/// ```toml
/// [[transitions.extra]]
/// from = "completion"
/// to = "planning"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTransitionsConfig {
    pub extra: Vec<FileTransitionEdge>,
}

impl FileTransitionsConfig {
    /// Build the transition policy, reporting unknown modes as errors.
    pub fn parse_policy(&self) -> (TransitionPolicy, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut policy = TransitionPolicy::forward_only();

        for edge in &self.extra {
            let from = parse_endpoint("transitions.extra.from", &edge.from, &mut issues);
            let to = parse_endpoint("transitions.extra.to", &edge.to, &mut issues);
            let (Some(from), Some(to)) = (from, to) else {
                continue;
            };
            if from == to {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::SelfTransition {
                        mode: from.to_string(),
                    },
                    format!("transitions: {} -> {} has no effect, ignored", from, to),
                ));
                continue;
            }
            policy = policy.with_edge(from, to);
        }

        (policy, issues)
    }
}

fn parse_endpoint(field: &str, value: &str, issues: &mut Vec<ConfigIssue>) -> Option<Mode> {
    match value.parse::<Mode>() {
        Ok(mode) => Some(mode),
        Err(_) => {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidEnumValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    valid_values: valid_modes(),
                },
                format!("{}: unknown mode '{}'", field, value),
            ));
            None
        }
    }
}
