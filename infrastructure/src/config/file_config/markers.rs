//! Marker configuration from TOML (`[markers]` section)

use super::agent::valid_modes;
use phasekeeper_domain::{ConfigIssue, ConfigIssueCode, MarkerDictionary, Mode, TransitionPolicy};
use serde::{Deserialize, Serialize};

/// One configured marker phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMarkerEntry {
    pub phrase: String,
    pub mode: String,
}

/// Raw marker configuration from TOML
///
/// # Example
///
/// ```toml
/// [markers]
/// include_baseline = true
///
/// [[markers.entries]]
/// phrase = "Revising the plan"
/// mode = "planning"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMarkersConfig {
    /// Start from "Moving to Development" and "Development Complete"
    pub include_baseline: bool,
    /// Additional phrases
    pub entries: Vec<FileMarkerEntry>,
}

impl Default for FileMarkersConfig {
    fn default() -> Self {
        Self {
            include_baseline: true,
            entries: Vec::new(),
        }
    }
}

impl FileMarkersConfig {
    /// Build the marker dictionary.
    ///
    /// Entries with an unknown mode, an empty phrase, or a phrase already
    /// mapped to another mode are skipped and reported as errors.
    pub fn parse_dictionary(&self) -> (MarkerDictionary, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut dictionary = if self.include_baseline {
            MarkerDictionary::baseline()
        } else {
            MarkerDictionary::empty()
        };

        for entry in &self.entries {
            let Ok(mode) = entry.mode.parse::<Mode>() else {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "markers.entries.mode".to_string(),
                        value: entry.mode.clone(),
                        valid_values: valid_modes(),
                    },
                    format!(
                        "markers: phrase '{}' has unknown mode '{}'",
                        entry.phrase, entry.mode
                    ),
                ));
                continue;
            };

            match dictionary.extended([(entry.phrase.as_str(), mode)]) {
                Ok(extended) => dictionary = extended,
                Err(e) => issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidMarker {
                        phrase: entry.phrase.clone(),
                    },
                    format!("markers: {}", e),
                )),
            }
        }

        if dictionary.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyMarkerDictionary,
                "markers: no marker phrases configured, conversations will never change mode",
            ));
        }

        (dictionary, issues)
    }
}

/// Warn about markers that can never change the mode under `policy`.
pub(super) fn unreachable_markers(
    dictionary: &MarkerDictionary,
    policy: &TransitionPolicy,
) -> Vec<ConfigIssue> {
    dictionary
        .iter()
        .filter(|marker| !policy.has_inbound(marker.target()))
        .map(|marker| {
            ConfigIssue::warning(
                ConfigIssueCode::UnreachableMarker {
                    phrase: marker.phrase().to_string(),
                    mode: marker.target().to_string(),
                },
                format!(
                    "markers: '{}' targets {}, but no transition leads into {}; add a [[transitions.extra]] edge",
                    marker.phrase(),
                    marker.target(),
                    marker.target()
                ),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;
    use phasekeeper_domain::Severity;

    #[test]
    fn test_default_is_baseline() {
        let (dictionary, issues) = FileMarkersConfig::default().parse_dictionary();
        assert!(issues.is_empty());
        assert_eq!(dictionary, MarkerDictionary::baseline());
    }

    #[test]
    fn test_entries_extend_baseline() {
        let config: FileConfig = toml::from_str(
            r#"
[[markers.entries]]
phrase = "Revising the plan"
mode = "planning"

[[markers.entries]]
phrase = "moving to development"
mode = "execution"
"#,
        )
        .unwrap();
        let (dictionary, issues) = config.markers.parse_dictionary();
        assert!(issues.is_empty());
        assert_eq!(dictionary.len(), 3);
        assert_eq!(dictionary.target_of("revising the plan"), Some(Mode::Planning));
    }

    #[test]
    fn test_conflicting_phrase_is_an_error() {
        let config = FileMarkersConfig {
            include_baseline: true,
            entries: vec![FileMarkerEntry {
                phrase: "Development Complete".to_string(),
                mode: "planning".to_string(),
            }],
        };
        let (dictionary, issues) = config.parse_dictionary();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(
            dictionary.target_of("development complete"),
            Some(Mode::Completion)
        );
    }

    #[test]
    fn test_unknown_mode_is_an_error() {
        let config = FileMarkersConfig {
            include_baseline: true,
            entries: vec![FileMarkerEntry {
                phrase: "ship it".to_string(),
                mode: "deploying".to_string(),
            }],
        };
        let (_, issues) = config.parse_dictionary();
        assert!(issues[0].is_error());
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::InvalidEnumValue { .. }
        ));
    }

    #[test]
    fn test_empty_phrase_is_an_error() {
        let config = FileMarkersConfig {
            include_baseline: true,
            entries: vec![FileMarkerEntry {
                phrase: "   ".to_string(),
                mode: "execution".to_string(),
            }],
        };
        let (_, issues) = config.parse_dictionary();
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_baseline_markers_are_reachable() {
        assert!(
            unreachable_markers(&MarkerDictionary::baseline(), &TransitionPolicy::default())
                .is_empty()
        );
    }

    #[test]
    fn test_marker_into_planning_needs_an_edge() {
        let dictionary = MarkerDictionary::baseline()
            .extended([("revising the plan", Mode::Planning)])
            .unwrap();

        let issues = unreachable_markers(&dictionary, &TransitionPolicy::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::UnreachableMarker {
                phrase: "revising the plan".to_string(),
                mode: "planning".to_string(),
            }
        );

        let policy = TransitionPolicy::default().with_edge(Mode::Completion, Mode::Planning);
        assert!(unreachable_markers(&dictionary, &policy).is_empty());
    }

    #[test]
    fn test_no_markers_at_all_warns() {
        let config = FileMarkersConfig {
            include_baseline: false,
            entries: Vec::new(),
        };
        let (dictionary, issues) = config.parse_dictionary();
        assert!(dictionary.is_empty());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }
}
