//! Marker dictionary: configured phrases that signal a mode change.

use crate::core::error::DomainError;
use crate::mode::Mode;
use serde::{Deserialize, Serialize};

/// Phrase announcing the move from planning into execution.
pub const MOVING_TO_DEVELOPMENT: &str = "moving to development";

/// Phrase announcing that execution has finished.
pub const DEVELOPMENT_COMPLETE: &str = "development complete";

/// A single (phrase, target mode) pair.
///
/// The phrase is stored lowercased and trimmed; matching is substring
/// containment against lowercased text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPhrase {
    phrase: String,
    target: Mode,
}

impl MarkerPhrase {
    pub fn new(phrase: impl AsRef<str>, target: Mode) -> Result<Self, DomainError> {
        let phrase = phrase.as_ref().trim().to_lowercase();
        if phrase.is_empty() {
            return Err(DomainError::EmptyMarker);
        }
        Ok(Self { phrase, target })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn target(&self) -> Mode {
        self.target
    }

    /// Test against text that has already been lowercased.
    pub fn is_contained_in(&self, lowercased: &str) -> bool {
        lowercased.contains(&self.phrase)
    }
}

/// Immutable set of marker phrases, unique per phrase.
///
/// Built once at configuration time and shared read-only between
/// conversations (wrap it in an `Arc`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDictionary {
    entries: Vec<MarkerPhrase>,
}

impl MarkerDictionary {
    /// Build a dictionary from (phrase, mode) pairs.
    ///
    /// A phrase listed twice with the same mode collapses into one entry.
    /// A phrase mapped to two different modes is rejected.
    pub fn new<I, S>(entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (S, Mode)>,
        S: AsRef<str>,
    {
        let mut dictionary = Self {
            entries: Vec::new(),
        };
        for (phrase, target) in entries {
            dictionary.insert(MarkerPhrase::new(phrase, target)?)?;
        }
        Ok(dictionary)
    }

    /// A dictionary with no phrases; nothing will ever be detected.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The two built-in markers.
    pub fn baseline() -> Self {
        Self {
            entries: vec![
                MarkerPhrase {
                    phrase: MOVING_TO_DEVELOPMENT.to_string(),
                    target: Mode::Execution,
                },
                MarkerPhrase {
                    phrase: DEVELOPMENT_COMPLETE.to_string(),
                    target: Mode::Completion,
                },
            ],
        }
    }

    /// Return a copy extended with more entries, applying the same
    /// duplicate rules as [`MarkerDictionary::new`].
    pub fn extended<I, S>(&self, entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (S, Mode)>,
        S: AsRef<str>,
    {
        let mut dictionary = self.clone();
        for (phrase, target) in entries {
            dictionary.insert(MarkerPhrase::new(phrase, target)?)?;
        }
        Ok(dictionary)
    }

    fn insert(&mut self, marker: MarkerPhrase) -> Result<(), DomainError> {
        match self.entries.iter().find(|m| m.phrase == marker.phrase) {
            Some(existing) if existing.target == marker.target => Ok(()),
            Some(existing) => Err(DomainError::DuplicateMarker {
                phrase: marker.phrase,
                existing: existing.target,
                conflicting: marker.target,
            }),
            None => {
                self.entries.push(marker);
                Ok(())
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarkerPhrase> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the target mode of a phrase (case-insensitive).
    pub fn target_of(&self, phrase: &str) -> Option<Mode> {
        let phrase = phrase.trim().to_lowercase();
        self.entries
            .iter()
            .find(|m| m.phrase == phrase)
            .map(|m| m.target)
    }
}

impl Default for MarkerDictionary {
    fn default() -> Self {
        Self::baseline()
    }
}
