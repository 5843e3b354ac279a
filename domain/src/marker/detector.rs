//! Mode detection over free text.
//!
//! When markers for several modes appear in the same text, the mode latest in
//! the progression wins (Completion > Execution > Planning): a response that
//! says it is "moving to development" and also that "development complete"
//! has finished, not started.

use super::dictionary::{MarkerDictionary, MarkerPhrase};
use crate::mode::Mode;
use std::sync::Arc;

/// Scans text for marker phrases.
///
/// Cheap to clone; the dictionary is shared read-only.
#[derive(Debug, Clone)]
pub struct ModeDetector {
    dictionary: Arc<MarkerDictionary>,
}

impl ModeDetector {
    pub fn new(dictionary: Arc<MarkerDictionary>) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &MarkerDictionary {
        &self.dictionary
    }

    /// Return the target mode signalled by `text`, if any.
    pub fn detect(&self, text: &str) -> Option<Mode> {
        if text.is_empty() {
            return None;
        }
        let lowered = text.to_lowercase();
        self.dictionary
            .iter()
            .filter(|m| m.is_contained_in(&lowered))
            .map(MarkerPhrase::target)
            .max()
    }

    /// Every marker found in `text`, in dictionary order.
    pub fn matches(&self, text: &str) -> Vec<&MarkerPhrase> {
        let lowered = text.to_lowercase();
        self.dictionary
            .iter()
            .filter(|m| m.is_contained_in(&lowered))
            .collect()
    }
}

impl Default for ModeDetector {
    fn default() -> Self {
        Self::new(Arc::new(MarkerDictionary::baseline()))
    }
}
