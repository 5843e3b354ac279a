//! State storage configuration from TOML (`[state]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw state configuration from TOML
///
/// ```toml
/// [state]
/// dir = ".phasekeeper/state"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStateConfig {
    /// Directory holding one JSON file per conversation
    pub dir: Option<PathBuf>,
}

impl FileStateConfig {
    /// Configured directory, or `$XDG_DATA_HOME/phasekeeper/state`
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("phasekeeper").join("state"))
                .unwrap_or_else(|| PathBuf::from(".phasekeeper").join("state"))
        })
    }
}
