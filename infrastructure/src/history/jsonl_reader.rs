//! JSONL transcript reader.
//!
//! A transcript holds one turn per line:
//!
//! ```text
//! {"role": "user", "content": "Build a todo app"}
//! {"role": "agent", "content": "Plan ready. Moving to Development."}
//! ```
//!
//! Blank lines are skipped. Line numbers in errors are 1-based. A transcript
//! that does not exist yet is an empty history.

use crate::file_name::conversation_file_name;
use async_trait::async_trait;
use phasekeeper_application::ports::history_reader::{HistoryError, HistoryReader};
use phasekeeper_domain::{ConversationHistory, ConversationId, Turn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads `<dir>/<encoded conversation id>.jsonl` transcripts
pub struct JsonlHistoryReader {
    dir: PathBuf,
}

impl JsonlHistoryReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn transcript_path(&self, id: &ConversationId) -> PathBuf {
        self.dir.join(conversation_file_name(id, "jsonl"))
    }

    /// Read a transcript from an explicit path
    pub async fn read_path(path: &Path) -> Result<ConversationHistory, HistoryError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "No transcript at {}, starting from an empty history",
                    path.display()
                );
                return Ok(ConversationHistory::new());
            }
            Err(e) => return Err(HistoryError::Io(format!("{}: {}", path.display(), e))),
        };
        let history = Self::parse(&content)?;
        debug!("Read {} turns from {}", history.len(), path.display());
        Ok(history)
    }

    /// Parse transcript text
    pub fn parse(content: &str) -> Result<ConversationHistory, HistoryError> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str::<Turn>(line).map_err(|e| HistoryError::Parse {
                    line: index + 1,
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl HistoryReader for JsonlHistoryReader {
    async fn read(&self, id: &ConversationId) -> Result<ConversationHistory, HistoryError> {
        Self::read_path(&self.transcript_path(id)).await
    }
}
