//! JSON-file mode state store.
//!
//! One file per conversation, `<dir>/<encoded conversation id>.json` (see
//! [`conversation_file_name`]). Writes go to a temporary sibling first and
//! are renamed into place, so a crash never leaves a half-written state
//! behind.

use crate::file_name::conversation_file_name;
use async_trait::async_trait;
use phasekeeper_application::ports::state_store::{ModeStateStore, StoreError};
use phasekeeper_domain::{AgentModeState, ConversationId};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Store writing each conversation's state to its own JSON file
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a conversation's state file, always directly inside [`dir`](Self::dir).
    pub fn state_path(&self, id: &ConversationId) -> PathBuf {
        self.dir.join(conversation_file_name(id, "json"))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl ModeStateStore for FileStateStore {
    async fn load(&self, id: &ConversationId) -> Result<Option<AgentModeState>, StoreError> {
        let path = self.state_path(id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Serialization(format!("{}: {}", path.display(), e)))
    }

    async fn save(&self, id: &ConversationId, state: &AgentModeState) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;

        let path = self.state_path(id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(&path, e))?;

        debug!("Saved mode state for {} to {}", id, path.display());
        Ok(())
    }

    async fn remove(&self, id: &ConversationId) -> Result<(), StoreError> {
        let path = self.state_path(id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}
