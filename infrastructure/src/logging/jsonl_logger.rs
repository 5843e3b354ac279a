//! JSONL file writer for conversation events.
//!
//! Every [`ConversationEvent`] becomes one line: its payload fields plus
//! `type` and `timestamp`. The file is opened in append mode so successive
//! runs over the same conversation extend one log, and each line is flushed
//! as it is written.
//!
//! The logger port is infallible. A failed write is reported once through
//! `tracing` and then only counted (see
//! [`failed_writes`](JsonlConversationLogger::failed_writes)), so a full disk
//! neither fails a step nor floods the diagnostics.

use phasekeeper_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Appends conversation events to a JSONL file
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    failed_writes: AtomicUsize,
}

impl JsonlConversationLogger {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Returns `None` when the file cannot be opened; callers run without a
    /// conversation log in that case.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open conversation log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            failed_writes: AtomicUsize::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of events that could not be written
    pub fn failed_writes(&self) -> usize {
        self.failed_writes.load(Ordering::Relaxed)
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)?;
        writer.flush()
    }

    fn record_failure(&self, event_type: &str, error: &dyn std::fmt::Display) {
        let failures = self.failed_writes.fetch_add(1, Ordering::Relaxed) + 1;
        if failures == 1 {
            warn!(
                "Could not write to conversation log {}: {}; further failures are only counted",
                self.path.display(),
                error
            );
        } else {
            debug!("Dropped {} event ({} dropped so far)", event_type, failures);
        }
    }
}

/// Flatten an event into one JSON object.
///
/// Object payloads keep their fields at the top level; anything else is
/// nested under `data`.
fn record(event: ConversationEvent, timestamp: String) -> Value {
    let mut map = match event.payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => Map::from_iter([("data".to_string(), other)]),
    };
    map.insert("type".to_string(), Value::from(event.event_type));
    map.insert("timestamp".to_string(), Value::String(timestamp));
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let event_type = event.event_type;
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let result = serde_json::to_string(&record(event, timestamp))
            .map_err(|e| e.to_string())
            .and_then(|line| self.write_line(&line).map_err(|e| e.to_string()));
        if let Err(e) = result {
            self.record_failure(event_type, &e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        let writer = self.writer.get_mut().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.flush();
    }
}
