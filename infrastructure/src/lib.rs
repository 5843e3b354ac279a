//! Infrastructure layer for phasekeeper
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod file_name;
pub mod handlers;
pub mod history;
pub mod logging;
pub mod prompts;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, ConfigSource, FileConfig};
pub use handlers::{DirectiveHandler, directive_registry};
pub use history::JsonlHistoryReader;
pub use logging::JsonlConversationLogger;
pub use prompts::FsPromptRepository;
pub use state::{FileStateStore, InMemoryStateStore};
