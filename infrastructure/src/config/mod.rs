//! Configuration file loading for phasekeeper
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PHASEKEEPER_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./phasekeeper.toml` or `./.phasekeeper.toml`
//! 4. Global: `$XDG_CONFIG_HOME/phasekeeper/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    FileAgentConfig, FileConfig, FileLoggingConfig, FileMarkerEntry, FileMarkersConfig,
    FilePromptsConfig, FileStateConfig, FileTransitionEdge, FileTransitionsConfig,
};
pub use loader::{ConfigLoader, ConfigSource, ENV_PREFIX};
