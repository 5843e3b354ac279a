//! Application-level configuration.
//!
//! - [`ModeConfig`]: default mode, marker dictionary and transition policy

pub mod mode_config;

pub use mode_config::ModeConfig;
