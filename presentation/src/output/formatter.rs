//! Output formatter trait

use crate::cli::commands::OutputFormat;
use phasekeeper_application::{ModeConfig, ReplayOutput, StepOutput};
use phasekeeper_domain::ConfigIssue;

/// Trait for formatting command results
pub trait OutputFormatter {
    /// Final mode of a history
    fn format_restore(&self, output: &ReplayOutput) -> String;

    /// Mode after every turn
    fn format_replay(&self, output: &ReplayOutput) -> String;

    /// Result of one step
    fn format_step(&self, output: &StepOutput) -> String;

    /// Effective mode configuration and any issues found while loading it
    fn format_config(&self, config: &ModeConfig, issues: &[ConfigIssue]) -> String;
}

/// Formatter for the requested output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(super::console::ConsoleFormatter),
        OutputFormat::Json => Box::new(super::json::JsonFormatter),
    }
}
