//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for phasekeeper
#[derive(Parser, Debug)]
#[command(name = "phasekeeper")]
#[command(author, version, about = "Mode control for conversational coding agents")]
#[command(long_about = r#"
phasekeeper tracks which mode a coding agent is in (planning, execution or
completion) by scanning the agent's own output for marker phrases such as
"Moving to Development" and "Development Complete".

Transcripts are JSONL files with one {"role": ..., "content": ...} object per
line; roles are user, agent (or assistant) and tool.

Configuration files are loaded from (in priority order):
1. PHASEKEEPER_* environment variables, e.g. PHASEKEEPER_AGENT__DEFAULT_MODE
2. --config <path>          Explicit config file
3. ./phasekeeper.toml       Project-level config
4. ~/.config/phasekeeper/config.toml   Global config

Example:
  phasekeeper restore session.jsonl
  phasekeeper replay session.jsonl --output json
  phasekeeper step conv-42 session.jsonl
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the mode and prompt template a transcript ends in
    Restore {
        /// JSONL transcript
        history: PathBuf,
    },
    /// Print the mode after every turn of a transcript
    Replay {
        /// JSONL transcript
        history: PathBuf,
    },
    /// Run one step and persist the resulting mode state
    Step {
        /// Conversation id, used as the state file name
        conversation_id: String,
        /// JSONL transcript
        history: PathBuf,
        /// Ignore any stored state and rebuild it from the transcript
        #[arg(long)]
        fresh: bool,
    },
    /// Show configuration sources and the effective mode settings
    Config,
}
