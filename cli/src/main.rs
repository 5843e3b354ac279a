//! CLI entrypoint for phasekeeper
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use phasekeeper_application::{
    ConversationSessions, ModeConfig, ModeStateStore, ReplayHistoryUseCase, StepController,
    StepError,
};
use phasekeeper_domain::{ConversationId, DomainError};
use phasekeeper_infrastructure::{
    ConfigLoader, FileConfig, FileStateStore, FsPromptRepository, JsonlConversationLogger,
    JsonlHistoryReader, directive_registry,
};
use phasekeeper_presentation::{Cli, Command, OutputFormat, OutputFormatter, formatter_for};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting phasekeeper");

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    let issues = file_config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }

    let formatter = formatter_for(cli.output);

    if cli.command == Command::Config {
        if cli.output == OutputFormat::Text {
            print_config_sources(cli.config.as_ref(), cli.no_config);
        }
        let mode_config = file_config.to_mode_config().unwrap_or_else(|_| ModeConfig::default());
        println!("{}", formatter.format_config(&mode_config, &issues));
        if issues.iter().any(|i| i.is_error()) {
            bail!("configuration has errors");
        }
        return Ok(());
    }

    let mode_config = file_config.to_mode_config()?;

    match cli.command {
        Command::Restore { history } => {
            let history = JsonlHistoryReader::read_path(&history).await?;
            let output = ReplayHistoryUseCase::new(mode_config).replay(&history);
            println!("{}", formatter.format_restore(&output));
        }
        Command::Replay { history } => {
            let history = JsonlHistoryReader::read_path(&history).await?;
            let output = ReplayHistoryUseCase::new(mode_config).replay(&history);
            println!("{}", formatter.format_replay(&output));
        }
        Command::Step {
            conversation_id,
            history,
            fresh,
        } => {
            let id = ConversationId::new(conversation_id);
            run_step(
                &file_config,
                mode_config,
                &id,
                &history,
                fresh,
                formatter.as_ref(),
            )
            .await?;
        }
        Command::Config => {}
    }

    Ok(())
}

/// Install the tracing subscriber, optionally writing to a file
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let Some(path) = log_file else {
        builder.with_writer(std::io::stderr).init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("--log-file {} does not name a file", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    builder.with_writer(writer).with_ansi(false).init();
    Ok(Some(guard))
}

/// Run one step against the stored state, persisting the result
async fn run_step(
    file_config: &FileConfig,
    mode_config: ModeConfig,
    id: &ConversationId,
    history_path: &Path,
    fresh: bool,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let history = JsonlHistoryReader::read_path(history_path).await?;

    // === Dependency Injection ===
    let store = Arc::new(FileStateStore::new(file_config.state.resolved_dir()));
    let templates = FsPromptRepository::from_config(file_config.prompts.template_dir.as_deref());
    let mut controller = StepController::new(mode_config, directive_registry(), Arc::clone(&store))?
        .with_templates(Arc::new(templates));
    if let Some(path) = &file_config.logging.conversation_log
        && let Some(logger) = JsonlConversationLogger::new(path)
    {
        controller = controller.with_logger(Arc::new(logger));
    }
    let sessions = ConversationSessions::new(Arc::new(controller));

    if !fresh && let Some(state) = store.load(id).await? {
        sessions.resume(id, state).await;
    }

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    match sessions.step_cancellable(id, &history, &cancel).await {
        Ok(output) => {
            println!("{}", formatter.format_step(&output));
            Ok(())
        }
        Err(StepError::Domain(e @ DomainError::StateAheadOfHistory { .. })) => {
            Err(e).with_context(|| {
                format!(
                    "Stored state in {} does not match {}; rerun with --fresh",
                    store.dir().display(),
                    history_path.display()
                )
            })
        }
        Err(e) if e.is_cancelled() => bail!("Step cancelled, stored state left unchanged"),
        Err(e) => Err(e.into()),
    }
}

/// Print the config file locations being used
fn print_config_sources(config_path: Option<&PathBuf>, no_config: bool) {
    println!("Configuration sources (in priority order):");
    if no_config {
        println!("  [     ] Files disabled by --no-config");
    }
    println!("  [     ] Environment: {}*", phasekeeper_infrastructure::config::ENV_PREFIX);
    for source in ConfigLoader::sources(config_path) {
        let status = if source.found { "FOUND" } else { "     " };
        println!("  [{}] {:<8} {}", status, format!("{}:", source.label), source.location);
    }
    println!();
}
