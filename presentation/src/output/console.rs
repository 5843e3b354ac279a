//! Console output formatter

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use phasekeeper_application::{ModeConfig, ReplayOutput, StepOutput};
use phasekeeper_domain::{ConfigIssue, Mode, PromptSelector, Severity};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn mode(mode: Mode) -> ColoredString {
        match mode {
            Mode::Planning => mode.as_str().yellow().bold(),
            Mode::Execution => mode.as_str().blue().bold(),
            Mode::Completion => mode.as_str().green().bold(),
        }
    }

    fn label(text: &str) -> ColoredString {
        format!("{:<12}", text).cyan().bold()
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}\n", line.cyan(), title.bold(), line.cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_restore(&self, output: &ReplayOutput) -> String {
        let mode = output.state.current_mode;
        let applied = match output.state.last_applied_turn {
            Some(index) => format!("last agent turn #{}", index),
            None => "no agent turns, default mode".dimmed().to_string(),
        };
        format!(
            "{} {}\n{} {}\n{} {} ({})\n",
            Self::label("Mode:"),
            Self::mode(mode),
            Self::label("Template:"),
            PromptSelector::select(mode),
            Self::label("Turns:"),
            output.turns,
            applied
        )
    }

    fn format_replay(&self, output: &ReplayOutput) -> String {
        let mut text = Self::header("Mode Trajectory");

        for step in &output.trajectory {
            let marker = match &step.transition {
                Some(t) => format!("  {} {} -> {}", "◆".magenta(), t.from, t.to),
                None => String::new(),
            };
            text.push_str(&format!(
                "{:>4}  {:<6} {}{}\n",
                format!("#{}", step.turn_index).dimmed(),
                step.role.as_str(),
                Self::mode(step.mode),
                marker
            ));
        }

        if output.trajectory.is_empty() {
            text.push_str(&format!("{}\n", "(empty history)".dimmed()));
        }

        text.push_str(&format!(
            "\n{} {} after {} transition(s)\n",
            Self::label("Final mode:"),
            Self::mode(output.state.current_mode),
            output.transitions().len()
        ));
        text
    }

    fn format_step(&self, output: &StepOutput) -> String {
        let origin = if output.restored {
            "restored from history"
        } else {
            "resumed from stored state"
        };
        let mut text = format!(
            "{} {} ({})\n",
            Self::label("Mode:"),
            Self::mode(output.mode()),
            origin.dimmed()
        );

        for transition in &output.transitions {
            text.push_str(&format!("{} {}\n", Self::label("Transition:"), transition));
        }

        text.push_str(&format!(
            "{} {}\n{} {}\n",
            Self::label("Template:"),
            output.template,
            Self::label("Intent:"),
            output.action.intent
        ));

        let payload = serde_json::to_string_pretty(&output.action.payload)
            .unwrap_or_else(|_| output.action.payload.to_string());
        text.push_str(&format!(
            "{}\n{}\n",
            Self::label("Payload:"),
            Self::indent(&payload, "  ")
        ));

        if output.action.is_finish() {
            text.push_str(&format!("{}\n", "Task complete.".green().bold()));
        }
        text
    }

    fn format_config(&self, config: &ModeConfig, issues: &[ConfigIssue]) -> String {
        let mut text = format!(
            "{} {}\n{} {}\n",
            Self::label("Default:"),
            Self::mode(config.default_mode),
            Self::label("Verify:"),
            if config.verify_cached_state { "on" } else { "off" }
        );

        text.push_str(&format!("\n{}\n", "Markers:".cyan().bold()));
        for marker in config.markers.iter() {
            text.push_str(&format!(
                "  \"{}\" -> {}\n",
                marker.phrase(),
                Self::mode(marker.target())
            ));
        }

        text.push_str(&format!("\n{}\n", "Transitions:".cyan().bold()));
        for (from, to) in config.transitions.edges() {
            text.push_str(&format!("  {} -> {}\n", from, to));
        }

        if !issues.is_empty() {
            text.push_str(&format!("\n{}\n", "Issues:".cyan().bold()));
            for issue in issues {
                let severity = match issue.severity {
                    Severity::Error => "error".red().bold(),
                    Severity::Warning => "warning".yellow().bold(),
                };
                text.push_str(&format!("  {}: {}\n", severity, issue.message));
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasekeeper_application::ReplayHistoryUseCase;
    use phasekeeper_domain::{ConfigIssueCode, ConversationHistory, Turn};

    fn replay() -> ReplayOutput {
        let history: ConversationHistory = vec![
            Turn::user("Build a CLI"),
            Turn::agent("Moving to Development"),
            Turn::agent("Development Complete"),
        ]
        .into();
        ReplayHistoryUseCase::new(ModeConfig::default()).replay(&history)
    }

    #[test]
    fn test_format_restore() {
        let text = ConsoleFormatter.format_restore(&replay());
        assert!(text.contains("completion"));
        assert!(text.contains("completion_prompt"));
        assert!(text.contains("last agent turn #2"));
    }

    #[test]
    fn test_format_replay_lists_every_turn() {
        let text = ConsoleFormatter.format_replay(&replay());
        assert!(text.contains("Mode Trajectory"));
        assert!(text.contains("#0"));
        assert!(text.contains("#2"));
        assert!(text.contains("planning -> execution"));
        assert!(text.contains("2 transition(s)"));
    }

    #[test]
    fn test_format_replay_empty() {
        let output = ReplayHistoryUseCase::new(ModeConfig::default())
            .replay(&ConversationHistory::new());
        assert!(ConsoleFormatter.format_replay(&output).contains("(empty history)"));
    }

    #[test]
    fn test_format_config_lists_markers_and_issues() {
        let issues = vec![ConfigIssue::warning(
            ConfigIssueCode::EmptyMarkerDictionary,
            "nothing to detect",
        )];
        let text = ConsoleFormatter.format_config(&ModeConfig::default(), &issues);
        assert!(text.contains("\"moving to development\""));
        assert!(text.contains("\"development complete\""));
        assert!(text.contains("planning -> execution"));
        assert!(text.contains("nothing to detect"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
