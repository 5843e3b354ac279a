//! JSON output formatter

use crate::output::formatter::OutputFormatter;
use phasekeeper_application::{ModeConfig, ReplayOutput, StepOutput};
use phasekeeper_domain::{ConfigIssue, PromptSelector};
use serde_json::{Value, json};

/// Formats results as pretty-printed JSON
pub struct JsonFormatter;

impl JsonFormatter {
    fn render(value: Value) -> String {
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_restore(&self, output: &ReplayOutput) -> String {
        Self::render(json!({
            "mode": output.state.current_mode,
            "template": PromptSelector::select(output.state.current_mode),
            "last_applied_turn": output.state.last_applied_turn,
            "turns": output.turns,
        }))
    }

    fn format_replay(&self, output: &ReplayOutput) -> String {
        Self::render(json!({
            "trajectory": output.trajectory,
            "final_state": output.state,
            "transitions": output.transitions(),
        }))
    }

    fn format_step(&self, output: &StepOutput) -> String {
        Self::render(json!({
            "action": output.action,
            "state": output.state,
            "transitions": output.transitions,
            "restored": output.restored,
        }))
    }

    fn format_config(&self, config: &ModeConfig, issues: &[ConfigIssue]) -> String {
        let markers: Vec<Value> = config
            .markers
            .iter()
            .map(|m| json!({ "phrase": m.phrase(), "mode": m.target() }))
            .collect();
        let transitions: Vec<Value> = config
            .transitions
            .edges()
            .map(|(from, to)| json!({ "from": from, "to": to }))
            .collect();
        let issues: Vec<Value> = issues
            .iter()
            .map(|i| json!({ "severity": i.severity.to_string(), "message": i.message }))
            .collect();

        Self::render(json!({
            "default_mode": config.default_mode,
            "verify_cached_state": config.verify_cached_state,
            "markers": markers,
            "transitions": transitions,
            "issues": issues,
        }))
    }
}
