//! Mode handler port
//!
//! A handler is the mode-specific strategy that turns the current
//! conversation context into the next [`Action`]. The planning handler leans
//! toward questions and plan presentation, the execution handler toward tool
//! calls, the completion handler toward a summary. How they do it (model
//! invocation, tool selection) is up to the adapter.
//!
//! Handlers are looked up through a [`HandlerRegistry`] rather than a
//! hard-coded branch per mode, so any one of them can be swapped or tested in
//! isolation.

use async_trait::async_trait;
use phasekeeper_domain::{
    Action, ConversationHistory, ConversationId, Mode, ModeTransition, TemplateId,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by a handler
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Handler failed: {0}")]
    Failed(String),

    #[error("Handler cancelled")]
    Cancelled,
}

/// Everything a handler gets to see for one step.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    pub conversation_id: &'a ConversationId,
    pub mode: Mode,
    pub template: TemplateId,
    /// Resolved instruction text for `template`
    pub instructions: &'a str,
    pub history: &'a ConversationHistory,
    /// Transition applied during this step, if any
    pub transition: Option<ModeTransition>,
}

/// Mode-specific strategy producing the next action
#[async_trait]
pub trait ModeHandler: Send + Sync {
    /// The mode this handler serves
    fn mode(&self) -> Mode;

    /// Produce the next action
    async fn handle(&self, context: &HandlerContext<'_>) -> Result<Action, HandlerError>;
}

/// Mode → handler mapping
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<Mode, Arc<dyn ModeHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under the mode it reports.
    ///
    /// A later registration for the same mode replaces the earlier one.
    pub fn register(mut self, handler: Arc<dyn ModeHandler>) -> Self {
        self.handlers.insert(handler.mode(), handler);
        self
    }

    pub fn get(&self, mode: Mode) -> Option<&Arc<dyn ModeHandler>> {
        self.handlers.get(&mode)
    }

    /// Modes that have no handler, in progression order.
    pub fn missing(&self) -> Vec<Mode> {
        Mode::ALL
            .into_iter()
            .filter(|m| !self.handlers.contains_key(m))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut modes: Vec<Mode> = self.handlers.keys().copied().collect();
        modes.sort();
        f.debug_struct("HandlerRegistry")
            .field("modes", &modes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedHandler(Mode);

    #[async_trait]
    impl ModeHandler for FixedHandler {
        fn mode(&self) -> Mode {
            self.0
        }

        async fn handle(&self, context: &HandlerContext<'_>) -> Result<Action, HandlerError> {
            Ok(Action::new(self.0, context.template, json!(null)))
        }
    }

    #[test]
    fn test_missing_modes() {
        let registry = HandlerRegistry::new().register(Arc::new(FixedHandler(Mode::Execution)));
        assert_eq!(registry.missing(), vec![Mode::Planning, Mode::Completion]);
        assert!(!registry.is_complete());
    }

    #[test]
    fn test_complete_registry() {
        let registry = Mode::ALL.into_iter().fold(HandlerRegistry::new(), |r, m| {
            r.register(Arc::new(FixedHandler(m)))
        });
        assert!(registry.is_complete());
        assert_eq!(registry.get(Mode::Completion).unwrap().mode(), Mode::Completion);
    }

    #[tokio::test]
    async fn test_handler_receives_context() {
        let registry = HandlerRegistry::new().register(Arc::new(FixedHandler(Mode::Planning)));
        let id = ConversationId::new("c1");
        let history = ConversationHistory::new();
        let context = HandlerContext {
            conversation_id: &id,
            mode: Mode::Planning,
            template: TemplateId::PlanningPrompt,
            instructions: "plan",
            history: &history,
            transition: None,
        };
        let action = registry
            .get(Mode::Planning)
            .unwrap()
            .handle(&context)
            .await
            .unwrap();
        assert_eq!(action.mode, Mode::Planning);
        assert_eq!(action.template, TemplateId::PlanningPrompt);
    }
}
