//! Directive handlers.
//!
//! These handlers do not call a model. They package what the model would be
//! given for the current mode (the instruction text and the request being
//! worked on) into an [`Action`], which the caller hands to whatever executes
//! it. Used by the CLI and as a reference implementation of the port.

use async_trait::async_trait;
use phasekeeper_application::ports::mode_handler::{
    HandlerContext, HandlerError, HandlerRegistry, ModeHandler,
};
use phasekeeper_domain::{Action, Mode, Role};
use serde_json::json;
use std::sync::Arc;

/// Handler emitting a directive for one mode
pub struct DirectiveHandler {
    mode: Mode,
}

impl DirectiveHandler {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }
}

#[async_trait]
impl ModeHandler for DirectiveHandler {
    fn mode(&self) -> Mode {
        self.mode
    }

    async fn handle(&self, context: &HandlerContext<'_>) -> Result<Action, HandlerError> {
        let request = context
            .history
            .turns()
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.content.as_str());

        let payload = json!({
            "conversation_id": context.conversation_id.as_str(),
            "instructions": context.instructions,
            "request": request,
            "turns": context.history.len(),
            "entered": context.transition,
        });

        Ok(Action::new(self.mode, context.template, payload))
    }
}

/// Registry with a directive handler for every mode
pub fn directive_registry() -> HandlerRegistry {
    Mode::ALL.into_iter().fold(HandlerRegistry::new(), |registry, mode| {
        registry.register(Arc::new(DirectiveHandler::new(mode)))
    })
}
