//! Application layer for phasekeeper
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ModeConfig;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    history_reader::{HistoryError, HistoryReader},
    mode_handler::{HandlerContext, HandlerError, HandlerRegistry, ModeHandler},
    prompt_repository::{BuiltinTemplates, PromptTemplateRepository, TemplateError},
    state_store::{ModeStateStore, NoStateStore, StoreError},
};
pub use use_cases::conversation_sessions::ConversationSessions;
pub use use_cases::replay_history::{ReplayError, ReplayHistoryUseCase, ReplayOutput};
pub use use_cases::step_controller::{
    StepController, StepError, StepInput, StepOutput,
};
