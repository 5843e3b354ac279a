//! Step Controller use case
//!
//! Runs one turn of a conversation:
//!
//! ```text
//! cached state? ──no──► restore from history
//!      │yes
//!      ▼
//! scan agent turns not yet applied ──► apply transition (policy permitting)
//!      ▼
//! select template ──► load instructions ──► mode handler ──► Action
//!      ▼
//! persist state
//! ```
//!
//! The state is passed in and handed back by value. Nothing is committed
//! until the handler has produced its action and the store has accepted the
//! new state, so an error or a dropped future leaves the caller's previous
//! state valid.

use crate::config::ModeConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::mode_handler::{HandlerContext, HandlerError, HandlerRegistry};
use crate::ports::prompt_repository::{BuiltinTemplates, PromptTemplateRepository, TemplateError};
use crate::ports::state_store::{ModeStateStore, StoreError};
use phasekeeper_domain::{
    Action, AgentModeState, ConversationHistory, ConversationId, DomainError, Mode,
    ModeTransition, PromptSelector, StateRestorer, TemplateId,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a step
#[derive(Error, Debug)]
pub enum StepError {
    #[error("No handler registered for mode(s): {0:?}")]
    MissingHandlers(Vec<Mode>),

    #[error("Cached mode state {cached:?} diverged from history, which gives {restored:?}")]
    StateDiverged {
        cached: AgentModeState,
        restored: AgentModeState,
    },

    #[error("Handler for {expected} returned an action tagged {actual}")]
    MistaggedAction { expected: Mode, actual: Mode },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Failed to persist mode state: {0}")]
    Persistence(#[from] StoreError),

    #[error("Conversation {0} has ended")]
    ConversationEnded(ConversationId),

    #[error("Step cancelled")]
    Cancelled,
}

impl StepError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            StepError::Cancelled | StepError::Handler(HandlerError::Cancelled)
        )
    }
}

/// Input for one step
#[derive(Debug, Clone, Copy)]
pub struct StepInput<'a> {
    pub conversation_id: &'a ConversationId,
    pub history: &'a ConversationHistory,
    /// State returned by the previous step of this conversation; `None` on
    /// cold start or resume
    pub cached: Option<AgentModeState>,
}

impl<'a> StepInput<'a> {
    pub fn new(conversation_id: &'a ConversationId, history: &'a ConversationHistory) -> Self {
        Self {
            conversation_id,
            history,
            cached: None,
        }
    }

    pub fn with_cached(mut self, state: Option<AgentModeState>) -> Self {
        self.cached = state;
        self
    }
}

/// Result of one step
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub action: Action,
    /// State to pass into the next step
    pub state: AgentModeState,
    /// Transitions applied during this step
    pub transitions: Vec<ModeTransition>,
    pub template: TemplateId,
    /// Whether the state was rebuilt from history
    pub restored: bool,
}

impl StepOutput {
    pub fn mode(&self) -> Mode {
        self.state.current_mode
    }
}

/// Use case for advancing a conversation by one step
pub struct StepController<S: ModeStateStore + 'static> {
    config: ModeConfig,
    restorer: StateRestorer,
    handlers: HandlerRegistry,
    store: Arc<S>,
    templates: Arc<dyn PromptTemplateRepository>,
    logger: Arc<dyn ConversationLogger>,
}

impl<S: ModeStateStore + 'static> StepController<S> {
    /// Create a controller. Fails unless every mode has a handler.
    pub fn new(
        config: ModeConfig,
        handlers: HandlerRegistry,
        store: Arc<S>,
    ) -> Result<Self, StepError> {
        let missing = handlers.missing();
        if !missing.is_empty() {
            return Err(StepError::MissingHandlers(missing));
        }

        Ok(Self {
            restorer: config.restorer(),
            config,
            handlers,
            store,
            templates: Arc::new(BuiltinTemplates),
            logger: Arc::new(NoConversationLogger),
        })
    }

    pub fn with_templates(mut self, templates: Arc<dyn PromptTemplateRepository>) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ModeConfig {
        &self.config
    }

    pub fn restorer(&self) -> &StateRestorer {
        &self.restorer
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Mode at the end of `history`, without running a step.
    pub fn current_mode(&self, history: &ConversationHistory) -> Mode {
        self.restorer.restore(history, self.config.default_mode)
    }

    /// Run one step
    pub async fn step(&self, input: StepInput<'_>) -> Result<StepOutput, StepError> {
        let id = input.conversation_id;
        let history = input.history;

        // 1 + 2 + 3: current state, with any new agent output applied
        let (state, transitions, restored) = match input.cached {
            Some(cached) => {
                let (state, transitions) = self.restorer.advance(cached, history)?;
                if self.config.verify_cached_state {
                    let expected = self.restorer.restore_state(history, self.config.default_mode);
                    if expected != state {
                        warn!(
                            "Cached mode state for {} diverged: cached {:?}, restored {:?}",
                            id, state, expected
                        );
                        return Err(StepError::StateDiverged {
                            cached: state,
                            restored: expected,
                        });
                    }
                }
                (state, transitions, false)
            }
            None => {
                let state = self.restorer.restore_state(history, self.config.default_mode);
                if history.has_agent_turns() {
                    info!(
                        "Restored mode {} for conversation {} from {} turns",
                        state.current_mode,
                        id,
                        history.len()
                    );
                } else {
                    info!(
                        "No agent output for conversation {}, starting in default mode {}",
                        id, state.current_mode
                    );
                }
                self.logger
                    .log(ConversationEvent::mode_restored(id, &state, history.len()));
                (state, Vec::new(), true)
            }
        };

        for transition in &transitions {
            info!("Conversation {}: mode {}", id, transition);
            self.logger
                .log(ConversationEvent::mode_transition(id, transition));
        }

        // 4: prompt
        let mode = state.current_mode;
        let template = PromptSelector::select(mode);
        let instructions = self.templates.load(template)?;
        debug!("Conversation {}: using template {} for {}", id, template, mode);

        // 5: dispatch
        let handler = self
            .handlers
            .get(mode)
            .ok_or_else(|| StepError::MissingHandlers(vec![mode]))?;
        let context = HandlerContext {
            conversation_id: id,
            mode,
            template,
            instructions: &instructions,
            history,
            transition: transitions.last().copied(),
        };
        let action = handler.handle(&context).await?;
        if action.mode != mode {
            return Err(StepError::MistaggedAction {
                expected: mode,
                actual: action.mode,
            });
        }

        // 6: persist
        self.store.save(id, &state).await?;
        self.logger
            .log(ConversationEvent::step_completed(id, &state, &action));

        Ok(StepOutput {
            action,
            state,
            transitions,
            template,
            restored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mode_handler::ModeHandler;
    use crate::use_cases::test_support::{
        MockStore, RecordingHandler, RecordingLogger, SeenCall, recording_registry,
    };
    use async_trait::async_trait;
    use phasekeeper_domain::{ActionIntent, PromptTemplate, Turn};
    use std::sync::Mutex;

    fn controller(
        config: ModeConfig,
    ) -> (StepController<MockStore>, Arc<Mutex<Vec<SeenCall>>>) {
        let (registry, calls) = recording_registry();
        let controller =
            StepController::new(config, registry, Arc::new(MockStore::default())).unwrap();
        (controller, calls)
    }

    fn id() -> ConversationId {
        ConversationId::new("conv-1")
    }

    #[tokio::test]
    async fn test_cold_start_empty_history_uses_default() {
        let (controller, calls) = controller(ModeConfig::default());
        let history = ConversationHistory::new();
        let id = id();

        let output = controller.step(StepInput::new(&id, &history)).await.unwrap();

        assert_eq!(output.mode(), Mode::Planning);
        assert!(output.restored);
        assert!(output.transitions.is_empty());
        assert_eq!(output.template, TemplateId::PlanningPrompt);
        assert_eq!(output.action.intent, ActionIntent::GatherRequirements);
        assert_eq!(calls.lock().unwrap()[0].instructions, PromptTemplate::planning());
        assert_eq!(controller.store().save_count(), 1);
    }

    #[tokio::test]
    async fn test_cold_start_with_execution_default_ignores_chatter() {
        let (controller, _) = controller(ModeConfig::default().with_default_mode(Mode::Execution));
        let id = id();
        let mut history = ConversationHistory::new();

        let first = controller.step(StepInput::new(&id, &history)).await.unwrap();
        assert_eq!(first.mode(), Mode::Execution);

        history.push(Turn::agent("Let's discuss requirements first"));
        let second = controller
            .step(StepInput::new(&id, &history).with_cached(Some(first.state)))
            .await
            .unwrap();
        assert_eq!(second.mode(), Mode::Execution);
        assert!(second.transitions.is_empty());
        assert_eq!(second.template, TemplateId::SystemPrompt);
    }

    #[tokio::test]
    async fn test_cold_start_with_planning_default_waits_for_marker() {
        let (controller, _) = controller(ModeConfig::default());
        let id = id();
        let mut history: ConversationHistory = vec![Turn::user("Build a todo app")].into();

        let mut state = controller.step(StepInput::new(&id, &history)).await.unwrap().state;
        history.push(Turn::agent("Let's discuss requirements first"));
        state = controller
            .step(StepInput::new(&id, &history).with_cached(Some(state)))
            .await
            .unwrap()
            .state;
        assert_eq!(state.current_mode, Mode::Planning);

        history.push(Turn::agent("Plan approved. Moving to development."));
        let output = controller
            .step(StepInput::new(&id, &history).with_cached(Some(state)))
            .await
            .unwrap();
        assert_eq!(output.mode(), Mode::Execution);
    }

    #[tokio::test]
    async fn test_full_cycle() {
        let (controller, calls) = controller(ModeConfig::default());
        let id = id();
        let mut history: ConversationHistory = vec![Turn::user("Write a CSV parser")].into();

        let out = controller.step(StepInput::new(&id, &history)).await.unwrap();
        assert_eq!(out.mode(), Mode::Planning);
        let mut state = out.state;

        let script = [
            ("Moving to Development", Mode::Execution, true),
            ("Created parser.rs", Mode::Execution, false),
            ("Ran the tests, all green", Mode::Execution, false),
            ("Development Complete", Mode::Completion, true),
            ("Summary follows", Mode::Completion, false),
        ];

        for (text, expected, transitioned) in script {
            history.push(Turn::agent(text));
            history.push(Turn::tool("ok"));
            let out = controller
                .step(StepInput::new(&id, &history).with_cached(Some(state)))
                .await
                .unwrap();
            assert_eq!(out.mode(), expected, "after {:?}", text);
            assert_eq!(!out.transitions.is_empty(), transitioned, "after {:?}", text);
            assert!(!out.restored);
            assert_eq!(out.action.mode, expected);
            state = out.state;
        }

        assert_eq!(controller.store().save_count(), 6);
        assert_eq!(controller.store().stored(&id), Some(state));

        let calls = calls.lock().unwrap();
        let transition = calls[1].transition.unwrap();
        assert_eq!((transition.from, transition.to), (Mode::Planning, Mode::Execution));
        assert_eq!(calls.last().unwrap().mode, Mode::Completion);
    }

    #[tokio::test]
    async fn test_resumed_conversation_restores_execution() {
        let (controller, _) = controller(ModeConfig::default());
        let id = id();
        let history: ConversationHistory = vec![
            Turn::user("Add caching"),
            Turn::agent("Got it, moving to development"),
            Turn::tool("edited cache.rs"),
            Turn::agent("Added an LRU cache"),
        ]
        .into();

        let out = controller.step(StepInput::new(&id, &history)).await.unwrap();
        assert!(out.restored);
        assert_eq!(out.mode(), Mode::Execution);
        assert_eq!(out.template, TemplateId::SystemPrompt);
        assert_eq!(out.state.last_applied_turn, Some(3));
        assert_eq!(out.mode(), controller.current_mode(&history));
    }

    #[tokio::test]
    async fn test_live_stepping_matches_restore() {
        let (controller, _) = controller(ModeConfig::default());
        let id = id();
        let full: ConversationHistory = vec![
            Turn::user("go"),
            Turn::agent("questions?"),
            Turn::user("none"),
            Turn::agent("moving to development"),
            Turn::agent("step 1"),
            Turn::agent("development complete"),
            Turn::agent("bye"),
        ]
        .into();

        let mut state = None;
        for len in 0..=full.len() {
            let prefix = full.prefix(len);
            let out = controller
                .step(StepInput::new(&id, &prefix).with_cached(state))
                .await
                .unwrap();
            let restored = controller
                .restorer()
                .restore_state(&prefix, controller.config().default_mode);
            assert_eq!(out.state, restored);
            state = Some(out.state);
        }
    }

    #[tokio::test]
    async fn test_handler_failure_does_not_persist() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let registry = Mode::ALL.into_iter().fold(HandlerRegistry::new(), |r, m| {
            r.register(Arc::new(RecordingHandler::failing(m, Arc::clone(&calls))))
        });
        let controller =
            StepController::new(ModeConfig::default(), registry, Arc::new(MockStore::default()))
                .unwrap();
        let id = id();
        let history = ConversationHistory::new();

        let err = controller.step(StepInput::new(&id, &history)).await.unwrap_err();
        assert!(matches!(err, StepError::Handler(HandlerError::Failed(_))));
        assert_eq!(controller.store().save_count(), 0);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_persistence_failure_surfaces() {
        let (registry, _) = recording_registry();
        let controller =
            StepController::new(ModeConfig::default(), registry, Arc::new(MockStore::failing()))
                .unwrap();
        let id = id();
        let history = ConversationHistory::new();

        let err = controller.step(StepInput::new(&id, &history)).await.unwrap_err();
        assert!(matches!(err, StepError::Persistence(StoreError::Io(_))));
    }

    #[test]
    fn test_missing_handler_rejected_at_construction() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let registry = HandlerRegistry::new()
            .register(Arc::new(RecordingHandler::new(Mode::Planning, calls)));
        let result =
            StepController::new(ModeConfig::default(), registry, Arc::new(MockStore::default()));
        match result {
            Err(StepError::MissingHandlers(modes)) => {
                assert_eq!(modes, vec![Mode::Execution, Mode::Completion])
            }
            _ => panic!("expected MissingHandlers"),
        }
    }

    #[tokio::test]
    async fn test_verify_cached_state_detects_divergence() {
        let (controller, _) = controller(ModeConfig::default().with_verify_cached_state(true));
        let id = id();
        let history: ConversationHistory = vec![Turn::agent("hello")].into();
        let bogus = AgentModeState {
            current_mode: Mode::Completion,
            last_applied_turn: Some(0),
        };

        let err = controller
            .step(StepInput::new(&id, &history).with_cached(Some(bogus)))
            .await
            .unwrap_err();
        match err {
            StepError::StateDiverged { cached, restored } => {
                assert_eq!(cached.current_mode, Mode::Completion);
                assert_eq!(restored.current_mode, Mode::Planning);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(controller.store().save_count(), 0);
    }

    #[tokio::test]
    async fn test_cached_state_ahead_of_history_is_rejected() {
        let (controller, _) = controller(ModeConfig::default());
        let id = id();
        let history = ConversationHistory::new();
        let ahead = AgentModeState {
            current_mode: Mode::Execution,
            last_applied_turn: Some(2),
        };

        let err = controller
            .step(StepInput::new(&id, &history).with_cached(Some(ahead)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StepError::Domain(DomainError::StateAheadOfHistory { .. })
        ));
    }

    struct WrongTagHandler(Mode);

    #[async_trait]
    impl ModeHandler for WrongTagHandler {
        fn mode(&self) -> Mode {
            self.0
        }

        async fn handle(&self, context: &HandlerContext<'_>) -> Result<Action, HandlerError> {
            Ok(Action::new(Mode::Completion, context.template, serde_json::Value::Null))
        }
    }

    #[tokio::test]
    async fn test_mistagged_action_is_rejected() {
        let (registry, _) = recording_registry();
        let registry = registry.register(Arc::new(WrongTagHandler(Mode::Planning)));
        let controller =
            StepController::new(ModeConfig::default(), registry, Arc::new(MockStore::default()))
                .unwrap();
        let id = id();
        let history = ConversationHistory::new();

        let err = controller.step(StepInput::new(&id, &history)).await.unwrap_err();
        assert!(matches!(
            err,
            StepError::MistaggedAction {
                expected: Mode::Planning,
                actual: Mode::Completion
            }
        ));
    }

    #[tokio::test]
    async fn test_logs_restore_transition_and_step_events() {
        let (registry, _) = recording_registry();
        let logger = Arc::new(RecordingLogger::default());
        let controller =
            StepController::new(ModeConfig::default(), registry, Arc::new(MockStore::default()))
                .unwrap()
                .with_logger(logger.clone());
        let id = id();
        let mut history = ConversationHistory::new();

        let state = controller.step(StepInput::new(&id, &history)).await.unwrap().state;
        history.push(Turn::agent("moving to development"));
        controller
            .step(StepInput::new(&id, &history).with_cached(Some(state)))
            .await
            .unwrap();

        assert_eq!(
            logger.event_types(),
            vec![
                "mode_restored",
                "step_completed",
                "mode_transition",
                "step_completed"
            ]
        );
    }
}
