//! Conversation domain.
//!
//! - [`entities::ConversationHistory`]: ordered turns of a conversation
//! - [`state::AgentModeState`]: per-conversation mode record
//! - [`restorer::StateRestorer`]: recomputes the mode from history

pub mod entities;
pub mod restorer;
pub mod state;
