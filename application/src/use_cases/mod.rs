//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod conversation_sessions;
pub mod replay_history;
pub mod step_controller;

#[cfg(test)]
pub(crate) mod test_support;
