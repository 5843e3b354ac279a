//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod history_reader;
pub mod mode_handler;
pub mod prompt_repository;
pub mod state_store;
