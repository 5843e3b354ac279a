//! Conversation history adapters

mod jsonl_reader;

pub use jsonl_reader::JsonlHistoryReader;
