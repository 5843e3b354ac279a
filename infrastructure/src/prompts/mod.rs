//! Prompt template adapters

mod fs_repository;

pub use fs_repository::FsPromptRepository;
