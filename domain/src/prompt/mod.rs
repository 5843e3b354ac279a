//! Prompt domain
//!
//! Selection of the instruction template for the current mode, plus the
//! built-in template texts.

pub mod selector;
mod template;

pub use selector::{PromptSelector, TemplateId};
pub use template::PromptTemplate;
