//! Mode handler adapters

mod directive;

pub use directive::{DirectiveHandler, directive_registry};
