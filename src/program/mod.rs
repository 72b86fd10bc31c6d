//! Structured program model: parsing one source snapshot of the
//! sprite/stage dialect into actors with appearances and event-driven
//! scripts.
//!
//! The dialect is deliberately tiny: one base reference per actor class,
//! one decorator per script method, list-literal appearance declarations,
//! fixed indentation widths. Anything outside it is rejected with a
//! structural error rather than silently approximated.

/// Syntax tree for the accepted dialect.
pub mod ast;
/// Parser from source text to the syntax tree.
pub mod parser;
/// Event descriptors and the decorator lookup tables.
pub mod event;
/// Actors, identifiers, appearances, script paths and handlers.
pub mod actor;
/// The extractor producing a [`StructuredProgram`].
pub mod structured;

pub use actor::{
    canonicalize_suite, Actor, ActorIdentifier, ActorKind, Appearance, EventHandler, ScriptPath,
};
pub use event::{event_from_decorator, EventDescriptor};
pub use parser::parse_module;
pub use structured::StructuredProgram;

/// Indentation width (in spaces) of a statement directly inside a class.
pub const CLASS_BODY_INDENT: usize = 4;

/// Indentation width (in spaces) of a line directly inside a method body.
pub const METHOD_BODY_INDENT: usize = 8;
