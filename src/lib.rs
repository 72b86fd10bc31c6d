//! Stagehand – structured program model and diff classifier for compiling
//! guided sprite/stage tutorials from source-control history.
//!
//! This crate implements the hard part of the tutorial compiler:
//! - Parsing one snapshot of program source (a tiny, highly constrained
//!   dialect of sprite/stage classes) into a [`program::StructuredProgram`]
//!   of actors with appearances and event-driven scripts
//! - Classifying the structural delta between two sibling snapshots into
//!   exactly one recognized [`diff::RichCommit`] kind, failing loudly when
//!   the delta does not match
//!
//! Both steps are pure, synchronous transforms: no I/O, no shared state,
//! safe to run concurrently over independent inputs. History walking,
//! Markdown rendering and bundle assembly live in the surrounding pipeline;
//! this crate only exchanges code-text pairs and serialized commits with
//! them.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Diff classification over an old/new snapshot pair.
pub mod diff;
/// Error types: structural (authored content) vs internal (our defect).
pub mod error;
/// JSON interop with the tutorial renderer.
pub mod interop;
/// The structured program model and its extractor.
pub mod program;

// Re-export key types for convenience
pub use diff::{RichCommit, StructuredDiff};
pub use error::{InternalError, Result, StructureError, TutorialError};
pub use program::{
    Actor, ActorIdentifier, ActorKind, Appearance, EventDescriptor, EventHandler, ScriptPath,
    StructuredProgram,
};

/// Current version of the stagehand crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
