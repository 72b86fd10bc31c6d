//! Diff classification: given the structured programs of two sibling
//! snapshots, compute the structural delta and classify it into exactly one
//! recognized commit kind, or fail with a structural error when the delta
//! is ambiguous, empty, or inconsistent with the requested kind.

/// Classifier over an old/new program pair.
pub mod classify;
/// The typed commit variants the classifier produces.
pub mod commit;

pub use classify::StructuredDiff;
pub use commit::RichCommit;
