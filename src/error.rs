//! Error types for the tutorial-compiler core.
//!
//! Two kinds: [`StructureError`] means the authored content (the program
//! snapshots or the old/new pairing) violates the accepted dialect or the
//! invariants of a requested classification, and must be surfaced so the
//! author can fix it. [`InternalError`] means an invariant this crate should
//! itself guarantee was broken, and indicates a defect here rather than in
//! the authored content.

use thiserror::Error;

/// Top-level error for extraction and classification.
#[derive(Debug, Error)]
pub enum TutorialError {
    /// Authored content does not conform to the dialect or diff invariants.
    #[error("{0}")]
    Structure(#[from] StructureError),

    /// A defect in this crate; should be treated as fatal.
    #[error("{0}")]
    Internal(#[from] InternalError),
}

/// Situations where the input source or old/new pairing is not suitable.
///
/// Never recovered from silently: each variant names the offending
/// construct so the author can locate and correct it.
#[derive(Debug, Error)]
pub enum StructureError {
    /// Source text falls outside the accepted dialect.
    #[error("syntax error at line {line}: {detail}")]
    Syntax {
        /// 1-based source line of the offending construct.
        line: usize,
        /// Description of what was found.
        detail: String,
    },

    /// An actor class must have exactly one base reference.
    #[error("class \"{class_name}\" has {count} base classes; expecting exactly one")]
    BadBaseCount {
        /// Name of the offending class.
        class_name: String,
        /// Number of bases found.
        count: usize,
    },

    /// The single base did not resolve to the sprite/stage base.
    #[error("class \"{class_name}\" has unrecognized base \"{base}\"; expecting one resolving to Sprite or Stage")]
    UnknownBase {
        /// Name of the offending class.
        class_name: String,
        /// The base reference as written.
        base: String,
    },

    /// Two top-level classes share a name.
    #[error("duplicate actor class \"{class_name}\"")]
    DuplicateActor {
        /// The repeated class name.
        class_name: String,
    },

    /// A program has at most one Stage actor.
    #[error("class \"{class_name}\" declares a second Stage; \"{existing}\" is already the stage")]
    MultipleStages {
        /// Name of the second stage-based class.
        class_name: String,
        /// Name of the class already recorded as the stage.
        existing: String,
    },

    /// A script method must carry exactly one decorator.
    #[error("method \"{method_name}\" has {count} decorators; expecting exactly one")]
    BadDecoratorCount {
        /// Name of the offending method.
        method_name: String,
        /// Number of decorators found.
        count: usize,
    },

    /// The decorator does not match any recognized hat-block shape.
    #[error("method \"{method_name}\" has unexpected decorator: {detail}")]
    UnexpectedDecorator {
        /// Name of the offending method.
        method_name: String,
        /// Description of the unexpected construct.
        detail: String,
    },

    /// Two methods of one class share a name.
    #[error("class \"{class_name}\" defines method \"{method_name}\" more than once")]
    DuplicateMethod {
        /// Name of the owning class.
        class_name: String,
        /// The repeated method name.
        method_name: String,
    },

    /// A Costumes/Backdrops assignment was not a list literal of strings.
    #[error("class \"{class_name}\": {attribute} must be assigned a list literal of string literals")]
    BadAppearanceList {
        /// Name of the owning class.
        class_name: String,
        /// The attribute as written (Costumes or Backdrops).
        attribute: String,
    },

    /// A class declared its appearance list twice.
    #[error("class \"{class_name}\" assigns {attribute} but already declared its appearance list")]
    DuplicateAppearanceList {
        /// Name of the owning class.
        class_name: String,
        /// The second attribute as written.
        attribute: String,
    },

    /// One appearance name occurs twice in a class's list.
    #[error("class \"{class_name}\" lists appearance \"{appearance_name}\" more than once")]
    DuplicateAppearance {
        /// Name of the owning class.
        class_name: String,
        /// The repeated appearance name.
        appearance_name: String,
    },

    /// A class-body statement kind the dialect does not accept.
    #[error("class \"{class_name}\" contains an unexpected statement at line {line}")]
    UnexpectedClassStatement {
        /// Name of the owning class.
        class_name: String,
        /// 1-based source line of the statement.
        line: usize,
    },

    /// A body line did not start with the fixed indentation width.
    #[error("method \"{method_name}\": body line {line:?} does not start with {width} spaces")]
    IndentationMismatch {
        /// Name of the owning method.
        method_name: String,
        /// The offending line text.
        line: String,
        /// The required indentation width.
        width: usize,
    },

    /// The old/new delta does not match the requested classification.
    #[error("{label}: {detail}")]
    Diff {
        /// Label identifying the commit reference being classified.
        label: String,
        /// Description of the mismatch.
        detail: String,
    },

    /// The authored kind tag is not one of the recognized commit kinds.
    #[error("{label}: unknown commit-kind \"{kind}\"")]
    UnknownCommitKind {
        /// Label identifying the commit reference being classified.
        label: String,
        /// The unrecognized tag.
        kind: String,
    },

    /// Wrong number of arguments for the authored kind tag.
    #[error("{label}: commit-kind \"{kind}\" expects {expected} argument(s), found {found}")]
    BadCommitArguments {
        /// Label identifying the commit reference being classified.
        label: String,
        /// The kind tag supplied.
        kind: String,
        /// How many arguments the kind takes.
        expected: usize,
        /// How many were supplied.
        found: usize,
    },
}

/// Situations which really shouldn't happen.
#[derive(Debug, Error)]
pub enum InternalError {
    /// A script path computed from a program failed to resolve in it.
    #[error("no handler at {path} in the program it was computed from")]
    MissingHandler {
        /// The unresolvable path, rendered for display.
        path: String,
    },

    /// Old/new script lists changed length after the path-list check.
    #[error("old/new script lists have lengths {old} vs {new} after path check")]
    ScriptListLength {
        /// Length of the old program's script list.
        old: usize,
        /// Length of the new program's script list.
        new: usize,
    },

    /// Positionally paired scripts were at different paths.
    #[error("scripts paired at different paths: {old_path} vs {new_path}")]
    PathPairMismatch {
        /// Path from the old program, rendered for display.
        old_path: String,
        /// Path from the new program, rendered for display.
        new_path: String,
    },

    /// JSON serialization of a crate-owned value failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type using [`TutorialError`].
pub type Result<T> = std::result::Result<T, TutorialError>;
