use std::fmt;

/// Syntax tree for the accepted program dialect.
///
/// The dialect is deliberately tiny: top-level class declarations whose
/// bodies hold decorated method definitions and single-target assignments.
/// Everything the extractor does not recognize is either carried as an
/// `Other` node (where the dialect says to ignore it) or rejected later
/// during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Top-level statements in source order.
    pub body: Vec<TopLevel>,
}

/// One top-level statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevel {
    /// A class declaration (a candidate actor).
    Class(ClassDef),
    /// Any non-class top-level statement; the extractor ignores these.
    Other {
        /// 1-based line the statement starts on.
        line: usize,
    },
}

/// A top-level class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// Class name.
    pub name: String,
    /// Base references, in declaration order.
    pub bases: Vec<DottedName>,
    /// Class-body statements, in declaration order.
    pub body: Vec<ClassStmt>,
    /// 1-based line the declaration starts on.
    pub line: usize,
}

/// One class-body statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassStmt {
    /// A (possibly decorated) method definition.
    Method(MethodDef),
    /// A single-target assignment.
    Assign(Assign),
    /// Any other statement kind; the extractor rejects these.
    Other {
        /// 1-based line the statement starts on.
        line: usize,
    },
}

/// A method definition inside a class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    /// Method name.
    pub name: String,
    /// Decorators, outermost first.
    pub decorators: Vec<Decorator>,
    /// Raw body source lines, from the first body statement through the
    /// last, with interior blank lines kept and trailing blank lines
    /// trimmed. Indentation is untouched here.
    pub body_lines: Vec<String>,
    /// 1-based line of the `def` header.
    pub line: usize,
}

/// A single-target assignment inside a class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    /// Assignment target (an identifier).
    pub target: String,
    /// Right-hand side, as far as the dialect classifies it.
    pub value: AssignValue,
    /// 1-based line the assignment starts on.
    pub line: usize,
}

/// Right-hand side of a class-body assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignValue {
    /// A list literal whose every element is a string literal.
    StringList(Vec<String>),
    /// Anything else. Permitted (and ignored) unless the target is a
    /// recognized appearance attribute.
    Other,
}

/// A decorator attached to a method definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decorator {
    /// A bare qualified reference, e.g. `@pytch.when_green_flag_clicked`.
    Bare(DottedName),
    /// A call of a qualified reference, e.g. `@pytch.when_I_receive("go")`.
    Call {
        /// The reference being called.
        callee: DottedName,
        /// Call arguments, in order.
        args: Vec<CallArg>,
    },
}

/// One argument in a call-form decorator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    /// A string literal.
    Str(String),
    /// Any other expression, captured as source text for diagnostics.
    Other(String),
}

/// A dotted qualified name, e.g. `pytch.Sprite`. Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DottedName {
    /// Name components, in order.
    pub parts: Vec<String>,
}

impl DottedName {
    /// Final component of the name, which is what base and decorator
    /// resolution key on.
    pub fn last(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for DottedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("."))
    }
}
