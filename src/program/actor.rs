use std::fmt;

use serde::{Deserialize, Serialize};

use super::event::EventDescriptor;
use super::METHOD_BODY_INDENT;
use crate::error::{Result, StructureError};

/// Whether an actor is the stage or a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    /// The single stage of a program.
    Stage,
    /// An ordinary sprite.
    Sprite,
}

/// Unambiguous reference to one actor. A program has at most one stage,
/// so the `Stage` variant needs no payload; sprites are keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ActorIdentifier {
    /// The stage.
    Stage,
    /// A sprite, identified by its class name.
    Sprite {
        /// The sprite's class name.
        name: String,
    },
}

impl fmt::Display for ActorIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorIdentifier::Stage => write!(f, "Stage"),
            ActorIdentifier::Sprite { name } => write!(f, "Sprite {:?}", name),
        }
    }
}

/// One costume (sprite) or backdrop (stage) of an actor.
///
/// Declaration order matters within an actor, but appearances are compared
/// as an unordered set when diffing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Appearance {
    /// The owning actor.
    pub actor_identifier: ActorIdentifier,
    /// The appearance's filename/string as declared.
    pub appearance_name: String,
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} of {}", self.appearance_name, self.actor_identifier)
    }
}

/// Location of one script: which actor, which method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptPath {
    /// The owning actor.
    pub actor: ActorIdentifier,
    /// The method name within that actor.
    pub method_name: String,
}

impl fmt::Display for ScriptPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.actor, self.method_name)
    }
}

/// One script: a method with exactly one hat-block event and a captured
/// body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventHandler {
    /// Method name within the owning class.
    pub method_name: String,
    /// The event that triggers the script.
    pub event: EventDescriptor,
    /// Raw body source lines, indentation untouched.
    pub body_lines: Vec<String>,
}

impl EventHandler {
    /// The de-indented, canonicalized body text used for diffing and for
    /// embedding in rendered commits.
    ///
    /// Trailing whitespace is stripped per line; the fixed method-body
    /// indentation is stripped from every non-empty line (a line not
    /// starting with that exact width is a structural error); the
    /// conventional placeholder body `pass` canonicalizes to the empty
    /// string, so an empty script round-trips to empty.
    pub fn body_suite_text(&self) -> Result<String> {
        let mut suite_lines = Vec::with_capacity(self.body_lines.len());
        for line in &self.body_lines {
            let line = line.trim_end();
            if line.is_empty() {
                suite_lines.push("");
                continue;
            }
            let stripped = line.strip_prefix(BODY_INDENT).ok_or_else(|| {
                StructureError::IndentationMismatch {
                    method_name: self.method_name.clone(),
                    line: line.to_string(),
                    width: METHOD_BODY_INDENT,
                }
            })?;
            suite_lines.push(stripped);
        }
        Ok(canonicalize_suite(&suite_lines.join("\n")))
    }
}

const BODY_INDENT: &str = "        ";

/// Canonicalize an already de-indented body suite: strip trailing
/// whitespace per line and map the sole statement `pass` to the empty
/// string. Idempotent.
pub fn canonicalize_suite(text: &str) -> String {
    let joined = text
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    if joined == "pass" {
        String::new()
    } else {
        joined
    }
}

/// A Stage or Sprite entity with its appearances and scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The class name the actor was declared under.
    pub name: String,
    /// Stage or sprite, resolved from the class's single base reference.
    pub kind: ActorKind,
    /// Appearance names in declaration order.
    pub appearances: Vec<String>,
    /// Event handlers in declaration order.
    pub handlers: Vec<EventHandler>,
}

impl Actor {
    /// The identifier the rest of the model uses to refer to this actor.
    pub fn identifier(&self) -> ActorIdentifier {
        match self.kind {
            ActorKind::Stage => ActorIdentifier::Stage,
            ActorKind::Sprite => ActorIdentifier::Sprite {
                name: self.name.clone(),
            },
        }
    }
}
