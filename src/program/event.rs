use std::fmt;

use serde::{Deserialize, Serialize};

use super::ast::{CallArg, Decorator};
use crate::error::{Result, StructureError};

/// The typed representation of what triggers a script (its "hat block").
///
/// Serialized with camelCase payload fields because these values are
/// destined for JSON consumed by the front-end; the `kind` tags are stable
/// across releases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum EventDescriptor {
    /// Fired on program start.
    GreenFlag,
    /// The sprite (or stage) was clicked.
    Clicked,
    /// The sprite started life as a clone.
    StartAsClone,
    /// A broadcast message was received.
    MessageReceived {
        /// The message name.
        message: String,
    },
    /// A key was pressed.
    KeyPressed {
        /// The key name.
        key_name: String,
    },
}

impl fmt::Display for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventDescriptor::GreenFlag => write!(f, "green-flag"),
            EventDescriptor::Clicked => write!(f, "clicked"),
            EventDescriptor::StartAsClone => write!(f, "start-as-clone"),
            EventDescriptor::MessageReceived { message } => {
                write!(f, "message-received({:?})", message)
            }
            EventDescriptor::KeyPressed { key_name } => write!(f, "key-pressed({:?})", key_name),
        }
    }
}

/// Bare-attribute decorators and the events they denote. Extending the
/// accepted event vocabulary means adding a table entry here.
const BARE_EVENT_DECORATORS: &[(&str, EventDescriptor)] = &[
    ("when_green_flag_clicked", EventDescriptor::GreenFlag),
    ("when_this_sprite_clicked", EventDescriptor::Clicked),
    ("when_stage_clicked", EventDescriptor::Clicked),
    ("when_I_start_as_a_clone", EventDescriptor::StartAsClone),
];

/// Call-form decorators taking exactly one string-literal argument.
const CALL_EVENT_DECORATORS: &[(&str, fn(String) -> EventDescriptor)] = &[
    ("when_I_receive", message_received),
    ("when_key_pressed", key_pressed),
];

fn message_received(message: String) -> EventDescriptor {
    EventDescriptor::MessageReceived { message }
}

fn key_pressed(key_name: String) -> EventDescriptor {
    EventDescriptor::KeyPressed { key_name }
}

/// Interpret a method's decorator as an [`EventDescriptor`].
///
/// Resolution keys on the final dotted component, so `@when_I_receive(...)`
/// and `@pytch.when_I_receive(...)` are equivalent. Any shape outside the
/// two lookup tables is a structural error naming the method and construct.
pub fn event_from_decorator(method_name: &str, decorator: &Decorator) -> Result<EventDescriptor> {
    match decorator {
        Decorator::Bare(name) => {
            for (known, event) in BARE_EVENT_DECORATORS {
                if name.last() == *known {
                    return Ok(event.clone());
                }
            }
            Err(unexpected(
                method_name,
                format!("unknown decorator \"@{}\"", name),
            ))
        }
        Decorator::Call { callee, args } => {
            for (known, make) in CALL_EVENT_DECORATORS {
                if callee.last() == *known {
                    if args.len() != 1 {
                        return Err(unexpected(
                            method_name,
                            format!(
                                "decorator \"@{}(...)\" has {} arguments; expecting exactly one",
                                callee,
                                args.len()
                            ),
                        ));
                    }
                    return match &args[0] {
                        CallArg::Str(value) => Ok(make(value.clone())),
                        CallArg::Other(text) => Err(unexpected(
                            method_name,
                            format!(
                                "argument {:?} of decorator \"@{}(...)\" is not a string literal",
                                text, callee
                            ),
                        )),
                    };
                }
            }
            Err(unexpected(
                method_name,
                format!("unknown decorator \"@{}(...)\"", callee),
            ))
        }
    }
}

fn unexpected(method_name: &str, detail: String) -> crate::error::TutorialError {
    StructureError::UnexpectedDecorator {
        method_name: method_name.to_string(),
        detail,
    }
    .into()
}
