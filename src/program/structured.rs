use super::actor::{Actor, ActorKind, Appearance, EventHandler, ScriptPath};
use super::ast::{AssignValue, ClassDef, ClassStmt, TopLevel};
use super::event::event_from_decorator;
use super::parser::parse_module;
use crate::error::{InternalError, Result, StructureError};

/// Attribute names recognized as an actor's appearance list. Either is
/// accepted on either actor kind; convention pairs the first with sprites
/// and the second with the stage.
const APPEARANCE_ATTRIBUTES: &[&str] = &["Costumes", "Backdrops"];

/// The full actor/appearance/script model extracted from one source
/// snapshot.
///
/// Built once from the snapshot's text and immutable thereafter. The
/// projections (`all_actor_names`, `all_appearances`, ...) are computed on
/// demand from the owned actors, so they always agree with the underlying
/// model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredProgram {
    actors: Vec<Actor>,
}

impl StructuredProgram {
    /// Parse one snapshot of source text into the structured model,
    /// failing on the first dialect violation encountered.
    pub fn new(code_text: &str) -> Result<Self> {
        let module = parse_module(code_text)?;
        let mut actors: Vec<Actor> = Vec::new();
        for top in &module.body {
            let TopLevel::Class(class) = top else {
                continue;
            };
            let actor = extract_actor(class)?;
            if actors.iter().any(|existing| existing.name == actor.name) {
                return Err(StructureError::DuplicateActor {
                    class_name: actor.name,
                }
                .into());
            }
            if actor.kind == ActorKind::Stage {
                if let Some(stage) = actors.iter().find(|a| a.kind == ActorKind::Stage) {
                    return Err(StructureError::MultipleStages {
                        class_name: actor.name,
                        existing: stage.name.clone(),
                    }
                    .into());
                }
            }
            tracing::debug!(
                actor = %actor.name,
                kind = ?actor.kind,
                appearances = actor.appearances.len(),
                scripts = actor.handlers.len(),
                "extracted actor"
            );
            actors.push(actor);
        }
        Ok(Self { actors })
    }

    /// All actors, in declaration order.
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Look up an actor by class name.
    pub fn actor_by_name(&self, name: &str) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.name == name)
    }

    /// All actor class names, in declaration order.
    pub fn all_actor_names(&self) -> Vec<String> {
        self.actors.iter().map(|actor| actor.name.clone()).collect()
    }

    /// All appearances across all actors, in declaration order.
    pub fn all_appearances(&self) -> Vec<Appearance> {
        self.actors
            .iter()
            .flat_map(|actor| {
                let identifier = actor.identifier();
                actor.appearances.iter().map(move |name| Appearance {
                    actor_identifier: identifier.clone(),
                    appearance_name: name.clone(),
                })
            })
            .collect()
    }

    /// All scripts paired with their paths, in declaration order.
    pub fn all_scripts(&self) -> Vec<(ScriptPath, &EventHandler)> {
        self.actors
            .iter()
            .flat_map(|actor| {
                let identifier = actor.identifier();
                actor.handlers.iter().map(move |handler| {
                    (
                        ScriptPath {
                            actor: identifier.clone(),
                            method_name: handler.method_name.clone(),
                        },
                        handler,
                    )
                })
            })
            .collect()
    }

    /// All script paths, in declaration order.
    pub fn all_script_paths(&self) -> Vec<ScriptPath> {
        self.all_scripts()
            .into_iter()
            .map(|(path, _)| path)
            .collect()
    }

    /// The handler at a path known to come from this program. A miss is an
    /// internal error, not a structural one.
    pub fn handler_from_path(&self, path: &ScriptPath) -> Result<&EventHandler> {
        let actor = self
            .actors
            .iter()
            .find(|actor| actor.identifier() == path.actor);
        actor
            .and_then(|actor| {
                actor
                    .handlers
                    .iter()
                    .find(|handler| handler.method_name == path.method_name)
            })
            .ok_or_else(|| {
                InternalError::MissingHandler {
                    path: path.to_string(),
                }
                .into()
            })
    }
}

fn extract_actor(class: &ClassDef) -> Result<Actor> {
    if class.bases.len() != 1 {
        return Err(StructureError::BadBaseCount {
            class_name: class.name.clone(),
            count: class.bases.len(),
        }
        .into());
    }
    let base = &class.bases[0];
    let kind = match base.last().to_ascii_lowercase().as_str() {
        "sprite" => ActorKind::Sprite,
        "stage" => ActorKind::Stage,
        _ => {
            return Err(StructureError::UnknownBase {
                class_name: class.name.clone(),
                base: base.to_string(),
            }
            .into());
        }
    };

    let mut appearances: Option<Vec<String>> = None;
    let mut handlers: Vec<EventHandler> = Vec::new();
    for stmt in &class.body {
        match stmt {
            ClassStmt::Method(method) => {
                if method.decorators.len() != 1 {
                    return Err(StructureError::BadDecoratorCount {
                        method_name: method.name.clone(),
                        count: method.decorators.len(),
                    }
                    .into());
                }
                let event = event_from_decorator(&method.name, &method.decorators[0])?;
                if handlers.iter().any(|h| h.method_name == method.name) {
                    return Err(StructureError::DuplicateMethod {
                        class_name: class.name.clone(),
                        method_name: method.name.clone(),
                    }
                    .into());
                }
                handlers.push(EventHandler {
                    method_name: method.name.clone(),
                    event,
                    body_lines: method.body_lines.clone(),
                });
            }
            ClassStmt::Assign(assign) => {
                if !APPEARANCE_ATTRIBUTES.contains(&assign.target.as_str()) {
                    // Reserved for extension; currently ignored.
                    continue;
                }
                let AssignValue::StringList(names) = &assign.value else {
                    return Err(StructureError::BadAppearanceList {
                        class_name: class.name.clone(),
                        attribute: assign.target.clone(),
                    }
                    .into());
                };
                if appearances.is_some() {
                    return Err(StructureError::DuplicateAppearanceList {
                        class_name: class.name.clone(),
                        attribute: assign.target.clone(),
                    }
                    .into());
                }
                for (index, name) in names.iter().enumerate() {
                    if names[..index].contains(name) {
                        return Err(StructureError::DuplicateAppearance {
                            class_name: class.name.clone(),
                            appearance_name: name.clone(),
                        }
                        .into());
                    }
                }
                appearances = Some(names.clone());
            }
            ClassStmt::Other { line } => {
                return Err(StructureError::UnexpectedClassStatement {
                    class_name: class.name.clone(),
                    line: *line,
                }
                .into());
            }
        }
    }

    Ok(Actor {
        name: class.name.clone(),
        kind,
        appearances: appearances.unwrap_or_default(),
        handlers,
    })
}
