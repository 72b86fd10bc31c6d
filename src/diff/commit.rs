use serde::{Deserialize, Serialize};

use crate::program::{ActorIdentifier, EventDescriptor, ScriptPath};

/// The classified, strongly-typed description of a single authored content
/// change.
///
/// Constructed once per classification call and immediately serialized for
/// embedding in the rendered tutorial markup. The `kind` tags and camelCase
/// field names are consumed by the front-end and must stay stable across
/// releases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum RichCommit {
    /// A new sprite class was added.
    AddSprite {
        /// The added class's name.
        name: String,
    },
    /// One or more appearances were added to one actor from the media
    /// library. `n_items` is 1 for the singular form.
    AddMedialibAppearancesEntry {
        /// The actor gaining appearances.
        actor: ActorIdentifier,
        /// Author-supplied display label for the media-library entry.
        display_identifier: String,
        /// How many appearances were added.
        n_items: usize,
    },
    /// One appearance was removed from one actor.
    DeleteAppearance {
        /// The actor losing the appearance.
        actor: ActorIdentifier,
        /// The removed appearance's filename.
        appearance_filename: String,
    },
    /// One new script was added.
    AddScript {
        /// Where the script lives.
        path: ScriptPath,
        /// The script's hat-block event.
        event: EventDescriptor,
        /// The script's canonical body text.
        code_text: String,
    },
    /// Exactly one script's body changed; all events unchanged.
    EditScript {
        /// Where the script lives.
        path: ScriptPath,
        /// The (unchanged) hat-block event.
        event: EventDescriptor,
        /// Canonical body text before the edit.
        old_code_text: String,
        /// Canonical body text after the edit.
        new_code_text: String,
    },
    /// Exactly one script's hat-block changed; all bodies unchanged.
    ChangeHatBlock {
        /// Where the script lives.
        path: ScriptPath,
        /// The (unchanged) canonical body text.
        code_text: String,
        /// Hat-block event before the change.
        old_event: EventDescriptor,
        /// Hat-block event after the change.
        new_event: EventDescriptor,
    },
}

impl RichCommit {
    /// The script path the commit refers to, for the kinds that carry one.
    pub fn path(&self) -> Option<&ScriptPath> {
        match self {
            RichCommit::AddScript { path, .. }
            | RichCommit::EditScript { path, .. }
            | RichCommit::ChangeHatBlock { path, .. } => Some(path),
            _ => None,
        }
    }
}
