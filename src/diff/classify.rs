use std::collections::BTreeSet;
use std::fmt::Display;

use super::commit::RichCommit;
use crate::error::{InternalError, Result, StructureError, TutorialError};
use crate::program::{EventHandler, ScriptPath, StructuredProgram};

/// Classifier over the structured programs of one parent/child snapshot
/// pair.
///
/// The surrounding pipeline guarantees the two snapshots come from a
/// parent commit and its child; this type only verifies that the resulting
/// models differ in the single way the authored kind tag claims. Every
/// classification either returns a fully-populated [`RichCommit`] or fails
/// with a structural error prefixed by the diff's label.
#[derive(Debug, Clone)]
pub struct StructuredDiff {
    label: String,
    old_program: StructuredProgram,
    new_program: StructuredProgram,
}

impl StructuredDiff {
    /// Extract both snapshots eagerly; a dialect violation in either is
    /// surfaced immediately.
    pub fn new(label: impl Into<String>, old_code: &str, new_code: &str) -> Result<Self> {
        Ok(Self {
            label: label.into(),
            old_program: StructuredProgram::new(old_code)?,
            new_program: StructuredProgram::new(new_code)?,
        })
    }

    /// Build a classifier from already-extracted programs.
    pub fn from_programs(
        label: impl Into<String>,
        old_program: StructuredProgram,
        new_program: StructuredProgram,
    ) -> Self {
        Self {
            label: label.into(),
            old_program,
            new_program,
        }
    }

    /// The label prefixed onto classification errors.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The parent-revision program.
    pub fn old_program(&self) -> &StructuredProgram {
        &self.old_program
    }

    /// The child-revision program.
    pub fn new_program(&self) -> &StructuredProgram {
        &self.new_program
    }

    fn structure_error(&self, detail: String) -> TutorialError {
        StructureError::Diff {
            label: self.label.clone(),
            detail,
        }
        .into()
    }

    /// Shared primitive: nothing removed and exactly one `name` added.
    pub fn sole_added<T>(&self, old_objs: Vec<T>, new_objs: Vec<T>, name: &str) -> Result<T>
    where
        T: Ord + Display,
    {
        let old_set: BTreeSet<T> = old_objs.into_iter().collect();
        let new_set: BTreeSet<T> = new_objs.into_iter().collect();

        let removed: Vec<&T> = old_set.difference(&new_set).collect();
        if !removed.is_empty() {
            return Err(self.structure_error(format!(
                "expecting every {} from old code to still exist in new code, \
                 but found {} removed",
                name,
                display_list(&removed)
            )));
        }

        let mut added: Vec<T> = new_set
            .into_iter()
            .filter(|obj| !old_set.contains(obj))
            .collect();
        if added.len() != 1 {
            return Err(self.structure_error(format!(
                "expecting exactly one new {} to exist in new code compared \
                 to old code, but found {} added",
                name,
                display_list(&added)
            )));
        }
        Ok(added.swap_remove(0))
    }

    /// Shared primitive: nothing added and exactly one `name` removed.
    pub fn sole_removed<T>(&self, old_objs: Vec<T>, new_objs: Vec<T>, name: &str) -> Result<T>
    where
        T: Ord + Display,
    {
        let old_set: BTreeSet<T> = old_objs.into_iter().collect();
        let new_set: BTreeSet<T> = new_objs.into_iter().collect();

        let added: Vec<&T> = new_set.difference(&old_set).collect();
        if !added.is_empty() {
            return Err(self.structure_error(format!(
                "expecting every {} in new code to have existed in old code, \
                 but found {} added",
                name,
                display_list(&added)
            )));
        }

        let mut removed: Vec<T> = old_set
            .into_iter()
            .filter(|obj| !new_set.contains(obj))
            .collect();
        if removed.len() != 1 {
            return Err(self.structure_error(format!(
                "expecting exactly one {} to be removed in new code compared \
                 to old code, but found {} removed",
                name,
                display_list(&removed)
            )));
        }
        Ok(removed.swap_remove(0))
    }

    /// Shared primitive: two ordered sequences must be pointwise equal.
    pub fn assert_lists_unchanged<T>(
        &self,
        old_objs: &[T],
        new_objs: &[T],
        name_plural: &str,
    ) -> Result<()>
    where
        T: PartialEq + Display,
    {
        if old_objs != new_objs {
            return Err(self.structure_error(format!(
                "expecting the collection of {} to be unchanged, but found \
                 old list {} to differ from new list {}",
                name_plural,
                display_list(&old_objs.iter().collect::<Vec<_>>()),
                display_list(&new_objs.iter().collect::<Vec<_>>())
            )));
        }
        Ok(())
    }

    /// Classify as the addition of exactly one sprite class.
    pub fn add_sprite_commit(&self) -> Result<RichCommit> {
        let added_class_name = self.sole_added(
            self.old_program.all_actor_names(),
            self.new_program.all_actor_names(),
            "class",
        )?;
        Ok(RichCommit::AddSprite {
            name: added_class_name,
        })
    }

    /// Classify as the addition of exactly one appearance.
    pub fn add_medialib_appearance_commit(&self, display_identifier: &str) -> Result<RichCommit> {
        let added_appearance = self.sole_added(
            self.old_program.all_appearances(),
            self.new_program.all_appearances(),
            "appearance",
        )?;
        Ok(RichCommit::AddMedialibAppearancesEntry {
            actor: added_appearance.actor_identifier,
            display_identifier: display_identifier.to_string(),
            n_items: 1,
        })
    }

    /// Classify as the addition of a group of appearances (more than one),
    /// all belonging to the same actor.
    pub fn add_medialib_appearances_entry_commit(&self, entry_name: &str) -> Result<RichCommit> {
        let old_appearances: BTreeSet<_> = self.old_program.all_appearances().into_iter().collect();
        let new_appearances: BTreeSet<_> = self.new_program.all_appearances().into_iter().collect();

        if old_appearances.difference(&new_appearances).count() > 0 {
            return Err(self.structure_error("expecting no appearances to be removed".to_string()));
        }

        let added_appearances: Vec<_> = new_appearances.difference(&old_appearances).collect();
        if added_appearances.len() <= 1 {
            return Err(
                self.structure_error("expecting more than one appearance to be added".to_string())
            );
        }

        let actors_adding_appearances: BTreeSet<_> = added_appearances
            .iter()
            .map(|appearance| appearance.actor_identifier.clone())
            .collect();
        let mut actors = actors_adding_appearances.into_iter();
        let actor = match (actors.next(), actors.next()) {
            (Some(actor), None) => actor,
            _ => {
                return Err(self.structure_error(
                    "expecting appearances to be added to exactly one actor".to_string(),
                ));
            }
        };
        Ok(RichCommit::AddMedialibAppearancesEntry {
            actor,
            display_identifier: entry_name.to_string(),
            n_items: added_appearances.len(),
        })
    }

    /// Classify as the removal of exactly one appearance.
    pub fn delete_appearance_commit(&self) -> Result<RichCommit> {
        let deleted_appearance = self.sole_removed(
            self.old_program.all_appearances(),
            self.new_program.all_appearances(),
            "appearance",
        )?;
        Ok(RichCommit::DeleteAppearance {
            actor: deleted_appearance.actor_identifier,
            appearance_filename: deleted_appearance.appearance_name,
        })
    }

    /// Classify as the addition of exactly one script.
    pub fn add_script_commit(&self) -> Result<RichCommit> {
        let added_path = self.sole_added(
            self.old_program.all_script_paths(),
            self.new_program.all_script_paths(),
            "script",
        )?;
        let added_script = self.new_program.handler_from_path(&added_path)?;
        Ok(RichCommit::AddScript {
            path: added_path,
            event: added_script.event.clone(),
            code_text: added_script.body_suite_text()?,
        })
    }

    /// Classify as an edit to exactly one script's body, with every
    /// hat-block unchanged.
    pub fn edit_script_commit(&self) -> Result<RichCommit> {
        self.assert_lists_unchanged(
            &self.old_program.all_script_paths(),
            &self.new_program.all_script_paths(),
            "script paths",
        )?;

        let mut commits = Vec::new();
        for ((old_path, old_script), (new_path, new_script)) in self.paired_scripts()? {
            self.assert_event_unchanged(&old_path, old_script, &new_path, new_script)?;
            let old_code = old_script.body_suite_text()?;
            let new_code = new_script.body_suite_text()?;
            if new_code != old_code {
                commits.push(RichCommit::EditScript {
                    path: old_path,
                    event: old_script.event.clone(),
                    old_code_text: old_code,
                    new_code_text: new_code,
                });
            }
        }

        self.sole_commit(commits, "different code")
    }

    /// Classify as a change to exactly one script's hat-block, with every
    /// body unchanged.
    pub fn change_hat_block_commit(&self) -> Result<RichCommit> {
        self.assert_lists_unchanged(
            &self.old_program.all_script_paths(),
            &self.new_program.all_script_paths(),
            "script paths",
        )?;

        let mut commits = Vec::new();
        for ((old_path, old_script), (new_path, new_script)) in self.paired_scripts()? {
            self.assert_code_unchanged(&old_path, old_script, &new_path, new_script)?;
            if new_script.event != old_script.event {
                commits.push(RichCommit::ChangeHatBlock {
                    path: old_path,
                    code_text: old_script.body_suite_text()?,
                    old_event: old_script.event.clone(),
                    new_event: new_script.event.clone(),
                });
            }
        }

        self.sole_commit(commits, "a different hat-block")
    }

    /// Dispatch on the authored kind tag. Classification is driven by the
    /// tag alone, never inferred from the delta's size or shape.
    pub fn rich_commit(&self, kind: &str, args: &[&str]) -> Result<RichCommit> {
        match kind {
            "add-sprite" => {
                self.expect_args(kind, args, 0)?;
                self.add_sprite_commit()
            }
            "add-medialib-appearance" => {
                self.expect_args(kind, args, 1)?;
                self.add_medialib_appearance_commit(args[0])
            }
            "add-medialib-appearances-entry" => {
                self.expect_args(kind, args, 1)?;
                self.add_medialib_appearances_entry_commit(args[0])
            }
            "delete-appearance" => {
                self.expect_args(kind, args, 0)?;
                self.delete_appearance_commit()
            }
            "add-script" => {
                self.expect_args(kind, args, 0)?;
                self.add_script_commit()
            }
            "edit-script" => {
                self.expect_args(kind, args, 0)?;
                self.edit_script_commit()
            }
            "change-hat-block" => {
                self.expect_args(kind, args, 0)?;
                self.change_hat_block_commit()
            }
            _ => Err(StructureError::UnknownCommitKind {
                label: self.label.clone(),
                kind: kind.to_string(),
            }
            .into()),
        }
    }

    fn expect_args(&self, kind: &str, args: &[&str], expected: usize) -> Result<()> {
        if args.len() != expected {
            return Err(StructureError::BadCommitArguments {
                label: self.label.clone(),
                kind: kind.to_string(),
                expected,
                found: args.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Pair old and new scripts positionally. Only valid after the
    /// script-path lists have been asserted unchanged, so a length
    /// mismatch here is an internal error.
    #[allow(clippy::type_complexity)]
    fn paired_scripts(
        &self,
    ) -> Result<
        Vec<(
            (ScriptPath, &EventHandler),
            (ScriptPath, &EventHandler),
        )>,
    > {
        let old_scripts = self.old_program.all_scripts();
        let new_scripts = self.new_program.all_scripts();
        if old_scripts.len() != new_scripts.len() {
            return Err(InternalError::ScriptListLength {
                old: old_scripts.len(),
                new: new_scripts.len(),
            }
            .into());
        }
        Ok(old_scripts.into_iter().zip(new_scripts).collect())
    }

    fn assert_paths_paired(&self, old_path: &ScriptPath, new_path: &ScriptPath) -> Result<()> {
        if old_path != new_path {
            return Err(InternalError::PathPairMismatch {
                old_path: old_path.to_string(),
                new_path: new_path.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn assert_event_unchanged(
        &self,
        old_path: &ScriptPath,
        old_script: &EventHandler,
        new_path: &ScriptPath,
        new_script: &EventHandler,
    ) -> Result<()> {
        self.assert_paths_paired(old_path, new_path)?;
        if new_script.event != old_script.event {
            return Err(self.structure_error(format!(
                "expecting event for script at {} to be unchanged, but found \
                 {} for old vs {} for new",
                old_path, old_script.event, new_script.event
            )));
        }
        Ok(())
    }

    fn assert_code_unchanged(
        &self,
        old_path: &ScriptPath,
        old_script: &EventHandler,
        new_path: &ScriptPath,
        new_script: &EventHandler,
    ) -> Result<()> {
        self.assert_paths_paired(old_path, new_path)?;
        if new_script.body_lines != old_script.body_lines {
            return Err(self.structure_error(format!(
                "expecting code for script at {} to be unchanged, but found \
                 {:?} for old vs {:?} for new",
                old_path, old_script.body_lines, new_script.body_lines
            )));
        }
        Ok(())
    }

    fn sole_commit(&self, mut commits: Vec<RichCommit>, what: &str) -> Result<RichCommit> {
        if commits.len() != 1 {
            let paths: Vec<String> = commits
                .iter()
                .filter_map(|commit| commit.path())
                .map(|path| path.to_string())
                .collect();
            return Err(self.structure_error(format!(
                "expecting exactly one script to have {} but found {}, at [{}]",
                what,
                commits.len(),
                paths.join(", ")
            )));
        }
        Ok(commits.swap_remove(0))
    }
}

fn display_list<T: Display>(items: &[T]) -> String {
    let rendered: Vec<String> = items.iter().map(|item| item.to_string()).collect();
    format!("[{}]", rendered.join(", "))
}
