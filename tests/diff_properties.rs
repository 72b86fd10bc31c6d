//! Algebraic properties of the shared diff primitives and of body-suite
//! canonicalization.

use proptest::prelude::*;
use std::collections::BTreeSet;

use stagehand::program::canonicalize_suite;
use stagehand::StructuredDiff;

fn empty_diff() -> StructuredDiff {
    StructuredDiff::new("prop", "", "").expect("extract")
}

fn name_set() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-z]{1,8}", 0..8)
}

proptest! {
    /// sole_added(A, A ∪ {x}) returns x whenever x ∉ A.
    #[test]
    fn sole_added_finds_the_one_addition(base in name_set(), extra in "[A-Z][a-z]{0,7}") {
        prop_assume!(!base.contains(&extra));
        let mut grown = base.clone();
        grown.insert(extra.clone());
        let found = empty_diff()
            .sole_added(
                base.iter().cloned().collect(),
                grown.iter().cloned().collect(),
                "class",
            )
            .expect("classify");
        prop_assert_eq!(found, extra);
    }

    /// An unchanged set has no sole addition.
    #[test]
    fn sole_added_rejects_identical_sets(base in name_set()) {
        let result = empty_diff().sole_added(
            base.iter().cloned().collect(),
            base.iter().cloned().collect(),
            "class",
        );
        prop_assert!(result.is_err());
    }

    /// Removing anything defeats sole_added, even if something was also
    /// added.
    #[test]
    fn sole_added_rejects_removals(
        base in name_set(),
        extra in "[A-Z][a-z]{0,7}",
    ) {
        prop_assume!(!base.is_empty());
        prop_assume!(!base.contains(&extra));
        let mut changed: BTreeSet<String> = base.iter().skip(1).cloned().collect();
        changed.insert(extra);
        let result = empty_diff().sole_added(
            base.iter().cloned().collect(),
            changed.iter().cloned().collect(),
            "class",
        );
        prop_assert!(result.is_err());
    }

    /// sole_removed is the mirror of sole_added.
    #[test]
    fn sole_removed_finds_the_one_removal(base in name_set(), extra in "[A-Z][a-z]{0,7}") {
        prop_assume!(!base.contains(&extra));
        let mut grown = base.clone();
        grown.insert(extra.clone());
        let found = empty_diff()
            .sole_removed(
                grown.iter().cloned().collect(),
                base.iter().cloned().collect(),
                "appearance",
            )
            .expect("classify");
        prop_assert_eq!(found, extra);
    }

    /// Adding anything defeats sole_removed.
    #[test]
    fn sole_removed_rejects_additions(base in name_set(), extra in "[A-Z][a-z]{0,7}") {
        prop_assume!(!base.contains(&extra));
        let mut grown = base.clone();
        grown.insert(extra);
        let result = empty_diff().sole_removed(
            base.iter().cloned().collect(),
            grown.iter().cloned().collect(),
            "appearance",
        );
        prop_assert!(result.is_err());
    }

    /// Canonicalizing an already-canonical suite is the identity.
    #[test]
    fn canonicalize_is_idempotent(text in "[ -~\\n]{0,120}") {
        let once = canonicalize_suite(&text);
        prop_assert_eq!(canonicalize_suite(&once), once);
    }

    /// Only the lone statement `pass` canonicalizes to the empty string.
    #[test]
    fn only_pass_canonicalizes_to_empty(statement in "[a-z][a-z0-9_ ().+=]{0,40}") {
        prop_assume!(statement.trim_end() != "pass");
        prop_assume!(!statement.trim_end().is_empty());
        prop_assert_ne!(canonicalize_suite(&statement), "");
    }
}

#[test]
fn pass_canonicalizes_to_empty() {
    assert_eq!(canonicalize_suite("pass"), "");
    assert_eq!(canonicalize_suite("pass   "), "");
}
