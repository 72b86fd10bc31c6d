use stagehand::{ActorIdentifier, EventDescriptor, RichCommit, ScriptPath, StructuredDiff};

fn diff(old_code: &str, new_code: &str) -> StructuredDiff {
    StructuredDiff::new("commit-1", old_code, new_code).expect("extract")
}

const OLD_BOWL: &str = concat!(
    "class Bowl(pytch.Sprite):\n",
    "    Costumes = [\"bowl.png\"]\n",
    "\n",
    "    @pytch.when_green_flag_clicked\n",
    "    def move_with_keys(self):\n",
    "        pass\n",
);

const NEW_BOWL_AND_APPLE: &str = concat!(
    "class Bowl(pytch.Sprite):\n",
    "    Costumes = [\"bowl.png\"]\n",
    "\n",
    "    @pytch.when_green_flag_clicked\n",
    "    def move_with_keys(self):\n",
    "        pass\n",
    "\n",
    "\n",
    "class Apple(pytch.Sprite):\n",
    "    Costumes = [\"apple.png\"]\n",
);

#[test]
fn add_sprite_returns_the_new_class_name() {
    let commit = diff(OLD_BOWL, NEW_BOWL_AND_APPLE)
        .rich_commit("add-sprite", &[])
        .expect("classify");
    assert_eq!(
        commit,
        RichCommit::AddSprite {
            name: "Apple".into()
        }
    );
}

#[test]
fn add_script_on_the_same_pair_fails() {
    let err = diff(OLD_BOWL, NEW_BOWL_AND_APPLE)
        .rich_commit("add-script", &[])
        .unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains("expecting exactly one new script"),
        "message was: {message}"
    );
}

const STAGE_AWARD_POINT_EMPTY: &str = concat!(
    "class ScoreKeeper(pytch.Stage):\n",
    "    Backdrops = [\"Dani.png\"]\n",
    "\n",
    "    @pytch.when_I_receive(\"award-point\")\n",
    "    def award_point(self):\n",
    "        pass\n",
);

const STAGE_AWARD_POINT_SCORES: &str = concat!(
    "class ScoreKeeper(pytch.Stage):\n",
    "    Backdrops = [\"Dani.png\"]\n",
    "\n",
    "    @pytch.when_I_receive(\"award-point\")\n",
    "    def award_point(self):\n",
    "        score += 1\n",
);

#[test]
fn edit_script_from_empty_body() {
    let commit = diff(STAGE_AWARD_POINT_EMPTY, STAGE_AWARD_POINT_SCORES)
        .rich_commit("edit-script", &[])
        .expect("classify");
    assert_eq!(
        commit,
        RichCommit::EditScript {
            path: ScriptPath {
                actor: ActorIdentifier::Stage,
                method_name: "award_point".into(),
            },
            event: EventDescriptor::MessageReceived {
                message: "award-point".into()
            },
            old_code_text: "".into(),
            new_code_text: "score += 1".into(),
        }
    );
}

#[test]
fn edit_script_and_change_hat_block_are_mutually_exclusive() {
    // Body changed, event unchanged: edit-script succeeds...
    let body_edit = diff(STAGE_AWARD_POINT_EMPTY, STAGE_AWARD_POINT_SCORES);
    body_edit.edit_script_commit().expect("classify");
    // ...so change-hat-block must fail on the same pair.
    let err = body_edit.change_hat_block_commit().unwrap_err();
    assert!(
        err.to_string().contains("expecting code for script"),
        "message was: {err}"
    );

    // Event changed, body unchanged: the reverse holds.
    let hat_change = diff(
        STAGE_AWARD_POINT_EMPTY,
        concat!(
            "class ScoreKeeper(pytch.Stage):\n",
            "    Backdrops = [\"Dani.png\"]\n",
            "\n",
            "    @pytch.when_green_flag_clicked\n",
            "    def award_point(self):\n",
            "        pass\n",
        ),
    );
    let commit = hat_change.change_hat_block_commit().expect("classify");
    assert_eq!(
        commit,
        RichCommit::ChangeHatBlock {
            path: ScriptPath {
                actor: ActorIdentifier::Stage,
                method_name: "award_point".into(),
            },
            code_text: "".into(),
            old_event: EventDescriptor::MessageReceived {
                message: "award-point".into()
            },
            new_event: EventDescriptor::GreenFlag,
        }
    );
    let err = hat_change.edit_script_commit().unwrap_err();
    assert!(
        err.to_string().contains("expecting event for script"),
        "message was: {err}"
    );
}

#[test]
fn grouped_appearances_across_two_actors_fail() {
    let old_code = concat!(
        "class Bowl(pytch.Sprite):\n",
        "    Costumes = [\"bowl.png\"]\n",
        "class Apple(pytch.Sprite):\n",
        "    Costumes = [\"apple.png\"]\n",
    );
    let new_code = concat!(
        "class Bowl(pytch.Sprite):\n",
        "    Costumes = [\"bowl.png\", \"basket.png\", \"cup.png\"]\n",
        "class Apple(pytch.Sprite):\n",
        "    Costumes = [\"apple.png\", \"pear.png\"]\n",
    );
    let err = diff(old_code, new_code)
        .rich_commit("add-medialib-appearances-entry", &["Fruit"])
        .unwrap_err();
    assert!(
        err.to_string().contains("exactly one actor"),
        "message was: {err}"
    );
}

#[test]
fn grouped_appearances_on_one_actor_count_the_additions() {
    let old_code = "class Bowl(pytch.Sprite):\n    Costumes = [\"bowl.png\"]\n";
    let new_code =
        "class Bowl(pytch.Sprite):\n    Costumes = [\"bowl.png\", \"basket.png\", \"cup.png\"]\n";
    let commit = diff(old_code, new_code)
        .rich_commit("add-medialib-appearances-entry", &["Bowls"])
        .expect("classify");
    assert_eq!(
        commit,
        RichCommit::AddMedialibAppearancesEntry {
            actor: ActorIdentifier::Sprite {
                name: "Bowl".into()
            },
            display_identifier: "Bowls".into(),
            n_items: 2,
        }
    );
}

#[test]
fn delete_appearance_via_dispatcher() {
    let old_code = "class Bowl(pytch.Sprite):\n    Costumes = [\"bowl.png\", \"basket.png\"]\n";
    let new_code = "class Bowl(pytch.Sprite):\n    Costumes = [\"bowl.png\"]\n";
    let commit = diff(old_code, new_code)
        .rich_commit("delete-appearance", &[])
        .expect("classify");
    assert_eq!(
        commit,
        RichCommit::DeleteAppearance {
            actor: ActorIdentifier::Sprite {
                name: "Bowl".into()
            },
            appearance_filename: "basket.png".into(),
        }
    );
}

#[test]
fn add_script_returns_event_and_body() {
    let old_code = concat!(
        "class Apple(pytch.Sprite):\n",
        "    Costumes = [\"apple.png\"]\n",
    );
    let new_code = concat!(
        "class Apple(pytch.Sprite):\n",
        "    Costumes = [\"apple.png\"]\n",
        "\n",
        "    @pytch.when_key_pressed(\"d\")\n",
        "    def dart_right(self):\n",
        "        self.change_x(10)\n",
    );
    let commit = diff(old_code, new_code)
        .rich_commit("add-script", &[])
        .expect("classify");
    assert_eq!(
        commit,
        RichCommit::AddScript {
            path: ScriptPath {
                actor: ActorIdentifier::Sprite {
                    name: "Apple".into()
                },
                method_name: "dart_right".into(),
            },
            event: EventDescriptor::KeyPressed {
                key_name: "d".into()
            },
            code_text: "self.change_x(10)".into(),
        }
    );
}

#[test]
fn unknown_commit_kind_is_a_structure_error() {
    let err = diff(OLD_BOWL, NEW_BOWL_AND_APPLE)
        .rich_commit("rename-sprite", &[])
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("commit-1"), "message was: {message}");
    assert!(message.contains("rename-sprite"), "message was: {message}");
}

#[test]
fn edit_script_with_two_changed_bodies_names_both_paths() {
    let old_code = concat!(
        "class A(pytch.Sprite):\n",
        "    @pytch.when_green_flag_clicked\n",
        "    def one(self):\n",
        "        pass\n",
        "\n",
        "    @pytch.when_green_flag_clicked\n",
        "    def two(self):\n",
        "        pass\n",
    );
    let new_code = concat!(
        "class A(pytch.Sprite):\n",
        "    @pytch.when_green_flag_clicked\n",
        "    def one(self):\n",
        "        print(1)\n",
        "\n",
        "    @pytch.when_green_flag_clicked\n",
        "    def two(self):\n",
        "        print(2)\n",
    );
    let err = diff(old_code, new_code).edit_script_commit().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("found 2"), "message was: {message}");
    assert!(message.contains("one"), "message was: {message}");
    assert!(message.contains("two"), "message was: {message}");
}
