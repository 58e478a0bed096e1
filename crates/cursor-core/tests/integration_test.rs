use std::sync::{Arc, Mutex};

use cursor_core::{
    AutoClosingPair, AutoClosingStrategy, Command, CommandError, CommandResult, CursorChangeReason,
    CursorCommand, CursorConfig, CursorController, EditCommand, EndOfLinePreference,
    IndentationRules, KEYBOARD_SOURCE, LanguageConfiguration, LanguageRegistry, LineEnding,
    Pattern, Position, Selection, TextModel,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn controller_with(text: &str, config: CursorConfig, language: LanguageConfiguration) -> CursorController {
    init_tracing();
    let registry = LanguageRegistry::new();
    registry.register("test", language);
    CursorController::new(TextModel::with_options(text, Default::default(), "test"))
        .with_config(config)
        .with_language_provider(Arc::new(registry))
}

fn brackets_language() -> LanguageConfiguration {
    LanguageConfiguration::new()
        .with_brackets([("{", "}"), ("[", "]"), ("(", ")")])
        .with_auto_closing_pairs(vec![
            AutoClosingPair::new("{", "}"),
            AutoClosingPair::new("[", "]"),
            AutoClosingPair::new("(", ")"),
            AutoClosingPair::new("\"", "\""),
        ])
}

fn brace_rules() -> IndentationRules {
    IndentationRules::new(
        Pattern::new(r"^.*\{[^}]*$").unwrap(),
        Pattern::new(r"^\s*\}").unwrap(),
    )
}

fn cursor(controller: &mut CursorController, command: CursorCommand) {
    controller.trigger("test", Command::Cursor(command)).unwrap();
}

fn type_keys(controller: &mut CursorController, text: &str) {
    controller
        .trigger(KEYBOARD_SOURCE, Command::Edit(EditCommand::Type { text: text.to_string() }))
        .unwrap();
}

fn set_selections(controller: &mut CursorController, selections: Vec<Selection>) {
    controller
        .trigger("test", Command::Cursor(CursorCommand::SetSelections { selections }))
        .unwrap();
}

fn text(controller: &CursorController) -> String {
    controller.model().get_value(EndOfLinePreference::Lf)
}

fn caret(line: usize, column: usize) -> Selection {
    Selection::caret(Position::new(line, column))
}

#[test]
fn test_multicursor_paste_distributes_fragments() {
    let mut controller = CursorController::new(TextModel::new("xy\nzw"));
    set_selections(&mut controller, vec![caret(1, 1), caret(2, 1)]);

    controller
        .trigger(
            "test",
            Command::Edit(EditCommand::Paste {
                text: "a\nb".to_string(),
                paste_on_new_line: false,
                multicursor_text: Some(vec!["a".to_string(), "b".to_string()]),
            }),
        )
        .unwrap();

    assert_eq!(text(&controller), "axy\nbzw");
    assert_eq!(controller.selections(), vec![caret(1, 2), caret(2, 2)]);
}

#[test]
fn test_copy_then_paste_round_trips_whole_line() {
    let mut controller = CursorController::new(TextModel::new("first\nsecond"));
    controller
        .trigger(
            "test",
            Command::Cursor(CursorCommand::MoveTo {
                position: Position::new(2, 3),
                select: false,
            }),
        )
        .unwrap();

    let clip = controller.clipboard_content();
    assert_eq!(clip.text, "second\n");
    assert!(clip.is_whole_line);

    controller
        .trigger(
            "test",
            Command::Edit(EditCommand::Paste {
                text: clip.text,
                paste_on_new_line: clip.is_whole_line,
                multicursor_text: None,
            }),
        )
        .unwrap();
    assert_eq!(text(&controller), "first\nsecond\nsecond");
    assert_eq!(controller.selections(), vec![caret(3, 3)]);
}

#[test]
fn test_auto_close_always_before_whitespace_only() {
    let config = CursorConfig {
        auto_closing_brackets: AutoClosingStrategy::Always,
        ..CursorConfig::default()
    };
    let mut controller = controller_with("a b", config.clone(), brackets_language());
    set_selections(&mut controller, vec![caret(1, 2)]);
    type_keys(&mut controller, "(");
    assert_eq!(text(&controller), "a() b");
    assert_eq!(controller.selections(), vec![caret(1, 3)]);

    let mut controller = controller_with("word", config, brackets_language());
    type_keys(&mut controller, "(");
    assert_eq!(text(&controller), "(word");
    assert_eq!(controller.selections(), vec![caret(1, 2)]);
}

#[test]
fn test_auto_close_then_overtype_then_delete_pair() {
    let mut controller = controller_with("", CursorConfig::default(), brackets_language());

    type_keys(&mut controller, "(");
    assert_eq!(text(&controller), "()");
    type_keys(&mut controller, ")");
    assert_eq!(text(&controller), "()");
    assert_eq!(controller.selections(), vec![caret(1, 3)]);

    controller
        .trigger("test", Command::Cursor(CursorCommand::Left { select: false }))
        .unwrap();
    controller
        .trigger("test", Command::Edit(EditCommand::DeleteLeft))
        .unwrap();
    assert_eq!(text(&controller), "");
}

#[test]
fn test_enter_between_brackets_indents_and_outdents() {
    let mut controller = controller_with("f {}", CursorConfig::default(), brackets_language());
    set_selections(&mut controller, vec![caret(1, 4)]);
    type_keys(&mut controller, "\n");
    assert_eq!(text(&controller), "f {\n    \n}");
    assert_eq!(controller.selections(), vec![caret(2, 5)]);
}

#[test]
fn test_enter_after_indent_next_line_indents_only_one_line() {
    let rules =
        brace_rules().with_indent_next_line(Pattern::new(r"^\s*(if|while)\b.*\)\s*$").unwrap());
    let language = LanguageConfiguration::new().with_indentation_rules(rules);
    let mut controller = controller_with("if (x)", CursorConfig::default(), language);
    set_selections(&mut controller, vec![caret(1, 7)]);

    type_keys(&mut controller, "\n");
    assert_eq!(text(&controller), "if (x)\n    ");
    assert_eq!(controller.selections(), vec![caret(2, 5)]);

    type_keys(&mut controller, "y");
    type_keys(&mut controller, "\n");
    assert_eq!(text(&controller), "if (x)\n    y\n");
    assert_eq!(controller.selections(), vec![caret(3, 1)]);
}

#[test]
fn test_enter_on_unindented_line_keeps_indentation() {
    let rules = brace_rules().with_unindented_line(Pattern::new(r"^\s*//").unwrap());
    let language = brackets_language().with_indentation_rules(rules);
    let mut controller = controller_with("    // note {", CursorConfig::default(), language);
    set_selections(&mut controller, vec![caret(1, 14)]);

    type_keys(&mut controller, "\n");
    assert_eq!(text(&controller), "    // note {\n    ");
    assert_eq!(controller.selections(), vec![caret(2, 5)]);
}

#[test]
fn test_enter_increase_wins_over_decrease_on_same_line() {
    let language = LanguageConfiguration::new().with_indentation_rules(brace_rules());
    let mut controller = controller_with("    } else {", CursorConfig::default(), language);
    set_selections(&mut controller, vec![caret(1, 13)]);

    type_keys(&mut controller, "\n");
    assert_eq!(text(&controller), "    } else {\n        ");
    assert_eq!(controller.selections(), vec![caret(2, 9)]);
}

#[test]
fn test_surround_selection_with_brackets() {
    let mut controller = controller_with("call arg", CursorConfig::default(), brackets_language());
    set_selections(&mut controller, vec![Selection::new(1, 6, 1, 9)]);
    type_keys(&mut controller, "(");
    assert_eq!(text(&controller), "call (arg)");
    assert_eq!(controller.selections(), vec![Selection::new(1, 7, 1, 10)]);
}

#[test]
fn test_column_select_over_short_lines() {
    let mut controller = CursorController::new(TextModel::new("abcdef\nab\n\nabcd"));
    controller
        .trigger(
            "mouse",
            Command::Cursor(CursorCommand::MoveTo {
                position: Position::new(1, 4),
                select: false,
            }),
        )
        .unwrap();
    controller
        .trigger(
            "mouse",
            Command::Cursor(CursorCommand::ColumnSelect {
                position: Position::new(4, 1),
                mouse_column: 1,
            }),
        )
        .unwrap();

    assert_eq!(
        controller.selections(),
        vec![
            Selection::new(1, 4, 1, 1),
            Selection::new(2, 3, 2, 1),
            caret(3, 1),
            Selection::new(4, 4, 4, 1),
        ]
    );
}

#[test]
fn test_keyboard_column_select_then_type() {
    let mut controller = CursorController::new(TextModel::new("abc\nabc\nabc"));
    for command in [
        CursorCommand::ColumnSelectDown,
        CursorCommand::ColumnSelectDown,
        CursorCommand::ColumnSelectRight,
    ] {
        controller.trigger("keyboard", Command::Cursor(command)).unwrap();
    }
    assert_eq!(controller.selections().len(), 3);

    type_keys(&mut controller, "X");
    assert_eq!(text(&controller), "Xbc\nXbc\nXbc");
}

#[test]
fn test_column_select_left_shrinks_after_overshooting_right() {
    let mut controller = CursorController::new(TextModel::new("abc\nab"));
    cursor(&mut controller, CursorCommand::ColumnSelectDown);
    for _ in 0..10 {
        cursor(&mut controller, CursorCommand::ColumnSelectRight);
    }
    assert_eq!(
        controller.selections(),
        vec![Selection::new(1, 1, 1, 4), Selection::new(2, 1, 2, 3)]
    );

    cursor(&mut controller, CursorCommand::ColumnSelectLeft);
    assert_eq!(
        controller.selections(),
        vec![Selection::new(1, 1, 1, 3), Selection::new(2, 1, 2, 3)]
    );
}

#[test]
fn test_home_and_end_collapse_multiline_selection_on_active_line() {
    let mut controller = CursorController::new(TextModel::new("  abc\ndef\n  ghi"));

    set_selections(&mut controller, vec![Selection::new(1, 4, 3, 5)]);
    cursor(&mut controller, CursorCommand::Home { select: false });
    assert_eq!(controller.selections(), vec![caret(3, 3)]);

    set_selections(&mut controller, vec![Selection::new(3, 5, 1, 5)]);
    cursor(&mut controller, CursorCommand::Home { select: false });
    assert_eq!(controller.selections(), vec![caret(1, 3)]);

    set_selections(&mut controller, vec![Selection::new(3, 2, 1, 2)]);
    cursor(&mut controller, CursorCommand::End { select: false });
    assert_eq!(controller.selections(), vec![caret(1, 6)]);

    set_selections(&mut controller, vec![Selection::new(1, 2, 2, 2)]);
    cursor(&mut controller, CursorCommand::End { select: false });
    assert_eq!(controller.selections(), vec![caret(2, 4)]);
}

#[test]
fn test_left_right_step_over_combining_marks() {
    let mut controller = CursorController::new(TextModel::new("e\u{301}x"));
    cursor(&mut controller, CursorCommand::Right { select: false });
    assert_eq!(controller.selections(), vec![caret(1, 3)]);
    cursor(&mut controller, CursorCommand::Left { select: false });
    assert_eq!(controller.selections(), vec![caret(1, 1)]);

    set_selections(&mut controller, vec![caret(1, 3)]);
    controller
        .trigger("test", Command::Edit(EditCommand::DeleteLeft))
        .unwrap();
    assert_eq!(text(&controller), "x");
}

#[test]
fn test_add_cursor_below_and_remove_secondary() {
    let mut controller = CursorController::new(TextModel::new("aaaa\nbb\ncccc"));
    set_selections(&mut controller, vec![caret(1, 4)]);
    controller
        .trigger("test", Command::Cursor(CursorCommand::AddCursorBelow))
        .unwrap();
    controller
        .trigger("test", Command::Cursor(CursorCommand::AddCursorBelow))
        .unwrap();
    assert_eq!(controller.selections(), vec![caret(1, 4), caret(2, 3), caret(3, 3)]);

    controller
        .trigger("test", Command::Cursor(CursorCommand::RemoveSecondaryCursors))
        .unwrap();
    assert_eq!(controller.selections(), vec![caret(1, 4)]);
}

#[test]
fn test_delete_left_merges_touching_cursors() {
    let mut controller = CursorController::new(TextModel::new("abcd"));
    set_selections(&mut controller, vec![caret(1, 2), caret(1, 3)]);
    controller
        .trigger("test", Command::Edit(EditCommand::DeleteLeft))
        .unwrap();
    assert_eq!(text(&controller), "cd");
    assert_eq!(controller.selections(), vec![caret(1, 1)]);
}

#[test]
fn test_cursor_events_report_reason_and_source() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut controller = CursorController::new(TextModel::new("abc"));
    let sink = Arc::clone(&events);
    controller.on_did_change_cursor(move |event| {
        sink.lock().unwrap().push((event.reason, event.source.clone(), event.selections.clone()));
    });

    set_selections(&mut controller, vec![caret(1, 3)]);
    set_selections(&mut controller, vec![caret(1, 3)]);
    type_keys(&mut controller, "x");
    controller.set_value("new");

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            (CursorChangeReason::Explicit, "test".to_string(), vec![caret(1, 3)]),
            (CursorChangeReason::NotSet, KEYBOARD_SOURCE.to_string(), vec![caret(1, 4)]),
            (CursorChangeReason::ContentFlush, "model".to_string(), vec![caret(1, 1)]),
        ]
    );
}

#[test]
fn test_content_events_carry_version_and_eol() {
    let versions = Arc::new(Mutex::new(Vec::new()));
    let mut controller = CursorController::new(TextModel::new("a\r\nb"));
    assert_eq!(controller.model().eol(), LineEnding::Crlf);
    let sink = Arc::clone(&versions);
    controller.on_did_change_content(move |event| {
        sink.lock().unwrap().push((event.version_id, event.is_undoing, event.eol));
    });

    type_keys(&mut controller, "x");
    controller
        .trigger("test", Command::Edit(EditCommand::Undo))
        .unwrap();

    let versions = versions.lock().unwrap();
    assert_eq!(versions.len(), 2);
    assert!(versions[0].0 < versions[1].0);
    assert!(!versions[0].1 && versions[1].1);
    assert_eq!(versions[0].2, LineEnding::Crlf);
    assert_eq!(controller.model().get_value(EndOfLinePreference::TextDefined), "a\r\nb");
}

#[test]
fn test_read_only_model_ignores_edits_but_moves_cursors() {
    init_tracing();
    let mut controller = CursorController::new(TextModel::new("abc"));
    controller.set_read_only(true);

    let result = controller
        .trigger(KEYBOARD_SOURCE, Command::Edit(EditCommand::Type { text: "x".to_string() }))
        .unwrap();
    assert_eq!(result, CommandResult::ReadOnly);
    assert_eq!(text(&controller), "abc");

    controller
        .trigger("test", Command::Cursor(CursorCommand::End { select: false }))
        .unwrap();
    assert_eq!(controller.selections(), vec![caret(1, 4)]);
}

#[test]
fn test_set_selections_rejects_empty_list() {
    let mut controller = CursorController::new(TextModel::new("abc"));
    let err = controller
        .trigger("test", Command::Cursor(CursorCommand::SetSelections { selections: vec![] }))
        .unwrap_err();
    assert!(matches!(err, CommandError::EmptySelections));
    assert_eq!(controller.selections(), vec![caret(1, 1)]);
}

#[test]
fn test_save_and_restore_state() {
    let mut controller = CursorController::new(TextModel::new("one\ntwo\nthree"));
    set_selections(&mut controller, vec![Selection::new(1, 1, 1, 4), caret(3, 2)]);
    let saved = controller.save_state();

    let mut restored = CursorController::new(TextModel::new("one\ntwo"));
    restored.restore_state(&saved).unwrap();
    assert_eq!(restored.selections(), vec![Selection::new(1, 1, 1, 4), caret(2, 2)]);
    assert!(restored.restore_state("[]").is_err());
}

#[test]
fn test_model_edits_carry_cursors_along() {
    init_tracing();
    let mut controller = CursorController::new(TextModel::new("hello"));
    set_selections(&mut controller, vec![caret(1, 3)]);
    controller
        .apply_model_edits(&[cursor_core::EditOperation::insert(Position::new(1, 1), ">> ")])
        .unwrap();
    assert_eq!(text(&controller), ">> hello");
    assert_eq!(controller.selections(), vec![caret(1, 6)]);
    assert!(!controller.model().can_undo());
}

#[test]
fn test_non_keyboard_type_skips_interceptors() {
    let mut controller = controller_with("", CursorConfig::default(), brackets_language());
    controller
        .trigger("api", Command::Edit(EditCommand::Type { text: "(".to_string() }))
        .unwrap();
    assert_eq!(text(&controller), "(");
}

#[test]
fn test_composition_collapses_to_one_edit() {
    let mut controller = CursorController::new(TextModel::new(""));
    controller
        .trigger(KEYBOARD_SOURCE, Command::Edit(EditCommand::CompositionStart))
        .unwrap();
    type_keys(&mut controller, "n");
    controller
        .trigger(
            KEYBOARD_SOURCE,
            Command::Edit(EditCommand::ReplacePreviousChar {
                text: "ñ".to_string(),
                replace_char_count: 1,
            }),
        )
        .unwrap();
    controller
        .trigger(KEYBOARD_SOURCE, Command::Edit(EditCommand::CompositionEnd))
        .unwrap();
    assert_eq!(text(&controller), "ñ");

    controller
        .trigger("test", Command::Edit(EditCommand::Undo))
        .unwrap();
    assert_eq!(text(&controller), "");
}
