use super::*;

/// Build a composition with two precommitted phrases: 你 (keys "ni") and
/// 好 (keys "hk").
fn composed_engine() -> TableEngine {
    let mut engine = engine();
    type_str(&mut engine, "ni");
    engine.process_key(&press('1'));
    type_str(&mut engine, "hk");
    engine.process_key(&press('1'));
    assert_eq!(engine.editor().committed_phrases(), ["你", "好"]);
    engine
}

#[test]
fn arrows_move_through_precommitted_phrases() {
    let mut engine = composed_engine();
    assert_eq!(engine.editor().cursor_precommit(), 2);

    engine.process_key(&press_key(Keysym::LEFT));
    assert_eq!(engine.editor().cursor_precommit(), 1);

    engine.process_key(&press_key(Keysym::LEFT));
    assert_eq!(engine.editor().cursor_precommit(), 0);

    let result = engine.process_key(&press_key(Keysym::RIGHT));
    assert_eq!(engine.editor().cursor_precommit(), 1);
    assert_eq!(preedit_text(&result).as_deref(), Some("你好"));
}

#[test]
fn ctrl_arrows_jump_to_extremes() {
    let mut engine = composed_engine();

    engine.process_key(&press_ctrl(Keysym::LEFT));
    assert_eq!(engine.editor().cursor_precommit(), 0);

    engine.process_key(&press_ctrl(Keysym::RIGHT));
    assert_eq!(engine.editor().cursor_precommit(), 2);

    // Home/End behave like the Ctrl variants
    engine.process_key(&press_key(Keysym::HOME));
    assert_eq!(engine.editor().cursor_precommit(), 0);
    engine.process_key(&press_key(Keysym::END));
    assert_eq!(engine.editor().cursor_precommit(), 2);
}

#[test]
fn arrow_splits_multichar_phrase() {
    let mut engine = engine();
    type_str(&mut engine, "nh");
    engine.process_key(&press('1'));
    type_str(&mut engine, "ni");
    engine.process_key(&press('1'));
    assert_eq!(engine.editor().committed_phrases(), ["你好", "你"]);

    engine.process_key(&press_key(Keysym::LEFT));
    assert_eq!(engine.editor().committed_phrases(), ["你", "好", "你"]);
    assert_eq!(engine.editor().cursor_precommit(), 2);
}

#[test]
fn arrow_left_finalizes_live_input_first() {
    let mut engine = engine();
    type_str(&mut engine, "ni");
    engine.process_key(&press('1'));
    type_str(&mut engine, "hk");

    engine.process_key(&press_key(Keysym::LEFT));
    // The live "hk" segment was flushed to its best candidate first
    assert_eq!(engine.editor().committed_phrases(), ["你", "好"]);
    assert!(engine.editor().is_empty());
    assert_eq!(engine.editor().cursor_precommit(), 1);
}

#[test]
fn backspace_pops_live_input_then_enters_precommit() {
    let mut engine = engine();
    type_str(&mut engine, "ni");
    engine.process_key(&press('1'));
    type_str(&mut engine, "hk");

    // Live segment shrinks first
    engine.process_key(&press_key(Keysym::BACKSPACE));
    assert_eq!(engine.editor().chars_valid(), "h");

    // Popping the last live key un-finalizes the precommitted phrase
    engine.process_key(&press_key(Keysym::BACKSPACE));
    assert!(engine.editor().committed_phrases().is_empty());
    assert_eq!(engine.editor().chars_valid(), "ni");
    assert_eq!(engine.editor().candidates()[0].phrase, "你");
}

#[test]
fn backspace_restores_precommitted_keys_for_rematching() {
    let mut engine = composed_engine();

    let result = engine.process_key(&press_key(Keysym::BACKSPACE));
    assert_eq!(engine.editor().committed_phrases(), ["你"]);
    assert_eq!(engine.editor().chars_valid(), "hk");
    assert_eq!(preedit_text(&result).as_deref(), Some("你好"));
}

#[test]
fn ctrl_backspace_removes_left_span() {
    let mut engine = composed_engine();

    let result = engine.process_key(&press_ctrl(Keysym::BACKSPACE));
    assert!(engine.editor().committed_phrases().is_empty());
    assert!(!engine.is_composing());
    assert_eq!(preedit_text(&result).as_deref(), Some(""));
}

#[test]
fn delete_removes_phrase_after_cursor() {
    let mut engine = composed_engine();
    engine.process_key(&press_ctrl(Keysym::LEFT));

    engine.process_key(&press_key(Keysym::DELETE));
    assert_eq!(engine.editor().committed_phrases(), ["好"]);

    // Ctrl+Delete drops the rest
    engine.process_key(&press_ctrl(Keysym::DELETE));
    assert!(!engine.is_composing());
}

#[test]
fn lookup_cursor_moves_with_up_down() {
    let mut engine = engine();
    type_str(&mut engine, "ni");

    engine.process_key(&press_key(Keysym::DOWN));
    assert_eq!(engine.editor().lookup_table().cursor(), 1);
    let result = engine.process_key(&press('1'));
    // Selection follows the moved cursor via commit_to_preedit
    assert_eq!(engine.editor().committed_phrases(), ["你"]);
    assert!(result.consumed);

    let mut engine = engine_builder_cursor_commit();
    type_str(&mut engine, "ni");
    engine.process_key(&press_key(Keysym::DOWN));
    // Enter with auto_select commits the candidate under the cursor
    let result = engine.process_key(&press_key(Keysym::RETURN));
    assert_eq!(result.commits(), ["尼"]);
}

fn engine_builder_cursor_commit() -> TableEngine {
    let mut settings = Settings::default();
    settings.mode.auto_select = true;
    engine_with(settings)
}
