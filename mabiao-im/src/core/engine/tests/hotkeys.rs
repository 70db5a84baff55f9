use super::*;
use mabiao_engine::ChineseMode;

fn shift() -> KeyModifiers {
    KeyModifiers::new().with_shift(true)
}

fn ctrl() -> KeyModifiers {
    KeyModifiers::new().with_control(true)
}

#[test]
fn left_shift_toggles_table_input() {
    let mut engine = engine();
    assert_eq!(engine.input_mode(), InputMode::Table);

    let result = tap(&mut engine, Keysym::SHIFT_L, shift());
    assert!(result.consumed);
    assert_eq!(engine.input_mode(), InputMode::Direct);
    assert!(has_write(&result, SettingKey::TableInput));

    let result = tap(&mut engine, Keysym::SHIFT_L, shift());
    assert_eq!(engine.input_mode(), InputMode::Table);
    assert!(has_write(&result, SettingKey::TableInput));
}

#[test]
fn shift_used_as_modifier_does_not_toggle() {
    let mut engine = engine();
    engine.process_key(&KeyEvent::new(Keysym::SHIFT_L, shift(), true));
    // Another key is pressed while Shift is held
    engine.process_key(&KeyEvent::new(Keysym(b'A' as u32), shift(), true));
    let result = engine.process_key(&release_key(Keysym::SHIFT_L));

    assert!(!result.consumed);
    assert_eq!(engine.input_mode(), InputMode::Table);
}

#[test]
fn left_shift_ignored_while_composing() {
    let mut engine = engine();
    type_str(&mut engine, "ni");

    tap(&mut engine, Keysym::SHIFT_L, shift());
    assert_eq!(engine.input_mode(), InputMode::Table);
    assert_eq!(engine.editor().chars_valid(), "ni");
}

#[test]
fn right_shift_toggles_pinyin() {
    let mut engine = engine();
    let result = tap(&mut engine, Keysym::SHIFT_R, shift());
    assert!(engine.settings().mode.pinyin);
    assert!(engine.editor().py_mode());
    assert!(has_write(&result, SettingKey::Pinyin));

    tap(&mut engine, Keysym::SHIFT_R, shift());
    assert!(!engine.settings().mode.pinyin);
}

#[test]
fn right_shift_ignored_without_pinyin_support() {
    let mut table = MemoryTable::new(TableMetadata {
        supports_pinyin: false,
        ..test_metadata()
    });
    table.push("ni", "你", 100);
    let mut engine = TableEngine::new(Box::new(table), Settings::default());

    tap(&mut engine, Keysym::SHIFT_R, shift());
    assert!(!engine.settings().mode.pinyin);
}

#[test]
fn pinyin_mode_queries_readings() {
    let mut engine = engine();
    tap(&mut engine, Keysym::SHIFT_R, shift());

    let result = engine.process_key(&press('n'));
    assert!(result.consumed);
    engine.process_key(&press('i'));
    assert_eq!(engine.editor().candidates()[0].phrase, "你");
    assert_eq!(engine.editor().candidates()[1].phrase, "尼");
}

#[test]
fn shift_space_toggles_fullwidth_letter_for_current_mode() {
    let mut engine = engine();
    let press_result = engine.process_key(&KeyEvent::new(Keysym::SPACE, shift(), true));
    // The press is swallowed so the application never sees the space
    assert!(press_result.consumed);
    assert!(press_result.commits().is_empty());

    let result = engine.process_key(&KeyEvent::new(Keysym::SPACE, shift(), false));
    assert!(result.consumed);
    // Table mode is index 1
    assert_eq!(engine.settings().width.full_width_letter, [false, true]);
    assert!(has_write(&result, SettingKey::FullWidthLetter));
}

#[test]
fn ctrl_period_toggles_fullwidth_punct() {
    let mut engine = engine();
    let result = tap_held(&mut engine, Keysym::PERIOD, ctrl());
    // Default table-mode punct is fullwidth, so the toggle turns it off
    assert_eq!(engine.settings().width.full_width_punct, [false, false]);
    assert!(has_write(&result, SettingKey::FullWidthPunct));

    let result = engine.process_key(&press(','));
    assert!(!result.consumed, "halfwidth punctuation passes through");
}

#[test]
fn ctrl_comma_toggles_onechar() {
    let mut engine = engine();
    let result = tap_held(&mut engine, Keysym::COMMA, ctrl());
    assert!(engine.settings().mode.onechar);
    assert!(engine.editor().onechar());
    assert!(has_write(&result, SettingKey::OneChar));

    // With onechar active the multi-character phrase is filtered out
    type_str(&mut engine, "nh");
    assert!(engine.editor().candidates().is_empty());
}

#[test]
fn ctrl_slash_toggles_auto_commit() {
    let mut engine = engine();
    let result = tap_held(&mut engine, Keysym::SLASH, ctrl());
    assert!(engine.settings().mode.auto_commit);
    assert!(has_write(&result, SettingKey::AutoCommit));
}

#[test]
fn ctrl_semicolon_cycles_chinese_mode() {
    let mut engine = engine();
    assert_eq!(
        engine.settings().mode.chinese_mode,
        ChineseMode::SimplifiedFirst
    );

    let result = tap_held(&mut engine, Keysym::SEMICOLON, ctrl());
    assert_eq!(
        engine.settings().mode.chinese_mode,
        ChineseMode::TraditionalFirst
    );
    assert_eq!(engine.editor().chinese_mode(), ChineseMode::TraditionalFirst);
    assert!(has_write(&result, SettingKey::ChineseMode));
}

#[test]
fn left_alt_cycles_candidate_within_page() {
    let mut engine = engine();
    type_str(&mut engine, "ni");
    assert_eq!(engine.editor().lookup_table().cursor(), 0);

    tap(
        &mut engine,
        Keysym::ALT_L,
        KeyModifiers::new().with_alt(true),
    );
    assert_eq!(engine.editor().lookup_table().cursor(), 1);

    // Two candidates on the page: cycling again wraps to the start
    tap(
        &mut engine,
        Keysym::ALT_L,
        KeyModifiers::new().with_alt(true),
    );
    assert_eq!(engine.editor().lookup_table().cursor(), 0);
}
