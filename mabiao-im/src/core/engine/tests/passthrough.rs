use super::*;

fn abc_table() -> MemoryTable {
    let mut table = MemoryTable::new(TableMetadata {
        name: "abc".to_string(),
        valid_input_chars: "abc".to_string(),
        max_key_length: 4,
        single_wildcard_char: None,
        multi_wildcard_char: None,
        auto_wildcard: false,
        ..TableMetadata::default()
    });
    table.push("ab", "甲", 10);
    table.push("a", "乙", 5);
    table
}

#[test]
fn leading_invalid_char_passes_through() {
    let mut engine = TableEngine::new(Box::new(abc_table()), Settings::default());

    let result = engine.process_key(&press('x'));
    assert!(!result.consumed);
    assert!(!engine.is_composing());
    assert!(engine.editor().is_empty());
}

#[test]
fn leading_non_start_char_passes_through() {
    let mut table = MemoryTable::new(TableMetadata {
        name: "starts".to_string(),
        valid_input_chars: "nik".to_string(),
        start_chars: "n".to_string(),
        max_key_length: 4,
        auto_wildcard: false,
        ..TableMetadata::default()
    });
    table.push("ni", "你", 100);
    let mut engine = TableEngine::new(Box::new(table), Settings::default());

    // 'i' is a valid input char but cannot start a segment
    let result = engine.process_key(&press('i'));
    assert!(!result.consumed);
    assert!(engine.editor().is_empty());

    let result = engine.process_key(&press('n'));
    assert!(result.consumed);
    assert_eq!(engine.editor().chars_valid(), "n");
}

#[test]
fn leading_punct_is_width_converted() {
    // Table-mode fullwidth punctuation is on by default
    let mut engine = engine();
    let result = engine.process_key(&press(','));
    assert!(result.consumed);
    assert_eq!(result.commits(), ["，"]);
    assert!(!engine.is_composing());
}

#[test]
fn trailing_invalid_char_flushes_composition() {
    let mut engine = engine();
    type_str(&mut engine, "ni");

    let result = engine.process_key(&press(','));
    assert!(result.consumed);
    // Best candidate flushed first, then the converted character itself
    assert_eq!(result.commits(), ["你", "，"]);
    assert!(!engine.is_composing());
}

#[test]
fn digit_passes_through_when_idle() {
    let mut settings = Settings::default();
    settings.width.full_width_punct = [false, false];
    let mut engine = engine_with(settings);

    let result = engine.process_key(&press('1'));
    assert!(!result.consumed);
}

#[test]
fn releases_pass_through_in_table_mode() {
    let mut engine = engine();
    type_str(&mut engine, "ni");

    let result = engine.process_key(&release_key(Keysym(b'n' as u32)));
    assert!(!result.consumed);
    assert_eq!(engine.editor().chars_valid(), "ni");
}

#[test]
fn direct_mode_passes_through_without_conversion() {
    let mut settings = Settings::default();
    settings.mode.table_input = false;
    let mut engine = engine_with(settings);
    assert_eq!(engine.input_mode(), InputMode::Direct);

    assert!(!engine.process_key(&press('a')).consumed);
    assert!(!engine.process_key(&press(',')).consumed);
    assert!(!engine.process_key(&press_key(Keysym::RETURN)).consumed);
}

#[test]
fn direct_mode_converts_width_when_enabled() {
    let mut settings = Settings::default();
    settings.mode.table_input = false;
    settings.width.full_width_letter = [true, false];
    settings.width.full_width_punct = [true, false];
    let mut engine = engine_with(settings);

    let result = engine.process_key(&press('a'));
    assert!(result.consumed);
    assert_eq!(result.commits(), ["ａ"]);

    let result = engine.process_key(&press('.'));
    assert_eq!(result.commits(), ["。"]);

    let result = engine.process_key(&press(' '));
    assert_eq!(result.commits(), ["\u{3000}"]);
}
