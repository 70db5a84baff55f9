use super::*;

#[test]
fn auto_select_backtracks_on_dead_end() {
    let mut settings = Settings::default();
    settings.mode.auto_select = true;
    let mut engine = engine_with(settings);

    type_str(&mut engine, "sh");
    assert_eq!(engine.editor().candidates()[0].phrase, "ш");

    // "shs" matches nothing: the previous match is finalized and the
    // third key starts a fresh segment.
    let result = engine.process_key(&press('s'));
    assert!(result.consumed);
    assert_eq!(engine.editor().committed_phrases(), ["ш"]);
    assert_eq!(engine.editor().chars_valid(), "s");
    assert_eq!(engine.editor().chars_invalid(), "");
    // Still in preedit, nothing delivered
    assert!(result.commits().is_empty());
}

#[test]
fn dead_end_without_auto_select_keeps_invalid_suffix() {
    let mut engine = engine();

    type_str(&mut engine, "shs");
    assert_eq!(engine.editor().chars_valid(), "sh");
    assert_eq!(engine.editor().chars_invalid(), "s");
    assert!(!engine.editor().has_precommit());

    // The invalid suffix is rendered in its own segment
    let result = engine.process_key(&press('s'));
    assert_eq!(engine.editor().chars_invalid(), "ss");
    assert_eq!(preedit_text(&result).as_deref(), Some("shss"));
}

#[test]
fn boundary_precommit_stays_in_preedit_by_default() {
    let mut table = MemoryTable::new(test_metadata());
    table.push("a", "一", 1);
    table.push("aa", "二", 1);
    table.push("aaa", "三", 1);
    table.push("aaaa", "四", 1);
    let mut engine = TableEngine::new(Box::new(table), Settings::default());

    type_str(&mut engine, "aaaaa");
    assert_eq!(engine.editor().committed_phrases(), ["四"]);
    assert_eq!(engine.editor().chars_valid(), "a");
}

#[test]
fn boundary_precommit_goes_to_host_with_auto_commit() {
    let mut table = MemoryTable::new(test_metadata());
    table.push("a", "一", 1);
    table.push("aa", "二", 1);
    table.push("aaa", "三", 1);
    table.push("aaaa", "四", 1);
    let mut settings = Settings::default();
    settings.mode.auto_commit = true;
    let mut engine = TableEngine::new(Box::new(table), settings);

    type_str(&mut engine, "aaaa");
    let result = engine.process_key(&press('a'));
    assert_eq!(result.commits(), ["四"]);
    assert!(!engine.editor().has_precommit());
    assert_eq!(engine.editor().chars_valid(), "a");
}

#[test]
fn table_declared_auto_select_policy_applies() {
    let mut table = MemoryTable::new(TableMetadata {
        auto_select: true,
        ..test_metadata()
    });
    table.push("s", "三", 10);
    table.push("sh", "ш", 10);
    let mut engine = TableEngine::new(Box::new(table), Settings::default());
    assert!(engine.settings().mode.auto_select);

    type_str(&mut engine, "shs");
    assert_eq!(engine.editor().committed_phrases(), ["ш"]);
    assert_eq!(engine.editor().chars_valid(), "s");
}
