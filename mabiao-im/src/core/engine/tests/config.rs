use super::*;
use mabiao_engine::ChineseMode;

#[test]
fn oversized_page_size_is_clamped_and_written_back_once() {
    let mut settings = Settings::default();
    settings.lookup.page_size = 99;
    let mut engine = engine_with(settings);

    // Ten select keys: the effective page size is 10
    assert_eq!(engine.settings().lookup.page_size, 10);
    let writes = engine.take_pending_config_writes();
    assert_eq!(
        writes,
        vec![(SettingKey::PageSize, SettingValue::Int(10))],
        "the corrected value is written back exactly once"
    );
    assert!(engine.take_pending_config_writes().is_empty());
}

#[test]
fn startup_correction_rides_the_first_result() {
    let mut settings = Settings::default();
    settings.lookup.page_size = 99;
    let mut engine = engine_with(settings);

    let first = engine.process_key(&press('n'));
    assert!(has_write(&first, SettingKey::PageSize));
    let second = engine.process_key(&press('i'));
    assert!(!has_write(&second, SettingKey::PageSize));
}

#[test]
fn page_size_change_notification_is_clamped() {
    let mut engine = engine();

    let result = engine.config_value_changed(SettingKey::PageSize, SettingValue::Int(99));
    let corrections: Vec<_> = result
        .actions
        .iter()
        .filter(|a| matches!(a, EngineAction::WriteConfig(SettingKey::PageSize, _)))
        .collect();
    assert_eq!(corrections.len(), 1);
    assert_eq!(engine.settings().lookup.page_size, 10);

    // An in-range value is accepted silently
    let result = engine.config_value_changed(SettingKey::PageSize, SettingValue::Int(5));
    assert!(!has_write(&result, SettingKey::PageSize));
    assert_eq!(engine.settings().lookup.page_size, 5);
    assert_eq!(engine.editor().lookup_table().page_size(), 5);
}

#[test]
fn table_input_change_switches_mode_and_clears_composition() {
    let mut engine = engine();
    type_str(&mut engine, "ni");

    engine.config_value_changed(SettingKey::TableInput, SettingValue::Bool(false));
    assert_eq!(engine.input_mode(), InputMode::Direct);
    assert!(!engine.is_composing());

    // Direct mode now: letters pass through
    assert!(!engine.process_key(&press('n')).consumed);
}

#[test]
fn width_settings_are_mode_indexed() {
    let mut engine = engine();
    engine.config_value_changed(
        SettingKey::FullWidthLetter,
        SettingValue::BoolPair([true, false]),
    );

    // Table mode uses index 1: the lone wildcard stays halfwidth
    type_str(&mut engine, "?");
    assert_eq!(engine.editor().candidates()[0].phrase, "?");
    engine.process_key(&press_key(Keysym::ESCAPE));

    // Switching to direct mode re-derives the letter width from index 0
    engine.config_value_changed(SettingKey::TableInput, SettingValue::Bool(false));
    let result = engine.process_key(&press('a'));
    assert_eq!(result.commits(), ["ａ"]);
}

#[test]
fn chinese_mode_change_applies_to_lookups() {
    let mut engine = engine();
    engine.config_value_changed(
        SettingKey::ChineseMode,
        SettingValue::Text("traditional-only".to_string()),
    );
    assert_eq!(engine.editor().chinese_mode(), ChineseMode::TraditionalOnly);

    let result = engine.config_value_changed(
        SettingKey::ChineseMode,
        SettingValue::Text("bogus".to_string()),
    );
    assert!(!result.consumed);
    assert_eq!(engine.editor().chinese_mode(), ChineseMode::TraditionalOnly);
}

#[test]
fn wrong_value_type_is_rejected() {
    let mut engine = engine();
    let result = engine.config_value_changed(SettingKey::Pinyin, SettingValue::Int(1));
    assert!(!result.consumed);
    assert!(!engine.settings().mode.pinyin);
}

#[test]
fn always_show_lookup_controls_empty_table_visibility() {
    let mut engine = engine();

    // 'z' matches nothing, but always_show keeps the (empty) table up
    let result = engine.process_key(&press('z'));
    assert!(result
        .actions
        .iter()
        .any(|a| matches!(a, EngineAction::ShowLookupTable(view) if view.entries.is_empty())));
    engine.process_key(&press_key(Keysym::ESCAPE));

    engine.config_value_changed(SettingKey::AlwaysShowLookup, SettingValue::Bool(false));
    let result = engine.process_key(&press('z'));
    assert!(result
        .actions
        .iter()
        .any(|a| matches!(a, EngineAction::HideLookupTable)));
}

#[test]
fn usage_sync_fires_on_tick() {
    let mut settings = Settings::default();
    settings.usage.max_pending = 1000;
    settings.usage.max_age_ms = 0;
    let mut engine = engine_with(settings);

    assert!(!engine.tick(), "no pending events, no sync");

    type_str(&mut engine, "ni");
    engine.process_key(&press_ctrl_char('1'));
    assert!(engine.tick(), "age threshold of zero syncs immediately");
    assert!(!engine.tick());
}
