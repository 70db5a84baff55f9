//! Tests for the table engine

use super::*;
use crate::config::settings::Settings;
use mabiao_engine::{MemoryTable, TableMetadata};

mod backtrack;
mod config;
mod cursor;
mod hotkeys;
mod passthrough;

fn press(ch: char) -> KeyEvent {
    KeyEvent::press(Keysym(ch as u32))
}

fn press_key(keysym: Keysym) -> KeyEvent {
    KeyEvent::press(keysym)
}

fn release_key(keysym: Keysym) -> KeyEvent {
    KeyEvent::release(keysym)
}

fn press_ctrl(keysym: Keysym) -> KeyEvent {
    KeyEvent::new(keysym, KeyModifiers::new().with_control(true), true)
}

fn press_ctrl_char(ch: char) -> KeyEvent {
    press_ctrl(Keysym(ch as u32))
}

fn press_alt_char(ch: char) -> KeyEvent {
    KeyEvent::new(Keysym(ch as u32), KeyModifiers::new().with_alt(true), true)
}

/// Press and release a hotkey with the given modifier state on the press.
/// The release reports no modifiers, like a real keyboard releasing the
/// last key of a combo.
fn tap(engine: &mut TableEngine, keysym: Keysym, mods: KeyModifiers) -> EngineResult {
    engine.process_key(&KeyEvent::new(keysym, mods, true));
    engine.process_key(&KeyEvent::new(keysym, KeyModifiers::default(), false))
}

/// Press and release where the modifier is still held on release
/// (Ctrl+period style combos).
fn tap_held(engine: &mut TableEngine, keysym: Keysym, mods: KeyModifiers) -> EngineResult {
    engine.process_key(&KeyEvent::new(keysym, mods, true));
    engine.process_key(&KeyEvent::new(keysym, mods, false))
}

fn type_str(engine: &mut TableEngine, text: &str) {
    for ch in text.chars() {
        engine.process_key(&press(ch));
    }
}

fn test_metadata() -> TableMetadata {
    TableMetadata {
        name: "test".to_string(),
        max_key_length: 4,
        single_wildcard_char: Some('?'),
        multi_wildcard_char: Some('*'),
        auto_wildcard: false,
        supports_pinyin: true,
        ..TableMetadata::default()
    }
}

fn test_table() -> MemoryTable {
    let mut table = MemoryTable::new(test_metadata());
    table.push("n", "女", 10);
    table.push("ni", "你", 100);
    table.push("ni", "尼", 50);
    table.push("nh", "你好", 70);
    table.push("h", "火", 10);
    table.push("hk", "好", 80);
    table.push("s", "三", 10);
    table.push("sh", "ш", 10);
    table.push_pinyin("ni", "你", 100);
    table.push_pinyin("ni", "尼", 40);
    table
}

fn engine() -> TableEngine {
    engine_with(Settings::default())
}

fn engine_with(settings: Settings) -> TableEngine {
    TableEngine::new(Box::new(test_table()), settings)
}

/// The preedit text from the last rendered UpdatePreedit action.
fn preedit_text(result: &EngineResult) -> Option<String> {
    result.actions.iter().rev().find_map(|a| match a {
        EngineAction::UpdatePreedit(preedit) => Some(preedit.text().to_string()),
        _ => None,
    })
}

fn has_write(result: &EngineResult, key: SettingKey) -> bool {
    result
        .actions
        .iter()
        .any(|a| matches!(a, EngineAction::WriteConfig(k, _) if *k == key))
}
