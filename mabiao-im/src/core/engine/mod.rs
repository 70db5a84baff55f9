//! Table engine - the key-event dispatcher and mode manager
//!
//! [`TableEngine`] classifies raw key events (mode hotkeys, navigation,
//! selection, input characters, passthrough), delegates composition state to
//! the [`Editor`], and re-renders the host-visible preedit, auxiliary text
//! and lookup table after every state change.

mod commit;
mod direct;
mod display;
mod hotkeys;
mod table_mode;
mod types;

pub use types::*;

#[cfg(test)]
mod tests;

use std::time::Duration;

use mabiao_engine::{ChineseMode, Editor, Orientation, TableQuery, UsageRecorder};
use tracing::{debug, warn};

use super::keycode::{KeyEvent, KeyModifiers, Keysym};
use super::preedit::{AttributeType, Preedit, PreeditSegment};
use crate::config::settings::Settings;

/// The table input engine for one session.
pub struct TableEngine {
    editor: Editor,
    settings: Settings,
    input_mode: InputMode,
    /// The last pressed key. Release-matched hotkeys fire only when the
    /// release immediately follows its own press.
    prev_pressed: Option<(Keysym, KeyModifiers)>,
    page_up_keys: Vec<Keysym>,
    page_down_keys: Vec<Keysym>,
    usage: UsageRecorder,
    /// Corrections queued at construction, before any result can carry them
    pending_config: Vec<(SettingKey, SettingValue)>,
}

impl TableEngine {
    pub fn new(db: Box<dyn TableQuery>, mut settings: Settings) -> Self {
        let meta = db.metadata().clone();

        // Table-declared policy defaults
        if meta.auto_select {
            settings.mode.auto_select = true;
        }
        if meta.auto_commit {
            settings.mode.auto_commit = true;
        }
        if !meta.supports_pinyin {
            settings.mode.pinyin = false;
        }

        // A page cannot offer more candidates than there are select keys.
        let mut pending_config = Vec::new();
        let clamped = settings.lookup.page_size.clamp(1, meta.select_keys.len().max(1));
        if clamped != settings.lookup.page_size {
            debug!(
                requested = settings.lookup.page_size,
                clamped, "clamping lookup page size to the select keys"
            );
            settings.lookup.page_size = clamped;
            pending_config.push((SettingKey::PageSize, SettingValue::Int(clamped as i64)));
        }

        let input_mode = if settings.mode.table_input {
            InputMode::Table
        } else {
            InputMode::Direct
        };

        let mut editor = Editor::new(db, settings.lookup.page_size, settings.lookup.orientation);
        editor.set_py_mode(settings.mode.pinyin);
        editor.set_onechar(settings.mode.onechar && meta.supports_onechar);
        editor.set_chinese_mode(settings.mode.chinese_mode);
        editor.set_auto_wildcard(settings.mode.auto_wildcard);
        editor.set_full_width_letter(settings.width.full_width_letter[input_mode.index()]);

        // `-`/`=` page the lookup table unless the table needs them as
        // literal input.
        let mut page_up_keys = vec![Keysym::PAGE_UP];
        let mut page_down_keys = vec![Keysym::PAGE_DOWN];
        if !editor.is_valid_input_char('-') {
            page_up_keys.push(Keysym::MINUS);
        }
        if !editor.is_valid_input_char('=') {
            page_down_keys.push(Keysym::EQUAL);
        }

        let usage = UsageRecorder::with_limits(
            settings.usage.max_pending,
            Duration::from_millis(settings.usage.max_age_ms),
        );

        Self {
            editor,
            settings,
            input_mode,
            prev_pressed: None,
            page_up_keys,
            page_down_keys,
            usage,
            pending_config,
        }
    }

    /// Process a key event. `false` in the result's `consumed` means the
    /// host should deliver the key to the application untouched.
    pub fn process_key(&mut self, key: &KeyEvent) -> EngineResult {
        let mut result = match self.handle_hotkey(key) {
            Some(result) => result,
            None => match self.input_mode {
                InputMode::Direct => self.process_direct(key),
                InputMode::Table => self.process_table(key),
            },
        };
        for (key, value) in self.pending_config.drain(..) {
            result.actions.push(EngineAction::WriteConfig(key, value));
        }
        self.prev_pressed = if key.is_press {
            Some((key.keysym, key.modifiers))
        } else {
            None
        };
        result
    }

    /// Full reset on focus loss or deactivation. Flushes pending usage
    /// signal durably.
    pub fn reset(&mut self) -> EngineResult {
        self.editor.clear_all_input_and_preedit();
        self.usage.flush(self.editor.database_mut());
        EngineResult::consumed()
            .with_action(EngineAction::UpdatePreedit(Preedit::new()))
            .with_action(EngineAction::HideLookupTable)
            .with_action(EngineAction::HideAuxText)
    }

    /// Periodic host tick; syncs batched usage signal when a threshold has
    /// tripped. Returns whether a sync happened.
    pub fn tick(&mut self) -> bool {
        self.usage.maybe_flush(self.editor.database_mut())
    }

    /// Configuration corrections queued before the first key event.
    pub fn take_pending_config_writes(&mut self) -> Vec<(SettingKey, SettingValue)> {
        std::mem::take(&mut self.pending_config)
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(super) fn is_composing(&self) -> bool {
        !self.editor.is_empty() || self.editor.has_precommit()
    }

    fn set_input_mode(&mut self, mode: InputMode) {
        if self.input_mode == mode {
            return;
        }
        // Width preferences are mode-indexed; switching modes re-derives
        // the editor's letter-width state.
        self.editor.clear_all_input_and_preedit();
        self.input_mode = mode;
        self.settings.mode.table_input = mode == InputMode::Table;
        self.editor
            .set_full_width_letter(self.settings.width.full_width_letter[mode.index()]);
    }

    /// React to an external change of one configuration key (e.g. a
    /// preferences tool writing the store).
    pub fn config_value_changed(&mut self, key: SettingKey, value: SettingValue) -> EngineResult {
        let mut result = EngineResult::consumed();
        match (key, &value) {
            (SettingKey::TableInput, SettingValue::Bool(v)) => {
                self.set_input_mode(if *v { InputMode::Table } else { InputMode::Direct });
            }
            (SettingKey::Pinyin, SettingValue::Bool(v)) => {
                let v = *v && self.editor.metadata().supports_pinyin;
                self.settings.mode.pinyin = v;
                self.editor.set_py_mode(v);
            }
            (SettingKey::ChineseMode, SettingValue::Text(text)) => match parse_chinese_mode(text) {
                Some(mode) => {
                    self.settings.mode.chinese_mode = mode;
                    self.editor.set_chinese_mode(mode);
                }
                None => {
                    warn!(value = %text, "unknown chinese_mode value");
                    return EngineResult::not_consumed();
                }
            },
            (SettingKey::OneChar, SettingValue::Bool(v)) => {
                let v = *v && self.editor.metadata().supports_onechar;
                self.settings.mode.onechar = v;
                self.editor.set_onechar(v);
            }
            (SettingKey::AutoSelect, SettingValue::Bool(v)) => {
                self.settings.mode.auto_select = *v;
            }
            (SettingKey::AutoCommit, SettingValue::Bool(v)) => {
                self.settings.mode.auto_commit = *v;
            }
            (SettingKey::AutoWildcard, SettingValue::Bool(v)) => {
                self.settings.mode.auto_wildcard = *v;
                self.editor.set_auto_wildcard(*v);
            }
            (SettingKey::FullWidthLetter, SettingValue::BoolPair(pair)) => {
                self.settings.width.full_width_letter = *pair;
                self.editor
                    .set_full_width_letter(pair[self.input_mode.index()]);
            }
            (SettingKey::FullWidthPunct, SettingValue::BoolPair(pair)) => {
                self.settings.width.full_width_punct = *pair;
            }
            (SettingKey::PageSize, SettingValue::Int(requested)) => {
                let requested = *requested;
                let select_keys = self.editor.select_keys().len().max(1);
                let clamped = requested.clamp(1, select_keys as i64) as usize;
                if clamped as i64 != requested {
                    debug!(requested, clamped, "clamping lookup page size");
                    result.actions.push(EngineAction::WriteConfig(
                        SettingKey::PageSize,
                        SettingValue::Int(clamped as i64),
                    ));
                }
                self.settings.lookup.page_size = clamped;
                self.editor.set_page_size(clamped);
            }
            (SettingKey::LookupOrientation, SettingValue::Text(text)) => {
                let orientation = match text.as_str() {
                    "horizontal" => Orientation::Horizontal,
                    "vertical" => Orientation::Vertical,
                    _ => {
                        warn!(value = %text, "unknown orientation value");
                        return EngineResult::not_consumed();
                    }
                };
                self.settings.lookup.orientation = orientation;
                self.editor.set_orientation(orientation);
            }
            (SettingKey::AlwaysShowLookup, SettingValue::Bool(v)) => {
                self.settings.lookup.always_show = *v;
            }
            (key, value) => {
                warn!(key = key.as_str(), ?value, "configuration value has the wrong type");
                return EngineResult::not_consumed();
            }
        }
        self.render_into(&mut result);
        result
    }
}

fn parse_chinese_mode(text: &str) -> Option<ChineseMode> {
    match text {
        "simplified-only" => Some(ChineseMode::SimplifiedOnly),
        "traditional-only" => Some(ChineseMode::TraditionalOnly),
        "simplified-first" => Some(ChineseMode::SimplifiedFirst),
        "traditional-first" => Some(ChineseMode::TraditionalFirst),
        "all" => Some(ChineseMode::All),
        _ => None,
    }
}
