//! Type definitions for the table engine

use mabiao_engine::{Candidate, Orientation};

use super::super::preedit::Preedit;

/// Action to be performed by the framework/UI layer
#[derive(Debug, Clone)]
pub enum EngineAction {
    /// Update the preedit display (an empty preedit hides it)
    UpdatePreedit(Preedit),
    /// Show the lookup table
    ShowLookupTable(LookupView),
    /// Hide the lookup table
    HideLookupTable,
    /// Commit text to the application
    Commit(String),
    /// Update auxiliary text (typed keys, mode feedback)
    UpdateAuxText(String),
    /// Hide auxiliary text
    HideAuxText,
    /// Persist a corrected or toggled setting to the configuration store
    WriteConfig(SettingKey, SettingValue),
}

/// Result of processing a key event
#[derive(Debug, Clone, Default)]
pub struct EngineResult {
    /// Whether the key was consumed by the input method
    pub consumed: bool,
    /// Actions to perform
    pub actions: Vec<EngineAction>,
}

impl EngineResult {
    pub fn consumed() -> Self {
        Self {
            consumed: true,
            actions: Vec::new(),
        }
    }

    pub fn not_consumed() -> Self {
        Self {
            consumed: false,
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: EngineAction) -> Self {
        self.actions.push(action);
        self
    }

    /// The committed texts in this result, in order.
    pub fn commits(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                EngineAction::Commit(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// One page of the lookup table as shown by the host panel.
#[derive(Debug, Clone)]
pub struct LookupView {
    /// Select-key label and candidate for each populated slot
    pub entries: Vec<(char, Candidate)>,
    /// Cursor position within the page
    pub cursor: usize,
    /// Page number (0-indexed)
    pub page: usize,
    pub orientation: Orientation,
}

/// Input mode for the engine. Doubles as the index into the mode-indexed
/// width preference arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Direct passthrough (with optional width conversion)
    Direct = 0,
    /// Table composition
    Table = 1,
}

impl InputMode {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Enumerated configuration keys. External change notifications and
/// engine-initiated write-backs both use this set; there is no string-keyed
/// attribute dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    TableInput,
    Pinyin,
    ChineseMode,
    OneChar,
    AutoSelect,
    AutoCommit,
    AutoWildcard,
    FullWidthLetter,
    FullWidthPunct,
    PageSize,
    LookupOrientation,
    AlwaysShowLookup,
}

impl SettingKey {
    /// The flat configuration-store key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TableInput => "mode.table_input",
            Self::Pinyin => "mode.pinyin",
            Self::ChineseMode => "mode.chinese_mode",
            Self::OneChar => "mode.onechar",
            Self::AutoSelect => "mode.auto_select",
            Self::AutoCommit => "mode.auto_commit",
            Self::AutoWildcard => "mode.auto_wildcard",
            Self::FullWidthLetter => "width.full_width_letter",
            Self::FullWidthPunct => "width.full_width_punct",
            Self::PageSize => "lookup.page_size",
            Self::LookupOrientation => "lookup.orientation",
            Self::AlwaysShowLookup => "lookup.always_show",
        }
    }
}

/// Configuration values crossing the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
    /// Mode-indexed pair: [direct, table]
    BoolPair([bool; 2]),
}
