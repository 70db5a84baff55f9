//! The candidate-database contract.
//!
//! The editor core never touches table storage directly; it talks to a
//! [`TableQuery`] implementation that owns the key-to-phrase data and the
//! user's reinforcement records.

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;

/// Chinese-variant filter applied to lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChineseMode {
    /// Simplified characters only
    SimplifiedOnly,
    /// Traditional characters only
    TraditionalOnly,
    /// Both, simplified ranked first
    #[default]
    SimplifiedFirst,
    /// Both, traditional ranked first
    TraditionalFirst,
    /// No filtering or re-ranking
    All,
}

impl ChineseMode {
    /// Cycle through the five modes in hotkey order.
    pub fn next(self) -> Self {
        match self {
            Self::SimplifiedOnly => Self::TraditionalOnly,
            Self::TraditionalOnly => Self::SimplifiedFirst,
            Self::SimplifiedFirst => Self::TraditionalFirst,
            Self::TraditionalFirst => Self::All,
            Self::All => Self::SimplifiedOnly,
        }
    }

    /// Short label shown in auxiliary text.
    pub fn label(self) -> &'static str {
        match self {
            Self::SimplifiedOnly => "简",
            Self::TraditionalOnly => "繁",
            Self::SimplifiedFirst => "简/繁",
            Self::TraditionalFirst => "繁/简",
            Self::All => "全",
        }
    }
}

/// Static metadata a table declares about itself.
#[derive(Debug, Clone)]
pub struct TableMetadata {
    /// Table display name
    pub name: String,
    /// Characters accepted as input in ordinary table mode
    pub valid_input_chars: String,
    /// Characters accepted as input in pinyin sub-mode
    pub pinyin_valid_input_chars: String,
    /// Characters that may start a composition; empty means any valid char
    pub start_chars: String,
    /// Wildcard matching exactly one input position, if configured
    pub single_wildcard_char: Option<char>,
    /// Wildcard matching any number of input positions, if configured
    pub multi_wildcard_char: Option<char>,
    /// Longest key sequence in ordinary mode
    pub max_key_length: usize,
    /// Whether the table ships pinyin readings for its characters
    pub supports_pinyin: bool,
    /// Whether single-character-only filtering is meaningful for this table
    pub supports_onechar: bool,
    /// Whether the Chinese-variant filter is meaningful for this table
    pub supports_chinese_mode: bool,
    /// Default policy: implicitly pick the best candidate at a boundary
    pub auto_select: bool,
    /// Default policy: boundary-finalized segments go straight to the host
    pub auto_commit: bool,
    /// Default policy: relax exact lookups with an implicit trailing wildcard
    pub auto_wildcard: bool,
    /// Candidate selection keys, in page order
    pub select_keys: Vec<char>,
}

impl Default for TableMetadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            valid_input_chars: "abcdefghijklmnopqrstuvwxyz".to_string(),
            pinyin_valid_input_chars: "abcdefghijklmnopqrstuvwxyz!@#$%".to_string(),
            start_chars: String::new(),
            single_wildcard_char: None,
            multi_wildcard_char: None,
            max_key_length: 4,
            supports_pinyin: false,
            supports_onechar: true,
            supports_chinese_mode: true,
            auto_select: false,
            auto_commit: false,
            auto_wildcard: true,
            select_keys: "1234567890".chars().collect(),
        }
    }
}

impl TableMetadata {
    /// Whether `ch` may begin a new composition segment.
    pub fn is_start_char(&self, ch: char) -> bool {
        if self.start_chars.is_empty() {
            self.valid_input_chars.contains(ch)
        } else {
            self.start_chars.contains(ch)
        }
    }
}

/// Filter parameters for a phrase lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordQueryOptions {
    /// Restrict matches to single-character phrases
    pub onechar: bool,
    /// Chinese-variant filter
    pub chinese_mode: ChineseMode,
    /// Wildcard matching one position, as currently configured
    pub single_wildcard: Option<char>,
    /// Wildcard matching any number of positions, as currently configured
    pub multi_wildcard: Option<char>,
    /// Append an implicit trailing multi-wildcard to exact lookups
    pub auto_wildcard: bool,
}

/// Capabilities the editor requires from the candidate database.
///
/// Lookups return candidates already ranked; the editor does not re-sort
/// them. Reinforcement methods mutate only user-specific records, never the
/// system ranking.
pub trait TableQuery {
    /// Static table metadata.
    fn metadata(&self) -> &TableMetadata;

    /// Phrases matching `tabkeys` under the given filters.
    fn select_words(&self, tabkeys: &str, options: &WordQueryOptions) -> Vec<Candidate>;

    /// Single characters whose pinyin reading matches `tabkeys`.
    fn select_chinese_characters_by_pinyin(
        &self,
        tabkeys: &str,
        options: &WordQueryOptions,
    ) -> Vec<Candidate>;

    /// Key sequences that produce `character`, best first. Used for
    /// "how would I type this" hints.
    fn find_zi_code(&self, character: char) -> Vec<String>;

    /// Record one user selection of `(tabkeys, phrase)`.
    fn check_phrase(&mut self, tabkeys: &str, phrase: &str);

    /// Forget the user reinforcement for `(tabkeys, phrase)`. The system
    /// ranking is untouched. `commit` requests an immediate durable write.
    fn remove_phrase(&mut self, tabkeys: &str, phrase: &str, commit: bool);

    /// Flush accumulated user records durably.
    fn sync(&mut self);
}
