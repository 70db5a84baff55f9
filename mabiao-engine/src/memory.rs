//! In-memory candidate database loaded from a plain-text table file.
//!
//! This is the reference [`TableQuery`] implementation used by the CLI and
//! the integration tests. The file format mirrors a table source file, not
//! a storage engine:
//!
//! ```text
//! name = demo
//! valid_input_chars = abcdefghijklmnopqrstuvwxyz
//! max_key_length = 4
//! single_wildcard_char = ?
//! multi_wildcard_char = *
//!
//! BEGIN_TABLE
//! ni	你	100	s
//! END_TABLE
//! BEGIN_PINYIN
//! ni	你	100
//! END_PINYIN
//! ```
//!
//! Entry lines are `tabkeys<TAB>phrase<TAB>freq` with an optional variant
//! column (`s` simplified, `t` traditional, `b` both; default both).

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::candidate::Candidate;
use crate::table::{ChineseMode, TableMetadata, TableQuery, WordQueryOptions};

/// Errors raised while loading a table file.
#[derive(Debug, thiserror::Error)]
pub enum TableLoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid table format: {0}")]
    Format(String),
}

type Result<T> = std::result::Result<T, TableLoadError>;

/// Chinese-variant tag carried by each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Simplified,
    Traditional,
    Both,
}

#[derive(Debug, Clone)]
struct TableEntry {
    keys: String,
    phrase: String,
    freq: i64,
    variant: Variant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Table,
    Pinyin,
}

/// An in-memory table with user-frequency reinforcement.
pub struct MemoryTable {
    metadata: TableMetadata,
    entries: Vec<TableEntry>,
    pinyin_entries: Vec<TableEntry>,
    user_freq: HashMap<(String, String), i64>,
    dirty: bool,
}

impl MemoryTable {
    /// Build an empty table with the given metadata. Used by tests and by
    /// callers that add entries programmatically.
    pub fn new(metadata: TableMetadata) -> Self {
        Self {
            metadata,
            entries: Vec::new(),
            pinyin_entries: Vec::new(),
            user_freq: HashMap::new(),
            dirty: false,
        }
    }

    /// Add a table entry (`variant` defaults to both).
    pub fn push(&mut self, keys: &str, phrase: &str, freq: i64) {
        self.entries.push(TableEntry {
            keys: keys.to_string(),
            phrase: phrase.to_string(),
            freq,
            variant: Variant::Both,
        });
    }

    /// Add a pinyin reading entry.
    pub fn push_pinyin(&mut self, pinyin: &str, character: &str, freq: i64) {
        self.pinyin_entries.push(TableEntry {
            keys: pinyin.to_string(),
            phrase: character.to_string(),
            freq,
            variant: Variant::Both,
        });
    }

    /// Load a table from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a table from its text form.
    pub fn parse(content: &str) -> Result<Self> {
        let mut metadata = TableMetadata::default();
        let mut entries = Vec::new();
        let mut pinyin_entries = Vec::new();
        let mut section = Section::Header;

        for (lineno, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line {
                "BEGIN_TABLE" => {
                    section = Section::Table;
                    continue;
                }
                "END_TABLE" | "END_PINYIN" => {
                    section = Section::Header;
                    continue;
                }
                "BEGIN_PINYIN" => {
                    section = Section::Pinyin;
                    continue;
                }
                _ => {}
            }
            match section {
                Section::Header => parse_directive(&mut metadata, line, lineno + 1)?,
                Section::Table => entries.push(parse_entry(line, lineno + 1)?),
                Section::Pinyin => pinyin_entries.push(parse_entry(line, lineno + 1)?),
            }
        }

        if entries.is_empty() {
            return Err(TableLoadError::Format("table has no entries".to_string()));
        }
        metadata.supports_pinyin = !pinyin_entries.is_empty();

        Ok(Self {
            metadata,
            entries,
            pinyin_entries,
            user_freq: HashMap::new(),
            dirty: false,
        })
    }

    fn user_freq_of(&self, keys: &str, phrase: &str) -> i64 {
        self.user_freq
            .get(&(keys.to_string(), phrase.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Match, filter, and rank entries for a lookup.
    fn select_from(
        &self,
        entries: &[TableEntry],
        tabkeys: &str,
        options: &WordQueryOptions,
        onechar: bool,
    ) -> Vec<Candidate> {
        let pattern: Vec<char> = tabkeys.chars().collect();
        let has_wildcard = pattern
            .iter()
            .any(|&c| options.single_wildcard == Some(c) || options.multi_wildcard == Some(c));
        // Auto-wildcard relaxes an exact lookup into a prefix lookup.
        let prefix_ok = options.auto_wildcard && !has_wildcard;

        let mut matched: Vec<&TableEntry> = entries
            .iter()
            .filter(|e| {
                let keys: Vec<char> = e.keys.chars().collect();
                let exact = glob_match(
                    &pattern,
                    &keys,
                    options.single_wildcard,
                    options.multi_wildcard,
                );
                exact || (prefix_ok && e.keys.starts_with(tabkeys) && e.keys != tabkeys)
            })
            .filter(|e| !onechar || e.phrase.chars().count() == 1)
            .filter(|e| match options.chinese_mode {
                ChineseMode::SimplifiedOnly => e.variant != Variant::Traditional,
                ChineseMode::TraditionalOnly => e.variant != Variant::Simplified,
                _ => true,
            })
            .collect();

        matched.sort_by(|a, b| {
            let variant_rank = |e: &TableEntry| match options.chinese_mode {
                ChineseMode::SimplifiedFirst => (e.variant == Variant::Traditional) as u8,
                ChineseMode::TraditionalFirst => (e.variant == Variant::Simplified) as u8,
                _ => 0,
            };
            let ua = self.user_freq_of(&a.keys, &a.phrase);
            let ub = self.user_freq_of(&b.keys, &b.phrase);
            variant_rank(a)
                .cmp(&variant_rank(b))
                .then(ub.cmp(&ua))
                .then(b.freq.cmp(&a.freq))
        });

        matched
            .into_iter()
            .map(|e| {
                Candidate::new(e.keys.clone(), e.phrase.clone(), e.freq)
                    .with_user_freq(self.user_freq_of(&e.keys, &e.phrase))
            })
            .collect()
    }
}

impl TableQuery for MemoryTable {
    fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    fn select_words(&self, tabkeys: &str, options: &WordQueryOptions) -> Vec<Candidate> {
        self.select_from(&self.entries, tabkeys, options, options.onechar)
    }

    fn select_chinese_characters_by_pinyin(
        &self,
        tabkeys: &str,
        options: &WordQueryOptions,
    ) -> Vec<Candidate> {
        self.select_from(&self.pinyin_entries, tabkeys, options, false)
    }

    fn find_zi_code(&self, character: char) -> Vec<String> {
        let mut hits: Vec<&TableEntry> = self
            .entries
            .iter()
            .filter(|e| e.phrase.chars().count() == 1 && e.phrase.starts_with(character))
            .collect();
        hits.sort_by(|a, b| b.freq.cmp(&a.freq));
        let mut codes: Vec<String> = Vec::new();
        for entry in hits {
            if !codes.contains(&entry.keys) {
                codes.push(entry.keys.clone());
            }
        }
        codes
    }

    fn check_phrase(&mut self, tabkeys: &str, phrase: &str) {
        *self
            .user_freq
            .entry((tabkeys.to_string(), phrase.to_string()))
            .or_insert(0) += 1;
        self.dirty = true;
    }

    fn remove_phrase(&mut self, tabkeys: &str, phrase: &str, commit: bool) {
        self.user_freq
            .remove(&(tabkeys.to_string(), phrase.to_string()));
        self.dirty = true;
        if commit {
            self.sync();
        }
    }

    fn sync(&mut self) {
        if self.dirty {
            debug!(table = %self.metadata.name, "user records flushed");
            self.dirty = false;
        }
    }
}

/// Glob-style match: the single wildcard consumes exactly one character,
/// the multi wildcard zero or more.
fn glob_match(pattern: &[char], text: &[char], single: Option<char>, multi: Option<char>) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((&p, rest)) if multi == Some(p) => {
            glob_match(rest, text, single, multi)
                || (!text.is_empty() && glob_match(pattern, &text[1..], single, multi))
        }
        Some((&p, rest)) => match text.split_first() {
            Some((&t, text_rest)) if single == Some(p) || p == t => {
                glob_match(rest, text_rest, single, multi)
            }
            _ => false,
        },
    }
}

fn parse_directive(metadata: &mut TableMetadata, line: &str, lineno: usize) -> Result<()> {
    let (key, value) = line.split_once('=').ok_or_else(|| {
        TableLoadError::Format(format!("line {lineno}: expected `key = value`, got {line:?}"))
    })?;
    let key = key.trim().to_ascii_lowercase();
    let value = value.trim();
    let parse_bool = |v: &str| match v.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(TableLoadError::Format(format!(
            "line {lineno}: expected a boolean, got {v:?}"
        ))),
    };
    match key.as_str() {
        "name" => metadata.name = value.to_string(),
        "valid_input_chars" => metadata.valid_input_chars = value.to_string(),
        "pinyin_valid_input_chars" => metadata.pinyin_valid_input_chars = value.to_string(),
        "start_chars" => metadata.start_chars = value.to_string(),
        "single_wildcard_char" => metadata.single_wildcard_char = value.chars().next(),
        "multi_wildcard_char" => metadata.multi_wildcard_char = value.chars().next(),
        "max_key_length" => {
            metadata.max_key_length = value.parse().map_err(|_| {
                TableLoadError::Format(format!("line {lineno}: bad max_key_length {value:?}"))
            })?
        }
        "onechar" => metadata.supports_onechar = parse_bool(value)?,
        "chinese_mode" => metadata.supports_chinese_mode = parse_bool(value)?,
        "auto_select" => metadata.auto_select = parse_bool(value)?,
        "auto_commit" => metadata.auto_commit = parse_bool(value)?,
        "auto_wildcard" => metadata.auto_wildcard = parse_bool(value)?,
        "select_keys" => metadata.select_keys = value.chars().filter(|c| *c != ',').collect(),
        _ => {
            return Err(TableLoadError::Format(format!(
                "line {lineno}: unknown directive {key:?}"
            )));
        }
    }
    Ok(())
}

fn parse_entry(line: &str, lineno: usize) -> Result<TableEntry> {
    let mut parts = line.split('\t');
    let keys = parts.next().unwrap_or_default();
    let phrase = parts.next().ok_or_else(|| {
        TableLoadError::Format(format!("line {lineno}: expected keys<TAB>phrase"))
    })?;
    let freq = match parts.next() {
        Some(raw) => raw.parse().map_err(|_| {
            TableLoadError::Format(format!("line {lineno}: bad frequency {raw:?}"))
        })?,
        None => 0,
    };
    let variant = match parts.next() {
        Some("s") => Variant::Simplified,
        Some("t") => Variant::Traditional,
        Some("b") | None => Variant::Both,
        Some(other) => {
            return Err(TableLoadError::Format(format!(
                "line {lineno}: unknown variant tag {other:?}"
            )));
        }
    };
    if keys.is_empty() || phrase.is_empty() {
        return Err(TableLoadError::Format(format!(
            "line {lineno}: empty keys or phrase"
        )));
    }
    Ok(TableEntry {
        keys: keys.to_string(),
        phrase: phrase.to_string(),
        freq,
        variant,
    })
}
