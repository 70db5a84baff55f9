//! Composition state for table input.
//!
//! The [`Editor`] owns the live key segment (`chars_valid` / `chars_invalid`),
//! the candidate list matched against it, and the queue of phrases that have
//! been finalized into the preedit but not yet delivered to the host
//! application. The engine layer drives it one key at a time; every mutation
//! ends in [`Editor::update_candidates`] so presentation state never goes
//! stale.

use tracing::debug;

use crate::candidate::{Candidate, LookupTable, Orientation};
use crate::fullwidth::to_fullwidth;
use crate::table::{ChineseMode, TableMetadata, TableQuery, WordQueryOptions};

/// Longest pinyin syllable the editor will match before forcing a segment
/// boundary.
pub const PINYIN_MAX_KEY_LENGTH: usize = 7;

/// Tone markers terminating a pinyin syllable (tones 1-5).
pub const PINYIN_TONE_MARKS: [char; 5] = ['!', '@', '#', '$', '%'];

/// The three-way preedit split used by the display layer: phrases left of
/// the precommit cursor, the in-progress segment, phrases right of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreeditParts {
    pub left: Vec<String>,
    pub current: String,
    pub right: Vec<String>,
}

impl PreeditParts {
    pub fn concat(&self) -> String {
        let mut out = String::new();
        out.extend(self.left.iter().map(String::as_str));
        out.push_str(&self.current);
        out.extend(self.right.iter().map(String::as_str));
        out
    }
}

/// Composition state holder for one input session.
pub struct Editor {
    db: Box<dyn TableQuery>,

    /// Accepted input characters of the live segment
    chars_valid: Vec<char>,
    /// Out-of-alphabet suffix of the live segment. Non-empty blocks lookups
    /// until stripped or flushed.
    chars_invalid: Vec<char>,
    /// The (valid, invalid) pair at the last lookup; `None` forces a query.
    chars_prev: Option<(Vec<char>, Vec<char>)>,

    /// Current match list for `chars_valid`, ranked by the database
    candidates: Vec<Candidate>,
    /// Match list from the previous lookup, kept one step for the
    /// auto-select backtrack
    candidates_prev: Vec<Candidate>,

    /// Key sequences of phrases committed to preedit, paired with
    /// `committed_phrases`
    committed_keys: Vec<String>,
    /// Phrases committed to preedit but not yet delivered to the host
    committed_phrases: Vec<String>,
    /// Edit position among the precommitted phrases,
    /// `0..=committed_phrases.len()`
    cursor_precommit: usize,

    lookup_table: LookupTable,
    select_keys: Vec<char>,

    // Active lookup filters. The engine layer keeps these in sync with its
    // mode state; every setter invalidates the lookup memo.
    py_mode: bool,
    onechar: bool,
    chinese_mode: ChineseMode,
    auto_wildcard: bool,
    single_wildcard: Option<char>,
    multi_wildcard: Option<char>,
    full_width_letter: bool,
}

impl Editor {
    pub fn new(db: Box<dyn TableQuery>, page_size: usize, orientation: Orientation) -> Self {
        let meta = db.metadata();
        let select_keys = meta.select_keys.clone();
        let auto_wildcard = meta.auto_wildcard;
        let single_wildcard = meta.single_wildcard_char;
        let multi_wildcard = meta.multi_wildcard_char;
        Self {
            db,
            chars_valid: Vec::new(),
            chars_invalid: Vec::new(),
            chars_prev: None,
            candidates: Vec::new(),
            candidates_prev: Vec::new(),
            committed_keys: Vec::new(),
            committed_phrases: Vec::new(),
            cursor_precommit: 0,
            lookup_table: LookupTable::new(page_size, orientation),
            select_keys,
            py_mode: false,
            onechar: false,
            chinese_mode: ChineseMode::default(),
            auto_wildcard,
            single_wildcard,
            multi_wildcard,
            full_width_letter: false,
        }
    }

    pub fn metadata(&self) -> &TableMetadata {
        self.db.metadata()
    }

    pub fn database(&self) -> &dyn TableQuery {
        self.db.as_ref()
    }

    pub fn database_mut(&mut self) -> &mut dyn TableQuery {
        self.db.as_mut()
    }

    // --- live segment ---------------------------------------------------

    /// True iff the live segment is empty. Says nothing about precommitted
    /// phrases.
    pub fn is_empty(&self) -> bool {
        self.chars_valid.is_empty() && self.chars_invalid.is_empty()
    }

    pub fn has_precommit(&self) -> bool {
        !self.committed_phrases.is_empty()
    }

    pub fn chars_valid(&self) -> String {
        self.chars_valid.iter().collect()
    }

    pub fn chars_invalid(&self) -> String {
        self.chars_invalid.iter().collect()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidates_prev(&self) -> &[Candidate] {
        &self.candidates_prev
    }

    pub fn committed_keys(&self) -> &[String] {
        &self.committed_keys
    }

    pub fn committed_phrases(&self) -> &[String] {
        &self.committed_phrases
    }

    pub fn cursor_precommit(&self) -> usize {
        self.cursor_precommit
    }

    pub fn precommit_cursor_at_end(&self) -> bool {
        self.cursor_precommit == self.committed_phrases.len()
    }

    pub fn lookup_table(&self) -> &LookupTable {
        &self.lookup_table
    }

    pub fn is_wildcard(&self, ch: char) -> bool {
        self.single_wildcard == Some(ch) || self.multi_wildcard == Some(ch)
    }

    /// Whether `ch` belongs to the active input alphabet (table or pinyin
    /// characters, plus the configured wildcards).
    pub fn is_valid_input_char(&self, ch: char) -> bool {
        if self.is_wildcard(ch) {
            return true;
        }
        let meta = self.db.metadata();
        if self.py_mode {
            meta.pinyin_valid_input_chars.contains(ch)
        } else {
            meta.valid_input_chars.contains(ch)
        }
    }

    /// The live segment has reached the mode-dependent key-length boundary:
    /// table `max_key_length` in ordinary mode; in pinyin mode a fixed
    /// length of 7, or a tone marker past the first position (tone markers
    /// terminate a syllable).
    fn at_max_key_length(&self) -> bool {
        if self.py_mode {
            self.chars_valid.len() >= PINYIN_MAX_KEY_LENGTH
                || (self.chars_valid.len() > 1
                    && self
                        .chars_valid
                        .last()
                        .is_some_and(|c| PINYIN_TONE_MARKS.contains(c)))
        } else {
            self.chars_valid.len() >= self.db.metadata().max_key_length
        }
    }

    /// Feed one character into the live segment. At the key-length boundary
    /// the current best match is first finalized into the preedit. Returns
    /// whether any candidates match afterwards.
    pub fn add_input(&mut self, ch: char) -> bool {
        if self.chars_invalid.is_empty() && self.is_valid_input_char(ch) && self.at_max_key_length()
        {
            self.commit_to_preedit();
        }
        if !self.chars_invalid.is_empty() || !self.is_valid_input_char(ch) {
            self.chars_invalid.push(ch);
        } else {
            self.chars_valid.push(ch);
        }
        self.update_candidates()
    }

    /// Remove and return the last character of the live segment (invalid
    /// suffix first). When the segment empties and a precommitted phrase
    /// sits left of the cursor, that phrase is un-finalized back into
    /// `chars_valid` so backspace transparently enters it.
    pub fn pop_input(&mut self) -> Option<char> {
        let popped = self.chars_invalid.pop().or_else(|| self.chars_valid.pop());
        if self.chars_valid.is_empty() && self.chars_invalid.is_empty() && self.cursor_precommit > 0
        {
            self.cursor_precommit -= 1;
            let keys = self.committed_keys.remove(self.cursor_precommit);
            self.committed_phrases.remove(self.cursor_precommit);
            self.chars_valid = keys.chars().collect();
        }
        self.update_candidates();
        popped
    }

    // --- candidate lookup -----------------------------------------------

    fn query_options(&self) -> WordQueryOptions {
        WordQueryOptions {
            onechar: self.onechar,
            chinese_mode: self.chinese_mode,
            single_wildcard: self.single_wildcard,
            multi_wildcard: self.multi_wildcard,
            auto_wildcard: self.auto_wildcard,
        }
    }

    /// Force the next [`Self::update_candidates`] to query even if the
    /// input pair is unchanged (used when a lookup filter changes).
    fn invalidate(&mut self) {
        self.chars_prev = None;
    }

    /// Refresh `candidates` from the database. Memoized on the
    /// (valid, invalid) pair: the database query is assumed non-trivial, so
    /// an unchanged pair never re-queries. Returns whether any candidates
    /// match.
    pub fn update_candidates(&mut self) -> bool {
        let current = (self.chars_valid.clone(), self.chars_invalid.clone());
        if self.chars_prev.as_ref() == Some(&current) {
            return !self.candidates.is_empty();
        }
        self.chars_prev = Some(current);
        self.candidates_prev = std::mem::take(&mut self.candidates);
        self.lookup_table.clear();

        if !self.chars_invalid.is_empty() || self.chars_valid.is_empty() {
            return false;
        }

        let tabkeys: String = self.chars_valid.iter().collect();
        let options = self.query_options();
        let mut results = if self.py_mode {
            self.db.select_chinese_characters_by_pinyin(&tabkeys, &options)
        } else {
            self.db.select_words(&tabkeys, &options)
        };

        // A lone wildcard can still be typed literally: synthesize it as
        // the first candidate, width-converted like any direct letter.
        if self.chars_valid.len() == 1 && self.is_wildcard(self.chars_valid[0]) {
            let wc = self.chars_valid[0];
            let literal = if self.full_width_letter {
                to_fullwidth(wc)
            } else {
                wc
            };
            results.insert(0, Candidate::new(wc.to_string(), literal.to_string(), 0));
        }

        if results.is_empty() && self.chars_valid.len() > 1 {
            // The last key killed the match. Park it in the invalid suffix;
            // the caller decides whether to backtrack. No automatic
            // re-query happens here.
            let failed = self.chars_valid.pop().expect("length checked above");
            self.chars_invalid.push(failed);
            debug!(keys = %tabkeys, "no candidates, keeping invalid suffix {:?}", failed);
            return false;
        }

        self.candidates = results;
        self.fill_lookup_table();
        !self.candidates.is_empty()
    }

    fn ensure_filled(&mut self, upto: usize) {
        let target = upto.min(self.candidates.len());
        if self.lookup_table.len() < target {
            let start = self.lookup_table.len();
            self.lookup_table
                .extend(self.candidates[start..target].iter().cloned());
        }
    }

    /// Materialize the lookup table two pages ahead of its cursor.
    pub fn fill_lookup_table(&mut self) {
        let page_size = self.lookup_table.page_size();
        self.ensure_filled((self.lookup_table.current_page() + 2) * page_size);
    }

    // --- lookup-table navigation ----------------------------------------

    pub fn cursor_down(&mut self) -> bool {
        let page_size = self.lookup_table.page_size();
        self.ensure_filled(self.lookup_table.cursor() + 2 + page_size);
        self.lookup_table.cursor_down()
    }

    pub fn cursor_up(&mut self) -> bool {
        if self.lookup_table.cursor() == 0 {
            // Wrapping to the end needs the tail materialized.
            self.ensure_filled(self.candidates.len());
        }
        self.lookup_table.cursor_up()
    }

    pub fn page_down(&mut self) -> bool {
        let page_size = self.lookup_table.page_size();
        self.ensure_filled((self.lookup_table.current_page() + 3) * page_size);
        self.lookup_table.page_down()
    }

    pub fn page_up(&mut self) -> bool {
        if self.lookup_table.current_page() == 0 {
            self.ensure_filled(self.candidates.len());
        }
        self.lookup_table.page_up()
    }

    /// Advance the selection within the current page only.
    pub fn cycle_next_cand(&mut self) -> bool {
        self.fill_lookup_table();
        self.lookup_table.cycle_next_in_page()
    }

    // --- precommit ------------------------------------------------------

    /// Finalize the live segment into the preedit at the precommit cursor:
    /// the selected candidate's phrase, or the raw typed keys when nothing
    /// matched. Does not deliver anything to the host.
    pub fn commit_to_preedit(&mut self) -> bool {
        if self.chars_valid.is_empty() {
            return false;
        }
        let raw: String = self
            .chars_valid
            .iter()
            .chain(self.chars_invalid.iter())
            .collect();
        let phrase = if self.chars_invalid.is_empty() {
            self.lookup_table
                .selected()
                .map(|c| c.phrase.clone())
                .unwrap_or_else(|| raw.clone())
        } else {
            raw.clone()
        };
        self.committed_keys.insert(self.cursor_precommit, raw);
        self.committed_phrases.insert(self.cursor_precommit, phrase);
        self.cursor_precommit += 1;
        self.clear_input_not_committed_to_preedit();
        true
    }

    /// Finalize the candidate at a 0-based position within the visible
    /// page. Out of range is a no-op.
    pub fn commit_to_preedit_current_page(&mut self, page_index: usize) -> bool {
        self.fill_lookup_table();
        match self.lookup_table.absolute_index_in_page(page_index) {
            Some(absolute) => {
                self.lookup_table.set_cursor(absolute);
                self.commit_to_preedit()
            }
            None => false,
        }
    }

    /// Position of `key` among the configured selection keys.
    pub fn select_key_index(&self, key: char) -> Option<usize> {
        self.select_keys.iter().position(|&k| k == key)
    }

    /// Finalize the candidate addressed by a selection key.
    pub fn select_key(&mut self, key: char) -> bool {
        match self.select_key_index(key) {
            Some(index) => self.commit_to_preedit_current_page(index),
            None => false,
        }
    }

    /// The candidate a selection key currently addresses, if populated.
    pub fn candidate_for_select_key(&mut self, key: char) -> Option<Candidate> {
        let index = self.select_key_index(key)?;
        self.fill_lookup_table();
        let absolute = self.lookup_table.absolute_index_in_page(index)?;
        Some(self.lookup_table.entries()[absolute].clone())
    }

    /// Drop the user reinforcement for the candidate a selection key
    /// addresses, then refresh the match list. System ranking stays.
    pub fn remove_candidate_from_user_database(&mut self, key: char) -> bool {
        let Some(candidate) = self.candidate_for_select_key(key) else {
            return false;
        };
        self.db
            .remove_phrase(&candidate.tabkeys, &candidate.phrase, true);
        self.invalidate();
        self.update_candidates()
    }

    // --- cursor movement through the preedit ----------------------------

    /// Split one character off the tail of the committed phrase at `index`.
    /// The split-off character's keys are recovered via `find_zi_code`;
    /// tables without a code for it leave the tail keys empty.
    fn split_phrase_tail(&mut self, index: usize) {
        let phrase = self.committed_phrases[index].clone();
        let mut chars: Vec<char> = phrase.chars().collect();
        let tail = chars.pop().expect("split of a non-empty phrase");
        let head: String = chars.into_iter().collect();
        let tail_keys = self
            .db
            .find_zi_code(tail)
            .into_iter()
            .next()
            .unwrap_or_default();
        let keys = self.committed_keys[index].clone();
        let head_keys = keys
            .strip_suffix(tail_keys.as_str())
            .filter(|_| !tail_keys.is_empty())
            .unwrap_or(&keys)
            .to_string();
        self.committed_phrases[index] = head;
        self.committed_keys[index] = head_keys;
        self.committed_phrases.insert(index + 1, tail.to_string());
        self.committed_keys.insert(index + 1, tail_keys);
    }

    /// Split one character off the head of the committed phrase at `index`.
    fn split_phrase_head(&mut self, index: usize) {
        let phrase = self.committed_phrases[index].clone();
        let mut chars = phrase.chars();
        let head = chars.next().expect("split of a non-empty phrase");
        let tail: String = chars.collect();
        let head_keys = self
            .db
            .find_zi_code(head)
            .into_iter()
            .next()
            .unwrap_or_default();
        let keys = self.committed_keys[index].clone();
        let tail_keys = keys
            .strip_prefix(head_keys.as_str())
            .filter(|_| !head_keys.is_empty())
            .unwrap_or(&keys)
            .to_string();
        self.committed_phrases[index] = head.to_string();
        self.committed_keys[index] = head_keys;
        self.committed_phrases.insert(index + 1, tail);
        self.committed_keys.insert(index + 1, tail_keys);
    }

    /// Move the precommit cursor one source character left. Multi-character
    /// phrases at the crossed boundary, and the phrase the cursor lands
    /// next to, are split so cursor granularity stays one character.
    pub fn arrow_left(&mut self) -> bool {
        if !self.is_empty() {
            self.commit_to_preedit();
        }
        if self.cursor_precommit == 0 {
            return false;
        }
        let crossing = self.cursor_precommit - 1;
        if self.committed_phrases[crossing].chars().count() > 1 {
            self.split_phrase_tail(crossing);
            self.cursor_precommit += 1;
        }
        self.cursor_precommit -= 1;
        if self.cursor_precommit > 0 {
            let left = self.cursor_precommit - 1;
            if self.committed_phrases[left].chars().count() > 1 {
                self.split_phrase_tail(left);
                self.cursor_precommit += 1;
            }
        }
        true
    }

    /// Move the precommit cursor one source character right, splitting as
    /// in [`Self::arrow_left`].
    pub fn arrow_right(&mut self) -> bool {
        if !self.is_empty() {
            self.commit_to_preedit();
        }
        if self.cursor_precommit == self.committed_phrases.len() {
            return false;
        }
        if self.committed_phrases[self.cursor_precommit].chars().count() > 1 {
            self.split_phrase_head(self.cursor_precommit);
        }
        self.cursor_precommit += 1;
        if self.cursor_precommit < self.committed_phrases.len()
            && self.committed_phrases[self.cursor_precommit].chars().count() > 1
        {
            self.split_phrase_head(self.cursor_precommit);
        }
        true
    }

    /// Jump to the left extreme without splitting.
    pub fn control_arrow_left(&mut self) -> bool {
        if !self.is_empty() {
            self.commit_to_preedit();
        }
        if self.cursor_precommit == 0 {
            return false;
        }
        self.cursor_precommit = 0;
        true
    }

    /// Jump to the right extreme without splitting.
    pub fn control_arrow_right(&mut self) -> bool {
        if !self.is_empty() {
            self.commit_to_preedit();
        }
        if self.cursor_precommit == self.committed_phrases.len() {
            return false;
        }
        self.cursor_precommit = self.committed_phrases.len();
        true
    }

    // --- deletion across the precommit boundary -------------------------

    /// Delete every precommitted phrase left of the cursor.
    pub fn remove_preedit_before_cursor(&mut self) -> bool {
        if !self.is_empty() {
            self.commit_to_preedit();
        }
        if self.cursor_precommit == 0 {
            return false;
        }
        self.committed_keys.drain(..self.cursor_precommit);
        self.committed_phrases.drain(..self.cursor_precommit);
        self.cursor_precommit = 0;
        true
    }

    /// Delete every precommitted phrase right of the cursor.
    pub fn remove_preedit_after_cursor(&mut self) -> bool {
        if !self.is_empty() {
            self.commit_to_preedit();
        }
        if self.cursor_precommit == self.committed_phrases.len() {
            return false;
        }
        self.committed_keys.truncate(self.cursor_precommit);
        self.committed_phrases.truncate(self.cursor_precommit);
        true
    }

    /// Un-finalize the phrase left of the cursor back into `chars_valid`
    /// so it can immediately re-match.
    pub fn remove_preedit_character_before_cursor(&mut self) -> bool {
        if !self.is_empty() {
            self.commit_to_preedit();
        }
        if self.cursor_precommit == 0 {
            return false;
        }
        self.cursor_precommit -= 1;
        let keys = self.committed_keys.remove(self.cursor_precommit);
        self.committed_phrases.remove(self.cursor_precommit);
        self.chars_valid = keys.chars().collect();
        self.update_candidates();
        true
    }

    /// Delete the phrase right of the cursor outright.
    pub fn remove_preedit_character_after_cursor(&mut self) -> bool {
        if !self.is_empty() {
            self.commit_to_preedit();
        }
        if self.cursor_precommit == self.committed_phrases.len() {
            return false;
        }
        self.committed_keys.remove(self.cursor_precommit);
        self.committed_phrases.remove(self.cursor_precommit);
        true
    }

    // --- display state --------------------------------------------------

    /// Phrase of the current edit: the selected candidate, or the raw
    /// typed keys when nothing matches yet.
    fn current_edit_phrase(&self) -> String {
        if self.chars_invalid.is_empty()
            && let Some(candidate) = self.lookup_table.selected()
        {
            return candidate.phrase.clone();
        }
        self.chars_valid
            .iter()
            .chain(self.chars_invalid.iter())
            .collect()
    }

    fn current_edit_tabkeys(&self) -> String {
        self.chars_valid
            .iter()
            .chain(self.chars_invalid.iter())
            .collect()
    }

    /// Three-way phrase split around the precommit cursor.
    pub fn get_preedit_string_parts(&self) -> PreeditParts {
        PreeditParts {
            left: self.committed_phrases[..self.cursor_precommit].to_vec(),
            current: self.current_edit_phrase(),
            right: self.committed_phrases[self.cursor_precommit..].to_vec(),
        }
    }

    /// The same split in terms of original keystrokes.
    pub fn get_preedit_tabkeys_parts(&self) -> PreeditParts {
        PreeditParts {
            left: self.committed_keys[..self.cursor_precommit].to_vec(),
            current: self.current_edit_tabkeys(),
            right: self.committed_keys[self.cursor_precommit..].to_vec(),
        }
    }

    pub fn get_preedit_string_complete(&self) -> String {
        self.get_preedit_string_parts().concat()
    }

    pub fn get_preedit_tabkeys_complete(&self) -> String {
        self.get_preedit_tabkeys_parts().concat()
    }

    /// Caret position in display characters: left-of-cursor phrases plus
    /// the current edit.
    pub fn get_caret(&self) -> usize {
        let left: usize = self.committed_phrases[..self.cursor_precommit]
            .iter()
            .map(|p| p.chars().count())
            .sum();
        left + self.current_edit_phrase().chars().count()
    }

    // --- reset ----------------------------------------------------------

    /// Reset the live segment only.
    pub fn clear_input_not_committed_to_preedit(&mut self) {
        self.chars_valid.clear();
        self.chars_invalid.clear();
        self.update_candidates();
    }

    /// Full reset: live segment, precommitted phrases and cursor.
    pub fn clear_all_input_and_preedit(&mut self) {
        self.chars_valid.clear();
        self.chars_invalid.clear();
        self.committed_keys.clear();
        self.committed_phrases.clear();
        self.cursor_precommit = 0;
        self.update_candidates();
    }

    /// Take the precommitted (keys, phrase) pairs for final delivery,
    /// leaving the preedit empty.
    pub fn drain_committed(&mut self) -> Vec<(String, String)> {
        self.cursor_precommit = 0;
        self.committed_keys
            .drain(..)
            .zip(self.committed_phrases.drain(..))
            .collect()
    }

    // --- lookup filters -------------------------------------------------

    pub fn py_mode(&self) -> bool {
        self.py_mode
    }

    pub fn set_py_mode(&mut self, py_mode: bool) {
        if self.py_mode != py_mode {
            self.py_mode = py_mode;
            self.invalidate();
            self.update_candidates();
        }
    }

    pub fn onechar(&self) -> bool {
        self.onechar
    }

    pub fn set_onechar(&mut self, onechar: bool) {
        if self.onechar != onechar {
            self.onechar = onechar;
            self.invalidate();
            self.update_candidates();
        }
    }

    pub fn chinese_mode(&self) -> ChineseMode {
        self.chinese_mode
    }

    pub fn set_chinese_mode(&mut self, mode: ChineseMode) {
        if self.chinese_mode != mode {
            self.chinese_mode = mode;
            self.invalidate();
            self.update_candidates();
        }
    }

    pub fn set_auto_wildcard(&mut self, auto_wildcard: bool) {
        if self.auto_wildcard != auto_wildcard {
            self.auto_wildcard = auto_wildcard;
            self.invalidate();
            self.update_candidates();
        }
    }

    pub fn set_full_width_letter(&mut self, full_width: bool) {
        if self.full_width_letter != full_width {
            self.full_width_letter = full_width;
            self.invalidate();
            self.update_candidates();
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.lookup_table.set_page_size(page_size);
        self.fill_lookup_table();
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.lookup_table.set_orientation(orientation);
    }

    pub fn select_keys(&self) -> &[char] {
        &self.select_keys
    }
}
