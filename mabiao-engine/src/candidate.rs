//! Candidate phrases and the paged lookup table.
//!
//! The lookup table is a presentation window over the editor's candidate
//! list: it is filled incrementally (two pages ahead of the cursor) because
//! wildcard queries can return thousands of rows.

use serde::{Deserialize, Serialize};

/// A single candidate phrase as returned by the table database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// The key sequence that produces this phrase
    pub tabkeys: String,
    /// The phrase text
    pub phrase: String,
    /// System frequency. Negative marks a user-defined phrase.
    pub freq: i64,
    /// User frequency (selection reinforcement)
    pub user_freq: i64,
}

impl Candidate {
    pub fn new(tabkeys: impl Into<String>, phrase: impl Into<String>, freq: i64) -> Self {
        Self {
            tabkeys: tabkeys.into(),
            phrase: phrase.into(),
            freq,
            user_freq: 0,
        }
    }

    pub fn with_user_freq(mut self, user_freq: i64) -> Self {
        self.user_freq = user_freq;
        self
    }

    /// Whether this phrase came from the user's own definitions.
    pub fn is_user_defined(&self) -> bool {
        self.freq < 0
    }
}

/// Lookup-table layout direction, as presented by the host panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

/// A paged view over the candidate list with a selection cursor.
///
/// Holds only the candidates materialized so far; the editor appends more
/// as the cursor approaches the end of the filled window.
#[derive(Debug, Clone)]
pub struct LookupTable {
    entries: Vec<Candidate>,
    cursor: usize,
    page_size: usize,
    orientation: Orientation,
}

impl LookupTable {
    /// Default page size, matching the ten default selection keys.
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    pub fn new(page_size: usize, orientation: Orientation) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            page_size: page_size.max(1),
            orientation,
        }
    }

    /// Drop all materialized candidates and reset the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Append newly materialized candidates to the window.
    pub fn extend(&mut self, candidates: impl IntoIterator<Item = Candidate>) {
        self.entries.extend(candidates);
    }

    /// Number of candidates materialized so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor to an absolute index. Out of range is a no-op.
    pub fn set_cursor(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.cursor = index;
            true
        } else {
            false
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.cursor = 0;
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Current page number (0-indexed).
    pub fn current_page(&self) -> usize {
        self.cursor / self.page_size
    }

    /// Start index of the current page.
    pub fn page_start(&self) -> usize {
        self.current_page() * self.page_size
    }

    /// Cursor position within the current page.
    pub fn page_cursor(&self) -> usize {
        self.cursor - self.page_start()
    }

    /// The candidates on the current page.
    pub fn page_candidates(&self) -> &[Candidate] {
        let start = self.page_start();
        let end = (start + self.page_size).min(self.entries.len());
        &self.entries[start..end]
    }

    /// The candidate under the cursor.
    pub fn selected(&self) -> Option<&Candidate> {
        self.entries.get(self.cursor)
    }

    /// Resolve a 0-based position within the current page to an absolute
    /// index, if that slot is populated.
    pub fn absolute_index_in_page(&self, page_index: usize) -> Option<usize> {
        if page_index >= self.page_size {
            return None;
        }
        let absolute = self.page_start() + page_index;
        (absolute < self.entries.len()).then_some(absolute)
    }

    /// Move the cursor one candidate forward, wrapping to the start.
    pub fn cursor_down(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        self.cursor = if self.cursor + 1 < self.entries.len() {
            self.cursor + 1
        } else {
            0
        };
        true
    }

    /// Move the cursor one candidate back, wrapping to the end.
    pub fn cursor_up(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        self.cursor = if self.cursor > 0 {
            self.cursor - 1
        } else {
            self.entries.len() - 1
        };
        true
    }

    /// Move to the next page, wrapping to the first.
    pub fn page_down(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let next_start = self.page_start() + self.page_size;
        self.cursor = if next_start < self.entries.len() {
            next_start
        } else {
            0
        };
        true
    }

    /// Move to the previous page, wrapping to the last.
    pub fn page_up(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let page = self.current_page();
        self.cursor = if page > 0 {
            (page - 1) * self.page_size
        } else {
            let last_page = (self.entries.len() - 1) / self.page_size;
            last_page * self.page_size
        };
        true
    }

    /// Advance the cursor within the current page only, wrapping to the
    /// start of the page rather than paging forward.
    pub fn cycle_next_in_page(&mut self) -> bool {
        let page = self.page_candidates().len();
        if page == 0 {
            return false;
        }
        let start = self.page_start();
        self.cursor = start + (self.page_cursor() + 1) % page;
        true
    }
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE, Orientation::default())
    }
}
