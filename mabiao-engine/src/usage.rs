//! Batched delivery of usage signal to the user database.
//!
//! Every host commit of a matched phrase is reported through
//! [`TableQuery::check_phrase`] right away, but the durable
//! [`TableQuery::sync`] is batched: the host's periodic tick calls
//! [`UsageRecorder::maybe_flush`], which syncs once enough events or enough
//! time has accumulated, whichever comes first.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::table::TableQuery;

pub struct UsageRecorder {
    pending: usize,
    last_flush: Instant,
    max_pending: usize,
    max_age: Duration,
}

impl UsageRecorder {
    pub const DEFAULT_MAX_PENDING: usize = 16;
    pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self::with_limits(Self::DEFAULT_MAX_PENDING, Self::DEFAULT_MAX_AGE)
    }

    pub fn with_limits(max_pending: usize, max_age: Duration) -> Self {
        Self {
            pending: 0,
            last_flush: Instant::now(),
            max_pending: max_pending.max(1),
            max_age,
        }
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Report one committed phrase and count it toward the next flush.
    pub fn record(&mut self, db: &mut dyn TableQuery, tabkeys: &str, phrase: &str) {
        db.check_phrase(tabkeys, phrase);
        self.pending += 1;
    }

    /// Sync if a threshold has tripped. Returns whether a sync happened.
    pub fn maybe_flush(&mut self, db: &mut dyn TableQuery) -> bool {
        if self.pending == 0 {
            // Keep the age window anchored to the last activity.
            self.last_flush = Instant::now();
            return false;
        }
        if self.pending >= self.max_pending || self.last_flush.elapsed() >= self.max_age {
            self.flush(db);
            return true;
        }
        false
    }

    /// Sync unconditionally (reset, focus loss, shutdown).
    pub fn flush(&mut self, db: &mut dyn TableQuery) {
        if self.pending > 0 {
            debug!(events = self.pending, "flushing usage records");
            db.sync();
        }
        self.pending = 0;
        self.last_flush = Instant::now();
    }
}

impl Default for UsageRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;
    use crate::table::{TableMetadata, WordQueryOptions};

    #[derive(Default)]
    struct CountingDb {
        metadata: TableMetadata,
        checks: usize,
        syncs: usize,
    }

    impl TableQuery for CountingDb {
        fn metadata(&self) -> &TableMetadata {
            &self.metadata
        }
        fn select_words(&self, _: &str, _: &WordQueryOptions) -> Vec<Candidate> {
            Vec::new()
        }
        fn select_chinese_characters_by_pinyin(
            &self,
            _: &str,
            _: &WordQueryOptions,
        ) -> Vec<Candidate> {
            Vec::new()
        }
        fn find_zi_code(&self, _: char) -> Vec<String> {
            Vec::new()
        }
        fn check_phrase(&mut self, _: &str, _: &str) {
            self.checks += 1;
        }
        fn remove_phrase(&mut self, _: &str, _: &str, _: bool) {}
        fn sync(&mut self) {
            self.syncs += 1;
        }
    }

    #[test]
    fn flushes_on_event_count() {
        let mut db = CountingDb::default();
        let mut usage = UsageRecorder::with_limits(2, Duration::from_secs(3600));

        usage.record(&mut db, "ni", "你");
        assert!(!usage.maybe_flush(&mut db));
        usage.record(&mut db, "ni", "你");
        assert!(usage.maybe_flush(&mut db));

        assert_eq!(db.checks, 2);
        assert_eq!(db.syncs, 1);
        assert_eq!(usage.pending(), 0);
    }

    #[test]
    fn flushes_on_age() {
        let mut db = CountingDb::default();
        let mut usage = UsageRecorder::with_limits(1000, Duration::ZERO);

        usage.record(&mut db, "ni", "你");
        assert!(usage.maybe_flush(&mut db));
        assert_eq!(db.syncs, 1);
    }

    #[test]
    fn idle_tick_does_not_sync() {
        let mut db = CountingDb::default();
        let mut usage = UsageRecorder::with_limits(1, Duration::ZERO);
        assert!(!usage.maybe_flush(&mut db));
        assert_eq!(db.syncs, 0);
    }

    #[test]
    fn forced_flush_is_unconditional() {
        let mut db = CountingDb::default();
        let mut usage = UsageRecorder::new();
        usage.record(&mut db, "ni", "你");
        usage.flush(&mut db);
        assert_eq!(db.syncs, 1);
        // Nothing pending: flush is a no-op sync-wise
        usage.flush(&mut db);
        assert_eq!(db.syncs, 1);
    }
}
