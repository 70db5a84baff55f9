//! Commit paths to the host application.

use super::*;

impl TableEngine {
    /// Finalize the live segment and deliver the whole preedit.
    pub(super) fn commit_all_to_host(&mut self, result: &mut EngineResult) {
        self.editor.commit_to_preedit();
        self.drain_precommit_to_host(result);
    }

    /// Deliver every precommitted phrase to the host, recording usage
    /// signal for each.
    pub(super) fn drain_precommit_to_host(&mut self, result: &mut EngineResult) {
        let pairs = self.editor.drain_committed();
        if pairs.is_empty() {
            return;
        }
        let mut text = String::new();
        for (keys, phrase) in &pairs {
            self.usage.record(self.editor.database_mut(), keys, phrase);
            text.push_str(phrase);
        }
        result.actions.push(EngineAction::Commit(text));
    }

    /// Commit the raw typed keys verbatim, bypassing the lookup. Used by
    /// tables whose key sequences are themselves meaningful text.
    pub(super) fn commit_raw_to_host(&mut self, result: &mut EngineResult) {
        let text = self.editor.get_preedit_tabkeys_complete();
        self.editor.clear_all_input_and_preedit();
        if !text.is_empty() {
            result.actions.push(EngineAction::Commit(text));
        }
    }

    /// Auto-commit policy: with the mode enabled and the precommit cursor
    /// at the end, boundary-finalized phrases go straight to the host
    /// instead of lingering in the preedit.
    pub(super) fn maybe_auto_commit(&mut self, result: &mut EngineResult) {
        if self.settings.mode.auto_commit
            && self.editor.has_precommit()
            && self.editor.precommit_cursor_at_end()
        {
            self.drain_precommit_to_host(result);
        }
    }
}
