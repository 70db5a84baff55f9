//! Display-state rendering: preedit, auxiliary text, lookup table.

use tracing::Level;

use super::*;

impl TableEngine {
    /// Append a full re-render of the host-visible state to `result`.
    pub(super) fn render_into(&mut self, result: &mut EngineResult) {
        result
            .actions
            .push(EngineAction::UpdatePreedit(self.build_preedit()));
        if self.is_composing() {
            result
                .actions
                .push(EngineAction::UpdateAuxText(self.format_aux()));
        } else {
            result.actions.push(EngineAction::HideAuxText);
        }
        match self.build_lookup_view() {
            Some(view) => result.actions.push(EngineAction::ShowLookupTable(view)),
            None => result.actions.push(EngineAction::HideLookupTable),
        }
    }

    pub(super) fn render(&mut self) -> EngineResult {
        let mut result = EngineResult::consumed();
        self.render_into(&mut result);
        result
    }

    /// Preedit with the three-way attribution: precommitted phrases left
    /// and right of the cursor in their own colors, the invalid suffix in
    /// a third, the whole span underlined.
    fn build_preedit(&self) -> Preedit {
        if !self.is_composing() {
            return Preedit::new();
        }
        let parts = self.editor.get_preedit_string_parts();
        let invalid = self.editor.chars_invalid();
        let current = if invalid.is_empty() {
            parts.current.clone()
        } else {
            self.editor.chars_valid()
        };
        let segments = vec![
            PreeditSegment::new(parts.left.concat(), AttributeType::PrecommitLeft),
            PreeditSegment::new(current, AttributeType::Current),
            PreeditSegment::new(invalid, AttributeType::Invalid),
            PreeditSegment::new(parts.right.concat(), AttributeType::PrecommitRight),
        ];
        Preedit::from_segments(segments, self.editor.get_caret())
    }

    fn mode_indicator(&self) -> String {
        match self.input_mode {
            InputMode::Direct => "[英]".to_string(),
            InputMode::Table if self.settings.mode.pinyin => "[拼]".to_string(),
            InputMode::Table => format!("[{}]", self.editor.chinese_mode().label()),
        }
    }

    /// Auxiliary text: the raw typed keys. Under debug verbosity each
    /// precommitted phrase is annotated with its originating keystrokes.
    fn format_aux(&self) -> String {
        let indicator = self.mode_indicator();
        if !tracing::enabled!(Level::DEBUG) {
            return format!("{} {}", indicator, self.editor.get_preedit_tabkeys_complete());
        }

        let keys = self.editor.get_preedit_tabkeys_parts();
        let phrases = self.editor.get_preedit_string_parts();
        let mut annotated = String::new();
        for (phrase, key) in phrases.left.iter().zip(keys.left.iter()) {
            annotated.push_str(&format!("{}({}) ", phrase, key));
        }
        annotated.push_str(&keys.current);
        for (phrase, key) in phrases.right.iter().zip(keys.right.iter()) {
            annotated.push_str(&format!(" {}({})", phrase, key));
        }
        format!("{} {}", indicator, annotated.trim())
    }

    /// The visible lookup-table page, or `None` when it should be hidden:
    /// live segment empty, or no candidates with always-show off.
    fn build_lookup_view(&mut self) -> Option<LookupView> {
        if self.editor.is_empty() {
            return None;
        }
        if self.editor.candidates().is_empty() && !self.settings.lookup.always_show {
            return None;
        }
        self.editor.fill_lookup_table();
        let select_keys: Vec<char> = self.editor.select_keys().to_vec();
        let table = self.editor.lookup_table();
        let entries = table
            .page_candidates()
            .iter()
            .enumerate()
            .map(|(i, candidate)| {
                (
                    select_keys.get(i).copied().unwrap_or(' '),
                    candidate.clone(),
                )
            })
            .collect();
        Some(LookupView {
            entries,
            cursor: table.page_cursor(),
            page: table.current_page(),
            orientation: table.orientation(),
        })
    }
}
