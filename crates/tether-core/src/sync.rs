use std::ops::{Deref, DerefMut};

/// Widget id meaning "no engine widget owns the proxy field".
pub const NO_WIDGET: i32 = -1;

/// Mirror of the proxy field as the engine-facing side sees it.
///
/// Offsets are char indices into `text`. After any of the transition
/// functions below, `selection_start <= selection_end <= len(text)` holds, and
/// the same ordering holds for the composing span. `(0, 0)` as the composing
/// span means there is no active composition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSyncState {
    pub widget_id: i32,
    pub text: String,
    pub selection_start: usize,
    pub selection_end: usize,
    pub composing_start: usize,
    pub composing_end: usize,
    /// While set, locally observed changes must not be pushed to the engine.
    pub suppress_echo: bool,
}

impl Default for TextSyncState {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSyncState {
    pub fn new() -> Self {
        Self {
            widget_id: NO_WIDGET,
            text: String::new(),
            selection_start: 0,
            selection_end: 0,
            composing_start: 0,
            composing_end: 0,
            suppress_echo: false,
        }
    }

    pub fn selection(&self) -> (usize, usize) {
        (self.selection_start, self.selection_end)
    }

    pub fn composing(&self) -> (usize, usize) {
        (self.composing_start, self.composing_end)
    }

    pub fn has_composition(&self) -> bool {
        self.composing_start != self.composing_end
    }

    /// Length of `text` in the offset unit used by every range here.
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Full reset performed when the field regains focus after being hidden.
    /// The owning widget id is kept; the next external update re-stamps it.
    pub fn reset(&mut self) {
        self.text.clear();
        self.selection_start = 0;
        self.selection_end = 0;
        self.composing_start = 0;
        self.composing_end = 0;
        self.suppress_echo = false;
    }

    pub fn clear_composing(&mut self) {
        self.composing_start = 0;
        self.composing_end = 0;
    }

    /// Stores a composing span, swapping reversed input.
    pub fn apply_composing_region(&self, start: usize, end: usize) -> TextSyncState {
        let mut next = self.clone();
        next.set_composing_region(start, end);
        next
    }

    pub fn set_composing_region(&mut self, start: usize, end: usize) {
        let (lo, hi) = normalize_range(start, end);
        self.composing_start = lo;
        self.composing_end = hi;
    }

    /// Applies authoritative text coming from the engine.
    ///
    /// Replacing the text drops any composing span since its offsets no longer
    /// refer to anything. Selection offsets are clamped into the new text and
    /// put in order. The returned state never has `suppress_echo` set.
    pub fn apply_external_text(
        &self,
        widget_id: i32,
        text: &str,
        sel_start: i32,
        sel_end: i32,
    ) -> TextSyncState {
        let mut next = self.clone();
        {
            let mut guard = EchoGuard::new(&mut next);
            guard.write_external(widget_id, text, sel_start, sel_end);
        }
        next
    }

    /// In-place variant used while an [`EchoGuard`] is already held.
    /// Returns whether the text changed.
    pub fn write_external(
        &mut self,
        widget_id: i32,
        text: &str,
        sel_start: i32,
        sel_end: i32,
    ) -> bool {
        self.widget_id = widget_id;
        let changed = self.text != text;
        if changed {
            self.text = text.to_owned();
            self.clear_composing();
        }
        let len = self.len();
        let (lo, hi) = normalize_range(clamp_offset(sel_start, len), clamp_offset(sel_end, len));
        self.selection_start = lo;
        self.selection_end = hi;
        changed
    }

    /// Copies text and selection observed on the platform field.
    pub fn observe(&mut self, text: String, selection: (usize, usize)) {
        self.text = text;
        let len = self.len();
        let (lo, hi) = normalize_range(selection.0.min(len), selection.1.min(len));
        self.selection_start = lo;
        self.selection_end = hi;
    }

    /// Pulls the composing span back inside the current text.
    pub fn clamp_composing(&mut self) {
        let len = self.len();
        let (lo, hi) = normalize_range(self.composing_start.min(len), self.composing_end.min(len));
        if lo == hi {
            self.clear_composing();
        } else {
            self.composing_start = lo;
            self.composing_end = hi;
        }
    }
}

/// Orders a range that may arrive reversed.
pub fn normalize_range<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a > b { (b, a) } else { (a, b) }
}

/// Clamps a raw engine offset into `[0, len]`.
pub fn clamp_offset(offset: i32, len: usize) -> usize {
    if offset <= 0 {
        0
    } else {
        (offset as usize).min(len)
    }
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Guesses where a freshly composed fragment sits inside the field.
///
/// This is a best-effort heuristic: when the last char of `composing_text`
/// equals the last char of `field_text`, the fragment is assumed to occupy
/// the tail of the field. Anything else yields `(0, 0)`. It can be fooled
/// when the fragment is not at the tail but the trailing chars coincide.
pub fn infer_composing_span_from_commit(field_text: &str, composing_text: &str) -> (usize, usize) {
    let (Some(tail), Some(field_tail)) = (composing_text.chars().last(), field_text.chars().last())
    else {
        return (0, 0);
    };
    if tail != field_tail {
        return (0, 0);
    }
    let field_len = char_len(field_text);
    let composing_len = char_len(composing_text);
    if composing_len > field_len {
        return (0, 0);
    }
    let start = field_len - composing_len;
    (start, start + composing_len)
}

/// Holds `suppress_echo` for as long as it lives.
///
/// Dropping the guard always clears the flag, including on early returns and
/// unwinding, so suppression can never be left stuck on.
pub struct EchoGuard<'a> {
    state: &'a mut TextSyncState,
}

impl<'a> EchoGuard<'a> {
    pub fn new(state: &'a mut TextSyncState) -> Self {
        state.suppress_echo = true;
        Self { state }
    }
}

impl Deref for EchoGuard<'_> {
    type Target = TextSyncState;

    fn deref(&self) -> &TextSyncState {
        self.state
    }
}

impl DerefMut for EchoGuard<'_> {
    fn deref_mut(&mut self) -> &mut TextSyncState {
        self.state
    }
}

impl Drop for EchoGuard<'_> {
    fn drop(&mut self) {
        self.state.suppress_echo = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_swaps_reversed_input() {
        for (a, b) in [(5usize, 2usize), (9, 0), (1, 0)] {
            assert_eq!(normalize_range(a, b), (b, a));
            assert_eq!(normalize_range(b, a), (b, a));
        }
        assert_eq!(normalize_range(3, 3), (3, 3));
    }

    #[test]
    fn composing_region_is_normalized() {
        let st = TextSyncState::new().apply_composing_region(7, 4);
        assert_eq!(st.composing(), (4, 7));
        assert!(st.text.is_empty());
        assert_eq!(st.selection(), (0, 0));
    }

    #[test]
    fn external_text_releases_suppression() {
        let mut st = TextSyncState::new();
        st.suppress_echo = true;
        let next = st.apply_external_text(3, "hello", 1, 3);
        assert!(!next.suppress_echo);
        assert_eq!(next.widget_id, 3);
        assert_eq!(next.text, "hello");
        assert_eq!(next.selection(), (1, 3));
    }

    #[test]
    fn external_text_clamps_and_orders_selection() {
        let st = TextSyncState::new().apply_external_text(1, "abc", 10, -4);
        assert_eq!(st.selection(), (0, 3));

        let st = TextSyncState::new().apply_external_text(1, "abc", 2, 1);
        assert_eq!(st.selection(), (1, 2));
    }

    #[test]
    fn external_text_clears_composing_only_on_change() {
        let mut st = TextSyncState::new().apply_external_text(1, "word", 4, 4);
        st.set_composing_region(0, 4);

        let same = st.apply_external_text(1, "word", 2, 2);
        assert_eq!(same.composing(), (0, 4));

        let changed = st.apply_external_text(1, "words", 5, 5);
        assert_eq!(changed.composing(), (0, 0));
    }

    #[test]
    fn offsets_count_chars_not_bytes() {
        let st = TextSyncState::new().apply_external_text(0, "café", 0, 99);
        assert_eq!(st.selection(), (0, 4));
    }

    #[test]
    fn infer_span_matches_tail() {
        assert_eq!(infer_composing_span_from_commit("wor", "wor"), (0, 3));
        assert_eq!(infer_composing_span_from_commit("hello wor", "wor"), (6, 9));
    }

    #[test]
    fn infer_span_falls_back_to_zero() {
        assert_eq!(infer_composing_span_from_commit("work", "wor"), (0, 0));
        assert_eq!(infer_composing_span_from_commit("", "a"), (0, 0));
        assert_eq!(infer_composing_span_from_commit("a", ""), (0, 0));
        assert_eq!(infer_composing_span_from_commit("a", "aa"), (0, 0));
    }

    #[test]
    fn guard_clears_flag_on_unwind() {
        let mut st = TextSyncState::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut g = EchoGuard::new(&mut st);
            g.text.push('x');
            panic!("platform blew up");
        }));
        assert!(result.is_err());
        assert!(!st.suppress_echo);
        assert_eq!(st.text, "x");
    }

    #[test]
    fn reset_keeps_widget_id() {
        let mut st = TextSyncState::new().apply_external_text(9, "abc", 1, 2);
        st.set_composing_region(0, 2);
        st.reset();
        assert_eq!(st.widget_id, 9);
        assert!(st.is_empty());
        assert!(!st.has_composition());
    }
}
