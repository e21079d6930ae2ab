use std::ops::Range;

use tether_core::{KeyCode, KeyEvent, MetaState, char_len, normalize_range};
use unicode_segmentation::UnicodeSegmentation;

/// Editable text with selection and an optional IME composing span.
///
/// All offsets are char indices. This is the editing behaviour a native text
/// field gives the input method: composing text replaces the current
/// composing span (or the selection when there is none), commits end the
/// composition, and cursor positions follow the `new_cursor` convention
/// (`> 0` is relative to the end of the inserted text, `<= 0` to its start).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub text: String,
    pub selection: Range<usize>,
    pub composition: Option<Range<usize>>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replaces the whole text, caret at the end, composition dropped.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        let end = self.len();
        self.selection = end..end;
        self.composition = None;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.selection = 0..0;
        self.composition = None;
    }

    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.len();
        let (s, e) = normalize_range(start.min(len), end.min(len));
        self.selection = s..e;
    }

    pub fn select_all(&mut self) {
        self.selection = 0..self.len();
    }

    /// Drops composing state without touching the text.
    pub fn clear_composing_text(&mut self) {
        self.composition = None;
    }

    pub fn finish_composing(&mut self) {
        self.composition = None;
    }

    pub fn set_composing_region(&mut self, start: usize, end: usize) {
        let len = self.len();
        let (s, e) = normalize_range(start.min(len), end.min(len));
        self.composition = if s == e { None } else { Some(s..e) };
    }

    pub fn set_composing_text(&mut self, text: &str, new_cursor: i32) {
        let inserted = self.replace_target(text);
        self.composition = if inserted.is_empty() {
            None
        } else {
            Some(inserted.clone())
        };
        self.place_cursor(inserted, new_cursor);
    }

    pub fn commit_text(&mut self, text: &str, new_cursor: i32) {
        let inserted = self.replace_target(text);
        self.composition = None;
        self.place_cursor(inserted, new_cursor);
    }

    /// Deletes `before` chars ahead of the selection and `after` chars past it.
    pub fn delete_surrounding(&mut self, before: usize, after: usize) {
        let len = self.len();
        let sel = self.selection.clone();

        let tail = sel.end..(sel.end + after).min(len);
        self.remove(tail);
        let head = sel.start.saturating_sub(before)..sel.start;
        let removed = head.len();
        self.remove(head);
        self.selection = (sel.start - removed)..(sel.end - removed);
    }

    /// Moves the caret by `delta` grapheme clusters. Returns false when the
    /// caret is already at the boundary in that direction.
    pub fn move_caret(&mut self, delta: isize, extend: bool) -> bool {
        let mut pos = if extend {
            self.selection.end
        } else if delta < 0 {
            self.selection.start
        } else {
            self.selection.end
        };
        let collapsed = self.selection.start == self.selection.end;
        if collapsed || extend {
            let start = pos;
            for _ in 0..delta.unsigned_abs() {
                pos = if delta < 0 {
                    prev_grapheme(&self.text, pos)
                } else {
                    next_grapheme(&self.text, pos)
                };
            }
            if pos == start {
                return false;
            }
        }
        if extend {
            let anchor = self.selection.start;
            let (s, e) = normalize_range(anchor, pos);
            self.selection = s..e;
        } else {
            self.selection = pos..pos;
        }
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.selection.start != self.selection.end {
            self.commit_text("", 1);
            return true;
        }
        let pos = self.selection.start;
        if pos == 0 {
            return false;
        }
        let prev = prev_grapheme(&self.text, pos);
        self.remove(prev..pos);
        self.selection = prev..prev;
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.selection.start != self.selection.end {
            self.commit_text("", 1);
            return true;
        }
        let pos = self.selection.start;
        if pos >= self.len() {
            return false;
        }
        let next = next_grapheme(&self.text, pos);
        self.remove(pos..next);
        true
    }

    /// Native key handling of a plain text field. Only presses edit.
    pub fn handle_key(&mut self, ev: &KeyEvent) -> bool {
        if !ev.is_down() {
            return false;
        }
        let shift = ev.meta.contains(MetaState::SHIFT_ON);
        match ev.key_code {
            KeyCode::DPAD_LEFT => self.move_caret(-1, shift),
            KeyCode::DPAD_RIGHT => self.move_caret(1, shift),
            KeyCode::MOVE_HOME => {
                self.selection = 0..0;
                true
            }
            KeyCode::MOVE_END => {
                let end = self.len();
                self.selection = end..end;
                true
            }
            KeyCode::DEL => self.backspace(),
            KeyCode::FORWARD_DEL => self.delete_forward(),
            KeyCode::A if ev.meta.contains(MetaState::CTRL_ON) => {
                self.select_all();
                true
            }
            _ => match ev.char() {
                Some(ch) if !ch.is_control() => {
                    let mut tmp = [0u8; 4];
                    self.commit_text(ch.encode_utf8(&mut tmp), 1);
                    true
                }
                _ => false,
            },
        }
    }

    // Replaces the composing span, or the selection when not composing, and
    // returns the char range of the inserted text.
    fn replace_target(&mut self, text: &str) -> Range<usize> {
        let len = self.len();
        let target = match self.composition.take() {
            Some(r) => {
                let (s, e) = normalize_range(r.start.min(len), r.end.min(len));
                s..e
            }
            None => self.selection.start.min(len)..self.selection.end.min(len),
        };
        let bs = byte_of(&self.text, target.start);
        let be = byte_of(&self.text, target.end);
        self.text.replace_range(bs..be, text);
        target.start..target.start + char_len(text)
    }

    fn place_cursor(&mut self, inserted: Range<usize>, new_cursor: i32) {
        let len = self.len() as i64;
        let pos = if new_cursor > 0 {
            inserted.end as i64 + new_cursor as i64 - 1
        } else {
            inserted.start as i64 + new_cursor as i64
        };
        let pos = pos.clamp(0, len) as usize;
        self.selection = pos..pos;
    }

    fn remove(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let bs = byte_of(&self.text, range.start);
        let be = byte_of(&self.text, range.end);
        self.text.replace_range(bs..be, "");
        let removed = range.len();
        if let Some(c) = self.composition.take() {
            self.composition = if c.end <= range.start {
                Some(c)
            } else if c.start >= range.end {
                Some((c.start - removed)..(c.end - removed))
            } else {
                None
            };
        }
    }
}

fn byte_of(text: &str, ci: usize) -> usize {
    text.char_indices()
        .nth(ci)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn char_of(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

fn prev_grapheme(text: &str, ci: usize) -> usize {
    let byte = byte_of(text, ci);
    let mut last = 0usize;
    for (i, _) in text.grapheme_indices(true) {
        if i >= byte {
            break;
        }
        last = i;
    }
    char_of(text, last)
}

fn next_grapheme(text: &str, ci: usize) -> usize {
    let byte = byte_of(text, ci);
    for (i, _) in text.grapheme_indices(true) {
        if i > byte {
            return char_of(text, i);
        }
    }
    char_len(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> EditBuffer {
        let mut b = EditBuffer::new();
        b.set_text(text);
        b
    }

    #[test]
    fn commit_at_caret() {
        let mut b = buffer("café");
        b.commit_text("é", 1);
        assert_eq!(b.text, "caféé");
        assert_eq!(b.selection, 5..5);
        assert!(b.composition.is_none());
    }

    #[test]
    fn composing_replaces_previous_composition() {
        let mut b = EditBuffer::new();
        b.set_composing_text("w", 1);
        b.set_composing_text("wo", 1);
        b.set_composing_text("wor", 1);
        assert_eq!(b.text, "wor");
        assert_eq!(b.composition, Some(0..3));
        assert_eq!(b.selection, 3..3);

        b.commit_text("word", 1);
        assert_eq!(b.text, "word");
        assert!(b.composition.is_none());
    }

    #[test]
    fn empty_composing_text_removes_composition() {
        let mut b = buffer("ab");
        b.set_composing_text("xy", 1);
        b.set_composing_text("", 1);
        assert_eq!(b.text, "ab");
        assert!(b.composition.is_none());
    }

    #[test]
    fn new_cursor_before_inserted_text() {
        let mut b = buffer("ab");
        b.commit_text("XY", 0);
        assert_eq!(b.text, "abXY");
        assert_eq!(b.selection, 2..2);
    }

    #[test]
    fn composing_region_reversed_and_clamped() {
        let mut b = buffer("hello");
        b.set_composing_region(9, 2);
        assert_eq!(b.composition, Some(2..5));
        b.set_composing_region(1, 1);
        assert!(b.composition.is_none());
    }

    #[test]
    fn delete_surrounding_around_caret() {
        let mut b = buffer("Hello");
        b.set_selection(3, 3);
        b.delete_surrounding(2, 1);
        assert_eq!(b.text, "Ho");
        assert_eq!(b.selection, 1..1);
    }

    #[test]
    fn caret_moves_over_grapheme_clusters() {
        let mut b = buffer("A👍🏽B");
        assert!(b.move_caret(-1, false));
        assert_eq!(b.selection.end, 3);
        assert!(b.backspace());
        assert_eq!(b.text, "AB");
        assert_eq!(b.selection, 1..1);
    }

    #[test]
    fn caret_at_boundary_does_not_move() {
        let mut b = buffer("ab");
        assert!(!b.move_caret(1, false));
        b.set_selection(0, 0);
        assert!(!b.move_caret(-1, false));
        assert!(!b.backspace());
    }

    #[test]
    fn keys_edit_like_a_native_field() {
        let mut b = buffer("ab");
        assert!(b.handle_key(&KeyEvent::down(KeyCode::UNKNOWN).with_char('c')));
        assert_eq!(b.text, "abc");
        assert!(b.handle_key(&KeyEvent::down(KeyCode::A).with_meta(MetaState::CTRL_ON)));
        assert_eq!(b.selection, 0..3);
        assert!(b.handle_key(&KeyEvent::down(KeyCode::DEL)));
        assert!(b.is_empty());
        assert!(!b.handle_key(&KeyEvent::up(KeyCode::DEL)));
    }
}
