use std::collections::HashSet;

use tether_core::{FieldError, InputType, KeyCode, KeyEvent, KeyAction};

use crate::buffer::EditBuffer;
use crate::platform::{LocalEdit, PlatformField};

/// Headless proxy field backed by an [`EditBuffer`].
#[derive(Debug, Default)]
pub struct MemoryField {
    pub buffer: EditBuffer,
    input_type: InputType,
    visible: bool,
    focused: bool,
    // presses this field consumed, so their releases are consumed too
    held: HashSet<KeyCode>,
}

impl MemoryField {
    pub fn new() -> Self {
        Self {
            input_type: InputType::CLASS_TEXT,
            ..Default::default()
        }
    }
}

impl PlatformField for MemoryField {
    fn text(&self) -> String {
        self.buffer.text.clone()
    }

    fn selection(&self) -> (usize, usize) {
        (self.buffer.selection.start, self.buffer.selection.end)
    }

    fn set_text(&mut self, text: &str) -> Result<(), FieldError> {
        self.buffer.set_text(text);
        Ok(())
    }

    fn set_selection(&mut self, start: usize, end: usize) -> Result<(), FieldError> {
        self.buffer.set_selection(start, end);
        Ok(())
    }

    fn clear_composing_text(&mut self) -> Result<(), FieldError> {
        self.buffer.clear_composing_text();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), FieldError> {
        self.buffer.clear();
        Ok(())
    }

    fn input_type(&self) -> InputType {
        self.input_type
    }

    fn set_input_type(&mut self, input_type: InputType) {
        self.input_type = input_type;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), FieldError> {
        self.visible = visible;
        if !visible {
            self.focused = false;
        }
        Ok(())
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn request_focus(&mut self) -> Result<(), FieldError> {
        if !self.visible {
            return Err(FieldError::platform("request_focus", "field is hidden"));
        }
        self.focused = true;
        Ok(())
    }

    fn clear_focus(&mut self) -> Result<(), FieldError> {
        self.focused = false;
        self.held.clear();
        Ok(())
    }

    fn apply_edit(&mut self, edit: &LocalEdit) -> bool {
        let b = &mut self.buffer;
        match edit {
            LocalEdit::SetComposingText { text, new_cursor } => {
                b.set_composing_text(text, *new_cursor)
            }
            LocalEdit::SetComposingRegion { start, end } => {
                b.set_composing_region((*start).max(0) as usize, (*end).max(0) as usize)
            }
            LocalEdit::FinishComposing => b.finish_composing(),
            LocalEdit::CommitText { text, new_cursor } => b.commit_text(text, *new_cursor),
            LocalEdit::DeleteSurrounding { before, after } => {
                b.delete_surrounding((*before).max(0) as usize, (*after).max(0) as usize)
            }
        }
        true
    }

    fn handle_key(&mut self, ev: &KeyEvent) -> bool {
        match ev.action {
            KeyAction::Down => {
                let consumed = self.buffer.handle_key(ev);
                if consumed {
                    self.held.insert(ev.key_code);
                }
                consumed
            }
            KeyAction::Up => self.held.remove(&ev.key_code),
            KeyAction::Multiple => false,
        }
    }
}
