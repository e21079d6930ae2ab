//! Collaborator interfaces of the native proxy field.

use tether_core::{FieldError, InputType, KeyEvent};

/// An edit reported by the platform's input-method connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocalEdit {
    SetComposingText { text: String, new_cursor: i32 },
    SetComposingRegion { start: i32, end: i32 },
    FinishComposing,
    CommitText { text: String, new_cursor: i32 },
    DeleteSurrounding { before: i32, after: i32 },
}

impl LocalEdit {
    pub fn composing(text: impl Into<String>) -> Self {
        LocalEdit::SetComposingText {
            text: text.into(),
            new_cursor: 1,
        }
    }

    pub fn commit(text: impl Into<String>) -> Self {
        LocalEdit::CommitText {
            text: text.into(),
            new_cursor: 1,
        }
    }
}

/// The single native text field that receives input-method traffic.
///
/// Offsets are char indices. Mutating calls may fail on a real platform;
/// callers treat failures as best-effort.
pub trait PlatformField {
    fn text(&self) -> String;
    fn selection(&self) -> (usize, usize);

    fn set_text(&mut self, text: &str) -> Result<(), FieldError>;
    fn set_selection(&mut self, start: usize, end: usize) -> Result<(), FieldError>;
    /// Drops composing spans without deleting text.
    fn clear_composing_text(&mut self) -> Result<(), FieldError>;
    fn clear(&mut self) -> Result<(), FieldError>;

    fn input_type(&self) -> InputType;
    fn set_input_type(&mut self, input_type: InputType);

    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool) -> Result<(), FieldError>;
    fn is_focused(&self) -> bool;
    fn request_focus(&mut self) -> Result<(), FieldError>;
    fn clear_focus(&mut self) -> Result<(), FieldError>;

    /// Lets the field's own editing buffer apply an input-method edit.
    fn apply_edit(&mut self, edit: &LocalEdit) -> bool;
    /// The field's native key handling. Returns true when consumed.
    fn handle_key(&mut self, ev: &KeyEvent) -> bool;
}

/// The platform input-method manager as seen from the proxy field.
pub trait ImeHost {
    /// Field content changed outside the normal input flow; discard any
    /// in-flight composition.
    fn restart_input(&mut self);
    fn show_soft_input(&mut self);
    fn hide_soft_input(&mut self);
    /// Hands focus back to the game surface once the field is hidden.
    fn refocus_surface(&mut self);
}
