use std::sync::mpsc::Sender;

use crate::field::FieldKind;
use crate::input::{KeyEvent, TouchPhase};
use crate::sync::TextSyncState;

/// Full field state as pushed to the engine after a local change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSnapshot {
    pub widget_id: i32,
    pub text: String,
    pub selection_start: usize,
    pub selection_end: usize,
    pub composing_start: usize,
    pub composing_end: usize,
}

impl From<&TextSyncState> for TextSnapshot {
    fn from(st: &TextSyncState) -> Self {
        Self {
            widget_id: st.widget_id,
            text: st.text.clone(),
            selection_start: st.selection_start,
            selection_end: st.selection_end,
            composing_start: st.composing_start,
            composing_end: st.composing_end,
        }
    }
}

/// Calls the core makes into the engine.
pub trait EngineSink {
    fn push_text_state(&mut self, snapshot: &TextSnapshot);
    fn forward_key(&mut self, key: &KeyEvent);
    fn forward_touch(&mut self, id: i32, x: i32, y: i32, phase: TouchPhase);
    /// IME "next field" action on the focused widget.
    fn notify_editor_next_action(&mut self, widget_id: i32);
    /// Caret hit the left or right boundary and wants to leave the widget.
    fn notify_editor_left_right(&mut self, is_left: bool, widget_id: i32);
}

/// An outward call captured as a value, for delivery on another thread.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    TextState(TextSnapshot),
    Key(KeyEvent),
    Touch {
        id: i32,
        x: i32,
        y: i32,
        phase: TouchPhase,
    },
    EditorNextAction(i32),
    EditorLeftRight {
        is_left: bool,
        widget_id: i32,
    },
}

impl EngineEvent {
    /// Replays this event on a live sink.
    pub fn deliver(&self, sink: &mut dyn EngineSink) {
        match self {
            EngineEvent::TextState(s) => sink.push_text_state(s),
            EngineEvent::Key(k) => sink.forward_key(k),
            EngineEvent::Touch { id, x, y, phase } => sink.forward_touch(*id, *x, *y, *phase),
            EngineEvent::EditorNextAction(w) => sink.notify_editor_next_action(*w),
            EngineEvent::EditorLeftRight { is_left, widget_id } => {
                sink.notify_editor_left_right(*is_left, *widget_id)
            }
        }
    }
}

impl EngineSink for Vec<EngineEvent> {
    fn push_text_state(&mut self, snapshot: &TextSnapshot) {
        self.push(EngineEvent::TextState(snapshot.clone()));
    }

    fn forward_key(&mut self, key: &KeyEvent) {
        self.push(EngineEvent::Key(key.clone()));
    }

    fn forward_touch(&mut self, id: i32, x: i32, y: i32, phase: TouchPhase) {
        self.push(EngineEvent::Touch { id, x, y, phase });
    }

    fn notify_editor_next_action(&mut self, widget_id: i32) {
        self.push(EngineEvent::EditorNextAction(widget_id));
    }

    fn notify_editor_left_right(&mut self, is_left: bool, widget_id: i32) {
        self.push(EngineEvent::EditorLeftRight { is_left, widget_id });
    }
}

impl EngineSink for Sender<EngineEvent> {
    fn push_text_state(&mut self, snapshot: &TextSnapshot) {
        send_or_log(self, EngineEvent::TextState(snapshot.clone()));
    }

    fn forward_key(&mut self, key: &KeyEvent) {
        send_or_log(self, EngineEvent::Key(key.clone()));
    }

    fn forward_touch(&mut self, id: i32, x: i32, y: i32, phase: TouchPhase) {
        send_or_log(self, EngineEvent::Touch { id, x, y, phase });
    }

    fn notify_editor_next_action(&mut self, widget_id: i32) {
        send_or_log(self, EngineEvent::EditorNextAction(widget_id));
    }

    fn notify_editor_left_right(&mut self, is_left: bool, widget_id: i32) {
        send_or_log(self, EngineEvent::EditorLeftRight { is_left, widget_id });
    }
}

fn send_or_log(tx: &Sender<EngineEvent>, ev: EngineEvent) {
    if tx.send(ev).is_err() {
        log::debug!("engine receiver dropped; event discarded");
    }
}

/// Requests the engine posts to the UI-owning thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineRequest {
    ShowField(FieldKind),
    HideField {
        clear_text: bool,
    },
    FocusWidget {
        widget_id: i32,
        text: String,
        sel_start: i32,
        sel_end: i32,
        kind: FieldKind,
    },
    OpenUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    #[test]
    fn recorded_events_replay_in_order() {
        let mut log: Vec<EngineEvent> = Vec::new();
        log.forward_touch(1, 10, 20, TouchPhase::PressedDown);
        log.notify_editor_next_action(4);
        log.forward_key(&KeyEvent::down(KeyCode::DPAD_LEFT));

        let mut replay: Vec<EngineEvent> = Vec::new();
        for ev in &log {
            ev.deliver(&mut replay);
        }
        assert_eq!(log, replay);
    }

    #[test]
    fn channel_sink_tolerates_dropped_receiver() {
        let (mut tx, rx) = std::sync::mpsc::channel::<EngineEvent>();
        tx.notify_editor_left_right(true, 2);
        assert_eq!(
            rx.recv().ok(),
            Some(EngineEvent::EditorLeftRight {
                is_left: true,
                widget_id: 2
            })
        );
        drop(rx);
        tx.notify_editor_next_action(2);
    }

    #[test]
    fn snapshot_copies_every_range() {
        let mut st = TextSyncState::new().apply_external_text(7, "hello", 1, 3);
        st.set_composing_region(3, 5);
        let snap = TextSnapshot::from(&st);
        assert_eq!(snap.widget_id, 7);
        assert_eq!((snap.selection_start, snap.selection_end), (1, 3));
        assert_eq!((snap.composing_start, snap.composing_end), (3, 5));
    }
}
