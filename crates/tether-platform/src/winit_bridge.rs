//! Conversions from winit window events into the platform event model.
//!
//! Hosts that drive their window through winit feed touches and keys through
//! [`Session::dispatch`](crate::Session::dispatch) and IME events through
//! [`Session::on_local_edit`](crate::Session::on_local_edit).

use tether_core::{KeyAction, KeyCode, KeyEvent, MetaState, MotionEvent, Pointer};
use tether_proxy::LocalEdit;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, Ime, Touch, TouchPhase};
use winit::keyboard::{KeyCode as WinitKey, ModifiersState, PhysicalKey};

pub fn touch_event(touch: &Touch) -> MotionEvent {
    touch_from_parts(touch.id, touch.phase, touch.location)
}

/// Single-pointer touch event. Ids that do not fit a pointer id become -1,
/// which the router ignores.
pub fn touch_from_parts(id: u64, phase: TouchPhase, location: PhysicalPosition<f64>) -> MotionEvent {
    let action = match phase {
        TouchPhase::Started => 0,
        TouchPhase::Ended => 1,
        TouchPhase::Moved => 2,
        TouchPhase::Cancelled => 3,
    };
    let pointer = Pointer {
        id: i32::try_from(id).unwrap_or(-1),
        x: location.x as f32,
        y: location.y as f32,
    };
    MotionEvent::touch(action, [pointer])
}

/// `Enabled` carries no edit.
pub fn ime_edit(ime: &Ime) -> Option<LocalEdit> {
    match ime {
        Ime::Enabled => None,
        Ime::Preedit(text, _) => Some(LocalEdit::composing(text.as_str())),
        Ime::Commit(text) => Some(LocalEdit::commit(text.as_str())),
        Ime::Disabled => Some(LocalEdit::FinishComposing),
    }
}

pub fn key_code(key: PhysicalKey) -> Option<KeyCode> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    Some(match code {
        WinitKey::ArrowUp => KeyCode::DPAD_UP,
        WinitKey::ArrowDown => KeyCode::DPAD_DOWN,
        WinitKey::ArrowLeft => KeyCode::DPAD_LEFT,
        WinitKey::ArrowRight => KeyCode::DPAD_RIGHT,
        WinitKey::Enter | WinitKey::NumpadEnter => KeyCode::ENTER,
        WinitKey::Backspace => KeyCode::DEL,
        WinitKey::Delete => KeyCode::FORWARD_DEL,
        WinitKey::Home => KeyCode::MOVE_HOME,
        WinitKey::End => KeyCode::MOVE_END,
        WinitKey::Tab => KeyCode::TAB,
        WinitKey::Space => KeyCode::SPACE,
        WinitKey::Escape => KeyCode::ESCAPE,
        WinitKey::BrowserBack => KeyCode::BACK,
        WinitKey::KeyA => KeyCode::A,
        _ => return None,
    })
}

pub fn meta_state(mods: ModifiersState) -> MetaState {
    let mut meta = MetaState::empty();
    meta.set(MetaState::SHIFT_ON, mods.shift_key());
    meta.set(MetaState::CTRL_ON, mods.control_key());
    meta.set(MetaState::ALT_ON, mods.alt_key());
    meta.set(MetaState::META_ON, mods.super_key());
    meta
}

/// Keys without a mapped code still come through when they produce text.
/// `modifiers` is the state last reported by `WindowEvent::ModifiersChanged`.
pub fn key_event(
    key: PhysicalKey,
    state: ElementState,
    repeat: bool,
    text: Option<&str>,
    modifiers: ModifiersState,
) -> Option<KeyEvent> {
    let ch = text.and_then(|t| t.chars().next());
    let code = match (key_code(key), ch) {
        (Some(code), _) => code,
        (None, Some(_)) => KeyCode::UNKNOWN,
        (None, None) => return None,
    };
    let action = match state {
        ElementState::Pressed => KeyAction::Down,
        ElementState::Released => KeyAction::Up,
    };
    let mut ev = KeyEvent::new(code, action).with_meta(meta_state(modifiers));
    if let Some(ch) = ch {
        ev = ev.with_char(ch);
    }
    ev.repeat_count = i32::from(repeat);
    Some(ev)
}

#[cfg(test)]
mod tests {
    use tether_core::{MotionAction, TouchPhase as Phase};

    use super::*;

    #[test]
    fn touch_phases_map_to_motion_actions() {
        let at = PhysicalPosition::new(12.7, 30.2);
        let down = touch_from_parts(2, TouchPhase::Started, at);
        assert_eq!(down.action, MotionAction::Down);
        assert_eq!(down.action.touch_phase(), Some(Phase::PressedDown));
        assert_eq!(down.pointers[0].id, 2);
        assert_eq!(down.pointers[0].x as i32, 12);

        let cancel = touch_from_parts(2, TouchPhase::Cancelled, at);
        assert_eq!(cancel.action.touch_phase(), Some(Phase::LeftUp));

        let huge = touch_from_parts(u64::MAX, TouchPhase::Moved, at);
        assert_eq!(huge.pointers[0].id, -1);
    }

    #[test]
    fn ime_events_become_edits() {
        assert_eq!(ime_edit(&Ime::Enabled), None);
        assert_eq!(
            ime_edit(&Ime::Preedit("ka".into(), Some((2, 2)))),
            Some(LocalEdit::composing("ka"))
        );
        assert_eq!(
            ime_edit(&Ime::Commit("か".into())),
            Some(LocalEdit::commit("か"))
        );
        assert_eq!(ime_edit(&Ime::Disabled), Some(LocalEdit::FinishComposing));
    }

    #[test]
    fn keys_map_to_platform_codes() {
        let ev = key_event(
            PhysicalKey::Code(WinitKey::ArrowLeft),
            ElementState::Pressed,
            false,
            None,
            ModifiersState::empty(),
        )
        .unwrap();
        assert_eq!(ev.key_code, KeyCode::DPAD_LEFT);
        assert!(ev.meta.is_empty());
        assert!(ev.is_down());

        let ev = key_event(
            PhysicalKey::Code(WinitKey::KeyQ),
            ElementState::Released,
            true,
            Some("q"),
            ModifiersState::empty(),
        )
        .unwrap();
        assert_eq!(ev.key_code, KeyCode::UNKNOWN);
        assert_eq!(ev.char(), Some('q'));
        assert_eq!(ev.repeat_count, 1);

        assert!(
            key_event(
                PhysicalKey::Code(WinitKey::F5),
                ElementState::Pressed,
                false,
                None,
                ModifiersState::empty(),
            )
            .is_none()
        );
    }

    #[test]
    fn modifiers_reach_meta_state() {
        let ev = key_event(
            PhysicalKey::Code(WinitKey::KeyA),
            ElementState::Pressed,
            false,
            Some("a"),
            ModifiersState::CONTROL,
        )
        .unwrap();
        assert_eq!(ev.key_code, KeyCode::A);
        assert_eq!(ev.meta, MetaState::CTRL_ON);

        let meta = meta_state(ModifiersState::SHIFT | ModifiersState::ALT);
        assert_eq!(meta, MetaState::SHIFT_ON | MetaState::ALT_ON);
    }
}
