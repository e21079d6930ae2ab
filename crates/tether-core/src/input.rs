//! Raw platform input, in the platform's own integer vocabulary.

use bitflags::bitflags;
use smallvec::SmallVec;

/// Platform key code (Android `KeyEvent.KEYCODE_*`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode(pub i32);

impl KeyCode {
    pub const UNKNOWN: KeyCode = KeyCode(0);
    pub const BACK: KeyCode = KeyCode(4);
    pub const DPAD_UP: KeyCode = KeyCode(19);
    pub const DPAD_DOWN: KeyCode = KeyCode(20);
    pub const DPAD_LEFT: KeyCode = KeyCode(21);
    pub const DPAD_RIGHT: KeyCode = KeyCode(22);
    pub const DPAD_CENTER: KeyCode = KeyCode(23);
    pub const A: KeyCode = KeyCode(29);
    pub const TAB: KeyCode = KeyCode(61);
    pub const SPACE: KeyCode = KeyCode(62);
    pub const ENTER: KeyCode = KeyCode(66);
    pub const DEL: KeyCode = KeyCode(67);
    pub const BUTTON_A: KeyCode = KeyCode(96);
    pub const BUTTON_B: KeyCode = KeyCode(97);
    pub const BUTTON_START: KeyCode = KeyCode(108);
    pub const ESCAPE: KeyCode = KeyCode(111);
    pub const FORWARD_DEL: KeyCode = KeyCode(112);
    pub const MOVE_HOME: KeyCode = KeyCode(122);
    pub const MOVE_END: KeyCode = KeyCode(123);

    /// Up/down/left/right navigation keys.
    pub fn is_directional(self) -> bool {
        matches!(
            self,
            KeyCode::DPAD_UP | KeyCode::DPAD_DOWN | KeyCode::DPAD_LEFT | KeyCode::DPAD_RIGHT
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
    Multiple,
}

impl KeyAction {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => KeyAction::Down,
            1 => KeyAction::Up,
            _ => KeyAction::Multiple,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            KeyAction::Down => 0,
            KeyAction::Up => 1,
            KeyAction::Multiple => 2,
        }
    }
}

bitflags! {
    /// Modifier state (Android `KeyEvent.META_*`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MetaState: u32 {
        const SHIFT_ON = 0x0000_0001;
        const ALT_ON = 0x0000_0002;
        const SYM_ON = 0x0000_0004;
        const CTRL_ON = 0x0000_1000;
        const META_ON = 0x0001_0000;
        const CAPS_LOCK_ON = 0x0010_0000;
    }
}

bitflags! {
    /// Device source (Android `InputDevice.SOURCE_*`). Several sources share
    /// class bits, so test with `contains`, not `intersects`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InputSource: u32 {
        const KEYBOARD = 0x0000_0101;
        const DPAD = 0x0000_0201;
        const GAMEPAD = 0x0000_0401;
        const TOUCHSCREEN = 0x0000_1002;
        const MOUSE = 0x0000_2002;
        const JOYSTICK = 0x0100_0010;
    }
}

impl InputSource {
    pub fn is_game_controller(self) -> bool {
        self.contains(InputSource::GAMEPAD) || self.contains(InputSource::JOYSTICK)
    }
}

/// Keyboard reported by the platform configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyboardType {
    #[default]
    Undefined,
    NoKeys,
    Qwerty,
    TwelveKey,
}

impl KeyboardType {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => KeyboardType::NoKeys,
            2 => KeyboardType::Qwerty,
            3 => KeyboardType::TwelveKey,
            _ => KeyboardType::Undefined,
        }
    }

    /// A physical keyboard is attached.
    pub fn is_hardware(self) -> bool {
        self == KeyboardType::Qwerty
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyEvent {
    pub key_code: KeyCode,
    pub action: KeyAction,
    pub meta: MetaState,
    pub scan_code: i32,
    /// Unicode scalar produced by the key, 0 if none.
    pub unicode_char: u32,
    pub source: InputSource,
    pub repeat_count: i32,
}

impl KeyEvent {
    pub fn new(key_code: KeyCode, action: KeyAction) -> Self {
        Self {
            key_code,
            action,
            meta: MetaState::empty(),
            scan_code: 0,
            unicode_char: 0,
            source: InputSource::KEYBOARD,
            repeat_count: 0,
        }
    }

    pub fn down(key_code: KeyCode) -> Self {
        Self::new(key_code, KeyAction::Down)
    }

    pub fn up(key_code: KeyCode) -> Self {
        Self::new(key_code, KeyAction::Up)
    }

    pub fn with_source(mut self, source: InputSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_meta(mut self, meta: MetaState) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_char(mut self, ch: char) -> Self {
        self.unicode_char = ch as u32;
        self
    }

    pub fn is_down(&self) -> bool {
        self.action == KeyAction::Down
    }

    pub fn is_up(&self) -> bool {
        self.action == KeyAction::Up
    }

    pub fn char(&self) -> Option<char> {
        if self.unicode_char == 0 {
            None
        } else {
            char::from_u32(self.unicode_char)
        }
    }
}

/// Masked motion action code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionAction {
    Down,
    Up,
    Move,
    Cancel,
    Outside,
    PointerDown,
    PointerUp,
    Other(i32),
}

const ACTION_MASK: i32 = 0xff;
const ACTION_POINTER_INDEX_MASK: i32 = 0xff00;
const ACTION_POINTER_INDEX_SHIFT: i32 = 8;

impl MotionAction {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => MotionAction::Down,
            1 => MotionAction::Up,
            2 => MotionAction::Move,
            3 => MotionAction::Cancel,
            4 => MotionAction::Outside,
            5 => MotionAction::PointerDown,
            6 => MotionAction::PointerUp,
            other => MotionAction::Other(other),
        }
    }

    /// Splits a packed platform action into the action and its pointer index.
    pub fn decode(raw: i32) -> (MotionAction, usize) {
        let action = MotionAction::from_code(raw & ACTION_MASK);
        let index = ((raw & ACTION_POINTER_INDEX_MASK) >> ACTION_POINTER_INDEX_SHIFT) as usize;
        (action, index)
    }

    /// Touch phase for this action, `None` for actions the engine never sees.
    pub fn touch_phase(self) -> Option<TouchPhase> {
        match self {
            MotionAction::Down | MotionAction::PointerDown => Some(TouchPhase::PressedDown),
            MotionAction::Move => Some(TouchPhase::Moved),
            MotionAction::Up | MotionAction::PointerUp | MotionAction::Cancel => {
                Some(TouchPhase::LeftUp)
            }
            MotionAction::Outside | MotionAction::Other(_) => None,
        }
    }
}

/// Touch phase as decoded by the engine. The numeric values are fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TouchPhase {
    PressedDown = 0,
    LeftUp = 1,
    Moved = 2,
}

impl TouchPhase {
    pub fn engine_code(self) -> i32 {
        self as i32
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub id: i32,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisValue {
    pub axis: i32,
    pub value: f32,
}

/// A touch or generic motion event.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionEvent {
    pub source: InputSource,
    pub action: MotionAction,
    /// Index into `pointers` the action refers to.
    pub action_index: usize,
    pub pointers: SmallVec<[Pointer; 4]>,
    pub axes: SmallVec<[AxisValue; 4]>,
}

impl MotionEvent {
    /// Touch event from a packed platform action code.
    pub fn touch(raw_action: i32, pointers: impl IntoIterator<Item = Pointer>) -> Self {
        let (action, action_index) = MotionAction::decode(raw_action);
        Self {
            source: InputSource::TOUCHSCREEN,
            action,
            action_index,
            pointers: pointers.into_iter().collect(),
            axes: SmallVec::new(),
        }
    }

    /// Generic motion (joystick, trigger) event.
    pub fn axes(source: InputSource, axes: impl IntoIterator<Item = AxisValue>) -> Self {
        Self {
            source,
            action: MotionAction::Move,
            action_index: 0,
            pointers: SmallVec::new(),
            axes: axes.into_iter().collect(),
        }
    }

    pub fn action_pointer(&self) -> Option<&Pointer> {
        self.pointers.get(self.action_index)
    }
}

/// Everything the platform can deliver to the window.
#[derive(Clone, Debug, PartialEq)]
pub enum PlatformEvent {
    Key(KeyEvent),
    Touch(MotionEvent),
    GenericMotion(MotionEvent),
}
