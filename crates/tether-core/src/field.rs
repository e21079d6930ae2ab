use bitflags::bitflags;

/// Input affordance requested by the engine for the focused widget.
///
/// The integer codes are a fixed contract with the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum FieldKind {
    #[default]
    PlainText = 0,
    SentenceCapitalized = 1,
    Password = 2,
    Numeric = 3,
    Email = 4,
}

impl FieldKind {
    /// Decodes an engine code; unknown values fall back to `PlainText`.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => FieldKind::SentenceCapitalized,
            2 => FieldKind::Password,
            3 => FieldKind::Numeric,
            4 => FieldKind::Email,
            _ => FieldKind::PlainText,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn input_type(self) -> InputType {
        match self {
            FieldKind::PlainText => InputType::CLASS_TEXT,
            FieldKind::SentenceCapitalized => {
                InputType::CLASS_TEXT | InputType::TEXT_FLAG_CAP_SENTENCES
            }
            FieldKind::Password => InputType::CLASS_TEXT | InputType::TEXT_VARIATION_PASSWORD,
            FieldKind::Numeric => InputType::CLASS_NUMBER,
            FieldKind::Email => InputType::CLASS_TEXT | InputType::TEXT_VARIATION_EMAIL_ADDRESS,
        }
    }
}

impl From<i32> for FieldKind {
    fn from(code: i32) -> Self {
        FieldKind::from_code(code)
    }
}

bitflags! {
    /// Platform input-type bits (Android `InputType` values).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InputType: u32 {
        const CLASS_TEXT = 0x0000_0001;
        const CLASS_NUMBER = 0x0000_0002;
        const TEXT_VARIATION_EMAIL_ADDRESS = 0x0000_0020;
        const TEXT_VARIATION_PASSWORD = 0x0000_0080;
        const TEXT_FLAG_CAP_SENTENCES = 0x0000_4000;
    }
}

bitflags! {
    /// Editor options handed to the input method (Android `EditorInfo.imeOptions`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ImeOptions: u32 {
        const ACTION_NEXT = 0x0000_0005;
        const FLAG_NO_FULLSCREEN = 0x0200_0000;
        const FLAG_NO_EXTRACT_UI = 0x1000_0000;
    }
}

/// Editor action reported by the input method (enter/next key on the soft keyboard).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImeAction {
    Done,
    Go,
    Next,
    Previous,
    Search,
    Send,
    Other(i32),
}

impl ImeAction {
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => ImeAction::Go,
            3 => ImeAction::Search,
            4 => ImeAction::Send,
            5 => ImeAction::Next,
            6 => ImeAction::Done,
            7 => ImeAction::Previous,
            other => ImeAction::Other(other),
        }
    }
}

/// What the proxy field advertises when an input connection is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditorInfo {
    pub input_type: InputType,
    pub ime_options: ImeOptions,
}

impl EditorInfo {
    pub fn for_input_type(input_type: InputType) -> Self {
        Self {
            input_type,
            ime_options: ImeOptions::ACTION_NEXT
                | ImeOptions::FLAG_NO_FULLSCREEN
                | ImeOptions::FLAG_NO_EXTRACT_UI,
        }
    }
}
