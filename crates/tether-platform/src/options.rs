use log::LevelFilter;
use tether_core::FieldKind;

/// Knobs for a [`Session`](crate::Session).
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Kind the proxy field is configured with before the engine asks for one.
    pub initial_field_kind: FieldKind,
    /// Drop text focus when the host window loses focus.
    pub defocus_on_window_blur: bool,
    /// Level passed to [`logging::init`](crate::logging::init).
    pub log_level: LevelFilter,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            initial_field_kind: FieldKind::PlainText,
            defocus_on_window_blur: true,
            log_level: LevelFilter::Info,
        }
    }
}

impl SessionOptions {
    pub fn with_field_kind(mut self, kind: FieldKind) -> Self {
        self.initial_field_kind = kind;
        self
    }

    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }
}
