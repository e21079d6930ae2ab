use tether_core::{KeyEvent, KeyboardType, MotionEvent};

/// The window the router is attached to.
pub trait PlatformHost {
    /// Current keyboard configuration. Queried per event since keyboards can
    /// be attached and detached at runtime.
    fn keyboard_type(&self) -> KeyboardType;

    fn has_hardware_keyboard(&self) -> bool {
        self.keyboard_type().is_hardware()
    }

    /// Window-level default key handling, after the focused field had its turn.
    fn default_key(&mut self, _ev: &KeyEvent) -> bool {
        false
    }

    fn default_motion(&mut self, _ev: &MotionEvent) -> bool {
        false
    }

    /// Offers a touch to the platform's own view hierarchy first.
    fn dispatch_touch_to_views(&mut self, _ev: &MotionEvent) -> bool {
        false
    }

    fn on_back_pressed(&mut self, ev: &KeyEvent);

    fn open_url(&mut self, url: &str);
}

/// Game controller handling (buttons, sticks, triggers).
pub trait ControllerSubsystem {
    fn handle_key(&mut self, ev: &KeyEvent) -> bool;
    fn handle_motion(&mut self, ev: &MotionEvent) -> bool;
}

/// For hosts without controller support.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoControllers;

impl ControllerSubsystem for NoControllers {
    fn handle_key(&mut self, _ev: &KeyEvent) -> bool {
        false
    }

    fn handle_motion(&mut self, _ev: &MotionEvent) -> bool {
        false
    }
}
