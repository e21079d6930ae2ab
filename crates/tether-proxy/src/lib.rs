//! Proxy text field controller.
//!
//! The platform routes all input-method traffic to one native text field.
//! [`ProxyFieldController`] lends that field to whichever engine widget has
//! logical focus and keeps both sides consistent:
//!
//! - engine -> field: `focus_for_widget`, `configure`, `show`, `defocus`
//! - field -> engine: `on_local_edit`, `sync_after_external_navigation`,
//!   `dispatch_key`, `on_editor_action`
//!
//! [`MemoryField`] is a headless [`PlatformField`] for tests and for hosts
//! without a native widget.

pub mod buffer;
pub mod controller;
pub mod memory;
pub mod platform;

pub use buffer::EditBuffer;
pub use controller::ProxyFieldController;
pub use memory::MemoryField;
pub use platform::{ImeHost, LocalEdit, PlatformField};
