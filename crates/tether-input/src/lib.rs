//! Input routing for a window that hosts both an engine surface and the
//! proxy text field.
//!
//! [`InputRouter`] decides for every key, touch and generic motion event
//! whether the controller subsystem, the engine or the proxy field gets it.
//! Touch updates are de-duplicated per touch id through [`TouchSlots`].

pub mod host;
pub mod router;
pub mod touch;

pub use host::{ControllerSubsystem, NoControllers, PlatformHost};
pub use router::{InputRouter, RouteContext, RoutingDecision};
pub use touch::{MAX_TOUCH_SLOTS, SlotUpdate, TouchSlot, TouchSlots};
