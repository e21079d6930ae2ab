//! # Text and input synchronization core
//!
//! A game engine draws its own text widgets while the platform only knows
//! about one native proxy text field. This crate holds the pieces both sides
//! agree on:
//!
//! - [`TextSyncState`]: the engine-facing mirror of the proxy field (owning
//!   widget, text, selection, composing span, echo suppression).
//! - [`EngineSink`] / [`EngineRequest`]: the calls crossing the engine boundary.
//! - [`UiQueue`]: FIFO hand-off of engine requests onto the UI thread.
//! - the raw platform input model ([`KeyEvent`], [`MotionEvent`], ...).
//!
//! ## Echo suppression
//!
//! Authoritative updates from the engine are applied under an [`EchoGuard`].
//! While the guard lives, nothing observed on the field is pushed back:
//!
//! ```rust
//! use tether_core::*;
//!
//! let st = TextSyncState::new().apply_external_text(2, "hello", 4, 1);
//! assert_eq!(st.selection(), (1, 4));
//! assert!(!st.suppress_echo);
//! ```

pub mod engine;
pub mod error;
pub mod field;
pub mod input;
pub mod queue;
pub mod sync;

pub use engine::*;
pub use error::*;
pub use field::*;
pub use input::*;
pub use queue::*;
pub use sync::*;
