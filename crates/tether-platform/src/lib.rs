//! Host-side wiring for the tether IME bridge.
//!
//! A [`Session`] owns the proxy field controller, the input router and the
//! UI-thread request queue. The host window creates one, installs logging
//! through [`logging::init`], forwards its platform events and pumps engine
//! requests on the UI thread.
//!
//! ```no_run
//! use tether_core::{EngineEvent, EngineRequest, FieldKind, KeyboardType, KeyEvent};
//! use tether_input::PlatformHost;
//! use tether_platform::{Session, SessionOptions, logging};
//! use tether_proxy::{MemoryField, ProxyFieldController};
//!
//! struct Window;
//!
//! impl PlatformHost for Window {
//!     fn keyboard_type(&self) -> KeyboardType {
//!         KeyboardType::NoKeys
//!     }
//!     fn on_back_pressed(&mut self, _ev: &KeyEvent) {}
//!     fn open_url(&mut self, url: &str) {
//!         println!("open {url}");
//!     }
//! }
//!
//! let options = SessionOptions::default();
//! logging::init(options.log_level).expect("logger");
//!
//! let (engine, _events) = std::sync::mpsc::channel::<EngineEvent>();
//! let proxy = ProxyFieldController::new(MemoryField::new);
//! let mut session = Session::new(proxy, engine, Window, options);
//!
//! session
//!     .requests()
//!     .post(EngineRequest::ShowField(FieldKind::Email))
//!     .expect("queue open");
//! session.pump();
//! ```

pub mod logging;
pub mod options;
pub mod session;
#[cfg(feature = "winit")]
pub mod winit_bridge;

pub use options::SessionOptions;
pub use session::Session;
