use tether_core::{EngineRequest, EngineSink, ImeAction, PlatformEvent, UiHandle, UiQueue};
use tether_input::{
    ControllerSubsystem, InputRouter, NoControllers, PlatformHost, RouteContext, RoutingDecision,
};
use tether_proxy::{LocalEdit, PlatformField, ProxyFieldController};

use crate::options::SessionOptions;

/// Everything one host window needs to bridge text and input to the engine.
///
/// A session lives on the UI thread. Engine-side threads talk to it through
/// [`Session::requests`]; the host calls [`Session::pump`] whenever the
/// queue's waker fires.
pub struct Session<F: PlatformField> {
    options: SessionOptions,
    proxy: ProxyFieldController<F>,
    router: InputRouter,
    requests: UiQueue<EngineRequest>,
    engine: Box<dyn EngineSink>,
    host: Box<dyn PlatformHost>,
    controllers: Box<dyn ControllerSubsystem>,
}

impl<F: PlatformField> Session<F> {
    pub fn new(
        mut proxy: ProxyFieldController<F>,
        engine: impl EngineSink + 'static,
        host: impl PlatformHost + 'static,
        options: SessionOptions,
    ) -> Self {
        proxy.configure(options.initial_field_kind);
        Self {
            options,
            proxy,
            router: InputRouter::new(),
            requests: UiQueue::new(),
            engine: Box::new(engine),
            host: Box::new(host),
            controllers: Box::new(NoControllers),
        }
    }

    pub fn with_controllers(mut self, controllers: impl ControllerSubsystem + 'static) -> Self {
        self.controllers = Box::new(controllers);
        self
    }

    /// `wake` runs on every post, including posts through handles taken
    /// before this call.
    pub fn with_request_waker(self, wake: impl Fn() + Send + Sync + 'static) -> Self {
        self.requests.set_waker(wake);
        self
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn proxy(&self) -> &ProxyFieldController<F> {
        &self.proxy
    }

    pub fn proxy_mut(&mut self) -> &mut ProxyFieldController<F> {
        &mut self.proxy
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    /// Producer end for engine threads.
    pub fn requests(&self) -> UiHandle<EngineRequest> {
        self.requests.handle()
    }

    pub fn pending_requests(&self) -> usize {
        self.requests.len()
    }

    /// Applies queued engine requests in posting order. Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let mut n = 0;
        while let Some(req) = self.requests.pop() {
            self.apply(req);
            n += 1;
        }
        n
    }

    /// Runs one engine request immediately. Must be called on the UI thread.
    pub fn apply(&mut self, req: EngineRequest) {
        log::trace!("engine request {req:?}");
        match req {
            EngineRequest::ShowField(kind) => {
                self.proxy.show(kind);
                self.show_soft_input_if_needed();
            }
            EngineRequest::HideField { clear_text } => self.proxy.defocus(clear_text),
            EngineRequest::FocusWidget {
                widget_id,
                text,
                sel_start,
                sel_end,
                kind,
            } => {
                self.proxy.configure(kind);
                self.proxy
                    .focus_for_widget(widget_id, &text, sel_start, sel_end);
                self.show_soft_input_if_needed();
            }
            EngineRequest::OpenUrl(url) => self.host.open_url(&url),
        }
    }

    /// Routes one key or motion event.
    pub fn dispatch(&mut self, event: &PlatformEvent) -> RoutingDecision {
        let mut cx = RouteContext {
            proxy: &mut self.proxy,
            engine: self.engine.as_mut(),
            host: self.host.as_mut(),
            controllers: self.controllers.as_mut(),
        };
        self.router.dispatch(event, &mut cx)
    }

    /// Input-method edit reported by the proxy field.
    pub fn on_local_edit(&mut self, edit: &LocalEdit) -> bool {
        self.proxy.on_local_edit(edit, self.engine.as_mut())
    }

    pub fn on_editor_action(&mut self, action: ImeAction) -> bool {
        self.proxy.on_editor_action(action, self.engine.as_mut())
    }

    /// Selection moved by something other than the input method.
    pub fn on_selection_moved(&mut self) -> bool {
        self.proxy.sync_after_external_navigation(self.engine.as_mut())
    }

    pub fn on_window_focus_changed(&mut self, focused: bool) {
        if !focused && self.options.defocus_on_window_blur && self.proxy.is_focused() {
            log::debug!("window lost focus; dropping text focus");
            self.proxy.defocus(false);
        }
    }

    pub fn has_hardware_keyboard(&self) -> bool {
        self.host.has_hardware_keyboard()
    }

    fn show_soft_input_if_needed(&mut self) {
        if self.host.has_hardware_keyboard() {
            log::debug!("hardware keyboard attached; not showing soft input");
        } else {
            self.proxy.show_soft_input();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc::{self, Receiver};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use tether_core::{
        EngineEvent, FieldKind, InputType, KeyCode, KeyEvent, KeyboardType, TextSnapshot,
    };
    use tether_proxy::{ImeHost, MemoryField};

    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Host {
        keyboard: Rc<RefCell<KeyboardType>>,
        log: Log,
    }

    impl PlatformHost for Host {
        fn keyboard_type(&self) -> KeyboardType {
            *self.keyboard.borrow()
        }

        fn on_back_pressed(&mut self, _ev: &KeyEvent) {
            self.log.borrow_mut().push("back".into());
        }

        fn open_url(&mut self, url: &str) {
            self.log.borrow_mut().push(format!("url {url}"));
        }
    }

    struct Ime(Log);

    impl ImeHost for Ime {
        fn restart_input(&mut self) {
            self.0.borrow_mut().push("restart".into());
        }
        fn show_soft_input(&mut self) {
            self.0.borrow_mut().push("show".into());
        }
        fn hide_soft_input(&mut self) {
            self.0.borrow_mut().push("hide".into());
        }
        fn refocus_surface(&mut self) {
            self.0.borrow_mut().push("surface".into());
        }
    }

    struct Fixture {
        session: Session<MemoryField>,
        events: Receiver<EngineEvent>,
        keyboard: Rc<RefCell<KeyboardType>>,
        log: Log,
    }

    fn fixture(options: SessionOptions) -> Fixture {
        let log: Log = Rc::default();
        let keyboard = Rc::new(RefCell::new(KeyboardType::NoKeys));
        let (tx, events) = mpsc::channel();
        let proxy = ProxyFieldController::new(MemoryField::new).with_ime(Ime(log.clone()));
        let host = Host {
            keyboard: keyboard.clone(),
            log: log.clone(),
        };
        Fixture {
            session: Session::new(proxy, tx, host, options),
            events,
            keyboard,
            log,
        }
    }

    fn focus(widget_id: i32, text: &str) -> EngineRequest {
        let n = text.chars().count() as i32;
        EngineRequest::FocusWidget {
            widget_id,
            text: text.into(),
            sel_start: n,
            sel_end: n,
            kind: FieldKind::PlainText,
        }
    }

    fn snapshots(rx: &Receiver<EngineEvent>) -> Vec<TextSnapshot> {
        rx.try_iter()
            .filter_map(|e| match e {
                EngineEvent::TextState(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn requests_apply_in_posting_order() {
        let mut fx = fixture(SessionOptions::default());
        let handle = fx.session.requests();
        handle.post(focus(1, "one")).unwrap();
        handle.post(focus(2, "two")).unwrap();
        handle
            .post(EngineRequest::HideField { clear_text: true })
            .unwrap();
        assert_eq!(fx.session.pending_requests(), 3);

        assert_eq!(fx.session.pump(), 3);
        assert_eq!(fx.session.pump(), 0);
        assert!(!fx.session.proxy().is_visible());
        assert_eq!(fx.session.proxy().field().unwrap().text(), "");
    }

    #[test]
    fn requests_posted_from_another_thread() {
        let mut fx = fixture(SessionOptions::default());
        let handle = fx.session.requests();
        thread::spawn(move || {
            handle.post(focus(9, "remote")).unwrap();
        })
        .join()
        .unwrap();

        fx.session.pump();
        assert_eq!(fx.session.proxy().widget_id(), 9);
        assert_eq!(fx.session.proxy().field().unwrap().text(), "remote");
        assert!(fx.session.proxy().is_focused());
    }

    #[test]
    fn waker_fires_on_post() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let fx = fixture(SessionOptions::default());
        let early = fx.session.requests();
        let mut session = fx.session.with_request_waker(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        session.requests().post(EngineRequest::ShowField(FieldKind::Email)).unwrap();
        early.post(EngineRequest::HideField { clear_text: false }).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(session.pump(), 2);
    }

    #[test]
    fn soft_input_only_without_hardware_keyboard() {
        let mut fx = fixture(SessionOptions::default());
        fx.session.apply(focus(1, "a"));
        assert!(fx.log.borrow().iter().any(|l| l == "show"));

        fx.log.borrow_mut().clear();
        *fx.keyboard.borrow_mut() = KeyboardType::Qwerty;
        fx.session.apply(EngineRequest::ShowField(FieldKind::Numeric));
        assert!(fx.session.has_hardware_keyboard());
        assert!(!fx.log.borrow().iter().any(|l| l == "show"));
    }

    #[test]
    fn focus_request_configures_field_kind() {
        let mut fx = fixture(SessionOptions::default());
        fx.session.apply(EngineRequest::FocusWidget {
            widget_id: 4,
            text: "x".into(),
            sel_start: 1,
            sel_end: 1,
            kind: FieldKind::Password,
        });
        let ty = fx.session.proxy().field().unwrap().input_type();
        assert!(ty.contains(InputType::CLASS_TEXT | InputType::TEXT_VARIATION_PASSWORD));
    }

    #[test]
    fn open_url_goes_to_host() {
        let mut fx = fixture(SessionOptions::default());
        fx.session
            .apply(EngineRequest::OpenUrl("https://example.org".into()));
        assert_eq!(*fx.log.borrow(), vec!["url https://example.org".to_string()]);
    }

    #[test]
    fn local_edits_reach_the_engine() {
        let mut fx = fixture(SessionOptions::default());
        fx.session.apply(focus(3, "ab"));
        assert!(fx.session.on_local_edit(&LocalEdit::commit("c")));

        let pushed = snapshots(&fx.events);
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].widget_id, 3);
        assert_eq!(pushed[0].text, "abc");
        assert_eq!((pushed[0].selection_start, pushed[0].selection_end), (3, 3));
    }

    #[test]
    fn editor_next_is_forwarded() {
        let mut fx = fixture(SessionOptions::default());
        fx.session.apply(focus(5, ""));
        assert!(fx.session.on_editor_action(ImeAction::Next));
        let events: Vec<_> = fx.events.try_iter().collect();
        assert!(events.contains(&EngineEvent::EditorNextAction(5)));
    }

    #[test]
    fn blur_defocuses_when_enabled() {
        let mut fx = fixture(SessionOptions::default());
        fx.session.apply(focus(1, "a"));
        fx.session.on_window_focus_changed(true);
        assert!(fx.session.proxy().is_focused());
        fx.session.on_window_focus_changed(false);
        assert!(!fx.session.proxy().is_focused());

        let mut fx = fixture(SessionOptions {
            defocus_on_window_blur: false,
            ..SessionOptions::default()
        });
        fx.session.apply(focus(1, "a"));
        fx.session.on_window_focus_changed(false);
        assert!(fx.session.proxy().is_focused());
    }

    #[test]
    fn dispatch_forwards_unfocused_keys() {
        let mut fx = fixture(SessionOptions::default());
        let ev = PlatformEvent::Key(KeyEvent::down(KeyCode::DPAD_UP));
        assert_eq!(
            fx.session.dispatch(&ev),
            RoutingDecision::ForwardedToEngineAsKey
        );
        let events: Vec<_> = fx.events.try_iter().collect();
        assert_eq!(events, vec![EngineEvent::Key(KeyEvent::down(KeyCode::DPAD_UP))]);
    }

    #[test]
    fn initial_kind_is_applied() {
        let fx = fixture(SessionOptions::default().with_field_kind(FieldKind::Email));
        let info = fx.session.proxy().editor_info();
        assert_eq!(info.input_type, FieldKind::Email.input_type());

        let plain = fixture(SessionOptions::default());
        assert_eq!(
            plain.session.proxy().editor_info().input_type,
            FieldKind::PlainText.input_type()
        );
    }

    #[test]
    fn lazily_created_field_uses_initial_kind() {
        let mut fx = fixture(SessionOptions::default().with_field_kind(FieldKind::Numeric));
        // focus without a kind-carrying request
        fx.session.proxy_mut().focus_for_widget(1, "42", 2, 2);
        let ty = fx.session.proxy().field().unwrap().input_type();
        assert_eq!(ty, InputType::CLASS_NUMBER);
        assert!(!ty.contains(InputType::CLASS_TEXT));
    }
}
