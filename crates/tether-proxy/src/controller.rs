use tether_core::{
    EchoGuard, EditorInfo, EngineSink, FieldError, FieldKind, ImeAction, InputType, KeyCode,
    KeyEvent, TextSnapshot, TextSyncState, infer_composing_span_from_commit,
};

use crate::platform::{ImeHost, LocalEdit, PlatformField};

/// Owns the native proxy field and its [`TextSyncState`].
///
/// Engine-driven calls (`configure`, `show`, `focus_for_widget`, `defocus`)
/// apply authoritative state under echo suppression. Platform-driven calls
/// (`on_local_edit`, `sync_after_external_navigation`, `dispatch_key`)
/// observe the field and push the result to the engine.
///
/// Every method must run on the UI-owning thread.
pub struct ProxyFieldController<F: PlatformField> {
    field: Option<F>,
    factory: Box<dyn FnMut() -> F>,
    ime: Option<Box<dyn ImeHost>>,
    state: TextSyncState,
    input_type: InputType,
    last_push: Option<TextSnapshot>,
}

impl<F: PlatformField> ProxyFieldController<F> {
    /// `factory` creates the platform field the first time it is needed.
    pub fn new(factory: impl FnMut() -> F + 'static) -> Self {
        Self {
            field: None,
            factory: Box::new(factory),
            ime: None,
            state: TextSyncState::new(),
            input_type: FieldKind::PlainText.input_type(),
            last_push: None,
        }
    }

    pub fn with_ime(mut self, ime: impl ImeHost + 'static) -> Self {
        self.ime = Some(Box::new(ime));
        self
    }

    /// `None` models an input-method manager that is currently unavailable.
    pub fn set_ime(&mut self, ime: Option<Box<dyn ImeHost>>) {
        self.ime = ime;
    }

    pub fn state(&self) -> &TextSyncState {
        &self.state
    }

    pub fn field(&self) -> Option<&F> {
        self.field.as_ref()
    }

    pub fn field_mut(&mut self) -> Option<&mut F> {
        self.field.as_mut()
    }

    pub fn widget_id(&self) -> i32 {
        self.state.widget_id
    }

    pub fn is_focused(&self) -> bool {
        self.field.as_ref().is_some_and(|f| f.is_focused())
    }

    pub fn is_visible(&self) -> bool {
        self.field.as_ref().is_some_and(|f| f.is_visible())
    }

    /// Attributes for a new input-method connection.
    pub fn editor_info(&self) -> EditorInfo {
        EditorInfo::for_input_type(self.input_type)
    }

    pub fn configure(&mut self, kind: FieldKind) {
        let input_type = kind.input_type();
        self.input_type = input_type;
        if let Some(field) = self.field.as_mut()
            && field.input_type() != input_type
        {
            log::debug!("proxy field input type -> {kind:?}");
            field.set_input_type(input_type);
        }
    }

    /// Shows the field and focuses it without changing the owning widget.
    pub fn show(&mut self, kind: FieldKind) {
        self.configure(kind);
        let was_hidden = !self.is_visible();
        if was_hidden {
            self.state.reset();
            self.last_push = None;
        }
        let field = ensure_field(&mut self.field, &mut self.factory, self.input_type);
        let result = {
            let _guard = EchoGuard::new(&mut self.state);
            reveal(field, was_hidden)
        };
        if let Err(e) = result {
            log::warn!("showing proxy field failed: {e}");
        }
    }

    /// Hands the proxy field to `widget_id` with the engine's text and selection.
    pub fn focus_for_widget(&mut self, widget_id: i32, text: &str, sel_start: i32, sel_end: i32) {
        let was_hidden = !self.is_visible();
        if was_hidden {
            self.state.reset();
        }
        self.last_push = None;

        let field = ensure_field(&mut self.field, &mut self.factory, self.input_type);
        let result = {
            let mut guard = EchoGuard::new(&mut self.state);
            apply_external(field, &mut guard, was_hidden, widget_id, text, sel_start, sel_end)
        };
        match result {
            Ok(true) => match self.ime.as_mut() {
                Some(ime) => ime.restart_input(),
                None => log::debug!("no input method manager; skipping restart"),
            },
            Ok(false) => {}
            Err(e) => log::warn!("focusing proxy field for widget {widget_id} failed: {e}"),
        }
    }

    /// Removes focus, hides the field and dismisses the soft keyboard.
    pub fn defocus(&mut self, clear_text: bool) {
        if let Some(field) = self.field.as_mut()
            && let Err(e) = hide(field, &mut self.state, clear_text)
        {
            log::warn!("hiding proxy field failed: {e}");
        }
        if let Some(ime) = self.ime.as_mut() {
            ime.hide_soft_input();
            ime.refocus_surface();
        }
    }

    pub fn show_soft_input(&mut self) {
        if let Some(ime) = self.ime.as_mut() {
            ime.show_soft_input();
        }
    }

    /// Applies an input-method edit and pushes the result to the engine.
    /// Returns whether the field's buffer accepted the edit.
    pub fn on_local_edit(&mut self, edit: &LocalEdit, engine: &mut dyn EngineSink) -> bool {
        let Some(field) = self.field.as_mut() else {
            log::debug!("input method edit without a proxy field: {edit:?}");
            return false;
        };
        let accepted = field.apply_edit(edit);
        self.state.observe(field.text(), field.selection());

        match edit {
            LocalEdit::SetComposingText { text, .. } => {
                let (start, end) = infer_composing_span_from_commit(&self.state.text, text);
                self.state.set_composing_region(start, end);
            }
            LocalEdit::SetComposingRegion { start, end } => {
                self.state
                    .set_composing_region((*start).max(0) as usize, (*end).max(0) as usize);
                self.state.clamp_composing();
            }
            LocalEdit::FinishComposing | LocalEdit::CommitText { .. } => {
                self.state.clear_composing();
            }
            LocalEdit::DeleteSurrounding { .. } => self.state.clamp_composing(),
        }

        self.push(engine);
        accepted
    }

    /// Input-method editor action (soft keyboard enter/next).
    pub fn on_editor_action(&mut self, action: ImeAction, engine: &mut dyn EngineSink) -> bool {
        if action == ImeAction::Next {
            engine.notify_editor_next_action(self.state.widget_id);
            return true;
        }
        false
    }

    /// Re-reads the field after something outside the input-method flow may
    /// have moved the caret, and pushes it unless nothing changed since the
    /// last push. Returns whether a push happened.
    pub fn sync_after_external_navigation(&mut self, engine: &mut dyn EngineSink) -> bool {
        let Some(field) = self.field.as_ref() else {
            return false;
        };
        if !field.is_focused() || self.state.suppress_echo {
            return false;
        }
        self.state.observe(field.text(), field.selection());
        self.state.clamp_composing();

        let snapshot = TextSnapshot::from(&self.state);
        if self.last_push.as_ref() == Some(&snapshot) {
            log::trace!("navigation sync unchanged; not pushed");
            return false;
        }
        log::debug!("push {snapshot:?}");
        engine.push_text_state(&snapshot);
        self.last_push = Some(snapshot);
        true
    }

    /// Runs before the input method sees a key. Releasing back leaves the
    /// field; the key itself is never consumed here.
    pub fn on_key_pre_ime(&mut self, ev: &KeyEvent) -> bool {
        if ev.key_code == KeyCode::BACK && ev.is_up() && self.is_focused() {
            self.defocus(false);
        }
        false
    }

    /// Key handling of the focused field: boundary navigation and enter are
    /// turned into engine notifications, everything else goes to the field's
    /// native handling. Returns true when consumed.
    pub fn dispatch_key(&mut self, ev: &KeyEvent, engine: &mut dyn EngineSink) -> bool {
        let Some(field) = self.field.as_ref() else {
            return false;
        };
        if !field.is_focused() {
            return false;
        }
        let widget_id = self.state.widget_id;
        let (sel_start, sel_end) = field.selection();
        let at_end = sel_end >= tether_core::char_len(&field.text());

        match ev.key_code {
            KeyCode::DPAD_UP | KeyCode::DPAD_DOWN => {
                // leave the field; the engine gets the key itself
                if ev.is_down() {
                    self.defocus(true);
                }
                return false;
            }
            KeyCode::DPAD_LEFT if sel_start == 0 => {
                self.leave_sideways(ev, true, widget_id, engine);
                return true;
            }
            KeyCode::DPAD_RIGHT if at_end => {
                self.leave_sideways(ev, false, widget_id, engine);
                return true;
            }
            KeyCode::ENTER => {
                if ev.is_down() {
                    engine.notify_editor_next_action(widget_id);
                }
                return true;
            }
            _ => {}
        }

        self.field.as_mut().is_some_and(|f| f.handle_key(ev))
    }

    fn leave_sideways(
        &mut self,
        ev: &KeyEvent,
        is_left: bool,
        widget_id: i32,
        engine: &mut dyn EngineSink,
    ) {
        if ev.is_down() {
            self.defocus(true);
            engine.notify_editor_left_right(is_left, widget_id);
        } else {
            self.sync_after_external_navigation(engine);
        }
    }

    fn push(&mut self, engine: &mut dyn EngineSink) {
        if self.state.suppress_echo {
            return;
        }
        let snapshot = TextSnapshot::from(&self.state);
        log::debug!("push {snapshot:?}");
        engine.push_text_state(&snapshot);
        self.last_push = Some(snapshot);
    }
}

fn ensure_field<'a, F: PlatformField>(
    slot: &'a mut Option<F>,
    factory: &mut Box<dyn FnMut() -> F>,
    input_type: InputType,
) -> &'a mut F {
    slot.get_or_insert_with(|| {
        log::info!("creating proxy field");
        let mut field = factory();
        field.set_input_type(input_type);
        field
    })
}

fn reveal<F: PlatformField>(field: &mut F, clear: bool) -> Result<(), FieldError> {
    if clear {
        field.clear_composing_text()?;
        field.clear()?;
    }
    if !field.is_visible() {
        log::info!("showing proxy field");
        field.set_visible(true)?;
    }
    field.request_focus()
}

// Returns whether the field text was replaced.
fn apply_external<F: PlatformField>(
    field: &mut F,
    state: &mut TextSyncState,
    was_hidden: bool,
    widget_id: i32,
    text: &str,
    sel_start: i32,
    sel_end: i32,
) -> Result<bool, FieldError> {
    if was_hidden {
        field.clear_composing_text()?;
        field.clear()?;
    }
    let changed = field.text() != text;
    state.write_external(widget_id, text, sel_start, sel_end);
    if changed {
        field.clear_composing_text()?;
        field.set_text(text)?;
        state.clear_composing();
    }
    field.set_selection(state.selection_start, state.selection_end)?;
    reveal(field, false)?;
    Ok(changed)
}

fn hide<F: PlatformField>(
    field: &mut F,
    state: &mut TextSyncState,
    clear_text: bool,
) -> Result<(), FieldError> {
    if clear_text {
        let mut guard = EchoGuard::new(state);
        field.clear_composing_text()?;
        field.clear()?;
        guard.text.clear();
        guard.selection_start = 0;
        guard.selection_end = 0;
        guard.clear_composing();
    }
    field.clear_focus()?;
    if field.is_visible() {
        log::info!("hiding proxy field");
    }
    field.set_visible(false)
}
