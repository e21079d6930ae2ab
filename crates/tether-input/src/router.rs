use std::slice;

use tether_core::{
    EngineSink, KeyAction, KeyCode, KeyEvent, MotionEvent, PlatformEvent, Pointer, TouchPhase,
};
use tether_proxy::{PlatformField, ProxyFieldController};

use crate::host::{ControllerSubsystem, PlatformHost};
use crate::touch::{SlotUpdate, TouchSlot, TouchSlots};

/// Where a platform event ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutingDecision {
    ConsumedByController,
    ForwardedToEngineAsKey,
    ForwardedToEngineAsTouch,
    RoutedToProxyField,
    Swallowed,
}

/// Collaborators an event may be routed to.
pub struct RouteContext<'a, F: PlatformField> {
    pub proxy: &'a mut ProxyFieldController<F>,
    pub engine: &'a mut dyn EngineSink,
    pub host: &'a mut dyn PlatformHost,
    pub controllers: &'a mut dyn ControllerSubsystem,
}

/// Per-window input dispatch.
#[derive(Clone, Debug, Default)]
pub struct InputRouter {
    touches: TouchSlots,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touches(&self) -> &TouchSlots {
        &self.touches
    }

    pub fn dispatch<F: PlatformField>(
        &mut self,
        event: &PlatformEvent,
        cx: &mut RouteContext<'_, F>,
    ) -> RoutingDecision {
        let decision = match event {
            PlatformEvent::Key(ev) => self.dispatch_key(ev, cx),
            PlatformEvent::Touch(ev) => self.dispatch_touch(ev, cx),
            PlatformEvent::GenericMotion(ev) => self.dispatch_generic_motion(ev, cx),
        };
        log::debug!("routed {event:?} -> {decision:?}");
        decision
    }

    /// Key priority: controller, back, then either the hardware keyboard path
    /// or the platform default handling followed by directional forwarding.
    /// A key is never both consumed by the platform and forwarded.
    pub fn dispatch_key<F: PlatformField>(
        &mut self,
        ev: &KeyEvent,
        cx: &mut RouteContext<'_, F>,
    ) -> RoutingDecision {
        if ev.source.is_game_controller()
            && matches!(ev.action, KeyAction::Down | KeyAction::Up)
            && cx.controllers.handle_key(ev)
        {
            return RoutingDecision::ConsumedByController;
        }

        if ev.key_code == KeyCode::BACK {
            cx.proxy.on_key_pre_ime(ev);
            if ev.is_down() {
                cx.host.on_back_pressed(ev);
            }
            return RoutingDecision::Swallowed;
        }

        if cx.host.has_hardware_keyboard() {
            if cx.proxy.is_focused() {
                cx.proxy.defocus(true);
            }
            cx.engine.forward_key(ev);
            return RoutingDecision::ForwardedToEngineAsKey;
        }

        let by_field = cx.proxy.dispatch_key(ev, cx.engine);
        let consumed = by_field || cx.host.default_key(ev);
        if cx.proxy.is_focused() {
            cx.proxy.sync_after_external_navigation(cx.engine);
        }
        if consumed {
            return if by_field {
                RoutingDecision::RoutedToProxyField
            } else {
                RoutingDecision::Swallowed
            };
        }

        if ev.key_code.is_directional() {
            cx.engine.forward_key(ev);
            return RoutingDecision::ForwardedToEngineAsKey;
        }
        RoutingDecision::Swallowed
    }

    pub fn dispatch_generic_motion<F: PlatformField>(
        &mut self,
        ev: &MotionEvent,
        cx: &mut RouteContext<'_, F>,
    ) -> RoutingDecision {
        if cx.controllers.handle_motion(ev) {
            return RoutingDecision::ConsumedByController;
        }
        cx.host.default_motion(ev);
        RoutingDecision::Swallowed
    }

    /// Forwards each pointer whose `(phase, x, y)` changed since the last
    /// forward. Moves cover every active pointer; other actions only the
    /// pointer they name.
    pub fn dispatch_touch<F: PlatformField>(
        &mut self,
        ev: &MotionEvent,
        cx: &mut RouteContext<'_, F>,
    ) -> RoutingDecision {
        if cx.host.dispatch_touch_to_views(ev) {
            return RoutingDecision::Swallowed;
        }
        let Some(phase) = ev.action.touch_phase() else {
            return RoutingDecision::Swallowed;
        };

        let pointers: &[Pointer] = if phase == TouchPhase::Moved {
            &ev.pointers
        } else {
            ev.action_pointer().map(slice::from_ref).unwrap_or(&[])
        };

        let mut forwarded = false;
        for p in pointers {
            let slot = TouchSlot {
                phase,
                x: p.x as i32,
                y: p.y as i32,
            };
            match self.touches.update(p.id, slot) {
                SlotUpdate::Changed => {
                    cx.engine.forward_touch(p.id, slot.x, slot.y, phase);
                    forwarded = true;
                }
                SlotUpdate::Unchanged => log::trace!("touch {} unchanged", p.id),
                SlotUpdate::OutOfRange => log::debug!("touch id {} not tracked", p.id),
            }
        }

        if forwarded {
            RoutingDecision::ForwardedToEngineAsTouch
        } else {
            RoutingDecision::Swallowed
        }
    }
}
