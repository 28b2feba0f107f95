//! JS Bridge for WASM ↔ HTML communication
//!
//! The host page drives the board with `CustomEvent`s dispatched on `window`:
//! `board:control`, `board:focus` and `app:gotoShelf`. Each listener decodes
//! the event detail (an object, or a JSON string) and forwards it to the
//! event bus on the window target. Malformed details are dropped there.
//!
//! On native builds the bridge is a no-op.

use crate::bus::EventBus;

#[cfg(target_arch = "wasm32")]
use crate::bus::Target;
#[cfg(target_arch = "wasm32")]
use agrolink_types::{EVENT_CONTROL, EVENT_FOCUS, EVENT_GOTO_SHELF};
#[cfg(target_arch = "wasm32")]
use serde_json::Value;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::CustomEvent;

/// Listens for board events on `window`.
pub struct JsBridge {
    bus: EventBus,
}

impl JsBridge {
    /// Register listeners. `repaint` is asked for a frame after each event so
    /// the board reacts while idle.
    pub fn new(bus: EventBus, repaint: egui::Context) -> Self {
        #[cfg(target_arch = "wasm32")]
        Self::setup_listeners(&bus, &repaint);

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = repaint;
            tracing::debug!("JsBridge: native build, no window listeners");
        }

        Self { bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    #[cfg(target_arch = "wasm32")]
    fn setup_listeners(bus: &EventBus, repaint: &egui::Context) {
        use wasm_bindgen::closure::Closure;

        let Some(window) = web_sys::window() else {
            tracing::warn!("JsBridge: no window, board events from the page are disabled");
            return;
        };

        for name in [EVENT_CONTROL, EVENT_FOCUS, EVENT_GOTO_SHELF] {
            let bus = bus.clone();
            let ctx = repaint.clone();
            let callback = Closure::<dyn Fn(CustomEvent)>::new(move |event: CustomEvent| {
                let detail = decode_detail(&event.detail());
                if bus.dispatch_named(Target::Window, name, &detail) {
                    ctx.request_repaint();
                }
            });
            if let Err(e) =
                window.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
            {
                tracing::warn!("JsBridge: failed to listen for {}: {:?}", name, e);
            }
            callback.forget();
        }

        tracing::info!("JsBridge: event listeners registered on window");
    }
}

/// Event detail as JSON. Strings are parsed as JSON documents.
#[cfg(target_arch = "wasm32")]
fn decode_detail(detail: &JsValue) -> Value {
    if let Some(text) = detail.as_string() {
        return serde_json::from_str(&text).unwrap_or(Value::Null);
    }
    serde_wasm_bindgen::from_value(detail.clone()).unwrap_or(Value::Null)
}
