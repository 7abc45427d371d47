#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the PortfolioRunner.
//!
//! This module wraps [`StepPortfolio`] with JS-friendly types. Only compiled
//! on `wasm32` targets.

use core::time::Duration;

use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use folio_core::{DomEvent, ElementId, IntersectionEntry, KeyCode, KeyEvent, Modifiers, ObserverKind};

use crate::step_portfolio::StepPortfolio;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = match info.location() {
                Some(loc) => format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                ),
                None => format!("panic: {info}"),
            };
            console_error(&msg);
        }));
    });
}

/// Host milliseconds; negative and non-finite values read as zero.
fn duration_from_ms(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

/// Portfolio view-state runner.
///
/// Host-driven: JavaScript forwards page events, keeps the shadow document's
/// layout facts current, advances time each frame, and applies the drained
/// patches. Event methods return `true` when the host should call
/// `preventDefault()`.
#[wasm_bindgen]
pub struct PortfolioRunner {
    inner: StepPortfolio,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl PortfolioRunner {
    /// Create a runner from the markup description and optional config JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(markup_json: &str, config_json: Option<String>) -> Result<PortfolioRunner, JsValue> {
        install_panic_hook();
        StepPortfolio::from_json(markup_json, config_json.as_deref())
            .map(|inner| Self { inner })
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Signal `DOMContentLoaded`; builds the components. Call once.
    pub fn ready(&mut self) -> bool {
        self.inner.ready()
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    /// Advance the deterministic clock by `dt_ms`; returns timers fired.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) -> u32 {
        self.inner.advance_time(duration_from_ms(dt_ms)) as u32
    }

    /// Set the clock to absolute milliseconds (replay mode); returns timers fired.
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, ts_ms: f64) -> u32 {
        self.inner.set_time(duration_from_ms(ts_ms)) as u32
    }

    /// Milliseconds until the host should call `advanceTime` again, if any
    /// timer is pending.
    #[wasm_bindgen(js_name = nextDeadlineMs)]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.inner
            .next_deadline()
            .map(|at| at.saturating_sub(self.inner.now()).as_secs_f64() * 1000.0)
    }

    // --- layout mirroring ---

    #[wasm_bindgen(js_name = setOffsetTop)]
    pub fn set_offset_top(&mut self, element: u32, top: f64) {
        self.inner.dom_mut().set_offset_top(ElementId(element), top);
    }

    #[wasm_bindgen(js_name = setParent)]
    pub fn set_parent(&mut self, child: u32, parent: u32) {
        self.inner
            .dom_mut()
            .set_parent(ElementId(child), ElementId(parent));
    }

    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&mut self, element: u32, value: String) {
        self.inner.dom_mut().set_value(ElementId(element), value);
    }

    #[wasm_bindgen(js_name = setActiveElement)]
    pub fn set_active_element(&mut self, element: Option<u32>) {
        self.inner
            .dom_mut()
            .set_active_element(element.map(ElementId));
    }

    /// Tab-ordered focusable descendants of `container`.
    #[wasm_bindgen(js_name = setFocusables)]
    pub fn set_focusables(&mut self, container: u32, elements: Vec<u32>) {
        self.inner.dom_mut().set_focusables(
            ElementId(container),
            elements.into_iter().map(ElementId).collect(),
        );
    }

    // --- events ---

    pub fn scroll(&mut self, offset: f64) -> bool {
        self.dispatch(DomEvent::Scroll { offset })
    }

    pub fn click(&mut self, target: u32) -> bool {
        self.dispatch(DomEvent::Click {
            target: ElementId(target),
        })
    }

    /// `key` is `KeyboardEvent.key`; `mods` bitmask: `1=shift`, `2=alt`,
    /// `4=ctrl`, `8=meta`.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, mods: u8) -> bool {
        self.dispatch(DomEvent::KeyDown(
            KeyEvent::new(KeyCode::from_dom_key(key))
                .with_modifiers(Modifiers::from_bits_truncate(mods)),
        ))
    }

    /// A control's value changed to `value`.
    pub fn input(&mut self, target: u32, value: String) -> bool {
        self.inner
            .type_into(ElementId(target), value)
            .is_some_and(|outcome| outcome.default_prevented())
    }

    pub fn blur(&mut self, target: u32) -> bool {
        self.dispatch(DomEvent::Blur {
            target: ElementId(target),
        })
    }

    pub fn submit(&mut self, form: u32) -> bool {
        self.dispatch(DomEvent::Submit {
            form: ElementId(form),
        })
    }

    /// `observer` is one of `reveal`, `skillBar`, `lazyImage`. Unknown
    /// observers are ignored.
    pub fn intersect(&mut self, observer: &str, target: u32, is_intersecting: bool) -> bool {
        let Some(observer) = ObserverKind::from_name(observer) else {
            console_error(&format!("unknown observer: {observer}"));
            return false;
        };
        self.dispatch(DomEvent::Intersect(IntersectionEntry {
            observer,
            target: ElementId(target),
            is_intersecting,
        }))
    }

    #[wasm_bindgen(js_name = mouseEnter)]
    pub fn mouse_enter(&mut self, target: u32) -> bool {
        self.dispatch(DomEvent::MouseEnter {
            target: ElementId(target),
        })
    }

    /// Parse a JSON-encoded input and queue it for the next `step`.
    /// Returns `true` if accepted, `false` if dropped/unknown/malformed.
    #[wasm_bindgen(js_name = pushEncodedInput)]
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        match self.inner.push_encoded_input(json) {
            Ok(accepted) => accepted,
            Err(err) => {
                console_error(&err.to_string());
                false
            }
        }
    }

    /// Fire due timers, then dispatch queued inputs; returns events processed.
    pub fn step(&mut self) -> u32 {
        self.inner.step().events as u32
    }

    /// Drain pending patches as JSONL.
    #[wasm_bindgen(js_name = takePatchesJsonl)]
    pub fn take_patches_jsonl(&mut self) -> Result<String, JsValue> {
        self.inner
            .take_patches_jsonl()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Events discarded because they arrived before `ready`.
    #[wasm_bindgen(js_name = droppedEvents)]
    pub fn dropped_events(&self) -> u32 {
        self.inner.dropped_events() as u32
    }
}

impl PortfolioRunner {
    fn dispatch(&mut self, event: DomEvent) -> bool {
        self.inner
            .dispatch(event)
            .is_some_and(|outcome| outcome.default_prevented())
    }
}
