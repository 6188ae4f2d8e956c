use crate::canvas::JsCanvas;
use crate::scope::JsScope;
use crate::{error, Mindmap, Shared};
use mindmap::{Chord, Config, Modifiers, Settings};
use serde::Serialize;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Route `log` output to the browser console. Safe to call more than once.
#[wasm_bindgen]
pub fn init_logging() {
    let _ = console_log::init_with_level(log::Level::Info);
}

fn to_js<T: Serialize>(v: &T) -> Result<JsValue, String> {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).map_err(|e| e.to_string())
}

fn json_of(v: JsValue) -> Result<Option<serde_json::Value>, String> {
    if v.is_undefined() || v.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(v).map(Some).map_err(|e| e.to_string())
}

#[wasm_bindgen]
impl Mindmap {
    /// `config` may be omitted or partial; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Mindmap, JsValue> {
        let config: Config = match json_of(config) {
            Ok(None) => Config::default(),
            Ok(Some(v)) => serde_json::from_value(v).map_err(|e| error::invalid_config(e.to_string()))?,
            Err(msg) => return Err(error::invalid_config(msg)),
        };
        Ok(Mindmap::rs_new(mindmap::Mindmap::new(config)))
    }

    /// Register the keymap against the host's key scope. Returns `{ok, value: count}`.
    pub fn load(&mut self, scope: JsValue) -> JsValue {
        let weak = Rc::downgrade(&self.shared);
        let mut s = self.shared.borrow_mut();
        let Shared { plugin, scope: slot, .. } = &mut *s;
        let registry = slot.get_or_insert_with(|| JsScope::new(scope, weak));
        match plugin.load(registry) {
            Ok(n) => error::ok(JsValue::from_f64(n as f64)),
            Err(e) => {
                *slot = None;
                error::from_core(&e)
            }
        }
    }

    /// Hand over the live canvas. Only the first call after `load` is accepted.
    pub fn attach_canvas(&mut self, canvas: JsValue) -> bool {
        self.shared.borrow_mut().plugin.attach(JsCanvas::new(canvas))
    }

    pub fn is_ready(&self) -> bool {
        self.shared.borrow().plugin.is_ready()
    }

    /// Dispatch one key press, e.g. `handle_key("Alt", "ArrowUp")`.
    pub fn handle_key(&mut self, modifiers: &str, key: &str) -> JsValue {
        let chord = Chord::new(Modifiers::parse(modifiers), key);
        match crate::dispatch(&self.shared, &chord) {
            Ok(outcome) => match to_js(&outcome) {
                Ok(v) => error::ok(v),
                Err(msg) => error::err("host", msg, None),
            },
            Err(e) => error::from_core(&e),
        }
    }

    /// Merge persisted settings over the defaults. Returns the effective settings.
    pub fn load_settings(&mut self, data: JsValue) -> JsValue {
        let value = match json_of(data) {
            Ok(v) => v,
            Err(msg) => return error::err("settings", msg, None),
        };
        match Settings::from_json_value(value) {
            Ok(settings) => {
                self.shared.borrow_mut().plugin.mindmap_mut().set_settings(settings);
                self.settings()
            }
            Err(e) => error::from_core(&e),
        }
    }

    /// Current settings in their persisted shape, for the host's `saveData`.
    pub fn settings(&self) -> JsValue {
        let v = self.shared.borrow().plugin.mindmap().settings().to_json_value();
        match to_js(&v) {
            Ok(v) => error::ok(v),
            Err(msg) => error::err("settings", msg, None),
        }
    }

    pub fn set_auto_focus(&mut self, on: bool) -> JsValue {
        let mut settings = *self.shared.borrow().plugin.mindmap().settings();
        settings.auto_focus = on;
        self.shared.borrow_mut().plugin.mindmap_mut().set_settings(settings);
        self.settings()
    }

    /// `"touch"`, `"navigate"`, `"create"`, `"invalid"`, or `undefined` with no canvas.
    pub fn mode(&self) -> Option<String> {
        self.shared.borrow().plugin.mode().map(|m| m.as_str().to_owned())
    }

    /// Deferred edits waiting on a timeout.
    pub fn pending_timers(&self) -> u32 {
        crate::pending_timers(&self.shared) as u32
    }

    /// Unregister all bindings, cancel pending timers and drop the canvas.
    pub fn unload(&mut self) {
        let mut s = self.shared.borrow_mut();
        let mut registry = s.scope.take().unwrap_or_else(JsScope::detached);
        s.plugin.unload(&mut registry);
        crate::clear_timers(&mut s);
    }
}
