use crate::interop::{call, describe};
use crate::Shared;
use js_sys::Array;
use mindmap::{Chord, Error, KeyRegistry, Result};
use std::cell::RefCell;
use std::rc::Weak;
use wasm_bindgen::prelude::*;

type Handler = Closure<dyn FnMut(JsValue, JsValue) -> std::result::Result<JsValue, JsValue>>;

/// [`KeyRegistry`] over the host's keymap scope (`register(modifiers, key, fn)` /
/// `unregister(handle)`). Owns the handler closures so they live as long as their
/// registration.
pub struct JsScope {
    scope: JsValue,
    shared: Weak<RefCell<Shared>>,
    handlers: Vec<(JsValue, Handler)>,
}

impl JsScope {
    pub fn new(scope: JsValue, shared: Weak<RefCell<Shared>>) -> JsScope {
        JsScope { scope, shared, handlers: Vec::new() }
    }

    /// A scope with nothing registered, for tearing down a plugin that never loaded.
    pub fn detached() -> JsScope {
        JsScope::new(JsValue::UNDEFINED, Weak::new())
    }
}

impl KeyRegistry for JsScope {
    type Handle = JsValue;

    fn register(&mut self, chord: &Chord) -> Result<JsValue> {
        let weak = self.shared.clone();
        let bound = chord.clone();
        let handler: Handler = Closure::new(move |_evt: JsValue, _ctx: JsValue| {
            if let Some(shared) = weak.upgrade() {
                crate::dispatch(&shared, &bound).map_err(|e| crate::error::to_exception(&e))?;
            }
            // handled; stop the host's default for this key
            Ok(JsValue::FALSE)
        });
        let mods: JsValue = chord.modifiers.names().into_iter().map(JsValue::from_str).collect::<Array>().into();
        let handle = call(&self.scope, "register", &[&mods, &JsValue::from_str(&chord.key), handler.as_ref()])
        .map_err(|e| Error::Host(describe(&e)))?;
        self.handlers.push((handle.clone(), handler));
        Ok(handle)
    }

    fn unregister(&mut self, handle: JsValue) {
        if let Err(e) = call(&self.scope, "unregister", &[&handle]) {
            log::warn!("unregister failed: {}", describe(&e));
        }
        self.handlers.retain(|(h, _)| *h != handle);
    }
}
