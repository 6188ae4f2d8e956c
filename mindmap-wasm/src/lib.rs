use mindmap::{Chord, Deferred, Outcome, Plugin, Scheduled};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
mod api;
mod canvas;
mod error;
mod interop;
mod scope;

use canvas::JsCanvas;
use scope::JsScope;

pub(crate) struct Shared {
    pub(crate) plugin: Plugin<JsCanvas, JsValue>,
    pub(crate) scope: Option<JsScope>,
    pub(crate) timers: Vec<i32>,
}

#[wasm_bindgen]
pub struct Mindmap { pub(crate) shared: Rc<RefCell<Shared>> }

impl Mindmap {
    pub fn rs_new(mm: mindmap::Mindmap) -> Mindmap {
        let shared = Shared { plugin: Plugin::new(mm), scope: None, timers: Vec::new() };
        Mindmap { shared: Rc::new(RefCell::new(shared)) }
    }
}

/// Run one chord against the attached canvas and hand any deferred work to the
/// host's timer queue.
pub(crate) fn dispatch(shared: &Rc<RefCell<Shared>>, chord: &Chord) -> mindmap::Result<Outcome> {
    let (result, scheduled) = {
        let Ok(mut s) = shared.try_borrow_mut() else {
            log::warn!("{} ignored: dispatch already in progress", chord);
            return Ok(Outcome::Noop);
        };
        let r = s.plugin.on_key(chord, js_sys::Date::now());
        (r, s.plugin.take_scheduled())
    };
    schedule(shared, scheduled);
    result
}

fn schedule(shared: &Rc<RefCell<Shared>>, tasks: Vec<Scheduled>) {
    if tasks.is_empty() {
        return;
    }
    let Some(window) = web_sys::window() else {
        log::warn!("no window; dropping {} deferred task(s)", tasks.len());
        return;
    };
    for Scheduled { delay_ms, task } in tasks {
        let weak = Rc::downgrade(shared);
        // filled in once setTimeout hands back the id
        let timer = Rc::new(Cell::new(None::<i32>));
        let fired = Rc::clone(&timer);
        let cb = Closure::once_into_js(move || {
            if let Some(shared) = weak.upgrade() {
                fire(&shared, fired.get(), task);
            }
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms as i32) {
            Ok(id) => {
                timer.set(Some(id));
                shared.borrow_mut().timers.push(id);
            }
            Err(e) => log::error!("setTimeout failed: {}", interop::describe(&e)),
        }
    }
}

/// Body of a fired timeout: forget its id, then run the task.
fn fire(shared: &Rc<RefCell<Shared>>, timer: Option<i32>, task: Deferred) {
    let Ok(mut s) = shared.try_borrow_mut() else {
        log::warn!("deferred {:?} skipped: plugin busy", task);
        return;
    };
    if let Some(id) = timer {
        s.timers.retain(|t| *t != id);
    }
    if let Err(e) = s.plugin.run_deferred(task) {
        log::error!("deferred task failed: {}", e);
    }
}

/// Timeouts scheduled and not yet fired.
pub(crate) fn pending_timers(shared: &Rc<RefCell<Shared>>) -> usize {
    shared.borrow().timers.len()
}

pub(crate) fn clear_timers(s: &mut Shared) {
    if let Some(window) = web_sys::window() {
        for id in s.timers.drain(..) {
            window.clear_timeout_with_handle(id);
        }
    }
    s.timers.clear();
}
