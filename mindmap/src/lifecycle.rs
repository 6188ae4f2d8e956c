use crate::error::Result;
use crate::host::{Canvas, Deferred, KeyRegistry, Scheduled};
use crate::keymap::Chord;
use crate::mode::Mode;
use crate::{Mindmap, Outcome};
use log::{debug, info, warn};

enum Slot<C> {
    /// Loaded, waiting for the host to hand over its canvas.
    Pending,
    Ready(C),
    /// Unloaded; no canvas will be accepted again.
    Closed,
}

/// Host lifecycle around a [`Mindmap`]: key registration on load, one-shot canvas
/// attachment, teardown on unload.
pub struct Plugin<C, H> {
    mindmap: Mindmap,
    slot: Slot<C>,
    handles: Vec<H>,
}

impl<C: Canvas, H> Plugin<C, H> {
    pub fn new(mindmap: Mindmap) -> Self {
        Plugin { mindmap, slot: Slot::Pending, handles: Vec::new() }
    }

    pub fn mindmap(&self) -> &Mindmap { &self.mindmap }
    pub fn mindmap_mut(&mut self) -> &mut Mindmap { &mut self.mindmap }

    pub fn canvas(&self) -> Option<&C> {
        match &self.slot {
            Slot::Ready(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool { matches!(self.slot, Slot::Ready(_)) }
    pub fn is_closed(&self) -> bool { matches!(self.slot, Slot::Closed) }
    pub fn registered(&self) -> usize { self.handles.len() }

    /// Register every keymap chord. If the host rejects one, the ones already
    /// registered are rolled back and the error is returned.
    pub fn load<R: KeyRegistry<Handle = H>>(&mut self, registry: &mut R) -> Result<usize> {
        if self.is_closed() {
            warn!("load after unload ignored");
            return Ok(0);
        }
        if !self.handles.is_empty() {
            warn!("keymap already registered");
            return Ok(0);
        }
        let chords: Vec<Chord> = self.mindmap.keymap().chords().cloned().collect();
        for chord in &chords {
            match registry.register(chord) {
                Ok(h) => self.handles.push(h),
                Err(e) => {
                    for h in self.handles.drain(..) {
                        registry.unregister(h);
                    }
                    return Err(e);
                }
            }
        }
        info!("registered {} key bindings", self.handles.len());
        Ok(self.handles.len())
    }

    /// Hand over the host canvas. Accepted once; later calls, and calls after
    /// unload, are rejected.
    pub fn attach(&mut self, canvas: C) -> bool {
        match self.slot {
            Slot::Pending => {
                self.slot = Slot::Ready(canvas);
                info!("canvas attached");
                true
            }
            Slot::Ready(_) => {
                warn!("canvas already attached");
                false
            }
            Slot::Closed => {
                warn!("canvas offered after unload");
                false
            }
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        self.canvas().map(|c| self.mindmap.mode(c))
    }

    pub fn on_key(&mut self, chord: &Chord, now_ms: f64) -> Result<Outcome> {
        match &mut self.slot {
            Slot::Ready(canvas) => self.mindmap.dispatch(canvas, chord, now_ms),
            _ => {
                debug!("{} before canvas is ready", chord);
                Ok(Outcome::Noop)
            }
        }
    }

    pub fn run_deferred(&mut self, task: Deferred) -> Result<Outcome> {
        match &mut self.slot {
            Slot::Ready(canvas) => self.mindmap.run_deferred(canvas, task),
            _ => Ok(Outcome::Noop),
        }
    }

    pub fn take_scheduled(&mut self) -> Vec<Scheduled> {
        self.mindmap.take_scheduled()
    }

    /// Unregister every binding, drop the canvas and any queued work.
    pub fn unload<R: KeyRegistry<Handle = H>>(&mut self, registry: &mut R) {
        let n = self.handles.len();
        for h in self.handles.drain(..) {
            registry.unregister(h);
        }
        self.mindmap.clear_transient();
        self.slot = Slot::Closed;
        info!("unloaded, {} key bindings removed", n);
    }
}
