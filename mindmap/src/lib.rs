pub mod config;
pub mod debounce;
pub mod error;
pub mod graph;
pub mod host;
pub mod json;
pub mod keymap;
pub mod lifecycle;
pub mod memory;
pub mod mode;
pub mod model;
pub mod geometry {
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod reflow;
    pub mod selector;
}

pub use config::{Config, Settings};
pub use error::{Error, Result};
pub use host::{Canvas, Deferred, KeyRegistry, Scheduled};
pub use keymap::{Action, Chord, Keymap, Modifiers, Operation, Placement};
pub use lifecycle::Plugin;
pub use memory::MemoryCanvas;
pub use mode::Mode;
pub use model::{Direction, Edge, Node, NodeId, Point, Selection, Side};

use algorithms::{reflow::reflow, selector};
use debounce::Debouncer;
use geometry::tolerance::{approx_eq, EPS_POS};
use graph::Neighbors;
use log::{debug, info, log_enabled, warn, Level};
use model::NewNode;
use rand::distributions::Alphanumeric;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const EDGE_ID_LEN: usize = 6;

/// What a single key action did to the canvas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Outcome {
    /// Nothing applicable in the current state.
    Noop,
    /// Dropped by the debouncer.
    Suppressed,
    /// No binding for the chord.
    Unbound,
    Created(NodeId),
    Navigated(NodeId),
    ModeChanged(Mode),
}

/// Keyboard mind-map controller. Holds configuration, settings and per-action state;
/// every operation reads the canvas, computes, and issues its mutations before
/// returning.
pub struct Mindmap {
    config: Config,
    settings: Settings,
    keymap: Keymap,
    debounce: Debouncer<Operation>,
    scheduled: Vec<Scheduled>,
    rng: SmallRng,
}

impl Default for Mindmap {
    fn default() -> Self {
        Mindmap::new(Config::default())
    }
}

impl Mindmap {
    pub fn new(config: Config) -> Mindmap {
        Mindmap::with_rng(config, SmallRng::from_entropy())
    }

    /// Deterministic edge ids, for tests and reproducible sessions.
    pub fn seeded(config: Config, seed: u64) -> Mindmap {
        Mindmap::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: Config, rng: SmallRng) -> Mindmap {
        Mindmap {
            config,
            settings: Settings::default(),
            keymap: Keymap::default(),
            debounce: Debouncer::new(config.debounce_ms),
            scheduled: Vec::new(),
            rng,
        }
    }

    pub fn config(&self) -> &Config { &self.config }
    pub fn settings(&self) -> &Settings { &self.settings }
    pub fn set_settings(&mut self, settings: Settings) { self.settings = settings; }
    pub fn keymap(&self) -> &Keymap { &self.keymap }

    /// Drain tasks queued since the last call. The host runs each after its delay
    /// through [`Mindmap::run_deferred`].
    pub fn take_scheduled(&mut self) -> Vec<Scheduled> {
        std::mem::take(&mut self.scheduled)
    }

    pub(crate) fn clear_transient(&mut self) {
        self.scheduled.clear();
        self.debounce.reset();
    }

    pub fn mode<C: Canvas + ?Sized>(&self, canvas: &C) -> Mode {
        Mode::classify(&canvas.selection())
    }

    /// Route a key chord to its action.
    pub fn dispatch<C: Canvas + ?Sized>(&mut self, canvas: &mut C, chord: &Chord, now_ms: f64) -> Result<Outcome> {
        let Some(action) = self.keymap.resolve(chord) else {
            return Ok(Outcome::Unbound);
        };
        if let Some(op) = action.operation() {
            if !self.debounce.admit(op, now_ms) {
                debug!("{:?} suppressed inside debounce window", action);
                return Ok(Outcome::Suppressed);
            }
        }
        self.perform(canvas, action)
    }

    pub fn perform<C: Canvas + ?Sized>(&mut self, canvas: &mut C, action: Action) -> Result<Outcome> {
        match action {
            Action::CreateChild => self.create_child(canvas),
            Action::CreateSibling(p) => self.create_sibling(canvas, p),
            Action::Navigate(d) => self.navigate(canvas, d),
            Action::Advance => self.advance(canvas),
            Action::Retreat => self.retreat(canvas),
        }
    }

    /// Add a node to the right of the selected one, connect it, and re-stack the
    /// selected node's child column.
    pub fn create_child<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Result<Outcome> {
        let Some(sel) = editable_single(canvas) else {
            debug!("create_child: no single non-editing selection");
            return Ok(Outcome::Noop);
        };
        let edges = canvas.edges_for_node(&sel.id);
        let children = resolve(canvas, &Neighbors::new(&edges).children(&sel.id));

        let y = children
            .iter()
            .map(|c| c.y)
            .reduce(f64::max)
            .map_or(sel.y, |max_y| max_y + self.config.nudge);
        let pos = Point { x: sel.x + sel.width + self.config.column_gap, y };
        let child = self.spawn_connected(canvas, &sel.id, NewNode::blank(pos, sel.size()))?;

        let mut column = children;
        column.push(child.clone());
        self.apply_reflow(canvas, &sel, column)?;
        self.zoom_to_node(canvas, &child.id)?;
        info!("created child {} under {}", child.id, sel.id);
        Ok(Outcome::Created(child.id))
    }

    /// Add a node next to the selected one under the same (first) parent.
    pub fn create_sibling<C: Canvas + ?Sized>(&mut self, canvas: &mut C, placement: Placement) -> Result<Outcome> {
        let Some(sel) = editable_single(canvas) else {
            debug!("create_sibling: no single non-editing selection");
            return Ok(Outcome::Noop);
        };
        let mut edges = canvas.edges_for_node(&sel.id);
        let Some(parent_id) = Neighbors::new(&edges).parent(&sel.id) else {
            debug!("create_sibling: {} has no parent", sel.id);
            return Ok(Outcome::Noop);
        };
        let parent = canvas.node(&parent_id).ok_or(Error::UnknownNode(parent_id))?;
        edges.extend(canvas.edges_for_node(&parent.id));
        let siblings = resolve(canvas, &Neighbors::new(&edges).siblings(&sel.id));

        let dy = match placement {
            Placement::Above => -self.config.nudge,
            Placement::Below => self.config.nudge,
        };
        let pos = Point { x: sel.x, y: sel.y + dy };
        let node = self.spawn_connected(canvas, &parent.id, NewNode::blank(pos, sel.size()))?;

        // the parent's column: the selection, its siblings and the new node
        let mut column = vec![sel.clone()];
        column.extend(siblings);
        column.push(node.clone());
        self.apply_reflow(canvas, &parent, column)?;
        self.zoom_to_node(canvas, &node.id)?;
        info!("created sibling {} {:?} {}", node.id, placement, sel.id);
        Ok(Outcome::Created(node.id))
    }

    /// Move the selection to the best visible node in `dir`.
    pub fn navigate<C: Canvas + ?Sized>(&mut self, canvas: &mut C, dir: Direction) -> Result<Outcome> {
        let Some(sel) = editable_single(canvas) else {
            debug!("navigate: no single non-editing selection");
            return Ok(Outcome::Noop);
        };
        let candidates = canvas.viewport_nodes();
        if log_enabled!(Level::Debug) {
            for r in selector::rank(&sel, dir, &candidates, &self.config).iter().take(3) {
                debug!(
                    "navigate {:?}: {} axis={:.1} endpoint={:.1} score={:.1}",
                    dir, r.node.id, r.axis_offset, r.endpoint_offset, r.score
                );
            }
        }
        let Some(target) = selector::select_best(&sel, dir, &candidates, &self.config).map(|n| n.id.clone()) else {
            return Ok(Outcome::Noop);
        };
        self.zoom_to_node(canvas, &target)?;
        Ok(Outcome::Navigated(target))
    }

    /// Touch -> Navigate, or Navigate -> Create.
    pub fn advance<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Result<Outcome> {
        let sel = canvas.selection();
        match Mode::classify(&sel) {
            Mode::Touch => {
                let center = canvas.viewport_bbox().center();
                let nodes = canvas.viewport_nodes();
                let Some(id) = selector::closest_by_corner(center, &nodes).map(|(n, _)| n.id.clone()) else {
                    debug!("advance: viewport is empty");
                    return Ok(Outcome::Noop);
                };
                self.zoom_to_node(canvas, &id)?;
                Ok(Outcome::ModeChanged(Mode::Navigate))
            }
            Mode::Navigate => {
                // single() is Some in Navigate
                if let Some(n) = sel.single() {
                    self.schedule_edit(n.id.clone());
                }
                Ok(Outcome::ModeChanged(Mode::Create))
            }
            m => {
                debug!("advance ignored in {} mode", m);
                Ok(Outcome::Noop)
            }
        }
    }

    /// Create -> Navigate, or Navigate -> Touch.
    pub fn retreat<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Result<Outcome> {
        let sel = canvas.selection();
        match (Mode::classify(&sel), sel.single()) {
            (Mode::Create, Some(n)) => {
                canvas.blur(&n.id)?;
                // ending an edit drops the focus outline; focusing again restores it
                canvas.focus(&n.id)?;
                Ok(Outcome::ModeChanged(Mode::Navigate))
            }
            (Mode::Navigate, _) => {
                canvas.deselect_all()?;
                Ok(Outcome::ModeChanged(Mode::Touch))
            }
            (m, _) => {
                debug!("retreat ignored in {} mode", m);
                Ok(Outcome::Noop)
            }
        }
    }

    /// Select `id` alone and bring it into view; with auto-focus on, also queue an edit.
    pub fn zoom_to_node<C: Canvas + ?Sized>(&mut self, canvas: &mut C, id: &NodeId) -> Result<()> {
        canvas.select_only(id)?;
        canvas.zoom_to_selection()?;
        if self.settings.auto_focus {
            self.schedule_edit(id.clone());
        }
        Ok(())
    }

    /// Run a task queued earlier. The selection may have changed since, so the
    /// target must still be the only selected node.
    pub fn run_deferred<C: Canvas + ?Sized>(&mut self, canvas: &mut C, task: Deferred) -> Result<Outcome> {
        match task {
            Deferred::StartEditing(id) => {
                let still_selected = canvas
                    .selection()
                    .single()
                    .map_or(false, |n| n.id == id && !n.is_editing());
                if !still_selected {
                    debug!("deferred edit of {} dropped: selection changed", id);
                    return Ok(Outcome::Noop);
                }
                canvas.start_editing(&id)?;
                Ok(Outcome::ModeChanged(Mode::Create))
            }
        }
    }

    fn schedule_edit(&mut self, id: NodeId) {
        self.scheduled.push(Scheduled { delay_ms: self.config.edit_delay_ms, task: Deferred::StartEditing(id) });
    }

    fn next_edge_id(&mut self) -> String {
        (&mut self.rng).sample_iter(&Alphanumeric).take(EDGE_ID_LEN).map(char::from).collect()
    }

    /// Create a node and connect `parent -> node`. A node that cannot be connected is
    /// removed again before the error is returned.
    fn spawn_connected<C: Canvas + ?Sized>(&mut self, canvas: &mut C, parent: &NodeId, req: NewNode) -> Result<Node> {
        let node = canvas.create_text_node(req)?;
        if let Err(e) = self.connect(canvas, parent, &node.id) {
            warn!("connecting {} to {} failed: {}", parent, node.id, e);
            if let Err(undo) = canvas.remove_node(&node.id) {
                warn!("could not remove unconnected {}: {}", node.id, undo);
            }
            return Err(e);
        }
        Ok(node)
    }

    fn connect<C: Canvas + ?Sized>(&mut self, canvas: &mut C, from: &NodeId, to: &NodeId) -> Result<Edge> {
        let edge = Edge::new(self.next_edge_id(), (from.clone(), Side::Right), (to.clone(), Side::Left));
        let data = canvas.data()?.with_edge(&edge)?;
        canvas.import_data(data)?;
        Ok(edge)
    }

    fn apply_reflow<C: Canvas + ?Sized>(&self, canvas: &mut C, parent: &Node, mut column: Vec<Node>) -> Result<()> {
        let before: Vec<(NodeId, Point)> = column.iter().map(|n| (n.id.clone(), n.position())).collect();
        reflow(parent, &mut column, &self.config);
        for n in &column {
            let unchanged = before
                .iter()
                .find(|(id, _)| *id == n.id)
                .map_or(false, |(_, p)| approx_eq(p.x, n.x, EPS_POS) && approx_eq(p.y, n.y, EPS_POS));
            if !unchanged {
                canvas.move_node(&n.id, n.position())?;
            }
        }
        Ok(())
    }
}

fn editable_single<C: Canvas + ?Sized>(canvas: &C) -> Option<Node> {
    canvas.selection().single().filter(|n| !n.is_editing()).cloned()
}

fn resolve<C: Canvas + ?Sized>(canvas: &C, ids: &[NodeId]) -> Vec<Node> {
    ids.iter()
        .filter_map(|id| {
            let n = canvas.node(id);
            if n.is_none() {
                debug!("edge references missing node {}", id);
            }
            n
        })
        .collect()
}
