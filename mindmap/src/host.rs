use crate::error::Result;
use crate::json::CanvasData;
use crate::keymap::Chord;
use crate::model::{BBox, Edge, NewNode, Node, NodeId, Point, Selection};

/// The narrow view of the host canvas the controller works against.
///
/// Queries never fail; a missing node is `None`. Mutators report host failures as
/// [`crate::Error::Host`] or [`crate::Error::UnknownNode`].
pub trait Canvas {
    fn selection(&self) -> Selection;
    fn node(&self, id: &NodeId) -> Option<Node>;
    fn viewport_nodes(&self) -> Vec<Node>;
    fn viewport_bbox(&self) -> BBox;
    /// Every edge with `id` at either end.
    fn edges_for_node(&self, id: &NodeId) -> Vec<Edge>;

    fn create_text_node(&mut self, req: NewNode) -> Result<Node>;
    /// Delete a node and every edge attached to it.
    fn remove_node(&mut self, id: &NodeId) -> Result<()>;
    fn data(&self) -> Result<CanvasData>;
    /// Replace the full node and edge lists.
    fn import_data(&mut self, data: CanvasData) -> Result<()>;
    fn move_node(&mut self, id: &NodeId, to: Point) -> Result<()>;
    fn start_editing(&mut self, id: &NodeId) -> Result<()>;
    fn blur(&mut self, id: &NodeId) -> Result<()>;
    fn focus(&mut self, id: &NodeId) -> Result<()>;
    fn select_only(&mut self, id: &NodeId) -> Result<()>;
    fn deselect_all(&mut self) -> Result<()>;
    fn zoom_to_selection(&mut self) -> Result<()>;
}

/// Host key-binding registration.
pub trait KeyRegistry {
    type Handle;

    fn register(&mut self, chord: &Chord) -> Result<Self::Handle>;
    fn unregister(&mut self, handle: Self::Handle);
}

/// Work the controller wants run later on the host's task queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Deferred {
    StartEditing(NodeId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheduled {
    pub delay_ms: u32,
    pub task: Deferred,
}
