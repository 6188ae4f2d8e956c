use crate::error::{Error, Result};
use crate::host::Canvas;
use crate::json::{CanvasData, EdgeData};
use crate::model::{BBox, Edge, FocusState, NewNode, Node, NodeId, Point, Selection, Side};
use serde::{Deserialize, Serialize};

/// Node payload as the in-memory host stores it in [`CanvasData`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct TextNodeData {
    id: NodeId,
    #[serde(rename = "type", default = "text_kind")]
    kind: String,
    #[serde(default)]
    text: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

fn text_kind() -> String { "text".to_owned() }

#[derive(Clone, Debug)]
struct Entry {
    node: Node,
    text: String,
}

/// Self-contained canvas host: nodes, edges, a selection and a viewport.
///
/// Edge records are kept in the host format, so fields the layout ignores survive
/// an export/import cycle; `edges()` is the left/right subset the layout sees.
///
/// Selection follows the usual canvas rules: `select_only` focuses the node,
/// `blur` clears focus and editing but keeps it selected, `deselect_all` clears
/// everything.
#[derive(Clone, Debug)]
pub struct MemoryCanvas {
    entries: Vec<Entry>,
    records: Vec<EdgeData>,
    edges: Vec<Edge>,
    selection: Vec<NodeId>,
    viewport: BBox,
    next_id: u64,
    reject_creation: bool,
    reject_data: bool,
}

impl MemoryCanvas {
    pub fn new(viewport: BBox) -> MemoryCanvas {
        MemoryCanvas {
            entries: Vec::new(),
            records: Vec::new(),
            edges: Vec::new(),
            selection: Vec::new(),
            viewport,
            next_id: 1,
            reject_creation: false,
            reject_data: false,
        }
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        self.entries.push(Entry { node, text: String::new() });
        id
    }

    pub fn add_edge(&mut self, id: &str, from: &NodeId, to: &NodeId) {
        let edge = Edge::new(id, (from.clone(), Side::Right), (to.clone(), Side::Left));
        self.records.push(EdgeData::from(&edge));
        self.edges.push(edge);
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.entries.iter().map(|e| e.node.clone()).collect()
    }

    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Every stored edge record, including top/bottom ones.
    pub fn edge_records(&self) -> &[EdgeData] { &self.records }

    pub fn set_viewport(&mut self, viewport: BBox) { self.viewport = viewport; }

    /// Replace the selection without touching focus state.
    pub fn select(&mut self, ids: &[NodeId]) {
        self.selection = ids.to_vec();
    }

    pub fn set_state(&mut self, id: &NodeId, state: FocusState) -> Result<()> {
        self.entry_mut(id)?.node.state = state;
        Ok(())
    }

    /// Make `create_text_node` fail, to exercise host error propagation.
    pub fn reject_creation(&mut self, yes: bool) { self.reject_creation = yes; }

    /// Make `data` fail, to exercise rollback after a node was created.
    pub fn reject_data(&mut self, yes: bool) { self.reject_data = yes; }

    fn set_records(&mut self, records: Vec<EdgeData>) {
        self.edges = records.iter().filter_map(EdgeData::to_edge).collect();
        self.records = records;
    }

    fn entry_mut(&mut self, id: &NodeId) -> Result<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|e| e.node.id == *id)
            .ok_or_else(|| Error::UnknownNode(id.clone()))
    }

    fn contains(&self, id: &NodeId) -> bool {
        self.entries.iter().any(|e| e.node.id == *id)
    }
}

impl Canvas for MemoryCanvas {
    fn selection(&self) -> Selection {
        Selection::new(self.selection.iter().filter_map(|id| self.node(id)).collect())
    }

    fn node(&self, id: &NodeId) -> Option<Node> {
        self.entries.iter().find(|e| e.node.id == *id).map(|e| e.node.clone())
    }

    fn viewport_nodes(&self) -> Vec<Node> {
        self.entries
            .iter()
            .filter(|e| e.node.bbox().intersects(&self.viewport))
            .map(|e| e.node.clone())
            .collect()
    }

    fn viewport_bbox(&self) -> BBox { self.viewport }

    fn edges_for_node(&self, id: &NodeId) -> Vec<Edge> {
        self.edges.iter().filter(|e| e.from.node == *id || e.to.node == *id).cloned().collect()
    }

    fn create_text_node(&mut self, req: NewNode) -> Result<Node> {
        if self.reject_creation {
            return Err(Error::Host("node creation rejected".into()));
        }
        let id = NodeId(format!("n{}", self.next_id));
        self.next_id += 1;
        let state = if req.focus { FocusState::Focused } else { FocusState::Idle };
        let node = Node::new(id, req.pos.x, req.pos.y, req.size.width, req.size.height).with_state(state);
        self.entries.push(Entry { node: node.clone(), text: req.text });
        Ok(node)
    }

    fn remove_node(&mut self, id: &NodeId) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::UnknownNode(id.clone()));
        }
        self.entries.retain(|e| e.node.id != *id);
        self.selection.retain(|s| s != id);
        let records: Vec<EdgeData> = self.records.drain(..).filter(|r| r.from_node != *id && r.to_node != *id).collect();
        self.set_records(records);
        Ok(())
    }

    fn data(&self) -> Result<CanvasData> {
        if self.reject_data {
            return Err(Error::Host("canvas data unavailable".into()));
        }
        let nodes = self
            .entries
            .iter()
            .map(|e| {
                let n = &e.node;
                serde_json::to_value(TextNodeData {
                    id: n.id.clone(),
                    kind: text_kind(),
                    text: e.text.clone(),
                    x: n.x,
                    y: n.y,
                    width: n.width,
                    height: n.height,
                })
                .map_err(Error::Data)
            })
            .collect::<Result<Vec<_>>>()?;
        let edges = self
            .records
            .iter()
            .map(|r| serde_json::to_value(r).map_err(Error::Data))
            .collect::<Result<Vec<_>>>()?;
        Ok(CanvasData { nodes, edges })
    }

    fn import_data(&mut self, data: CanvasData) -> Result<()> {
        let mut entries = Vec::with_capacity(data.nodes.len());
        for v in data.nodes {
            let d: TextNodeData = serde_json::from_value(v).map_err(Error::Data)?;
            // focus state survives a re-import, as it does on a live canvas
            let state = self.node(&d.id).map(|n| n.state).unwrap_or_default();
            entries.push(Entry { node: Node::new(d.id, d.x, d.y, d.width, d.height).with_state(state), text: d.text });
        }
        let records = data
            .edges
            .into_iter()
            .map(|v| serde_json::from_value::<EdgeData>(v).map_err(Error::Data))
            .collect::<Result<Vec<_>>>()?;
        for r in &records {
            for end in [&r.from_node, &r.to_node] {
                if !entries.iter().any(|x: &Entry| x.node.id == *end) {
                    return Err(Error::UnknownNode(end.clone()));
                }
            }
        }
        self.entries = entries;
        self.set_records(records);
        let MemoryCanvas { selection, entries, .. } = self;
        selection.retain(|id| entries.iter().any(|e| e.node.id == *id));
        Ok(())
    }

    fn move_node(&mut self, id: &NodeId, to: Point) -> Result<()> {
        let e = self.entry_mut(id)?;
        e.node.x = to.x;
        e.node.y = to.y;
        Ok(())
    }

    fn start_editing(&mut self, id: &NodeId) -> Result<()> {
        self.set_state(id, FocusState::Editing)
    }

    fn blur(&mut self, id: &NodeId) -> Result<()> {
        self.set_state(id, FocusState::Idle)
    }

    fn focus(&mut self, id: &NodeId) -> Result<()> {
        self.set_state(id, FocusState::Focused)
    }

    fn select_only(&mut self, id: &NodeId) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::UnknownNode(id.clone()));
        }
        for e in &mut self.entries {
            e.node.state = if e.node.id == *id { FocusState::Focused } else { FocusState::Idle };
        }
        self.selection = vec![id.clone()];
        Ok(())
    }

    fn deselect_all(&mut self) -> Result<()> {
        for e in &mut self.entries {
            e.node.state = FocusState::Idle;
        }
        self.selection.clear();
        Ok(())
    }

    fn zoom_to_selection(&mut self) -> Result<()> {
        let Some(bbox) = self
            .selection
            .iter()
            .filter_map(|id| self.node(id))
            .map(|n| n.bbox())
            .reduce(|a, b| BBox {
                min_x: a.min_x.min(b.min_x),
                max_x: a.max_x.max(b.max_x),
                min_y: a.min_y.min(b.min_y),
                max_y: a.max_y.max(b.max_y),
            })
        else {
            return Ok(());
        };
        // keep the zoom level, recenter on the selection
        let c = bbox.center();
        let v = self.viewport;
        let (hw, hh) = ((v.max_x - v.min_x) / 2.0, (v.max_y - v.min_y) / 2.0);
        self.viewport = BBox { min_x: c.x - hw, max_x: c.x + hw, min_y: c.y - hh, max_y: c.y + hh };
        Ok(())
    }
}
