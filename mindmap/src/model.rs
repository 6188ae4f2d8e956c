use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> NodeId {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_owned())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned bounding box in canvas coordinates (y grows downwards).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn center(&self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point { x: self.min_x, y: self.min_y },
            Point { x: self.max_x, y: self.min_y },
            Point { x: self.min_x, y: self.max_y },
            Point { x: self.max_x, y: self.max_y },
        ]
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// Focus state of a single node. Editing always implies focus, so the host's two
/// flags collapse into one of three states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusState {
    #[default]
    Idle,
    Focused,
    Editing,
}

impl FocusState {
    pub fn from_flags(is_focused: bool, is_editing: bool) -> FocusState {
        match (is_focused, is_editing) {
            (_, true) => FocusState::Editing,
            (true, false) => FocusState::Focused,
            (false, false) => FocusState::Idle,
        }
    }

    pub fn is_focused(self) -> bool {
        self != FocusState::Idle
    }

    pub fn is_editing(self) -> bool {
        self == FocusState::Editing
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub state: FocusState,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, x: f64, y: f64, width: f64, height: f64) -> Node {
        Node { id: id.into(), x, y, width, height, state: FocusState::Idle }
    }

    pub fn with_state(mut self, state: FocusState) -> Node {
        self.state = state;
        self
    }

    pub fn bbox(&self) -> BBox {
        BBox {
            min_x: self.x,
            max_x: self.x + self.width,
            min_y: self.y,
            max_y: self.y + self.height,
        }
    }

    pub fn position(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    pub fn size(&self) -> Size {
        Size { width: self.width, height: self.height }
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_editing()
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Host side name; `top` and `bottom` have no place in the layout.
    pub fn parse(s: &str) -> Option<Side> {
        match s {
            "left" => Some(Side::Left),
            "right" => Some(Side::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub node: NodeId,
    pub side: Side,
}

/// Directed connection `from -> to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Edge {
    pub fn new(id: impl Into<String>, from: (NodeId, Side), to: (NodeId, Side)) -> Edge {
        Edge {
            id: id.into(),
            from: Endpoint { node: from.0, side: from.1 },
            to: Endpoint { node: to.0, side: to.1 },
        }
    }
}

/// The host's current selection, in host iteration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub nodes: Vec<Node>,
}

impl Selection {
    pub fn new(nodes: Vec<Node>) -> Selection {
        Selection { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn single(&self) -> Option<&Node> {
        match self.nodes.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Creation request for a text node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewNode {
    pub pos: Point,
    pub size: Size,
    pub text: String,
    pub focus: bool,
    pub save: bool,
}

impl NewNode {
    pub fn blank(pos: Point, size: Size) -> NewNode {
        NewNode { pos, size, text: String::new(), focus: false, save: true }
    }
}
