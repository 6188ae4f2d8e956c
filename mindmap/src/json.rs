use crate::error::{Error, Result};
use crate::model::{Edge, Endpoint, NodeId, Side};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The host's import/export envelope. Node and edge payloads belong to the host and
/// pass through untouched; only new edges are appended.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasData {
    #[serde(default)]
    pub nodes: Vec<Value>,
    #[serde(default)]
    pub edges: Vec<Value>,
}

/// One edge record in the host format. Sides stay strings since the host also has
/// `top`/`bottom`; fields not modelled here (`color`, `label`, `toEnd`, ...) are kept
/// in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    pub id: String,
    pub from_node: NodeId,
    pub from_side: String,
    pub to_node: NodeId,
    pub to_side: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<&Edge> for EdgeData {
    fn from(e: &Edge) -> Self {
        EdgeData {
            id: e.id.clone(),
            from_node: e.from.node.clone(),
            from_side: e.from.side.as_str().to_owned(),
            to_node: e.to.node.clone(),
            to_side: e.to.side.as_str().to_owned(),
            extra: Map::new(),
        }
    }
}

impl EdgeData {
    /// The layout view of this record; `None` for top/bottom endpoints.
    pub fn to_edge(&self) -> Option<Edge> {
        Some(Edge {
            id: self.id.clone(),
            from: Endpoint { node: self.from_node.clone(), side: Side::parse(&self.from_side)? },
            to: Endpoint { node: self.to_node.clone(), side: Side::parse(&self.to_side)? },
        })
    }
}

impl CanvasData {
    pub fn with_edge(mut self, edge: &Edge) -> Result<CanvasData> {
        self.edges.push(serde_json::to_value(EdgeData::from(edge)).map_err(Error::Data)?);
        Ok(self)
    }
}
