use crate::model::{Edge, NodeId, Side};

/// Read-only neighbour queries over a flat edge list.
///
/// Every query returns node ids de-duplicated in first-seen edge order, and an empty
/// list when the relation does not exist.
#[derive(Clone, Copy, Debug)]
pub struct Neighbors<'a> {
    edges: &'a [Edge],
}

impl<'a> Neighbors<'a> {
    pub fn new(edges: &'a [Edge]) -> Self {
        Neighbors { edges }
    }

    /// Sources of edges ending at `id`.
    pub fn incoming(&self, id: &NodeId) -> Vec<NodeId> {
        collect_unique(self.edges.iter().filter(|e| e.to.node == *id).map(|e| &e.from.node))
    }

    /// Destinations of edges starting at `id`.
    pub fn outgoing(&self, id: &NodeId) -> Vec<NodeId> {
        collect_unique(self.edges.iter().filter(|e| e.from.node == *id).map(|e| &e.to.node))
    }

    /// First parent of `id`, if any. Only the first incoming edge counts.
    pub fn parent(&self, id: &NodeId) -> Option<NodeId> {
        self.edges.iter().find(|e| e.to.node == *id).map(|e| e.from.node.clone())
    }

    /// The other children of `id`'s first parent.
    pub fn siblings(&self, id: &NodeId) -> Vec<NodeId> {
        match self.parent(id) {
            Some(p) => self.outgoing(&p).into_iter().filter(|n| n != id).collect(),
            None => Vec::new(),
        }
    }

    /// Nodes in `id`'s child column: edges leaving `id` into a node's left side.
    pub fn children(&self, id: &NodeId) -> Vec<NodeId> {
        collect_unique(
            self.edges
                .iter()
                .filter(|e| e.from.node == *id && e.to.side == Side::Left && e.to.node != *id)
                .map(|e| &e.to.node),
        )
    }
}

fn collect_unique<'e>(ids: impl Iterator<Item = &'e NodeId>) -> Vec<NodeId> {
    let mut out: Vec<NodeId> = Vec::new();
    for id in ids {
        if !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}
