use crate::location::Location;
use crate::outcome::Outcome;
use crate::value::Value;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Index of a node in its tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Handle to an edge: the node that owns it and its insertion slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId {
    pub node: NodeId,
    pub slot: usize,
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.slot)
    }
}

/// One value chosen at a decision point.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub value: Value,
    pub outcome: Outcome,
    pub child: Option<NodeId>,
}

impl Edge {
    pub fn new(value: Value) -> Self {
        Edge {
            value,
            outcome: Outcome::new(),
            child: None,
        }
    }
}

/// A decision point. Edges are kept in insertion order, which fixes
/// traversal order; `index` maps each value to its slot.
#[derive(Clone, Debug, Default)]
pub struct Node {
    edges: Vec<Edge>,
    index: HashMap<Value, usize>,
    location: Option<Location>,
}

impl Node {
    pub fn new() -> Self {
        Node {
            edges: Vec::new(),
            index: HashMap::new(),
            location: None,
        }
    }

    /// Where in the harness this decision is made, if the harness said so.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Tag the node with `location`. Returns the location already held if it differs.
    pub(crate) fn assign_location(&mut self, location: Location) -> Result<(), Location> {
        match self.location {
            Some(held) if held != location => Err(held),
            _ => {
                self.location = Some(location);
                Ok(())
            }
        }
    }

    /// Slot of the edge recorded for `value`, if any.
    pub fn find(&self, value: &Value) -> Option<usize> {
        self.index.get(value).copied()
    }

    /// Return the slot for `value`, appending a fresh edge if there is none.
    /// The second item is `true` when the edge was created.
    pub fn find_or_insert(&mut self, value: Value) -> (usize, bool) {
        if let Some(slot) = self.find(&value) {
            return (slot, false);
        }
        let slot = self.edges.len();
        self.edges.push(Edge::new(value));
        self.index.insert(value, slot);
        (slot, true)
    }

    pub fn edge(&self, slot: usize) -> Option<&Edge> {
        self.edges.get(slot)
    }

    pub fn edge_mut(&mut self, slot: usize) -> Option<&mut Edge> {
        self.edges.get_mut(slot)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Children of this node in insertion order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().filter_map(|e| e.child)
    }

    /// Drop links to children whose arena index is `limit` or past it.
    pub(crate) fn detach_children_from(&mut self, limit: usize) {
        for e in &mut self.edges {
            if e.child.is_some_and(|c| c.0 >= limit) {
                e.child = None;
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location && self.edges == other.edges
    }
}
