use crate::constants::{GROWTH_LOG_INTERVAL, ROOT_NODE};
use crate::errors::ExeTreeError;
use crate::location::{Location, LocationIndex};
use crate::node::{Edge, EdgeId, Node, NodeId};
use crate::tree::persist::TreeRecords;
use crate::tree::run::Run;
use crate::value::Value;
use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// Every distinct decision path observed across runs.
///
/// Nodes live in an arena; node 0 is the root and each edge owns its child
/// through the child's arena index. Nodes and edges are never removed, so
/// `NodeId` and `EdgeId` handles stay valid for the life of the tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "TreeRecords", try_from = "TreeRecords")]
pub struct ExecutionTree {
    nodes: Vec<Node>,
    n_edges: usize,
}

impl Default for ExecutionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionTree {
    /// Create a tree holding only an empty root.
    pub fn new() -> Self {
        ExecutionTree {
            nodes: vec![Node::new()],
            n_edges: 0,
        }
    }

    pub(crate) fn from_parts(nodes: Vec<Node>, n_edges: usize) -> Self {
        ExecutionTree { nodes, n_edges }
    }

    pub fn root(&self) -> NodeId {
        NodeId(ROOT_NODE)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, ExeTreeError> {
        self.nodes.get(id.0).ok_or(ExeTreeError::UnknownNode(id.0))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, ExeTreeError> {
        self.nodes.get_mut(id.0).ok_or(ExeTreeError::UnknownNode(id.0))
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge, ExeTreeError> {
        self.node(id.node)?
            .edge(id.slot)
            .ok_or(ExeTreeError::UnknownEdge(id.node.0, id.slot))
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge, ExeTreeError> {
        self.node_mut(id.node)?
            .edge_mut(id.slot)
            .ok_or(ExeTreeError::UnknownEdge(id.node.0, id.slot))
    }

    /// Return the edge recorded for `value` at `node`, creating a blank one
    /// (unknown outcome, no child) if this is the first time the value is seen there.
    pub fn find_or_add_edge(&mut self, node: NodeId, value: impl Into<Value>) -> Result<EdgeId, ExeTreeError> {
        self.find_or_insert_edge(node, value.into()).map(|(edge, _)| edge)
    }

    /// `find_or_add_edge` at a decision point the harness identifies by
    /// `location`. A node keeps the first location it is given; a different
    /// one later is an error.
    pub fn find_or_add_edge_at(
        &mut self,
        node: NodeId,
        location: impl Into<Location>,
        value: impl Into<Value>,
    ) -> Result<EdgeId, ExeTreeError> {
        self.locate(node, location.into())?;
        self.find_or_add_edge(node, value)
    }

    pub(crate) fn locate(&mut self, node: NodeId, location: Location) -> Result<(), ExeTreeError> {
        self.node_mut(node)?
            .assign_location(location)
            .map_err(|held| ExeTreeError::LocationConflict {
                node: node.0,
                held: held.0,
                given: location.0,
            })
    }

    /// Like `find_or_add_edge`, also reporting whether the edge was created.
    pub(crate) fn find_or_insert_edge(&mut self, node: NodeId, value: Value) -> Result<(EdgeId, bool), ExeTreeError> {
        let (slot, created) = self.node_mut(node)?.find_or_insert(value);
        if created {
            self.n_edges += 1;
            if self.n_edges % GROWTH_LOG_INTERVAL == 0 {
                debug!(
                    "Execution tree reached {} edges across {} nodes.",
                    self.n_edges,
                    self.nodes.len()
                );
            }
        }
        Ok((EdgeId { node, slot }, created))
    }

    /// Record one run's result on an edge.
    pub fn mark_outcome(&mut self, edge: EdgeId, win: bool) -> Result<(), ExeTreeError> {
        self.edge_mut(edge)?.outcome.mark(win);
        Ok(())
    }

    /// The node reached by following `edge`, created empty on first access.
    pub fn child_of(&mut self, edge: EdgeId) -> Result<NodeId, ExeTreeError> {
        let next = NodeId(self.nodes.len());
        let e = self.edge_mut(edge)?;
        if let Some(child) = e.child {
            return Ok(child);
        }
        e.child = Some(next);
        self.nodes.push(Node::new());
        Ok(next)
    }

    /// Start recording a run from the root.
    pub fn run(&mut self) -> Run<'_> {
        Run::new(self)
    }

    /// Record a complete run: follow `values` from the root, creating edges as
    /// needed, then mark every edge on the path with `win`.
    pub fn record_run<V>(&mut self, values: &[V], win: bool) -> Result<Vec<EdgeId>, ExeTreeError>
    where
        V: Into<Value> + Copy,
    {
        let mut run = self.run();
        for v in values {
            run.choose(*v)?;
        }
        run.finish(win)
    }

    /// Record a complete run of `(location, value)` steps, see [`ExecutionTree::record_run`].
    pub fn record_located_run<L, V>(&mut self, steps: &[(L, V)], win: bool) -> Result<Vec<EdgeId>, ExeTreeError>
    where
        L: Into<Location> + Copy,
        V: Into<Value> + Copy,
    {
        let mut run = self.run();
        for (l, v) in steps {
            run.choose_at(*l, *v)?;
        }
        run.finish(win)
    }

    /// Number the locations of all nodes, in traversal order of first appearance.
    pub fn location_index(&self) -> LocationIndex {
        let mut index = LocationIndex::new();
        let mut last = None;
        for (eid, _) in self.preorder() {
            if last == Some(eid.node) {
                continue;
            }
            last = Some(eid.node);
            if let Some(location) = self.nodes[eid.node.0].location() {
                index.intern(location);
            }
        }
        index
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.n_edges
    }

    pub fn is_empty(&self) -> bool {
        self.n_edges == 0
    }

    /// Number of edges on the longest path from the root.
    pub fn depth(&self) -> usize {
        self.preorder().map(|(_, d)| d + 1).max().unwrap_or(0)
    }

    /// Walk every edge once: an edge is visited before the edges below it, and
    /// the edges of one node in insertion order. Items are `(edge, depth)`,
    /// with depth 0 for edges leaving the root.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![(self.root(), 0)],
        }
    }

    /// Move the tree into its read-only phase without copying.
    pub fn freeze(self) -> FrozenTree {
        FrozenTree(Arc::new(self))
    }

    /// Copy the tree into a read-only snapshot; recording can continue on `self`.
    pub fn snapshot(&self) -> FrozenTree {
        FrozenTree(Arc::new(self.clone()))
    }

    pub(crate) fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

// Arena positions depend on the order nodes were created in, so trees are
// compared by structure.
impl PartialEq for ExecutionTree {
    fn eq(&self, other: &Self) -> bool {
        self.n_edges == other.n_edges && self.to_records() == other.to_records()
    }
}

/// Pre-order edge iterator, see [`ExecutionTree::preorder`].
pub struct Preorder<'a> {
    tree: &'a ExecutionTree,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (EdgeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, slot) = *self.stack.last()?;
            let n = &self.tree.nodes[node.0];
            let Some(edge) = n.edge(slot) else {
                self.stack.pop();
                continue;
            };
            let depth = self.stack.len() - 1;
            if let Some(top) = self.stack.last_mut() {
                top.1 += 1;
            }
            if let Some(child) = edge.child {
                self.stack.push((child, 0));
            }
            return Some((EdgeId { node, slot }, depth));
        }
    }
}

/// A tree in its read-only phase. Cloning shares the same tree.
#[derive(Clone, Debug)]
pub struct FrozenTree(Arc<ExecutionTree>);

impl FrozenTree {
    /// Return to the recording phase, copying only if other readers still hold the tree.
    pub fn thaw(self) -> ExecutionTree {
        Arc::unwrap_or_clone(self.0)
    }
}

impl Deref for FrozenTree {
    type Target = ExecutionTree;

    fn deref(&self) -> &ExecutionTree {
        &self.0
    }
}

impl From<ExecutionTree> for FrozenTree {
    fn from(tree: ExecutionTree) -> Self {
        tree.freeze()
    }
}
