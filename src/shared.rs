//! Shared Execution Tree
//!
//! Recording phase for several workers writing into one tree at once.
//! Each node sits behind its own lock, so find-or-create is atomic per node
//! and marking an outcome is atomic per edge. A node's lock may be held while
//! the arena is grown, never the other way round.
use crate::constants::ROOT_NODE;
use crate::errors::ExeTreeError;
use crate::location::Location;
use crate::node::{Edge, EdgeId, Node, NodeId};
use crate::tree::ExecutionTree;
use crate::value::Value;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub struct SharedExecutionTree {
    nodes: RwLock<Vec<Arc<Mutex<Node>>>>,
    n_edges: AtomicUsize,
}

impl Default for SharedExecutionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedExecutionTree {
    pub fn new() -> Self {
        Self::from_tree(ExecutionTree::new())
    }

    /// Continue recording concurrently into an existing tree.
    pub fn from_tree(tree: ExecutionTree) -> Self {
        let n_edges = tree.edge_count();
        let nodes = tree.into_nodes().into_iter().map(|n| Arc::new(Mutex::new(n))).collect();
        SharedExecutionTree {
            nodes: RwLock::new(nodes),
            n_edges: AtomicUsize::new(n_edges),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(ROOT_NODE)
    }

    fn node_handle(&self, id: NodeId) -> Result<Arc<Mutex<Node>>, ExeTreeError> {
        self.nodes.read().get(id.0).cloned().ok_or(ExeTreeError::UnknownNode(id.0))
    }

    pub fn find_or_add_edge(&self, node: NodeId, value: impl Into<Value>) -> Result<EdgeId, ExeTreeError> {
        let handle = self.node_handle(node)?;
        let (slot, created) = handle.lock().find_or_insert(value.into());
        if created {
            self.n_edges.fetch_add(1, Ordering::Relaxed);
        }
        Ok(EdgeId { node, slot })
    }

    /// See [`ExecutionTree::find_or_add_edge_at`].
    pub fn find_or_add_edge_at(
        &self,
        node: NodeId,
        location: impl Into<Location>,
        value: impl Into<Value>,
    ) -> Result<EdgeId, ExeTreeError> {
        let location = location.into();
        let handle = self.node_handle(node)?;
        let mut guard = handle.lock();
        guard
            .assign_location(location)
            .map_err(|held| ExeTreeError::LocationConflict {
                node: node.0,
                held: held.0,
                given: location.0,
            })?;
        let (slot, created) = guard.find_or_insert(value.into());
        if created {
            self.n_edges.fetch_add(1, Ordering::Relaxed);
        }
        Ok(EdgeId { node, slot })
    }

    pub fn mark_outcome(&self, edge: EdgeId, win: bool) -> Result<(), ExeTreeError> {
        let handle = self.node_handle(edge.node)?;
        let mut node = handle.lock();
        match node.edge_mut(edge.slot) {
            Some(e) => {
                e.outcome.mark(win);
                Ok(())
            }
            None => Err(ExeTreeError::UnknownEdge(edge.node.0, edge.slot)),
        }
    }

    pub fn child_of(&self, edge: EdgeId) -> Result<NodeId, ExeTreeError> {
        let handle = self.node_handle(edge.node)?;
        let mut node = handle.lock();
        let e = node
            .edge_mut(edge.slot)
            .ok_or(ExeTreeError::UnknownEdge(edge.node.0, edge.slot))?;
        if let Some(child) = e.child {
            return Ok(child);
        }
        let child = {
            let mut nodes = self.nodes.write();
            nodes.push(Arc::new(Mutex::new(Node::new())));
            NodeId(nodes.len() - 1)
        };
        e.child = Some(child);
        Ok(child)
    }

    /// Copy of one edge as currently recorded.
    pub fn edge(&self, id: EdgeId) -> Result<Edge, ExeTreeError> {
        let handle = self.node_handle(id.node)?;
        let node = handle.lock();
        node.edge(id.slot)
            .cloned()
            .ok_or(ExeTreeError::UnknownEdge(id.node.0, id.slot))
    }

    /// Record a complete run, see [`ExecutionTree::record_run`].
    pub fn record_run<V>(&self, values: &[V], win: bool) -> Result<Vec<EdgeId>, ExeTreeError>
    where
        V: Into<Value> + Copy,
    {
        let mut path: Vec<EdgeId> = Vec::with_capacity(values.len());
        let mut node = self.root();
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                node = self.child_of(path[i - 1])?;
            }
            path.push(self.find_or_add_edge(node, *v)?);
        }
        for edge in &path {
            self.mark_outcome(*edge, win)?;
        }
        Ok(path)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn edge_count(&self) -> usize {
        self.n_edges.load(Ordering::Relaxed)
    }

    /// Copy the tree as it stands.
    ///
    /// Writers may keep going while the copy is taken. Every node is copied
    /// whole, but nodes created after the copy started are left out together
    /// with the links leading to them.
    pub fn snapshot(&self) -> ExecutionTree {
        let handles: Vec<Arc<Mutex<Node>>> = self.nodes.read().clone();
        let limit = handles.len();
        let nodes: Vec<Node> = handles
            .iter()
            .map(|n| {
                let mut node = n.lock().clone();
                node.detach_children_from(limit);
                node
            })
            .collect();
        let n_edges = nodes.iter().map(Node::len).sum();
        ExecutionTree::from_parts(nodes, n_edges)
    }

    /// End the concurrent phase.
    pub fn into_tree(self) -> ExecutionTree {
        let n_edges = self.n_edges.into_inner();
        let nodes = self
            .nodes
            .into_inner()
            .into_iter()
            .map(|n| {
                Arc::try_unwrap(n).map(Mutex::into_inner).unwrap_or_else(|n| {
                    let node = n.lock().clone();
                    node
                })
            })
            .collect();
        ExecutionTree::from_parts(nodes, n_edges)
    }
}

impl From<ExecutionTree> for SharedExecutionTree {
    fn from(tree: ExecutionTree) -> Self {
        SharedExecutionTree::from_tree(tree)
    }
}
