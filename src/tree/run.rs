use crate::errors::ExeTreeError;
use crate::location::Location;
use crate::node::{EdgeId, NodeId};
use crate::tree::core::ExecutionTree;
use crate::value::Value;

/// A harness run being recorded.
///
/// Each `choose` records the value picked at the next decision point and
/// advances past it. Nothing is marked until `finish`, so a run that is
/// abandoned leaves already-recorded edges with their previous outcome.
pub struct Run<'a> {
    tree: &'a mut ExecutionTree,
    path: Vec<EdgeId>,
}

impl<'a> Run<'a> {
    pub(crate) fn new(tree: &'a mut ExecutionTree) -> Self {
        Run { tree, path: Vec::new() }
    }

    fn current(&mut self) -> Result<NodeId, ExeTreeError> {
        match self.path.last() {
            Some(&prev) => self.tree.child_of(prev),
            None => Ok(self.tree.root()),
        }
    }

    /// Record `value` at the current decision point and step onto its edge.
    pub fn choose(&mut self, value: impl Into<Value>) -> Result<EdgeId, ExeTreeError> {
        let node = self.current()?;
        let edge = self.tree.find_or_add_edge(node, value)?;
        self.path.push(edge);
        Ok(edge)
    }

    /// Like `choose`, naming the decision point by its `location`.
    pub fn choose_at(&mut self, location: impl Into<Location>, value: impl Into<Value>) -> Result<EdgeId, ExeTreeError> {
        let node = self.current()?;
        let edge = self.tree.find_or_add_edge_at(node, location, value)?;
        self.path.push(edge);
        Ok(edge)
    }

    /// Edges touched so far, root first.
    pub fn path(&self) -> &[EdgeId] {
        &self.path
    }

    /// Mark every touched edge with the run's result.
    pub fn finish(self, win: bool) -> Result<Vec<EdgeId>, ExeTreeError> {
        for edge in &self.path {
            self.tree.mark_outcome(*edge, win)?;
        }
        Ok(self.path)
    }
}
