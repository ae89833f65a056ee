use crate::errors::ExeTreeError;
use crate::tree::core::ExecutionTree;
use log::info;

impl ExecutionTree {
    /// Fold another independently grown tree into this one.
    ///
    /// Paths are matched value by value from the root. Where both trees hold
    /// the same edge, its win/run counters are summed. Edges only present in
    /// `other` are appended, with their subtrees, after this tree's edges in
    /// the order `other` recorded them. Fails with `LocationConflict` if the
    /// two trees place the same node at different locations.
    pub fn merge(&mut self, other: &ExecutionTree) -> Result<(), ExeTreeError> {
        let edges_before = self.edge_count();
        let mut stack = vec![(self.root(), other.root())];

        while let Some((into, from)) = stack.pop() {
            let from_node = other.node(from)?;
            if let Some(location) = from_node.location() {
                self.locate(into, location)?;
            }
            for edge in from_node.edges() {
                let target = self.find_or_add_edge(into, edge.value)?;
                self.edge_mut(target)?.outcome.merge(&edge.outcome);
                if let Some(from_child) = edge.child {
                    let into_child = self.child_of(target)?;
                    stack.push((into_child, from_child));
                }
            }
        }

        info!(
            "Merged a tree of {} edges, {} new edges added, {} edges total.",
            other.edge_count(),
            self.edge_count() - edges_before,
            self.edge_count()
        );
        Ok(())
    }
}
