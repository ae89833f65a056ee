//! Persistence
//!
//! A tree is stored as a flat list of `(node, value, outcome, child)` records,
//! each also carrying the owning node's location when it has one.
//! Node ids are assigned in pre-order discovery order with the root as 0, so two
//! trees with the same structure produce identical records.
use crate::constants::ROOT_NODE;
use crate::errors::ExeTreeError;
use crate::location::Location;
use crate::outcome::Outcome;
use crate::tree::core::ExecutionTree;
use crate::value::Value;
use hashbrown::{HashMap, HashSet};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;

/// One edge of a persisted tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Id of the node that owns the edge.
    pub node: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub value: Value,
    pub outcome: Outcome,
    /// Id of the node the edge leads to, if the path continued.
    pub child: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeRecords {
    pub records: Vec<TreeRecord>,
}

impl ExecutionTree {
    /// Flatten the tree into records, in traversal order.
    pub fn to_records(&self) -> TreeRecords {
        let mut ids: Vec<Option<u64>> = vec![None; self.node_count()];
        ids[ROOT_NODE] = Some(ROOT_NODE as u64);
        let mut next_id = ROOT_NODE as u64 + 1;
        let mut records = Vec::with_capacity(self.edge_count());

        for (eid, _) in self.preorder() {
            // The owning node was numbered when the edge leading to it was emitted.
            let node = ids[eid.node.0].unwrap_or_default();
            let Ok(owner) = self.node(eid.node) else {
                continue;
            };
            let Some(edge) = owner.edge(eid.slot) else {
                continue;
            };
            let child = edge.child.map(|c| {
                let id = next_id;
                next_id += 1;
                ids[c.0] = Some(id);
                id
            });
            records.push(TreeRecord {
                node,
                location: owner.location(),
                value: edge.value,
                outcome: edge.outcome,
                child,
            });
        }
        TreeRecords { records }
    }

    /// Rebuild a tree from records.
    ///
    /// Records of one node must appear in that node's insertion order. Fails if
    /// a node repeats a value, a node is entered by more than one edge or by
    /// an edge pointing back at the root, a node cannot be reached from the
    /// root, or the records of one node disagree on its location.
    pub fn from_records(records: &TreeRecords) -> Result<Self, ExeTreeError> {
        let root = ROOT_NODE as u64;
        let mut by_node: HashMap<u64, Vec<&TreeRecord>> = HashMap::new();
        for r in &records.records {
            by_node.entry(r.node).or_default().push(r);
        }
        if !by_node.is_empty() && !by_node.contains_key(&root) {
            return Err(ExeTreeError::MalformedTree(format!("no records for root node {}", root)));
        }

        let mut tree = ExecutionTree::new();
        let mut entered: HashSet<u64> = HashSet::new();
        entered.insert(root);
        let mut stack = vec![(root, tree.root())];

        while let Some((record_id, node)) = stack.pop() {
            let Some(node_records) = by_node.get(&record_id) else {
                continue;
            };
            for r in node_records {
                if let Some(location) = r.location {
                    tree.locate(node, location).map_err(|_| {
                        ExeTreeError::MalformedTree(format!("node {} records more than one location", record_id))
                    })?;
                }
                let (edge, created) = tree.find_or_insert_edge(node, r.value)?;
                if !created {
                    return Err(ExeTreeError::MalformedTree(format!(
                        "node {} records value {} more than once",
                        record_id, r.value
                    )));
                }
                tree.edge_mut(edge)?.outcome = r.outcome;
                if let Some(child) = r.child {
                    if !entered.insert(child) {
                        return Err(ExeTreeError::MalformedTree(format!(
                            "node {} has more than one incoming edge",
                            child
                        )));
                    }
                    let child_node = tree.child_of(edge)?;
                    stack.push((child, child_node));
                }
            }
        }

        if let Some(orphan) = by_node.keys().find(|k| !entered.contains(*k)) {
            return Err(ExeTreeError::MalformedTree(format!(
                "node {} is not reachable from the root",
                orphan
            )));
        }
        Ok(tree)
    }

    /// Dump the tree as a json object.
    pub fn json_dump(&self) -> Result<String, ExeTreeError> {
        match serde_json::to_string(self) {
            Ok(s) => Ok(s),
            Err(e) => Err(ExeTreeError::UnableToWrite(e.to_string())),
        }
    }

    /// Load a tree from a json string.
    ///
    /// * `json_str` - String object, which can be deserialized to a tree.
    pub fn from_json(json_str: &str) -> Result<Self, ExeTreeError> {
        match serde_json::from_str::<ExecutionTree>(json_str) {
            Ok(t) => Ok(t),
            Err(e) => Err(ExeTreeError::UnableToRead(e.to_string())),
        }
    }

    /// Save the tree as a json object to a file.
    ///
    /// * `path` - Path to save the tree.
    pub fn save_tree(&self, path: &str) -> Result<(), ExeTreeError> {
        let dump = self.json_dump()?;
        match fs::write(path, dump) {
            Err(e) => Err(ExeTreeError::UnableToWrite(e.to_string())),
            Ok(_) => {
                info!("Saved execution tree with {} edges to {}.", self.edge_count(), path);
                Ok(())
            }
        }
    }

    /// Load a tree from a path to a json tree object.
    ///
    /// * `path` - Path to load the tree from.
    pub fn load_tree(path: &str) -> Result<Self, ExeTreeError> {
        let json_str = match fs::read_to_string(path) {
            Ok(s) => Ok(s),
            Err(e) => Err(ExeTreeError::UnableToRead(e.to_string())),
        }?;
        Self::from_json(&json_str)
    }
}

impl From<ExecutionTree> for TreeRecords {
    fn from(tree: ExecutionTree) -> Self {
        tree.to_records()
    }
}

impl TryFrom<TreeRecords> for ExecutionTree {
    type Error = ExeTreeError;

    fn try_from(records: TreeRecords) -> Result<Self, Self::Error> {
        ExecutionTree::from_records(&records)
    }
}
