use crate::config::{DatasetConfig, FeatureEncoding, LabelEncoding};
use crate::data::Example;
use crate::dataset::Dataset;
use crate::errors::ExeTreeError;
use crate::location::LocationIndex;
use crate::node::EdgeId;
use crate::tree::FrozenTree;
use log::debug;
use rayon::prelude::*;

struct IndexEntry {
    edge: EdgeId,
    /// Position of the edge leading into this edge's node.
    parent: Option<usize>,
}

/// A frozen tree presented as one example per edge, in pre-order.
pub struct ExeTreeDataset {
    tree: FrozenTree,
    config: DatasetConfig,
    index: Vec<IndexEntry>,
    locations: LocationIndex,
    depth: usize,
}

impl ExeTreeDataset {
    /// Build the flat edge index over `tree`. Cost is proportional to the edge count.
    pub fn new(tree: impl Into<FrozenTree>, config: DatasetConfig) -> Self {
        let tree = tree.into();
        let mut index = Vec::with_capacity(tree.edge_count());
        // Position of the most recent edge seen at each depth; in pre-order
        // that is the parent of the next edge one level deeper.
        let mut open: Vec<usize> = Vec::new();
        for (edge, depth) in tree.preorder() {
            open.truncate(depth);
            let parent = open.last().copied();
            open.push(index.len());
            index.push(IndexEntry { edge, parent });
        }
        let depth = tree.depth();
        let locations = tree.location_index();
        debug!(
            "Built dataset of {} examples over a tree of depth {} with {} locations.",
            index.len(),
            depth,
            locations.len()
        );
        ExeTreeDataset {
            tree,
            config,
            index,
            locations,
            depth,
        }
    }

    pub fn tree(&self) -> &FrozenTree {
        &self.tree
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Location numbering used for the `locations` of path examples.
    pub fn location_index(&self) -> &LocationIndex {
        &self.locations
    }

    /// Width of every feature vector this dataset yields.
    pub fn feature_width(&self) -> usize {
        match self.config.feature_encoding {
            FeatureEncoding::Value => 1,
            FeatureEncoding::Path => self.depth,
        }
    }

    /// The edge behind the example at `index`.
    pub fn edge_at(&self, index: usize) -> Result<EdgeId, ExeTreeError> {
        self.entry(index).map(|e| e.edge)
    }

    fn entry(&self, index: usize) -> Result<&IndexEntry, ExeTreeError> {
        self.index.get(index).ok_or(ExeTreeError::IndexOutOfRange {
            index,
            size: self.index.len(),
        })
    }

    /// Feature vector of the example at `index`, with its location indices
    /// when the whole path is encoded.
    fn feature(&self, index: usize) -> Result<(Vec<f64>, Vec<usize>), ExeTreeError> {
        match self.config.feature_encoding {
            FeatureEncoding::Value => {
                let edge = self.tree.edge(self.entry(index)?.edge)?;
                Ok((vec![edge.value.as_f64()], Vec::new()))
            }
            FeatureEncoding::Path => {
                let mut values = Vec::with_capacity(self.depth);
                let mut locations = Vec::with_capacity(self.depth);
                let mut at = Some(index);
                while let Some(i) = at {
                    let entry = self.entry(i)?;
                    values.push(self.tree.edge(entry.edge)?.value.as_f64());
                    let location = self.tree.node(entry.edge.node)?.location();
                    locations.push(location.map_or(0, |l| self.locations.get_index(l)));
                    at = entry.parent;
                }
                values.reverse();
                values.resize(self.depth, 0.0);
                locations.reverse();
                locations.resize(self.depth, 0);
                Ok((values, locations))
            }
        }
    }

    /// Every example in index order.
    ///
    /// * `parallel` - Build examples in parallel using Rayon.
    pub fn examples(&self, parallel: bool) -> Result<Vec<Example>, ExeTreeError> {
        if parallel {
            (0..self.size()).into_par_iter().map(|i| self.get(i)).collect()
        } else {
            (0..self.size()).map(|i| self.get(i)).collect()
        }
    }

    /// Number of examples labelled as may-win.
    pub fn positive_count(&self) -> usize {
        self.index
            .iter()
            .filter(|e| self.tree.edge(e.edge).map(|edge| edge.outcome.may_win()).unwrap_or(false))
            .count()
    }
}

impl Dataset for ExeTreeDataset {
    type Example = Example;

    fn size(&self) -> usize {
        self.index.len()
    }

    fn get(&self, index: usize) -> Result<Example, ExeTreeError> {
        let outcome = self.tree.edge(self.entry(index)?.edge)?.outcome;
        let label = match self.config.label_encoding {
            LabelEncoding::MayWin => vec![if outcome.may_win() { 1.0 } else { 0.0 }],
            LabelEncoding::WinRatio => vec![outcome.win_ratio()],
        };
        let (feature, locations) = self.feature(index)?;
        Ok(Example::with_locations(feature, locations, label))
    }
}
