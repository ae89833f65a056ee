use crate::utils::fmt_vec_output;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One training example derived from a tree edge.
///
/// `locations` is empty unless the features describe a whole path, in which
/// case it holds the location index of each step, padded with 0 like the
/// features.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub feature: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<usize>,
    pub label: Vec<f64>,
}

impl Example {
    pub fn new(feature: Vec<f64>, label: Vec<f64>) -> Self {
        Example {
            feature,
            locations: Vec::new(),
            label,
        }
    }

    pub fn with_locations(feature: Vec<f64>, locations: Vec<usize>, label: Vec<f64>) -> Self {
        Example {
            feature,
            locations,
            label,
        }
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] -> [{}]", fmt_vec_output(&self.feature), fmt_vec_output(&self.label))
    }
}

/// A dense row major block, used to hand a batch of examples to a learner.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RowMajorMatrix<T> {
    /// The raw data in row-major order.
    pub data: Vec<T>,
    pub rows: usize,
    pub cols: usize,
}

impl<T: Clone> RowMajorMatrix<T> {
    /// An empty matrix whose rows will be `cols` wide.
    pub fn with_cols(cols: usize, capacity_rows: usize) -> Self {
        RowMajorMatrix {
            data: Vec::with_capacity(cols * capacity_rows),
            rows: 0,
            cols,
        }
    }

    /// Append one row. Returns `false`, leaving the matrix untouched, if the
    /// row has the wrong width.
    pub fn append_row(&mut self, row: &[T]) -> bool {
        if row.len() != self.cols {
            return false;
        }
        self.data.extend_from_slice(row);
        self.rows += 1;
        true
    }

    /// Item at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[i * self.cols + j]
    }
}

/// Stacked form of a batch, one row per example.
#[derive(Debug, PartialEq)]
pub struct StackedBatch {
    pub features: RowMajorMatrix<f64>,
    /// Present when every example carries location indices.
    pub locations: Option<RowMajorMatrix<usize>>,
    pub labels: RowMajorMatrix<f64>,
}

/// Stack a batch into dense blocks.
///
/// Returns `None` for an empty batch or when examples disagree on width.
pub fn stack_examples(batch: &[Example]) -> Option<StackedBatch> {
    let first = batch.first()?;
    let mut features: RowMajorMatrix<f64> = RowMajorMatrix::with_cols(first.feature.len(), batch.len());
    let mut labels: RowMajorMatrix<f64> = RowMajorMatrix::with_cols(first.label.len(), batch.len());
    let mut locations: Option<RowMajorMatrix<usize>> = if first.locations.is_empty() {
        None
    } else {
        Some(RowMajorMatrix::with_cols(first.locations.len(), batch.len()))
    };
    for ex in batch {
        if !features.append_row(&ex.feature) || !labels.append_row(&ex.label) {
            return None;
        }
        match locations.as_mut() {
            Some(m) => {
                if !m.append_row(&ex.locations) {
                    return None;
                }
            }
            None if !ex.locations.is_empty() => return None,
            None => {}
        }
    }
    Some(StackedBatch {
        features,
        locations,
        labels,
    })
}
