//! Dataset
//!
//! The `{size, get}` contract a loader consumes, and its implementation over a
//! frozen execution tree.
use crate::errors::ExeTreeError;

mod exetree;

pub use self::exetree::ExeTreeDataset;

/// A fixed-size, randomly indexable sequence of examples.
///
/// `get` must be deterministic for a fixed index and must reject
/// `index >= size()` with [`ExeTreeError::IndexOutOfRange`].
pub trait Dataset {
    type Example;

    fn size(&self) -> usize;

    fn get(&self, index: usize) -> Result<Self::Example, ExeTreeError>;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
