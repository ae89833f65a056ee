//! Location
//!
//! Decision points are identified by a harness-defined location, for example
//! the call site that asked for a value. A [`LocationIndex`] interns the
//! locations of a tree into small dense indices suitable for an embedding.
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Identity of a decision point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(pub u64);

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<u64> for Location {
    fn from(v: u64) -> Self {
        Location(v)
    }
}

/// Dense numbering of locations, starting at 1. Index 0 stands for "no
/// location" and pads path vectors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationIndex {
    index: HashMap<Location, usize>,
}

impl LocationIndex {
    pub fn new() -> Self {
        LocationIndex { index: HashMap::new() }
    }

    /// Index of `location`, assigning the next free one on first sight.
    pub fn intern(&mut self, location: Location) -> usize {
        let next = self.index.len() + 1;
        *self.index.entry(location).or_insert(next)
    }

    /// Index of `location`, or 0 if it was never interned.
    pub fn get_index(&self, location: Location) -> usize {
        self.index.get(&location).copied().unwrap_or(0)
    }

    /// Number of distinct indices in use, counting the padding index 0.
    pub fn watermark(&self) -> usize {
        self.index.len() + 1
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
