//! Execution trees for search-guided fuzzing.
//!
//! A fuzz harness records, run after run, which value it chose at each
//! decision point and whether the run turned out interesting. The
//! [`ExecutionTree`] accumulates those choices; once frozen it is exposed
//! through [`ExeTreeDataset`] as one `{feature, label}` example per edge, and
//! [`DataLoader`] batches any [`Dataset`] for a learner.
mod node;
mod value;

// Modules
pub mod config;
pub mod constants;
pub mod data;
pub mod dataset;
pub mod errors;
pub mod loader;
pub mod location;
pub mod outcome;
pub mod sampler;
pub mod shared;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use config::{DatasetConfig, FeatureEncoding, LabelEncoding, LoaderConfig, SampleMethod};
pub use data::{Example, StackedBatch};
pub use dataset::{Dataset, ExeTreeDataset};
pub use errors::ExeTreeError;
pub use loader::DataLoader;
pub use location::{Location, LocationIndex};
pub use node::{Edge, EdgeId, Node, NodeId};
pub use outcome::{Outcome, OutcomeState};
pub use shared::SharedExecutionTree;
pub use tree::{ExecutionTree, FrozenTree, Run};
pub use value::Value;
