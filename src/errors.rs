//! Errors
//!
//! Custom error types used throughout the `exetree` crate.
use thiserror::Error;

/// Errors that can occur while recording into, persisting, or reading an execution tree.
#[derive(Debug, Error, PartialEq)]
pub enum ExeTreeError {
    /// A node handle that does not belong to this tree.
    #[error("Node {0} does not exist in this tree.")]
    UnknownNode(usize),
    /// An edge handle that does not belong to this tree.
    #[error("Edge {1} of node {0} does not exist in this tree.")]
    UnknownEdge(usize, usize),
    /// A node asked to take a second, different location.
    #[error("Node {node} is already at location {held}, cannot move it to {given}.")]
    LocationConflict { node: usize, held: u64, given: u64 },
    /// Dataset index past the end of the dataset.
    #[error("Index {index} is out of range for a dataset of size {size}.")]
    IndexOutOfRange { index: usize, size: usize },
    /// Persisted records that do not describe a single rooted tree.
    #[error("Malformed tree records: {0}")]
    MalformedTree(String),
    /// Unable to write tree to file.
    #[error("Unable to write tree to file: {0}")]
    UnableToWrite(String),
    /// Unable to read tree from file.
    #[error("Unable to read tree from a file {0}")]
    UnableToRead(String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
}
