//! Configuration
//!
//! How tree edges are encoded into examples, and how a loader batches them.
use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_SEED};
use crate::errors::ExeTreeError;
use crate::utils::{items_to_strings, validate_min_usize_parameter};
use log::warn;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What an example's feature vector holds.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub enum FeatureEncoding {
    /// The edge's own value, width 1.
    #[default]
    Value,
    /// The values on the path from the root down to and including the edge,
    /// zero-padded to the tree depth.
    Path,
}

/// What an example's label holds.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub enum LabelEncoding {
    /// `1` if any run through the edge won, `0` otherwise.
    #[default]
    MayWin,
    /// Fraction of runs through the edge that won.
    WinRatio,
}

/// Order in which a loader visits dataset indices.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub enum SampleMethod {
    #[default]
    Sequential,
    Random,
}

impl FromStr for FeatureEncoding {
    type Err = ExeTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Value" => Ok(FeatureEncoding::Value),
            "Path" => Ok(FeatureEncoding::Path),
            _ => Err(ExeTreeError::ParseString(
                s.to_string(),
                "FeatureEncoding".to_string(),
                items_to_strings(vec!["Value", "Path"]),
            )),
        }
    }
}

impl FromStr for LabelEncoding {
    type Err = ExeTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MayWin" => Ok(LabelEncoding::MayWin),
            "WinRatio" => Ok(LabelEncoding::WinRatio),
            _ => Err(ExeTreeError::ParseString(
                s.to_string(),
                "LabelEncoding".to_string(),
                items_to_strings(vec!["MayWin", "WinRatio"]),
            )),
        }
    }
}

impl FromStr for SampleMethod {
    type Err = ExeTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sequential" => Ok(SampleMethod::Sequential),
            "Random" => Ok(SampleMethod::Random),
            _ => Err(ExeTreeError::ParseString(
                s.to_string(),
                "SampleMethod".to_string(),
                items_to_strings(vec!["Sequential", "Random"]),
            )),
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_parallel() -> bool {
    false
}

/// Configuration for turning a frozen tree into examples.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct DatasetConfig {
    #[serde(default)]
    pub feature_encoding: FeatureEncoding,
    #[serde(default)]
    pub label_encoding: LabelEncoding,
}

impl DatasetConfig {
    pub fn set_feature_encoding(mut self, feature_encoding: FeatureEncoding) -> Self {
        self.feature_encoding = feature_encoding;
        self
    }

    pub fn set_label_encoding(mut self, label_encoding: LabelEncoding) -> Self {
        self.label_encoding = label_encoding;
        self
    }

    pub fn from_json(json_str: &str) -> Result<Self, ExeTreeError> {
        serde_json::from_str::<DatasetConfig>(json_str).map_err(|e| ExeTreeError::UnableToRead(e.to_string()))
    }
}

/// Configuration for a [`crate::loader::DataLoader`].
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Debug)]
pub struct LoaderConfig {
    /// Number of examples per batch. The final batch may be shorter.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub sample_method: SampleMethod,
    /// Seed for the random sampler.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Materialise each batch with rayon.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            batch_size: default_batch_size(),
            sample_method: SampleMethod::default(),
            seed: default_seed(),
            parallel: default_parallel(),
        }
    }
}

impl LoaderConfig {
    pub fn new(batch_size: usize) -> Self {
        LoaderConfig {
            batch_size,
            ..Default::default()
        }
    }

    pub fn set_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn set_sample_method(mut self, sample_method: SampleMethod) -> Self {
        self.sample_method = sample_method;
        self
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), ExeTreeError> {
        validate_min_usize_parameter(self.batch_size, 1, "batch_size").inspect_err(|e| warn!("{}", e))
    }

    pub fn from_json(json_str: &str) -> Result<Self, ExeTreeError> {
        let config = serde_json::from_str::<LoaderConfig>(json_str)
            .map_err(|e| ExeTreeError::UnableToRead(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
