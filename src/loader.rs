//! Loader
//!
//! Groups the indices of any [`Dataset`] into batches. Only `size` and `get`
//! are used, so the same loader serves tree datasets and anything else that
//! honours the contract.
use crate::config::LoaderConfig;
use crate::dataset::Dataset;
use crate::errors::ExeTreeError;
use crate::sampler::{sampler_for, Sampler};
use log::debug;
use rayon::prelude::*;

pub struct DataLoader<D> {
    dataset: D,
    config: LoaderConfig,
    sampler: Box<dyn Sampler + Send>,
}

impl<D: Dataset> DataLoader<D> {
    /// Create a loader using the sampler named by `config.sample_method`.
    pub fn new(dataset: D, config: LoaderConfig) -> Result<Self, ExeTreeError> {
        let sampler = sampler_for(config.sample_method, config.seed);
        Self::with_sampler(dataset, config, sampler)
    }

    /// Create a loader with a caller supplied sampler; `config.sample_method` is ignored.
    pub fn with_sampler(
        dataset: D,
        config: LoaderConfig,
        sampler: Box<dyn Sampler + Send>,
    ) -> Result<Self, ExeTreeError> {
        config.validate()?;
        Ok(DataLoader {
            dataset,
            config,
            sampler,
        })
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Number of batches in one pass over the dataset.
    pub fn batch_count(&self) -> usize {
        self.dataset.size().div_ceil(self.config.batch_size)
    }

    /// Start a pass over the dataset. Each pass asks the sampler for a fresh order.
    pub fn iter(&mut self) -> Batches<'_, D> {
        let order = self.sampler.sample(self.dataset.size());
        debug!(
            "Loading {} examples in batches of {}.",
            order.len(),
            self.config.batch_size
        );
        Batches {
            dataset: &self.dataset,
            order,
            position: 0,
            batch_size: self.config.batch_size,
            parallel: self.config.parallel,
        }
    }
}

/// One pass of batches, see [`DataLoader::iter`].
pub struct Batches<'a, D> {
    dataset: &'a D,
    order: Vec<usize>,
    position: usize,
    batch_size: usize,
    parallel: bool,
}

impl<'a, D> Iterator for Batches<'a, D>
where
    D: Dataset + Sync,
    D::Example: Send,
{
    type Item = Result<Vec<D::Example>, ExeTreeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.order.len() {
            return None;
        }
        let end = (self.position + self.batch_size).min(self.order.len());
        let chunk = &self.order[self.position..end];
        self.position = end;
        let dataset = self.dataset;
        let batch = if self.parallel {
            chunk.par_iter().map(|&i| dataset.get(i)).collect()
        } else {
            chunk.iter().map(|&i| dataset.get(i)).collect()
        };
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.order.len() - self.position).div_ceil(self.batch_size);
        (remaining, Some(remaining))
    }
}

impl<'a, D> IntoIterator for &'a mut DataLoader<D>
where
    D: Dataset + Sync,
    D::Example: Send,
{
    type Item = Result<Vec<D::Example>, ExeTreeError>;
    type IntoIter = Batches<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
