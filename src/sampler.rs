//! Sampler
//!
//! Strategies for ordering dataset indices before they are grouped into batches.
use crate::config::SampleMethod;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

// A sampler decides which dataset indices a loader visits, and in what order.
pub trait Sampler {
    /// Produce the indices to visit for a dataset of `size` examples.
    fn sample(&mut self, size: usize) -> Vec<usize>;
}

/// Visits `0..size` in order.
pub struct SequentialSampler;

impl Sampler for SequentialSampler {
    fn sample(&mut self, size: usize) -> Vec<usize> {
        (0..size).collect()
    }
}

/// Visits every index once, in a seeded random order.
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn new(seed: u64) -> Self {
        RandomSampler {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for RandomSampler {
    fn sample(&mut self, size: usize) -> Vec<usize> {
        let mut index: Vec<usize> = (0..size).collect();
        index.shuffle(&mut self.rng);
        index
    }
}

pub fn sampler_for(method: SampleMethod, seed: u64) -> Box<dyn Sampler + Send> {
    match method {
        SampleMethod::Sequential => Box::new(SequentialSampler),
        SampleMethod::Random => Box::new(RandomSampler::new(seed)),
    }
}
