// DataLoader — epoch-addressed batches over a Dataset
//
// The loader holds no cursor and never reshuffles in place. Epoch `e` is
// ordered by a generator seeded with `seed + e`, so every epoch gets a fresh
// order and any epoch can be replayed exactly. Batches of one epoch may be
// drawn while another epoch is iterated on a different thread.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use rayon::prelude::*;

use rxncond_core::{bail, Error, Result};

use crate::dataset::Dataset;
use crate::example::Example;

/// Batching parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLoaderConfig {
    pub batch_size: usize,
    pub shuffle: bool,
    pub drop_last: bool,
    /// Fetch the examples of each batch on the rayon pool.
    pub parallel: bool,
    /// Base seed of the per-epoch shuffle. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        Self::new(32)
    }
}

impl DataLoaderConfig {
    /// Shuffled, sequential, keeps the last partial batch.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            shuffle: true,
            drop_last: false,
            parallel: false,
            seed: None,
        }
    }

    pub fn seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }
}

/// Splits a dataset into batches, one epoch at a time.
pub struct DataLoader<'a, D: Dataset> {
    dataset: &'a D,
    config: DataLoaderConfig,
}

impl<'a, D> DataLoader<'a, D>
where
    D: Dataset,
    D::Item: Send,
{
    pub fn new(dataset: &'a D, config: DataLoaderConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be positive".into()));
        }
        Ok(Self { dataset, config })
    }

    pub fn config(&self) -> &DataLoaderConfig {
        &self.config
    }

    /// Batches per epoch.
    pub fn num_batches(&self) -> usize {
        let (n, bs) = (self.dataset.len(), self.config.batch_size);
        if self.config.drop_last {
            n / bs
        } else {
            n.div_ceil(bs)
        }
    }

    /// Example order of `epoch`.
    pub fn epoch_order(&self, epoch: u64) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if self.config.shuffle {
            let mut rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(epoch)),
                None => StdRng::from_entropy(),
            };
            order.shuffle(&mut rng);
        }
        order
    }

    /// Iterate the batches of `epoch`.
    pub fn epoch(&self, epoch: u64) -> Batches<'a, D> {
        Batches {
            dataset: self.dataset,
            order: self.epoch_order(epoch),
            batch_size: self.config.batch_size,
            drop_last: self.config.drop_last,
            parallel: self.config.parallel,
            pos: 0,
        }
    }
}

/// The batches of one epoch.
pub struct Batches<'a, D: Dataset> {
    dataset: &'a D,
    order: Vec<usize>,
    batch_size: usize,
    drop_last: bool,
    parallel: bool,
    pos: usize,
}

impl<'a, D> Iterator for Batches<'a, D>
where
    D: Dataset,
    D::Item: Send,
{
    type Item = Vec<D::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.order.len() - self.pos;
        if remaining == 0 || (self.drop_last && remaining < self.batch_size) {
            return None;
        }
        let end = self.pos + remaining.min(self.batch_size);
        let indices = &self.order[self.pos..end];
        self.pos = end;

        let dataset = self.dataset;
        Some(if self.parallel {
            indices.par_iter().map(|&i| dataset.get(i)).collect()
        } else {
            indices.iter().map(|&i| dataset.get(i)).collect()
        })
    }
}

/// A stacked batch of fingerprint examples.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintBatch {
    /// `[batch, fp_dim]` row-major.
    pub features: Vec<f32>,
    /// `[batch, label_width]` row-major.
    pub labels: Vec<f32>,
    pub batch_size: usize,
    pub fp_dim: usize,
    pub label_width: usize,
}

/// Stack fingerprint examples into feature and label matrices.
pub fn collate_fingerprints(batch: &[Example]) -> Result<FingerprintBatch> {
    let Some(first) = batch.first() else {
        bail!("collate_fingerprints: empty batch");
    };
    let Some(fp_dim) = first.features().map(<[f32]>::len) else {
        bail!("collate_fingerprints: graph example in fingerprint batch");
    };
    let label_width = first.label().to_vec().len();

    let mut features = Vec::with_capacity(batch.len() * fp_dim);
    let mut labels = Vec::with_capacity(batch.len() * label_width);
    for (i, ex) in batch.iter().enumerate() {
        let Some(f) = ex.features() else {
            bail!("collate_fingerprints: example {i} is a graph example");
        };
        if f.len() != fp_dim {
            return Err(Error::ShapeMismatch {
                what: format!("fingerprint width of batch item {i}"),
                expected: fp_dim,
                got: f.len(),
            });
        }
        let l = ex.label().to_vec();
        if l.len() != label_width {
            return Err(Error::ShapeMismatch {
                what: format!("label width of batch item {i}"),
                expected: label_width,
                got: l.len(),
            });
        }
        features.extend_from_slice(f);
        labels.extend_from_slice(&l);
    }

    Ok(FingerprintBatch {
        features,
        labels,
        batch_size: batch.len(),
        fp_dim,
        label_width,
    })
}
