// Split partitioning — deterministic train/validation division of a pool
//
// The record store ships one shared `trn` pool for training and validation
// plus a separate held-out `tst` pool. `trn` and `val` are carved out of the
// shared pool by a seeded permutation:
//
//   perm = shuffle(0..n)             (StdRng, seeded per dataset)
//   cut  = floor(n * (1 - frac_val))
//   trn  = perm[..cut]
//   val  = perm[cut..]
//
// The generator is owned by the call, never process-global, so datasets built
// concurrently with different seeds cannot interfere.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use rxncond_core::{Error, Result};

/// Default share of the shared pool held out for validation.
pub const DEFAULT_FRAC_VAL: f64 = 0.1;

/// Which slice of a category's reactions a dataset covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Trn,
    Val,
    Tst,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Trn => "trn",
            Split::Val => "val",
            Split::Tst => "tst",
        }
    }

    /// Key of the store bundle this split is drawn from. `trn` and `val`
    /// share the `trn` bundle.
    pub fn store_key(&self) -> &'static str {
        match self {
            Split::Trn | Split::Val => "trn",
            Split::Tst => "tst",
        }
    }

    /// Whether this split is carved out of the shared pool by [`partition`].
    pub fn is_partitioned(&self) -> bool {
        matches!(self, Split::Trn | Split::Val)
    }

    /// Whether reactions are expanded to one example per condition.
    pub fn is_expanded(&self) -> bool {
        matches!(self, Split::Trn)
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "trn" => Ok(Split::Trn),
            "val" => Ok(Split::Val),
            "tst" => Ok(Split::Tst),
            other => Err(Error::InvalidSplit(other.to_string())),
        }
    }
}

/// Disjoint train/validation index sets over `0..n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train: Vec<usize>,
    pub val: Vec<usize>,
}

impl Partition {
    /// Indices for `split`, or `None` for `tst` (which is never partitioned).
    pub fn indices(&self, split: Split) -> Option<&[usize]> {
        match split {
            Split::Trn => Some(&self.train),
            Split::Val => Some(&self.val),
            Split::Tst => None,
        }
    }

    /// Consume the partition, keeping one side.
    pub fn into_indices(self, split: Split) -> Option<Vec<usize>> {
        match split {
            Split::Trn => Some(self.train),
            Split::Val => Some(self.val),
            Split::Tst => None,
        }
    }
}

/// Position at which the shuffled pool is cut: `floor(n * (1 - frac_val))`.
pub fn cut_point(n: usize, frac_val: f64) -> usize {
    ((n as f64 * (1.0 - frac_val)).floor() as usize).min(n)
}

/// Partition `0..n` into train and validation indices.
///
/// With `seed = Some(s)` the result is reproducible bit-for-bit for the same
/// `(n, frac_val, s)`. With `None` the generator is seeded from OS entropy
/// and every call yields a fresh partition.
///
/// `frac_val` is trusted to lie in `[0, 1)`; configuration validation
/// rejects anything else before a load reaches this point.
pub fn partition(n: usize, frac_val: f64, seed: Option<u64>) -> Partition {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(&mut rng);

    let cut = cut_point(n, frac_val);
    let val = perm.split_off(cut);
    Partition { train: perm, val }
}
