// Reaction fingerprints — signed difference of product and reactant bit vectors
//
// The molecular fingerprint itself (circular/Morgan-style hashing of atom
// environments) is supplied by an external `FingerprintGenerator`. This module
// only splits the reaction SMILES, asks the generator for one indicator
// vector per side, and subtracts:
//
//   rxnfp[j] = product_fp[j] - reactant_fp[j]      in {-1, 0, 1}
//
// Swapping the two sides negates the vector.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use rxncond_core::{Error, Result};

/// Width of the reaction fingerprint.
pub const FP_DIM: usize = 16384;

/// Parameters passed to the fingerprint generator for each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintParams {
    /// Atom-environment radius.
    pub radius: u32,
    /// Output vector width.
    pub n_bits: usize,
    /// Include stereo information in atom invariants.
    pub use_chirality: bool,
    /// Use pharmacophoric feature invariants instead of atom invariants.
    pub use_features: bool,
}

impl Default for FingerprintParams {
    fn default() -> Self {
        Self {
            radius: 2,
            n_bits: FP_DIM,
            use_chirality: true,
            use_features: false,
        }
    }
}

/// A binary indicator vector produced by a [`FingerprintGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVec(Vec<bool>);

impl BitVec {
    pub fn zeros(n_bits: usize) -> Self {
        Self(vec![false; n_bits])
    }

    /// Set bit `i`.
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    pub fn set(&mut self, i: usize) {
        self.0[i] = true;
    }

    pub fn get(&self, i: usize) -> bool {
        self.0[i]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for BitVec {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

/// Turns a (possibly multi-component, `.`-joined) molecule SMILES string into
/// a fixed-width indicator vector.
///
/// Implementations must return exactly `params.n_bits` entries and should
/// report unparseable input as [`Error::SmilesParse`].
pub trait FingerprintGenerator: Send + Sync {
    fn fingerprint(&self, smiles: &str, params: &FingerprintParams) -> Result<BitVec>;
}

impl<F> FingerprintGenerator for F
where
    F: Fn(&str, &FingerprintParams) -> Result<BitVec> + Send + Sync,
{
    fn fingerprint(&self, smiles: &str, params: &FingerprintParams) -> Result<BitVec> {
        self(smiles, params)
    }
}

/// Split `"reactants>>products"` into its two sides.
///
/// Exactly one `>>` is accepted; none or several is `MalformedReaction`.
pub fn split_reaction_smiles(smiles: &str) -> Result<(&str, &str)> {
    match smiles.split_once(">>") {
        Some((reactants, products)) if !products.contains(">>") => Ok((reactants, products)),
        _ => Err(Error::MalformedReaction(smiles.to_string())),
    }
}

fn checked_fingerprint(
    generator: &dyn FingerprintGenerator,
    smiles: &str,
    params: &FingerprintParams,
) -> Result<BitVec> {
    let fp = generator.fingerprint(smiles, params)?;
    if fp.len() != params.n_bits {
        return Err(Error::ShapeMismatch {
            what: format!("fingerprint width for {smiles:?}"),
            expected: params.n_bits,
            got: fp.len(),
        });
    }
    Ok(fp)
}

/// Compute `product_fp - reactant_fp` for one reaction SMILES string.
pub fn difference_fingerprint(
    generator: &dyn FingerprintGenerator,
    reaction_smiles: &str,
    params: &FingerprintParams,
) -> Result<Vec<i8>> {
    let (reactants, products) = split_reaction_smiles(reaction_smiles)?;
    let rfp = checked_fingerprint(generator, reactants, params)?;
    let pfp = checked_fingerprint(generator, products, params)?;
    Ok(pfp
        .as_slice()
        .iter()
        .zip(rfp.as_slice())
        .map(|(&p, &r)| p as i8 - r as i8)
        .collect())
}

/// Row-major table of difference fingerprints, one row per example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintTable {
    dim: usize,
    data: Vec<i8>,
}

impl FingerprintTable {
    /// Fingerprint every reaction in `smiles`, in order.
    ///
    /// Rows are computed in parallel. The first failing reaction aborts the
    /// whole build; there is no per-row fallback.
    pub fn build<S>(
        generator: &dyn FingerprintGenerator,
        smiles: &[S],
        params: &FingerprintParams,
    ) -> Result<Self>
    where
        S: AsRef<str> + Sync,
    {
        debug!(
            n = smiles.len(),
            n_bits = params.n_bits,
            radius = params.radius,
            "computing reaction fingerprints"
        );
        let rows: Vec<Vec<i8>> = smiles
            .par_iter()
            .map(|s| difference_fingerprint(generator, s.as_ref(), params))
            .collect::<Result<_>>()?;

        let mut data = Vec::with_capacity(rows.len() * params.n_bits);
        for row in rows {
            data.extend_from_slice(&row);
        }
        Ok(Self {
            dim: params.n_bits,
            data,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row width.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Row `i`.
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    pub fn row(&self, i: usize) -> &[i8] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }
}
