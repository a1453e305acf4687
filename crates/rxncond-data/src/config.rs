// DatasetConfig — construction parameters of a reaction-condition dataset

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rxncond_core::{Error, Result};

use crate::fingerprint::FingerprintParams;
use crate::split::{Split, DEFAULT_FRAC_VAL};
use crate::store::DEFAULT_DATA_DIR;

/// Everything fixed at construction time.
///
/// Can be built in code with the builder methods or read from JSON; missing
/// JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Reaction category (dataset name).
    pub category: String,
    /// Which split to load.
    pub split: Split,
    /// Replace graphs with reaction fingerprints.
    pub use_rxnfp: bool,
    /// Seed of the train/validation partition. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Share of the shared pool held out for validation.
    pub frac_val: f64,
    /// Root of the filesystem record store.
    pub data_dir: PathBuf,
    /// Fingerprint generator parameters (fingerprint mode only).
    pub fingerprint: FingerprintParams,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            category: "suzuki".to_string(),
            split: Split::Trn,
            use_rxnfp: false,
            seed: None,
            frac_val: DEFAULT_FRAC_VAL,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            fingerprint: FingerprintParams::default(),
        }
    }
}

impl DatasetConfig {
    pub fn new(category: &str, split: Split) -> Self {
        Self {
            category: category.to_string(),
            split,
            ..Self::default()
        }
    }

    pub fn category(mut self, c: &str) -> Self {
        self.category = c.to_string();
        self
    }

    pub fn split(mut self, s: Split) -> Self {
        self.split = s;
        self
    }

    pub fn use_rxnfp(mut self, on: bool) -> Self {
        self.use_rxnfp = on;
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }

    pub fn frac_val(mut self, f: f64) -> Self {
        self.frac_val = f;
        self
    }

    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn fingerprint(mut self, params: FingerprintParams) -> Self {
        self.fingerprint = params;
        self
    }

    /// Parse a JSON configuration.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Read a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingResource(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&text)
    }

    /// Reject parameters no load could succeed with.
    ///
    /// `frac_val = 0` is accepted and leaves the validation side empty.
    pub fn validate(&self) -> Result<()> {
        if self.category.is_empty() {
            return Err(Error::InvalidConfig("category must not be empty".into()));
        }
        if !(0.0..1.0).contains(&self.frac_val) {
            return Err(Error::InvalidConfig(format!(
                "frac_val must be in [0, 1), got {}",
                self.frac_val
            )));
        }
        if self.use_rxnfp && self.fingerprint.n_bits == 0 {
            return Err(Error::InvalidConfig(
                "fingerprint width must be positive".into(),
            ));
        }
        Ok(())
    }
}
