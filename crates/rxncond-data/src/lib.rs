//! # rxncond-data
//!
//! Dataset assembly for reaction-condition prediction.
//!
//! This crate provides:
//! - [`ReactionDataset`] — train/validation/test examples for one reaction category
//! - [`Dataset`] trait — indexed, sized access shared by both dataset modes
//! - [`partition`] — seeded, reproducible train/validation split of a shared pool
//! - [`RecordStore`] — source of raw records, on disk ([`FsRecordStore`]) or in memory
//! - [`FingerprintGenerator`] — pluggable molecule fingerprinting for the rxnfp mode
//! - [`DataLoader`] — epoch-seeded batching with optional parallel retrieval
//
//   Train examples are expanded to one per observed condition and carry a
//   one-hot label; validation/test examples stay one per reaction with a
//   placeholder label.

pub mod config;
pub mod dataset;
pub mod example;
pub mod expand;
pub mod fingerprint;
pub mod loader;
pub mod reaction;
pub mod record;
pub mod split;
pub mod store;

pub use config::DatasetConfig;
pub use dataset::Dataset;
pub use example::{Example, Label};
pub use expand::{expand, passthrough, ExampleTable, GraphSet, Targets};
pub use fingerprint::{
    difference_fingerprint, split_reaction_smiles, BitVec, FingerprintGenerator,
    FingerprintParams, FingerprintTable, FP_DIM,
};
pub use loader::{collate_fingerprints, Batches, DataLoader, DataLoaderConfig, FingerprintBatch};
pub use reaction::{DatasetInfo, FingerprintDataset, GraphDataset, ReactionDataset};
pub use record::{DatasetMeta, ReactionRecord, RecordBundle};
pub use split::{cut_point, partition, Partition, Split, DEFAULT_FRAC_VAL};
pub use store::{CategoryArchive, FsRecordStore, MemoryRecordStore, RecordStore};

pub use rxncond_core::{Error, MolGraph, Result};
