// Record store — persisted per-category reaction data
//
// Layout of a filesystem store rooted at `root` (default `./data`):
//
//   data_<category>.json             { "summary": <any>, "class_list": [..] }
//   data_dgl_<category>_trn.bin      bincode RecordBundle, shared trn+val pool
//   data_dgl_<category>_tst.bin      bincode RecordBundle, held-out test pool
//
// The summary carries preprocessing metadata (molecule counts and the like)
// and is passed through untouched. The class list defines the condition
// vocabulary and therefore `n_classes`.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use rxncond_core::{Error, Result};

use crate::record::RecordBundle;

/// Default directory of a filesystem record store.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Per-category archive: preprocessing summary plus the condition vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryArchive {
    #[serde(default)]
    pub summary: serde_json::Value,
    pub class_list: Vec<String>,
}

/// Source of raw reaction records.
///
/// `store_key` is `"trn"` for both the train and validation splits and
/// `"tst"` for the held-out test split.
pub trait RecordStore: Send + Sync {
    /// Load the category archive (`data_<category>`).
    fn load_category(&self, category: &str) -> Result<CategoryArchive>;

    /// Load the record bundle `data_dgl_<category>_<store_key>`.
    fn load_bundle(&self, category: &str, store_key: &str) -> Result<RecordBundle>;
}

// FsRecordStore — JSON archive + bincode bundles on disk

/// A record store backed by a directory of files.
#[derive(Debug, Clone)]
pub struct FsRecordStore {
    root: PathBuf,
}

impl Default for FsRecordStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl FsRecordStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the category archive.
    pub fn category_path(&self, category: &str) -> PathBuf {
        self.root.join(format!("data_{category}.json"))
    }

    /// Path of a record bundle.
    pub fn bundle_path(&self, category: &str, store_key: &str) -> PathBuf {
        self.root.join(format!("data_dgl_{category}_{store_key}.bin"))
    }

    /// Write a category archive, creating the store directory if needed.
    pub fn save_category(&self, category: &str, archive: &CategoryArchive) -> Result<()> {
        let path = self.category_path(category);
        let mut writer = self.create(&path)?;
        serde_json::to_writer_pretty(&mut writer, archive)
            .map_err(|e| Error::msg(format!("failed to encode {}: {e}", path.display())))?;
        writer.flush().map_err(|e| Error::io(&path, e))
    }

    /// Write a record bundle, creating the store directory if needed.
    pub fn save_bundle(&self, category: &str, store_key: &str, bundle: &RecordBundle) -> Result<()> {
        bundle.validate_lengths()?;
        let path = self.bundle_path(category, store_key);
        let mut writer = self.create(&path)?;
        bincode::serialize_into(&mut writer, bundle)
            .map_err(|e| Error::msg(format!("failed to encode {}: {e}", path.display())))?;
        writer.flush().map_err(|e| Error::io(&path, e))
    }

    fn create(&self, path: &Path) -> Result<BufWriter<File>> {
        fs::create_dir_all(&self.root).map_err(|e| Error::io(&self.root, e))?;
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        Ok(BufWriter::new(file))
    }

    fn open(&self, path: &Path) -> Result<BufReader<File>> {
        if !path.exists() {
            return Err(Error::MissingResource(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Ok(BufReader::new(file))
    }
}

impl RecordStore for FsRecordStore {
    fn load_category(&self, category: &str) -> Result<CategoryArchive> {
        let path = self.category_path(category);
        debug!(path = %path.display(), "loading category archive");
        let reader = self.open(&path)?;
        serde_json::from_reader(reader).map_err(|e| Error::Decode {
            path,
            message: e.to_string(),
        })
    }

    fn load_bundle(&self, category: &str, store_key: &str) -> Result<RecordBundle> {
        let path = self.bundle_path(category, store_key);
        debug!(path = %path.display(), "loading record bundle");
        let reader = self.open(&path)?;
        bincode::deserialize_from(reader).map_err(|e| Error::Decode {
            path,
            message: e.to_string(),
        })
    }
}

// MemoryRecordStore — in-process store with the same keying

/// An in-memory record store, keyed like the filesystem layout.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    categories: HashMap<String, CategoryArchive>,
    bundles: HashMap<(String, String), RecordBundle>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: &str, archive: CategoryArchive) -> Self {
        self.categories.insert(category.to_string(), archive);
        self
    }

    pub fn with_bundle(mut self, category: &str, store_key: &str, bundle: RecordBundle) -> Self {
        self.bundles
            .insert((category.to_string(), store_key.to_string()), bundle);
        self
    }
}

impl RecordStore for MemoryRecordStore {
    fn load_category(&self, category: &str) -> Result<CategoryArchive> {
        self.categories
            .get(category)
            .cloned()
            .ok_or_else(|| Error::MissingResource(PathBuf::from(format!("data_{category}"))))
    }

    fn load_bundle(&self, category: &str, store_key: &str) -> Result<RecordBundle> {
        self.bundles
            .get(&(category.to_string(), store_key.to_string()))
            .cloned()
            .ok_or_else(|| {
                Error::MissingResource(PathBuf::from(format!(
                    "data_dgl_{category}_{store_key}"
                )))
            })
    }
}
