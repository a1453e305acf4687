// ReactionDataset — reaction-condition examples for one category/split
//
// Construction performs the single eager load:
//
//   1. category archive -> class list (n_classes)
//   2. record bundle for the split's store key
//   3. trn/val: seeded partition of the shared pool, keep one side
//   4. derive + check dataset-wide metadata
//   5. trn: expand to one example per condition; val/tst: pass through
//   6. fingerprint mode: fingerprint every example, drop the graphs
//
// The two modes are separate types behind one enum. Both are immutable
// after construction; `get` only reads.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use rxncond_core::{Error, Result};

use crate::config::DatasetConfig;
use crate::dataset::Dataset;
use crate::example::{Example, Label};
use crate::expand::{expand, passthrough, ExampleTable, GraphSet, Targets};
use crate::fingerprint::{FingerprintGenerator, FingerprintTable};
use crate::record::DatasetMeta;
use crate::split::{partition, Split};
use crate::store::{FsRecordStore, RecordStore};

/// Identity and metadata shared by both dataset variants.
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    pub category: String,
    pub split: Split,
    pub name: String,
    pub meta: DatasetMeta,
    pub class_list: Vec<String>,
    pub summary: Value,
}

impl DatasetInfo {
    fn label_at(&self, targets: &Targets, index: usize) -> Label {
        match targets {
            Targets::Single(classes) => Label::one_hot(classes[index], self.meta.n_classes),
            Targets::Sets(_) => Label::Placeholder,
        }
    }
}

fn conditions_at(targets: &Targets, index: usize) -> Vec<usize> {
    match targets {
        Targets::Single(classes) => vec![classes[index]],
        Targets::Sets(sets) => sets[index].clone(),
    }
}

// GraphDataset — examples carry the reactant/product molecular graphs

/// Graph-mode dataset: `(*reactant_graphs, *product_graphs, label)` per example.
#[derive(Debug, Clone)]
pub struct GraphDataset {
    info: DatasetInfo,
    table: ExampleTable,
}

impl GraphDataset {
    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }

    /// Reactant molecule set of example `index`, shared with its replicas.
    pub fn reactant_set(&self, index: usize) -> &GraphSet {
        &self.table.reactant_sets[index]
    }

    /// Product molecule set of example `index`, shared with its replicas.
    pub fn product_set(&self, index: usize) -> &GraphSet {
        &self.table.product_sets[index]
    }
}

impl Dataset for GraphDataset {
    type Item = Example;

    fn len(&self) -> usize {
        self.table.len()
    }

    fn get(&self, index: usize) -> Example {
        Example::Graph {
            reactants: self.table.reactant_sets[index].to_vec(),
            products: self.table.product_sets[index].to_vec(),
            label: self.info.label_at(&self.table.targets, index),
        }
    }

    fn name(&self) -> &str {
        &self.info.name
    }
}

// FingerprintDataset — examples carry the reaction difference fingerprint

/// Fingerprint-mode dataset: `(features, label)` per example.
#[derive(Debug, Clone)]
pub struct FingerprintDataset {
    info: DatasetInfo,
    smiles: Vec<Arc<str>>,
    targets: Targets,
    fingerprints: FingerprintTable,
}

impl FingerprintDataset {
    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }

    /// Fingerprint width.
    pub fn fp_dim(&self) -> usize {
        self.fingerprints.dim()
    }

    /// Raw `{-1, 0, 1}` fingerprint row of example `index`.
    pub fn fingerprint(&self, index: usize) -> &[i8] {
        self.fingerprints.row(index)
    }
}

impl Dataset for FingerprintDataset {
    type Item = Example;

    fn len(&self) -> usize {
        self.targets.len()
    }

    fn get(&self, index: usize) -> Example {
        Example::Fingerprint {
            features: self
                .fingerprints
                .row(index)
                .iter()
                .map(|&v| f32::from(v))
                .collect(),
            label: self.info.label_at(&self.targets, index),
        }
    }

    fn name(&self) -> &str {
        &self.info.name
    }
}

// ReactionDataset — the mode is chosen once, at construction

/// A reaction-condition dataset in graph or fingerprint mode.
#[derive(Debug, Clone)]
pub enum ReactionDataset {
    Graph(GraphDataset),
    Fingerprint(FingerprintDataset),
}

impl ReactionDataset {
    /// Load graph-mode data from the filesystem store at `config.data_dir`.
    ///
    /// Fingerprint mode needs a generator; use [`ReactionDataset::load`].
    pub fn open(config: &DatasetConfig) -> Result<Self> {
        let store = FsRecordStore::new(&config.data_dir);
        Self::load(config, &store, None)
    }

    /// Perform the one eager load from `store`.
    ///
    /// `fingerprinter` is required when `config.use_rxnfp` is set and ignored
    /// otherwise. Every failure aborts construction.
    pub fn load(
        config: &DatasetConfig,
        store: &dyn RecordStore,
        fingerprinter: Option<&dyn FingerprintGenerator>,
    ) -> Result<Self> {
        config.validate()?;
        let generator = match (config.use_rxnfp, fingerprinter) {
            (true, None) => {
                return Err(Error::InvalidConfig(
                    "use_rxnfp requires a fingerprint generator".into(),
                ))
            }
            (true, Some(g)) => Some(g),
            (false, _) => None,
        };

        let category = config.category.as_str();
        let split = config.split;

        let archive = store.load_category(category)?;
        let mut bundle = store.load_bundle(category, split.store_key())?;
        bundle.validate_lengths()?;

        if split.is_partitioned() {
            if config.seed.is_none() {
                warn!(
                    category,
                    split = %split,
                    "no seed given; train/validation partition is not reproducible"
                );
            }
            let pool = bundle.len();
            let part = partition(pool, config.frac_val, config.seed);
            debug!(
                pool,
                n_trn = part.train.len(),
                n_val = part.val.len(),
                "partitioned shared pool"
            );
            let indices = part
                .into_indices(split)
                .ok_or_else(|| Error::InvalidSplit(split.to_string()))?;
            bundle = bundle.select(&indices);
        }

        let meta = DatasetMeta::derive(&bundle, &archive.class_list, category, split.as_str())?;
        meta.check_conformance(&bundle)?;

        let table = if split.is_expanded() {
            expand(bundle, &meta.cnt_list)?
        } else {
            passthrough(bundle)?
        };

        let info = DatasetInfo {
            category: category.to_string(),
            split,
            name: format!("{category}-{split}"),
            meta,
            class_list: archive.class_list,
            summary: archive.summary,
        };

        let dataset = match generator {
            Some(generator) => {
                let fingerprints =
                    FingerprintTable::build(generator, &table.smiles, &config.fingerprint)?;
                let ExampleTable {
                    smiles, targets, ..
                } = table;
                ReactionDataset::Fingerprint(FingerprintDataset {
                    info,
                    smiles,
                    targets,
                    fingerprints,
                })
            }
            None => ReactionDataset::Graph(GraphDataset { info, table }),
        };

        info!(
            category,
            split = %split,
            mode = if dataset.is_fingerprint() { "rxnfp" } else { "graph" },
            n_reactions = dataset.n_reactions(),
            n_examples = dataset.len(),
            "loaded reaction-condition dataset"
        );
        Ok(dataset)
    }

    pub fn info(&self) -> &DatasetInfo {
        match self {
            ReactionDataset::Graph(d) => &d.info,
            ReactionDataset::Fingerprint(d) => &d.info,
        }
    }

    pub fn is_fingerprint(&self) -> bool {
        matches!(self, ReactionDataset::Fingerprint(_))
    }

    pub fn as_graph(&self) -> Option<&GraphDataset> {
        match self {
            ReactionDataset::Graph(d) => Some(d),
            ReactionDataset::Fingerprint(_) => None,
        }
    }

    pub fn as_fingerprint(&self) -> Option<&FingerprintDataset> {
        match self {
            ReactionDataset::Fingerprint(d) => Some(d),
            ReactionDataset::Graph(_) => None,
        }
    }

    pub fn meta(&self) -> &DatasetMeta {
        &self.info().meta
    }

    pub fn category(&self) -> &str {
        &self.info().category
    }

    pub fn split(&self) -> Split {
        self.info().split
    }

    pub fn class_list(&self) -> &[String] {
        &self.info().class_list
    }

    /// Preprocessing summary stored with the category archive.
    pub fn summary(&self) -> &Value {
        &self.info().summary
    }

    pub fn n_classes(&self) -> usize {
        self.meta().n_classes
    }

    pub fn n_reactions(&self) -> usize {
        self.meta().n_reactions
    }

    pub fn n_conditions(&self) -> usize {
        self.meta().n_conditions
    }

    pub fn cnt_list(&self) -> &[usize] {
        &self.meta().cnt_list
    }

    pub fn rmol_max_cnt(&self) -> usize {
        self.meta().rmol_max_cnt
    }

    pub fn pmol_max_cnt(&self) -> usize {
        self.meta().pmol_max_cnt
    }

    pub fn node_dim(&self) -> usize {
        self.meta().node_dim
    }

    pub fn edge_dim(&self) -> usize {
        self.meta().edge_dim
    }

    /// Fingerprint width, in fingerprint mode.
    pub fn fp_dim(&self) -> Option<usize> {
        self.as_fingerprint().map(FingerprintDataset::fp_dim)
    }

    /// Reaction SMILES of example `index`.
    pub fn smiles(&self, index: usize) -> &str {
        match self {
            ReactionDataset::Graph(d) => &d.table.smiles[index],
            ReactionDataset::Fingerprint(d) => &d.smiles[index],
        }
    }

    /// Observed condition classes behind example `index`: the single class of
    /// an expanded train example, or the full set of a val/tst reaction.
    ///
    /// Retrieval withholds these for val/tst; this accessor is for scoring.
    pub fn conditions(&self, index: usize) -> Vec<usize> {
        match self {
            ReactionDataset::Graph(d) => conditions_at(&d.table.targets, index),
            ReactionDataset::Fingerprint(d) => conditions_at(&d.targets, index),
        }
    }
}

impl Dataset for ReactionDataset {
    type Item = Example;

    fn len(&self) -> usize {
        match self {
            ReactionDataset::Graph(d) => d.len(),
            ReactionDataset::Fingerprint(d) => d.len(),
        }
    }

    fn get(&self, index: usize) -> Example {
        match self {
            ReactionDataset::Graph(d) => d.get(index),
            ReactionDataset::Fingerprint(d) => d.get(index),
        }
    }

    fn name(&self) -> &str {
        &self.info().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{BitVec, FingerprintParams};
    use crate::record::{ReactionRecord, RecordBundle};
    use crate::store::{CategoryArchive, MemoryRecordStore};
    use rxncond_core::{AttrMatrix, DType, MolGraph};

    fn graph(tag: i64) -> MolGraph {
        let node_attr = AttrMatrix::new(2, 3, vec![tag, 0, 1, 1, 0, tag]).unwrap();
        let edge_attr = AttrMatrix::new(2, 2, vec![1u8, 0, 1, 0]).unwrap();
        MolGraph::new(2, vec![(0, 1), (1, 0)], node_attr, edge_attr).unwrap()
    }

    fn store(label_sets: &[&[usize]], n_classes: usize) -> MemoryRecordStore {
        let records = label_sets
            .iter()
            .enumerate()
            .map(|(i, labels)| ReactionRecord {
                reactant_graphs: vec![graph(i as i64), MolGraph::empty(3, 2)],
                product_graphs: vec![graph(-(i as i64))],
                condition_labels: labels.to_vec(),
                reaction_smiles: format!("C{i}>>N{i}"),
            });
        let bundle = RecordBundle::from_records(records);
        let archive = CategoryArchive {
            summary: Value::Null,
            class_list: (0..n_classes).map(|c| format!("cond{c}")).collect(),
        };
        MemoryRecordStore::new()
            .with_category("toy", archive)
            .with_bundle("toy", "trn", bundle.clone())
            .with_bundle("toy", "tst", bundle)
    }

    fn config(split: Split) -> DatasetConfig {
        DatasetConfig::new("toy", split).seed(11).frac_val(0.0)
    }

    fn digit_bits(smiles: &str, params: &FingerprintParams) -> Result<BitVec> {
        let mut fp = BitVec::zeros(params.n_bits);
        for c in smiles.chars() {
            fp.set(c as usize % params.n_bits);
        }
        Ok(fp)
    }

    #[test]
    fn trn_expands_and_one_hots() {
        let s = store(&[&[0], &[1, 2], &[0, 2]], 3);
        let ds = ReactionDataset::load(&config(Split::Trn), &s, None).unwrap();
        assert_eq!(ds.len(), 5);
        assert_eq!(ds.n_reactions(), 3);
        assert_eq!(ds.n_conditions(), 5);
        for i in 0..ds.len() {
            let ex = ds.get(i);
            let label = ex.label().to_vec();
            assert_eq!(label.len(), 3);
            assert_eq!(label.iter().sum::<f32>(), 1.0);
            assert_eq!(ex.label().active_classes(), ds.conditions(i));
        }
    }

    #[test]
    fn tst_keeps_one_example_per_reaction() {
        let s = store(&[&[0], &[1, 2], &[0, 2]], 3);
        let ds = ReactionDataset::load(&config(Split::Tst), &s, None).unwrap();
        assert_eq!(ds.len(), 3);
        for i in 0..3 {
            assert!(ds.get(i).label().is_placeholder());
        }
        assert_eq!(ds.conditions(1), vec![1, 2]);
        assert_eq!(ds.smiles(2), "C2>>N2");
    }

    #[test]
    fn graphs_are_f32_on_every_access() {
        let s = store(&[&[0, 1]], 2);
        let ds = ReactionDataset::load(&config(Split::Trn), &s, None).unwrap();
        for _ in 0..2 {
            let ex = ds.get(0);
            let (r, p) = ex.graphs().unwrap();
            assert_eq!(ex.arity(), ds.rmol_max_cnt() + ds.pmol_max_cnt() + 1);
            for g in r.iter().chain(p) {
                assert_eq!(g.node_attr().dtype(), DType::F32);
                assert_eq!(g.edge_attr().dtype(), DType::F32);
            }
        }
    }

    #[test]
    fn fingerprint_mode_drops_graphs() {
        let s = store(&[&[0], &[1, 2]], 3);
        let params = FingerprintParams {
            n_bits: 64,
            ..FingerprintParams::default()
        };
        let cfg = config(Split::Trn).use_rxnfp(true).fingerprint(params);
        let generator: &dyn FingerprintGenerator = &digit_bits;
        let ds = ReactionDataset::load(&cfg, &s, Some(generator)).unwrap();
        assert!(ds.is_fingerprint());
        assert!(ds.as_graph().is_none());
        assert_eq!(ds.fp_dim(), Some(64));
        assert_eq!(ds.len(), 3);
        let ex = ds.get(0);
        assert_eq!(ex.arity(), 2);
        assert_eq!(ex.features().unwrap().len(), 64);
    }

    #[test]
    fn fingerprint_mode_requires_generator() {
        let s = store(&[&[0]], 1);
        let cfg = config(Split::Tst).use_rxnfp(true);
        let err = ReactionDataset::load(&cfg, &s, None).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn missing_category_is_fatal() {
        let s = MemoryRecordStore::new();
        let err = ReactionDataset::load(&config(Split::Trn), &s, None).unwrap_err();
        assert!(err.is_resource_error());
    }

    #[test]
    fn out_of_vocabulary_label_is_fatal() {
        let s = store(&[&[0], &[5]], 3);
        let err = ReactionDataset::load(&config(Split::Tst), &s, None).unwrap_err();
        assert!(matches!(err, Error::LabelOutOfRange { label: 5, .. }));
    }

    #[test]
    fn name_combines_category_and_split() {
        let s = store(&[&[0]], 1);
        let ds = ReactionDataset::load(&config(Split::Tst), &s, None).unwrap();
        assert_eq!(ds.name(), "toy-tst");
        assert_eq!(ds.category(), "toy");
        assert_eq!(ds.split(), Split::Tst);
    }
}
