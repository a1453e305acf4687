// RecordBundle — the four parallel per-reaction sequences of one store split
//
//   reactant_graphs[i] : reaction i's reactant molecule set (rmol_max_cnt graphs)
//   product_graphs[i]  : reaction i's product molecule set  (pmol_max_cnt graphs)
//   labels[i]          : observed condition class indices of reaction i
//   smiles[i]          : "reactants>>products"
//
// DatasetMeta freezes the dataset-wide constants derived from the first
// record and the category's class list, and checks every other record
// against them.

use serde::{Deserialize, Serialize};

use rxncond_core::{Error, MolGraph, Result};

/// One reaction before expansion. Used to build bundles programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionRecord {
    pub reactant_graphs: Vec<MolGraph>,
    pub product_graphs: Vec<MolGraph>,
    pub condition_labels: Vec<usize>,
    pub reaction_smiles: String,
}

/// Parallel per-reaction sequences as stored for one category/split.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBundle {
    pub reactant_graphs: Vec<Vec<MolGraph>>,
    pub product_graphs: Vec<Vec<MolGraph>>,
    pub labels: Vec<Vec<usize>>,
    pub smiles: Vec<String>,
}

impl RecordBundle {
    /// Build a bundle from individual reaction records.
    pub fn from_records(records: impl IntoIterator<Item = ReactionRecord>) -> Self {
        let mut bundle = RecordBundle::default();
        for r in records {
            bundle.reactant_graphs.push(r.reactant_graphs);
            bundle.product_graphs.push(r.product_graphs);
            bundle.labels.push(r.condition_labels);
            bundle.smiles.push(r.reaction_smiles);
        }
        bundle
    }

    /// Number of reactions (length of the label sequence).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Check that all four sequences have the same length.
    pub fn validate_lengths(&self) -> Result<()> {
        let n = self.labels.len();
        let columns = [
            ("reactant graph sets", self.reactant_graphs.len()),
            ("product graph sets", self.product_graphs.len()),
            ("reaction smiles", self.smiles.len()),
        ];
        for (what, got) in columns {
            if got != n {
                return Err(Error::LengthMismatch {
                    what: what.to_string(),
                    expected: n,
                    got,
                });
            }
        }
        Ok(())
    }

    /// Keep only the reactions at `indices`, in that order.
    ///
    /// # Panics
    /// Panics if any index is out of range.
    pub fn select(self, indices: &[usize]) -> Self {
        let RecordBundle {
            reactant_graphs,
            product_graphs,
            labels,
            smiles,
        } = self;
        RecordBundle {
            reactant_graphs: take_in_order(reactant_graphs, indices),
            product_graphs: take_in_order(product_graphs, indices),
            labels: take_in_order(labels, indices),
            smiles: take_in_order(smiles, indices),
        }
    }
}

/// Move the elements at `indices` out of `items`, in the order of `indices`.
fn take_in_order<T>(items: Vec<T>, indices: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    indices
        .iter()
        .map(|&i| {
            slots[i]
                .take()
                .unwrap_or_else(|| panic!("RecordBundle::select: index {i} selected twice"))
        })
        .collect()
}

/// Dataset-wide constants, derived once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetMeta {
    /// Size of the condition vocabulary.
    pub n_classes: usize,
    /// Molecule slots per reactant set.
    pub rmol_max_cnt: usize,
    /// Molecule slots per product set.
    pub pmol_max_cnt: usize,
    /// Node attribute width.
    pub node_dim: usize,
    /// Edge attribute width.
    pub edge_dim: usize,
    /// Observed-condition count of each reaction in the selected pool.
    pub cnt_list: Vec<usize>,
    /// Reactions in the selected pool.
    pub n_reactions: usize,
    /// Sum of `cnt_list`.
    pub n_conditions: usize,
}

impl DatasetMeta {
    /// Derive the constants from the first record and the class list.
    ///
    /// `category`/`split` only label the error for an empty pool.
    pub fn derive(
        bundle: &RecordBundle,
        class_list: &[String],
        category: &str,
        split: &str,
    ) -> Result<Self> {
        bundle.validate_lengths()?;
        let empty = || Error::EmptyPool {
            category: category.to_string(),
            split: split.to_string(),
        };
        let first_rset = bundle.reactant_graphs.first().ok_or_else(empty)?;
        let first_pset = &bundle.product_graphs[0];
        let first_graph = first_rset.first().ok_or_else(|| Error::ShapeMismatch {
            what: "reactant graphs in first record".into(),
            expected: 1,
            got: 0,
        })?;

        let cnt_list: Vec<usize> = bundle.labels.iter().map(Vec::len).collect();
        let n_conditions = cnt_list.iter().sum();

        Ok(Self {
            n_classes: class_list.len(),
            rmol_max_cnt: first_rset.len(),
            pmol_max_cnt: first_pset.len(),
            node_dim: first_graph.node_dim(),
            edge_dim: first_graph.edge_dim(),
            n_reactions: bundle.len(),
            cnt_list,
            n_conditions,
        })
    }

    /// Check every record against the frozen constants.
    pub fn check_conformance(&self, bundle: &RecordBundle) -> Result<()> {
        let sides = [
            ("reactant", &bundle.reactant_graphs, self.rmol_max_cnt),
            ("product", &bundle.product_graphs, self.pmol_max_cnt),
        ];
        for (side, sets, max_cnt) in sides {
            for (i, set) in sets.iter().enumerate() {
                if set.len() != max_cnt {
                    return Err(Error::ShapeMismatch {
                        what: format!("{side} set size of reaction {i}"),
                        expected: max_cnt,
                        got: set.len(),
                    });
                }
                for g in set {
                    self.check_graph(g, side, i)?;
                }
            }
        }

        for (reaction, labels) in bundle.labels.iter().enumerate() {
            if let Some(&label) = labels.iter().find(|&&l| l >= self.n_classes) {
                return Err(Error::LabelOutOfRange {
                    reaction,
                    label,
                    n_classes: self.n_classes,
                });
            }
        }
        Ok(())
    }

    fn check_graph(&self, g: &MolGraph, side: &str, reaction: usize) -> Result<()> {
        if g.node_dim() != self.node_dim {
            return Err(Error::ShapeMismatch {
                what: format!("node_dim of {side} graph in reaction {reaction}"),
                expected: self.node_dim,
                got: g.node_dim(),
            });
        }
        if g.edge_dim() != self.edge_dim {
            return Err(Error::ShapeMismatch {
                what: format!("edge_dim of {side} graph in reaction {reaction}"),
                expected: self.edge_dim,
                got: g.edge_dim(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(labels: Vec<usize>, smiles: &str) -> ReactionRecord {
        ReactionRecord {
            reactant_graphs: vec![MolGraph::empty(4, 2), MolGraph::empty(4, 2)],
            product_graphs: vec![MolGraph::empty(4, 2)],
            condition_labels: labels,
            reaction_smiles: smiles.to_string(),
        }
    }

    fn classes(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("cond{i}")).collect()
    }

    #[test]
    fn derive_reads_first_record() {
        let bundle = RecordBundle::from_records(vec![
            record(vec![0], "A>>B"),
            record(vec![1, 2], "C>>D"),
            record(vec![0, 2], "E>>F"),
        ]);
        let meta = DatasetMeta::derive(&bundle, &classes(3), "suzuki", "trn").unwrap();
        assert_eq!(meta.n_classes, 3);
        assert_eq!(meta.rmol_max_cnt, 2);
        assert_eq!(meta.pmol_max_cnt, 1);
        assert_eq!(meta.node_dim, 4);
        assert_eq!(meta.edge_dim, 2);
        assert_eq!(meta.cnt_list, vec![1, 2, 2]);
        assert_eq!(meta.n_reactions, 3);
        assert_eq!(meta.n_conditions, 5);
        meta.check_conformance(&bundle).unwrap();
    }

    #[test]
    fn derive_rejects_empty_pool() {
        let err = DatasetMeta::derive(&RecordBundle::default(), &classes(2), "suzuki", "val")
            .unwrap_err();
        assert!(matches!(err, Error::EmptyPool { .. }));
    }

    #[test]
    fn validate_lengths_catches_short_column() {
        let mut bundle = RecordBundle::from_records(vec![record(vec![0], "A>>B")]);
        bundle.smiles.clear();
        let err = bundle.validate_lengths().unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                expected: 1,
                got: 0,
                ..
            }
        ));
    }

    #[test]
    fn conformance_rejects_wrong_set_size() {
        let mut odd = record(vec![0], "C>>D");
        odd.product_graphs.push(MolGraph::empty(4, 2));
        let bundle = RecordBundle::from_records(vec![record(vec![0], "A>>B"), odd]);
        let meta = DatasetMeta::derive(&bundle, &classes(1), "c", "trn").unwrap();
        assert!(matches!(
            meta.check_conformance(&bundle),
            Err(Error::ShapeMismatch {
                expected: 1,
                got: 2,
                ..
            })
        ));
    }

    #[test]
    fn conformance_rejects_wrong_node_dim() {
        let mut odd = record(vec![0], "C>>D");
        odd.reactant_graphs[1] = MolGraph::empty(5, 2);
        let bundle = RecordBundle::from_records(vec![record(vec![0], "A>>B"), odd]);
        let meta = DatasetMeta::derive(&bundle, &classes(1), "c", "trn").unwrap();
        assert!(meta.check_conformance(&bundle).is_err());
    }

    #[test]
    fn conformance_rejects_label_out_of_range() {
        let bundle = RecordBundle::from_records(vec![record(vec![0, 3], "A>>B")]);
        let meta = DatasetMeta::derive(&bundle, &classes(3), "c", "trn").unwrap();
        assert!(matches!(
            meta.check_conformance(&bundle),
            Err(Error::LabelOutOfRange {
                reaction: 0,
                label: 3,
                n_classes: 3
            })
        ));
    }

    #[test]
    fn select_keeps_index_order() {
        let bundle = RecordBundle::from_records(vec![
            record(vec![0], "A>>B"),
            record(vec![1], "C>>D"),
            record(vec![2], "E>>F"),
        ]);
        let sub = bundle.select(&[2, 0]);
        assert_eq!(sub.smiles, vec!["E>>F", "A>>B"]);
        assert_eq!(sub.labels, vec![vec![2], vec![0]]);
        sub.validate_lengths().unwrap();
    }
}
