// Expansion — one record per reaction -> one example per observed condition
//
// For the train split a reaction with k observed conditions becomes k
// examples. The replicas share the reaction's graph sets and SMILES through
// `Arc`, so expansion costs one pointer per replica, not a copy of the
// graphs. Order is reaction-major: all examples of reaction 0, then all of
// reaction 1, and so on, each in the order of the reaction's label set.
//
// Every graph is coerced to F32 once, here, before it is shared. Retrieval
// afterwards only reads.

use std::sync::Arc;

use tracing::debug;

use rxncond_core::{Error, MolGraph, Result};

use crate::record::RecordBundle;

/// A reaction's molecule set, shared between the examples expanded from it.
pub type GraphSet = Arc<[Arc<MolGraph>]>;

/// Label column of an [`ExampleTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    /// Expanded: exactly one condition class per example.
    Single(Vec<usize>),
    /// Not expanded: each example keeps its reaction's full condition set.
    Sets(Vec<Vec<usize>>),
}

impl Targets {
    pub fn len(&self) -> usize {
        match self {
            Targets::Single(v) => v.len(),
            Targets::Sets(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Index-aligned example columns after (optional) expansion.
#[derive(Debug, Clone)]
pub struct ExampleTable {
    pub reactant_sets: Vec<GraphSet>,
    pub product_sets: Vec<GraphSet>,
    pub smiles: Vec<Arc<str>>,
    pub targets: Targets,
}

impl ExampleTable {
    /// Number of examples (length of the label column).
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Check that every column has as many entries as the label column.
    pub fn validate_lengths(&self) -> Result<()> {
        let n = self.len();
        let columns = [
            ("expanded reactant sets", self.reactant_sets.len()),
            ("expanded product sets", self.product_sets.len()),
            ("expanded smiles", self.smiles.len()),
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
}

/// Normalize every graph of a set and freeze it for sharing.
fn share_set(graphs: Vec<MolGraph>) -> GraphSet {
    graphs
        .into_iter()
        .map(|mut g| {
            g.normalize();
            Arc::new(g)
        })
        .collect()
}

/// Expand a train bundle into one example per (reaction, condition) pair.
///
/// `cnt_list[i]` must equal the size of reaction i's label set; the result has
/// `cnt_list.iter().sum()` examples.
pub fn expand(bundle: RecordBundle, cnt_list: &[usize]) -> Result<ExampleTable> {
    bundle.validate_lengths()?;
    if cnt_list.len() != bundle.len() {
        return Err(Error::LengthMismatch {
            what: "cnt_list".into(),
            expected: bundle.len(),
            got: cnt_list.len(),
        });
    }
    let n_conditions: usize = cnt_list.iter().sum();

    let mut table = ExampleTable {
        reactant_sets: Vec::with_capacity(n_conditions),
        product_sets: Vec::with_capacity(n_conditions),
        smiles: Vec::with_capacity(n_conditions),
        targets: Targets::Single(Vec::new()),
    };
    let mut flat = Vec::with_capacity(n_conditions);

    let rows = bundle
        .reactant_graphs
        .into_iter()
        .zip(bundle.product_graphs)
        .zip(bundle.labels)
        .zip(bundle.smiles);

    for (i, (((rset, pset), labels), smiles)) in rows.enumerate() {
        let k = cnt_list[i];
        if labels.len() != k {
            return Err(Error::LengthMismatch {
                what: format!("label set of reaction {i}"),
                expected: k,
                got: labels.len(),
            });
        }
        let rset = share_set(rset);
        let pset = share_set(pset);
        let smiles: Arc<str> = Arc::from(smiles);

        for _ in 0..k {
            table.reactant_sets.push(Arc::clone(&rset));
            table.product_sets.push(Arc::clone(&pset));
            table.smiles.push(Arc::clone(&smiles));
        }
        flat.extend(labels);
    }
    table.targets = Targets::Single(flat);

    table.validate_lengths()?;
    if table.len() != n_conditions {
        return Err(Error::LengthMismatch {
            what: "expanded labels".into(),
            expected: n_conditions,
            got: table.len(),
        });
    }
    debug!(n_conditions, "expanded reactions to per-condition examples");
    Ok(table)
}

/// Keep one example per reaction with its full, un-flattened label set.
pub fn passthrough(bundle: RecordBundle) -> Result<ExampleTable> {
    bundle.validate_lengths()?;
    let table = ExampleTable {
        reactant_sets: bundle.reactant_graphs.into_iter().map(share_set).collect(),
        product_sets: bundle.product_graphs.into_iter().map(share_set).collect(),
        smiles: bundle.smiles.into_iter().map(Arc::<str>::from).collect(),
        targets: Targets::Sets(bundle.labels),
    };
    table.validate_lengths()?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ReactionRecord;
    use rxncond_core::AttrMatrix;

    fn graph(tag: u8) -> MolGraph {
        let node_attr = AttrMatrix::new(1, 2, vec![tag, 1]).unwrap();
        let edge_attr = AttrMatrix::new(0, 1, Vec::<u8>::new()).unwrap();
        MolGraph::new(1, vec![], node_attr, edge_attr).unwrap()
    }

    fn bundle(label_sets: &[&[usize]]) -> RecordBundle {
        RecordBundle::from_records(label_sets.iter().enumerate().map(|(i, labels)| {
            ReactionRecord {
                reactant_graphs: vec![graph(i as u8)],
                product_graphs: vec![graph(100 + i as u8)],
                condition_labels: labels.to_vec(),
                reaction_smiles: format!("R{i}>>P{i}"),
            }
        }))
    }

    #[test]
    fn expansion_is_reaction_major() {
        let b = bundle(&[&[0], &[1, 2], &[0, 2]]);
        let table = expand(b, &[1, 2, 2]).unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.targets, Targets::Single(vec![0, 1, 2, 0, 2]));
        let smiles: Vec<&str> = table.smiles.iter().map(|s| &**s).collect();
        assert_eq!(smiles, vec!["R0>>P0", "R1>>P1", "R1>>P1", "R2>>P2", "R2>>P2"]);
    }

    #[test]
    fn replicas_share_graphs() {
        let table = expand(bundle(&[&[3, 4, 5]]), &[3]).unwrap();
        assert!(Arc::ptr_eq(&table.reactant_sets[0], &table.reactant_sets[2]));
        assert!(Arc::ptr_eq(&table.product_sets[0], &table.product_sets[1]));
        assert!(Arc::ptr_eq(&table.smiles[0], &table.smiles[2]));
    }

    #[test]
    fn graphs_are_normalized_once() {
        let table = expand(bundle(&[&[0]]), &[1]).unwrap();
        assert!(table.reactant_sets[0].iter().all(|g| g.is_normalized()));
        assert!(table.product_sets[0].iter().all(|g| g.is_normalized()));
    }

    #[test]
    fn empty_label_set_contributes_nothing() {
        let table = expand(bundle(&[&[1], &[], &[0]]), &[1, 0, 1]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(&*table.smiles[1], "R2>>P2");
    }

    #[test]
    fn mismatched_cnt_list_is_rejected() {
        let err = expand(bundle(&[&[0, 1]]), &[1]).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { .. }));
    }

    #[test]
    fn passthrough_keeps_label_sets() {
        let table = passthrough(bundle(&[&[0], &[1, 2]])).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.targets, Targets::Sets(vec![vec![0], vec![1, 2]]));
        assert!(table.reactant_sets[1][0].is_normalized());
    }
}
