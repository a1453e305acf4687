// Example — one retrieved item of a reaction-condition dataset

use std::sync::Arc;

use rxncond_core::MolGraph;

/// Label attached to a retrieved example.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    /// Train split: length `n_classes`, exactly one entry set to 1.
    MultiHot(Vec<f32>),
    /// Validation/test split: ground truth is withheld; stands for scalar `0`.
    Placeholder,
}

impl Label {
    /// Multi-hot vector of width `n_classes` with `class` set.
    ///
    /// # Panics
    /// Panics if `class >= n_classes`.
    pub fn one_hot(class: usize, n_classes: usize) -> Self {
        let mut v = vec![0.0; n_classes];
        v[class] = 1.0;
        Label::MultiHot(v)
    }

    /// The label as a flat numeric vector (`[0.0]` for the placeholder).
    pub fn to_vec(&self) -> Vec<f32> {
        match self {
            Label::MultiHot(v) => v.clone(),
            Label::Placeholder => vec![0.0],
        }
    }

    /// Indices of the set classes; empty for the placeholder.
    pub fn active_classes(&self) -> Vec<usize> {
        match self {
            Label::MultiHot(v) => v
                .iter()
                .enumerate()
                .filter(|(_, &x)| x != 0.0)
                .map(|(i, _)| i)
                .collect(),
            Label::Placeholder => Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Label::Placeholder)
    }
}

/// One dataset item.
///
/// In graph mode this is the variable-arity tuple
/// `(*reactant_graphs, *product_graphs, label)`; in fingerprint mode it is
/// `(features, label)`.
#[derive(Debug, Clone)]
pub enum Example {
    Graph {
        reactants: Vec<Arc<MolGraph>>,
        products: Vec<Arc<MolGraph>>,
        label: Label,
    },
    Fingerprint {
        features: Vec<f32>,
        label: Label,
    },
}

impl Example {
    pub fn label(&self) -> &Label {
        match self {
            Example::Graph { label, .. } | Example::Fingerprint { label, .. } => label,
        }
    }

    /// Tuple arity: `rmol_max_cnt + pmol_max_cnt + 1` for graphs, 2 for fingerprints.
    pub fn arity(&self) -> usize {
        match self {
            Example::Graph {
                reactants,
                products,
                ..
            } => reactants.len() + products.len() + 1,
            Example::Fingerprint { .. } => 2,
        }
    }

    /// Fingerprint features, if this is a fingerprint example.
    pub fn features(&self) -> Option<&[f32]> {
        match self {
            Example::Fingerprint { features, .. } => Some(features),
            Example::Graph { .. } => None,
        }
    }

    /// Reactant and product graphs, if this is a graph example.
    pub fn graphs(&self) -> Option<(&[Arc<MolGraph>], &[Arc<MolGraph>])> {
        match self {
            Example::Graph {
                reactants,
                products,
                ..
            } => Some((reactants, products)),
            Example::Fingerprint { .. } => None,
        }
    }
}
