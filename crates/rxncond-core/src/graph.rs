// MolGraph — a molecule as typed node/edge attribute matrices
//
// Edges follow the message-passing convention: a bond between atoms u and v
// is stored as the two directed edges (u, v) and (v, u), each with its own
// row in `edge_attr`. Padding slots in a reaction's molecule set are graphs
// with zero nodes; their attribute matrices still carry the dataset widths.
//
// Decoded graphs pass through `MolGraph::new` like constructed ones.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::AttrMatrix;

/// A molecular graph with per-node and per-edge attribute matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMolGraph")]
pub struct MolGraph {
    num_nodes: usize,
    edges: Vec<(usize, usize)>,
    node_attr: AttrMatrix,
    edge_attr: AttrMatrix,
}

#[derive(Deserialize)]
struct RawMolGraph {
    num_nodes: usize,
    edges: Vec<(usize, usize)>,
    node_attr: AttrMatrix,
    edge_attr: AttrMatrix,
}

impl TryFrom<RawMolGraph> for MolGraph {
    type Error = Error;

    fn try_from(raw: RawMolGraph) -> Result<Self> {
        MolGraph::new(raw.num_nodes, raw.edges, raw.node_attr, raw.edge_attr)
    }
}

impl MolGraph {
    /// Build a graph, checking that attribute rows line up with nodes/edges
    /// and that every edge endpoint exists.
    pub fn new(
        num_nodes: usize,
        edges: Vec<(usize, usize)>,
        node_attr: AttrMatrix,
        edge_attr: AttrMatrix,
    ) -> Result<Self> {
        if node_attr.rows() != num_nodes {
            return Err(Error::ShapeMismatch {
                what: "node_attr rows".into(),
                expected: num_nodes,
                got: node_attr.rows(),
            });
        }
        if edge_attr.rows() != edges.len() {
            return Err(Error::ShapeMismatch {
                what: "edge_attr rows".into(),
                expected: edges.len(),
                got: edge_attr.rows(),
            });
        }
        if let Some(&(src, dst)) = edges
            .iter()
            .find(|&&(s, d)| s >= num_nodes || d >= num_nodes)
        {
            return Err(Error::InvalidEdge {
                src,
                dst,
                num_nodes,
            });
        }
        Ok(Self {
            num_nodes,
            edges,
            node_attr,
            edge_attr,
        })
    }

    /// A zero-node graph used to pad a molecule set to its fixed count.
    pub fn empty(node_dim: usize, edge_dim: usize) -> Self {
        Self {
            num_nodes: 0,
            edges: Vec::new(),
            node_attr: AttrMatrix::zeros(0, node_dim),
            edge_attr: AttrMatrix::zeros(0, edge_dim),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn node_attr(&self) -> &AttrMatrix {
        &self.node_attr
    }

    pub fn edge_attr(&self) -> &AttrMatrix {
        &self.edge_attr
    }

    /// Width of the node attribute matrix.
    pub fn node_dim(&self) -> usize {
        self.node_attr.cols()
    }

    /// Width of the edge attribute matrix.
    pub fn edge_dim(&self) -> usize {
        self.edge_attr.cols()
    }

    /// Coerce both attribute matrices to F32. Idempotent.
    pub fn normalize(&mut self) {
        self.node_attr.coerce_f32();
        self.edge_attr.coerce_f32();
    }

    /// Whether both attribute matrices are already F32.
    pub fn is_normalized(&self) -> bool {
        self.node_attr.is_f32() && self.edge_attr.is_f32()
    }
}
