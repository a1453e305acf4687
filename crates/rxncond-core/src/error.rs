use std::path::PathBuf;

use crate::dtype::DType;

/// All errors that can occur while assembling a reaction-condition dataset.
///
/// Every failure is fatal for the load that raised it: there is no partial
/// dataset. The variants fall into three groups: resource errors (missing
/// or corrupt store files), parse errors (malformed reaction SMILES) and
/// precondition violations (bad split names, inconsistent record shapes).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A store file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested store file does not exist.
    #[error("resource not found: {}", .0.display())]
    MissingResource(PathBuf),

    /// A store file exists but could not be decoded.
    #[error("failed to decode {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    /// A molecule SMILES string was rejected by the fingerprint generator.
    #[error("failed to parse SMILES {smiles:?}: {message}")]
    SmilesParse { smiles: String, message: String },

    /// A reaction SMILES string has no `>>` delimiter.
    #[error("malformed reaction SMILES (expected `reactants>>products`): {0:?}")]
    MalformedReaction(String),

    /// Split name outside `trn`, `val`, `tst`.
    #[error("invalid split {0:?}: expected one of trn, val, tst")]
    InvalidSplit(String),

    /// Parallel sequences that must be index-aligned have different lengths.
    #[error("length mismatch in {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    /// A record does not conform to the dataset-wide shape constants.
    #[error("shape mismatch in {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    /// A condition label is outside `[0, n_classes)`.
    #[error("label {label} of reaction {reaction} out of range (n_classes = {n_classes})")]
    LabelOutOfRange {
        reaction: usize,
        label: usize,
        n_classes: usize,
    },

    /// The selected pool contains no reactions, so no metadata can be derived.
    #[error("no reactions in category {category:?}, split {split}")]
    EmptyPool { category: String, split: String },

    /// Element count does not match the declared matrix shape.
    #[error("element count mismatch: [{rows}x{cols}] requires {} elements, got {got}", .rows * .cols)]
    ElementCountMismatch { rows: usize, cols: usize, got: usize },

    /// A row index past the end of an attribute matrix.
    #[error("row {row} out of range for matrix with {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    /// An edge endpoint refers to a node that does not exist.
    #[error("edge ({src}, {dst}) out of range for graph with {num_nodes} nodes")]
    InvalidEdge {
        src: usize,
        dst: usize,
        num_nodes: usize,
    },

    /// An operation needed a specific storage type.
    #[error("dtype mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: DType, got: DType },

    /// Construction parameters rejected before loading.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }

    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from the record store (missing or unreadable files).
    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            Error::Io { .. } | Error::MissingResource(_) | Error::Decode { .. }
        )
    }
}

/// Convenience Result type used throughout rxncond.
pub type Result<T> = std::result::Result<T, Error>;

/// Macro for early return with a formatted error message.
/// Usage: `bail!("something went wrong: {}", detail)`
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::Msg(format!($($arg)*)))
    };
}
