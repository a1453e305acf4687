// AttrMatrix — dense row-major attribute matrix with typed storage
//
// Each molecular graph carries two of these: one row per node and one row per
// edge. The storage keeps whatever encoding the record store delivered until
// `coerce_f32` runs, after which the matrix is F32 and further coercions are
// no-ops.
//
// Decoding goes through `AttrMatrix::new`, so a stored matrix whose element
// count disagrees with its shape is rejected when the bundle is read.

use serde::{Deserialize, Serialize};

use crate::dtype::{DType, WithDType};
use crate::error::{Error, Result};

/// Typed element storage for an [`AttrMatrix`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrData {
    F16(Vec<half::f16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    U8(Vec<u8>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    Bool(Vec<bool>),
}

impl AttrData {
    /// Number of stored elements.
    pub fn len(&self) -> usize {
        match self {
            AttrData::F16(v) => v.len(),
            AttrData::F32(v) => v.len(),
            AttrData::F64(v) => v.len(),
            AttrData::U8(v) => v.len(),
            AttrData::I32(v) => v.len(),
            AttrData::I64(v) => v.len(),
            AttrData::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DType {
        match self {
            AttrData::F16(_) => DType::F16,
            AttrData::F32(_) => DType::F32,
            AttrData::F64(_) => DType::F64,
            AttrData::U8(_) => DType::U8,
            AttrData::I32(_) => DType::I32,
            AttrData::I64(_) => DType::I64,
            AttrData::Bool(_) => DType::Bool,
        }
    }

    /// Convert every element to f32.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        fn cast<T: WithDType>(v: &[T]) -> Vec<f32> {
            v.iter().map(|&x| x.to_f32()).collect()
        }
        match self {
            AttrData::F16(v) => cast(v),
            AttrData::F32(v) => v.clone(),
            AttrData::F64(v) => cast(v),
            AttrData::U8(v) => cast(v),
            AttrData::I32(v) => cast(v),
            AttrData::I64(v) => cast(v),
            AttrData::Bool(v) => cast(v),
        }
    }
}

macro_rules! impl_from_vec {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$t>> for AttrData {
                fn from(v: Vec<$t>) -> Self {
                    AttrData::$variant(v)
                }
            }
        )*
    };
}

impl_from_vec!(
    half::f16 => F16,
    f32 => F32,
    f64 => F64,
    u8 => U8,
    i32 => I32,
    i64 => I64,
    bool => Bool,
);

/// A `[rows x cols]` row-major matrix of node or edge attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAttrMatrix")]
pub struct AttrMatrix {
    rows: usize,
    cols: usize,
    data: AttrData,
}

/// Wire form of [`AttrMatrix`], checked on the way in.
#[derive(Deserialize)]
struct RawAttrMatrix {
    rows: usize,
    cols: usize,
    data: AttrData,
}

impl TryFrom<RawAttrMatrix> for AttrMatrix {
    type Error = Error;

    fn try_from(raw: RawAttrMatrix) -> Result<Self> {
        AttrMatrix::new(raw.rows, raw.cols, raw.data)
    }
}

impl AttrMatrix {
    /// Create a matrix, checking that `data` holds exactly `rows * cols` elements.
    pub fn new(rows: usize, cols: usize, data: impl Into<AttrData>) -> Result<Self> {
        let data = data.into();
        if data.len() != rows * cols {
            return Err(Error::ElementCountMismatch {
                rows,
                cols,
                got: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// An F32 matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: AttrData::F32(vec![0.0; rows * cols]),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn data(&self) -> &AttrData {
        &self.data
    }

    pub fn is_f32(&self) -> bool {
        matches!(self.data, AttrData::F32(_))
    }

    /// Return an F32 copy of this matrix (values preserved up to f32 precision).
    pub fn to_f32(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: AttrData::F32(self.data.to_f32_vec()),
        }
    }

    /// Convert the storage to F32 in place. Idempotent.
    pub fn coerce_f32(&mut self) {
        if !self.is_f32() {
            self.data = AttrData::F32(self.data.to_f32_vec());
        }
    }

    /// The elements as an f32 slice, if the storage is F32.
    pub fn as_f32_slice(&self) -> Option<&[f32]> {
        match &self.data {
            AttrData::F32(v) => Some(v),
            _ => None,
        }
    }

    /// Row `i` of an F32 matrix.
    pub fn row(&self, i: usize) -> Result<&[f32]> {
        if i >= self.rows {
            return Err(Error::RowOutOfRange {
                row: i,
                rows: self.rows,
            });
        }
        let data = self.as_f32_slice().ok_or(Error::DTypeMismatch {
            expected: DType::F32,
            got: self.dtype(),
        })?;
        Ok(&data[i * self.cols..(i + 1) * self.cols])
    }
}
