use std::fmt;

use serde::{Deserialize, Serialize};

// DType — numeric encodings of graph attribute matrices
//
// Node and edge attributes come out of the record store in whatever encoding
// the preprocessing step used. Featurizers commonly emit one-hot atom/bond
// features as bytes or booleans, counts as integers, and continuous
// descriptors as floats. The dataset hands everything to consumers as F32.
//
//   F16  — 16-bit IEEE half float
//   F32  — 32-bit float, the retrieval encoding
//   F64  — 64-bit float
//   U8   — unsigned byte, one-hot features
//   I32  — signed 32-bit int
//   I64  — signed 64-bit int, counts and indices
//   Bool — boolean indicator features

/// Enum of all supported attribute element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    F16,
    F32,
    F64,
    U8,
    I32,
    I64,
    Bool,
}

impl DType {
    /// Size of one element in bytes.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::F16 => 2,
            DType::F32 => 4,
            DType::F64 => 8,
            DType::U8 => 1,
            DType::I32 => 4,
            DType::I64 => 8,
            DType::Bool => 1,
        }
    }

    /// Whether this dtype is a floating-point type.
    pub fn is_float(&self) -> bool {
        matches!(self, DType::F16 | DType::F32 | DType::F64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DType::F16 => "f16",
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::U8 => "u8",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::Bool => "bool",
        };
        write!(f, "{}", s)
    }
}

// WithDType — bridge between Rust element types and the DType enum
//
// Lets generic code build an attribute matrix from a `Vec<T>` and convert any
// stored element to the f32 retrieval encoding.

/// Trait implemented by Rust types that can be stored in an attribute matrix.
pub trait WithDType: Copy + Send + Sync + 'static + fmt::Debug {
    /// The corresponding DType enum variant.
    const DTYPE: DType;

    /// Value-preserving (up to f32 precision) conversion to f32.
    fn to_f32(self) -> f32;
}

impl WithDType for half::f16 {
    const DTYPE: DType = DType::F16;
    fn to_f32(self) -> f32 {
        half::f16::to_f32(self)
    }
}

impl WithDType for f32 {
    const DTYPE: DType = DType::F32;
    fn to_f32(self) -> f32 {
        self
    }
}

impl WithDType for f64 {
    const DTYPE: DType = DType::F64;
    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl WithDType for u8 {
    const DTYPE: DType = DType::U8;
    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl WithDType for i32 {
    const DTYPE: DType = DType::I32;
    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl WithDType for i64 {
    const DTYPE: DType = DType::I64;
    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl WithDType for bool {
    const DTYPE: DType = DType::Bool;
    fn to_f32(self) -> f32 {
        if self {
            1.0
        } else {
            0.0
        }
    }
}
