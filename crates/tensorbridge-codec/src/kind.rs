use std::{fmt, str::FromStr};

use tensorbridge_tensor::DType;

use crate::error::CodecError;

/// Element type tag carried by every value crossing the boundary.
///
/// The numeric tags are stable and identical to the [`DType`] ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum ScalarKind {
    /// 1 byte, `0` or `1`.
    Bool = 0,
    /// 1 byte two's complement.
    Int8 = 1,
    /// 2 bytes little-endian.
    Int16 = 2,
    /// 4 bytes little-endian.
    Int32 = 3,
    /// 8 bytes little-endian.
    Int64 = 4,
    /// 1 byte.
    UInt8 = 5,
    /// 2 bytes, IEEE binary16 bits.
    Float16 = 6,
    /// 4 bytes, IEEE binary32 bits.
    Float32 = 7,
    /// 8 bytes, IEEE binary64 bits.
    Float64 = 8,
    /// 16 bytes, two binary64 lanes.
    Complex32 = 9,
    /// 16 bytes, two binary64 lanes.
    Complex64 = 10,
    /// 16 bytes, two binary64 lanes.
    Complex128 = 11,
}

const ALL_KINDS: [ScalarKind; 12] = [
    ScalarKind::Bool,
    ScalarKind::Int8,
    ScalarKind::Int16,
    ScalarKind::Int32,
    ScalarKind::Int64,
    ScalarKind::UInt8,
    ScalarKind::Float16,
    ScalarKind::Float32,
    ScalarKind::Float64,
    ScalarKind::Complex32,
    ScalarKind::Complex64,
    ScalarKind::Complex128,
];

const KIND_NAMES: [&str; 12] = [
    "bool",
    "int8",
    "int16",
    "int32",
    "int64",
    "uint8",
    "float16",
    "float32",
    "float64",
    "complex32",
    "complex64",
    "complex128",
];

/// Host spellings accepted in addition to the canonical names.
const ALIASES: [(&str, ScalarKind); 11] = [
    ("byte", ScalarKind::UInt8),
    ("char", ScalarKind::Int8),
    ("short", ScalarKind::Int16),
    ("int", ScalarKind::Int32),
    ("long", ScalarKind::Int64),
    ("half", ScalarKind::Float16),
    ("float", ScalarKind::Float32),
    ("double", ScalarKind::Float64),
    ("complex_half", ScalarKind::Complex32),
    ("complex_float", ScalarKind::Complex64),
    ("complex_double", ScalarKind::Complex128),
];

/// Kind to dtype, indexed by kind tag.
const KIND_TO_DTYPE: [DType; 12] = [
    DType::Bool,
    DType::Int8,
    DType::Int16,
    DType::Int32,
    DType::Int64,
    DType::UInt8,
    DType::Float16,
    DType::Float32,
    DType::Float64,
    DType::Complex32,
    DType::Complex64,
    DType::Complex128,
];

/// Dtype to kind, indexed by dtype ordinal.
const DTYPE_TO_KIND: [ScalarKind; 12] = {
    let mut table = [ScalarKind::Bool; 12];
    let mut i = 0;
    while i < KIND_TO_DTYPE.len() {
        table[KIND_TO_DTYPE[i].ordinal()] = ALL_KINDS[i];
        i += 1;
    }
    table
};

impl ScalarKind {
    /// Every kind, ordered by tag.
    pub const ALL: [ScalarKind; 12] = ALL_KINDS;

    /// Decodes a numeric tag.
    pub fn from_tag(tag: u8) -> Result<Self, CodecError> {
        ALL_KINDS
            .get(tag as usize)
            .copied()
            .ok_or(CodecError::UnknownKindTag(tag))
    }

    /// The numeric tag.
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        KIND_NAMES[self as usize]
    }

    /// Number of payload bytes of one encoded value.
    pub fn width(self) -> usize {
        match self {
            ScalarKind::Bool | ScalarKind::Int8 | ScalarKind::UInt8 => 1,
            ScalarKind::Int16 | ScalarKind::Float16 => 2,
            ScalarKind::Int32 | ScalarKind::Float32 => 4,
            ScalarKind::Int64 | ScalarKind::Float64 => 8,
            ScalarKind::Complex32 | ScalarKind::Complex64 | ScalarKind::Complex128 => 16,
        }
    }

    /// Returns true for the complex kinds.
    pub fn is_complex(self) -> bool {
        self.dtype().is_complex()
    }

    /// The tensor dtype of this kind.
    pub fn dtype(self) -> DType {
        KIND_TO_DTYPE[self as usize]
    }

    /// The kind tagging elements of `dtype`.
    pub fn from_dtype(dtype: DType) -> Self {
        DTYPE_TO_KIND[dtype.ordinal()]
    }
}

impl FromStr for ScalarKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(i) = KIND_NAMES.iter().position(|&name| name == s) {
            return Ok(ALL_KINDS[i]);
        }
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == s)
            .map(|&(_, kind)| kind)
            .ok_or_else(|| CodecError::UnsupportedKind(s.to_string()))
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ScalarKind> for DType {
    fn from(kind: ScalarKind) -> Self {
        kind.dtype()
    }
}

impl From<DType> for ScalarKind {
    fn from(dtype: DType) -> Self {
        ScalarKind::from_dtype(dtype)
    }
}
