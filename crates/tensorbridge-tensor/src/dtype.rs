use std::fmt;

/// Element type of a [`crate::Tensor`].
///
/// The discriminants are stable and double as indices into the lookup tables
/// kept by the marshaling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DType {
    /// Boolean, one byte per element.
    Bool = 0,
    /// Signed 8-bit integer.
    Int8 = 1,
    /// Signed 16-bit integer.
    Int16 = 2,
    /// Signed 32-bit integer.
    Int32 = 3,
    /// Signed 64-bit integer.
    Int64 = 4,
    /// Unsigned 8-bit integer.
    UInt8 = 5,
    /// IEEE-754 binary16.
    Float16 = 6,
    /// IEEE-754 binary32.
    Float32 = 7,
    /// IEEE-754 binary64.
    Float64 = 8,
    /// Complex number with binary16 lanes.
    Complex32 = 9,
    /// Complex number with binary32 lanes.
    Complex64 = 10,
    /// Complex number with binary64 lanes.
    Complex128 = 11,
}

impl DType {
    /// Every supported dtype, ordered by discriminant.
    pub const ALL: [DType; 12] = [
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

    /// Position of the dtype inside [`DType::ALL`].
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Returns true for the real floating point dtypes.
    #[inline]
    pub fn is_floating_point(self) -> bool {
        matches!(self, DType::Float16 | DType::Float32 | DType::Float64)
    }

    /// Returns true for the complex dtypes.
    #[inline]
    pub fn is_complex(self) -> bool {
        matches!(
            self,
            DType::Complex32 | DType::Complex64 | DType::Complex128
        )
    }

    /// Returns true for the integer dtypes (booleans excluded).
    #[inline]
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64 | DType::UInt8
        )
    }

    /// In-memory size of one element in bytes.
    pub fn itemsize(self) -> usize {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => 1,
            DType::Int16 | DType::Float16 => 2,
            DType::Int32 | DType::Float32 | DType::Complex32 => 4,
            DType::Int64 | DType::Float64 | DType::Complex64 => 8,
            DType::Complex128 => 16,
        }
    }

    /// The real dtype holding one lane of a complex dtype.
    ///
    /// Real dtypes map to themselves.
    pub fn to_real(self) -> DType {
        match self {
            DType::Complex32 => DType::Float16,
            DType::Complex64 => DType::Float32,
            DType::Complex128 => DType::Float64,
            other => other,
        }
    }

    /// The complex dtype whose lanes have this dtype's precision.
    ///
    /// Non floating dtypes promote to [`DType::Complex128`].
    pub fn to_complex(self) -> DType {
        match self {
            DType::Float16 | DType::Complex32 => DType::Complex32,
            DType::Float32 | DType::Complex64 => DType::Complex64,
            _ => DType::Complex128,
        }
    }

    /// Lowercase name of the dtype.
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::Float16 => "float16",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Complex32 => "complex32",
            DType::Complex64 => "complex64",
            DType::Complex128 => "complex128",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::DType;

    #[test]
    fn ordinal_matches_table_position() {
        for (i, dtype) in DType::ALL.iter().enumerate() {
            assert_eq!(dtype.ordinal(), i);
        }
    }

    #[test]
    fn complex_real_lanes() {
        assert_eq!(DType::Complex32.to_real(), DType::Float16);
        assert_eq!(DType::Complex64.to_real(), DType::Float32);
        assert_eq!(DType::Complex128.to_real(), DType::Float64);
        assert_eq!(DType::Float32.to_complex(), DType::Complex64);
        assert_eq!(DType::Int64.to_complex(), DType::Complex128);
        assert_eq!(DType::Int32.to_real(), DType::Int32);
    }

    #[test]
    fn categories() {
        assert!(DType::Float16.is_floating_point());
        assert!(!DType::Complex64.is_floating_point());
        assert!(DType::Complex64.is_complex());
        assert!(DType::UInt8.is_integral());
        assert!(!DType::Bool.is_integral());
        assert_eq!(DType::Complex128.itemsize(), 16);
    }
}
