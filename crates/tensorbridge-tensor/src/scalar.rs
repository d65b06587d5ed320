use half::f16;
use num_complex::Complex;
use num_traits::Float;

use crate::dtype::DType;

fn lanes_finite<T: Float>(c: Complex<T>) -> bool {
    c.re.is_finite() && c.im.is_finite()
}

/// A single native element, tagged with its exact element type.
///
/// This is the value read out of, or written into, a [`crate::Tensor`] one element at a
/// time. Conversions between variants go through [`ScalarValue::cast`] and follow the
/// native library's conventions: floating values convert through a saturating 64-bit
/// integer, integer narrowing wraps, and any value converted to [`DType::Bool`] is
/// `true` iff it is non-zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    /// Boolean element.
    Bool(bool),
    /// Signed 8-bit element.
    Int8(i8),
    /// Signed 16-bit element.
    Int16(i16),
    /// Signed 32-bit element.
    Int32(i32),
    /// Signed 64-bit element.
    Int64(i64),
    /// Unsigned 8-bit element.
    UInt8(u8),
    /// binary16 element.
    Float16(f16),
    /// binary32 element.
    Float32(f32),
    /// binary64 element.
    Float64(f64),
    /// Complex element with binary16 lanes.
    Complex32(Complex<f16>),
    /// Complex element with binary32 lanes.
    Complex64(Complex<f32>),
    /// Complex element with binary64 lanes.
    Complex128(Complex<f64>),
}

impl ScalarValue {
    /// The zero value of `dtype`.
    pub fn zero(dtype: DType) -> Self {
        ScalarValue::Int64(0).cast(dtype)
    }

    /// The dtype of the value.
    pub fn dtype(&self) -> DType {
        match self {
            ScalarValue::Bool(_) => DType::Bool,
            ScalarValue::Int8(_) => DType::Int8,
            ScalarValue::Int16(_) => DType::Int16,
            ScalarValue::Int32(_) => DType::Int32,
            ScalarValue::Int64(_) => DType::Int64,
            ScalarValue::UInt8(_) => DType::UInt8,
            ScalarValue::Float16(_) => DType::Float16,
            ScalarValue::Float32(_) => DType::Float32,
            ScalarValue::Float64(_) => DType::Float64,
            ScalarValue::Complex32(_) => DType::Complex32,
            ScalarValue::Complex64(_) => DType::Complex64,
            ScalarValue::Complex128(_) => DType::Complex128,
        }
    }

    /// The value as a double. Complex values yield their real lane.
    pub fn to_f64(&self) -> f64 {
        match *self {
            ScalarValue::Bool(v) => {
                if v {
                    1.0
                } else {
                    0.0
                }
            }
            ScalarValue::Int8(v) => v as f64,
            ScalarValue::Int16(v) => v as f64,
            ScalarValue::Int32(v) => v as f64,
            ScalarValue::Int64(v) => v as f64,
            ScalarValue::UInt8(v) => v as f64,
            ScalarValue::Float16(v) => v.to_f64(),
            ScalarValue::Float32(v) => v as f64,
            ScalarValue::Float64(v) => v,
            ScalarValue::Complex32(v) => v.re.to_f64(),
            ScalarValue::Complex64(v) => v.re as f64,
            ScalarValue::Complex128(v) => v.re,
        }
    }

    /// The value as a 64-bit integer, truncating floating values toward zero.
    pub fn to_i64(&self) -> i64 {
        match *self {
            ScalarValue::Bool(v) => i64::from(v),
            ScalarValue::Int8(v) => i64::from(v),
            ScalarValue::Int16(v) => i64::from(v),
            ScalarValue::Int32(v) => i64::from(v),
            ScalarValue::Int64(v) => v,
            ScalarValue::UInt8(v) => i64::from(v),
            _ => self.to_f64() as i64,
        }
    }

    /// The value as a double precision complex number.
    pub fn to_complex128(&self) -> Complex<f64> {
        match *self {
            ScalarValue::Complex32(v) => Complex::new(v.re.to_f64(), v.im.to_f64()),
            ScalarValue::Complex64(v) => Complex::new(v.re as f64, v.im as f64),
            ScalarValue::Complex128(v) => v,
            _ => Complex::new(self.to_f64(), 0.0),
        }
    }

    /// Returns true unless the value (or one of its complex lanes) is infinite or NaN.
    pub fn is_finite(&self) -> bool {
        match *self {
            ScalarValue::Float16(v) => Float::is_finite(v),
            ScalarValue::Float32(v) => Float::is_finite(v),
            ScalarValue::Float64(v) => Float::is_finite(v),
            ScalarValue::Complex32(v) => lanes_finite(v),
            ScalarValue::Complex64(v) => lanes_finite(v),
            ScalarValue::Complex128(v) => lanes_finite(v),
            _ => true,
        }
    }

    /// Returns true if the value compares equal to zero.
    pub fn is_zero(&self) -> bool {
        let c = self.to_complex128();
        c.re == 0.0 && c.im == 0.0
    }

    /// The real lane of a complex value, in the matching real dtype.
    ///
    /// Real values are returned unchanged.
    pub fn real(&self) -> ScalarValue {
        match *self {
            ScalarValue::Complex32(v) => ScalarValue::Float16(v.re),
            ScalarValue::Complex64(v) => ScalarValue::Float32(v.re),
            ScalarValue::Complex128(v) => ScalarValue::Float64(v.re),
            other => other,
        }
    }

    /// The imaginary lane of a complex value, in the matching real dtype.
    ///
    /// Real values yield zero of their own dtype.
    pub fn imag(&self) -> ScalarValue {
        match *self {
            ScalarValue::Complex32(v) => ScalarValue::Float16(v.im),
            ScalarValue::Complex64(v) => ScalarValue::Float32(v.im),
            ScalarValue::Complex128(v) => ScalarValue::Float64(v.im),
            other => ScalarValue::zero(other.dtype()),
        }
    }

    /// Arithmetic negation. Integers wrap, booleans are returned unchanged.
    pub fn neg(&self) -> ScalarValue {
        match *self {
            ScalarValue::Bool(v) => ScalarValue::Bool(v),
            ScalarValue::Int8(v) => ScalarValue::Int8(v.wrapping_neg()),
            ScalarValue::Int16(v) => ScalarValue::Int16(v.wrapping_neg()),
            ScalarValue::Int32(v) => ScalarValue::Int32(v.wrapping_neg()),
            ScalarValue::Int64(v) => ScalarValue::Int64(v.wrapping_neg()),
            ScalarValue::UInt8(v) => ScalarValue::UInt8(v.wrapping_neg()),
            ScalarValue::Float16(v) => ScalarValue::Float16(-v),
            ScalarValue::Float32(v) => ScalarValue::Float32(-v),
            ScalarValue::Float64(v) => ScalarValue::Float64(-v),
            ScalarValue::Complex32(v) => ScalarValue::Complex32(Complex::new(-v.re, -v.im)),
            ScalarValue::Complex64(v) => ScalarValue::Complex64(Complex::new(-v.re, -v.im)),
            ScalarValue::Complex128(v) => ScalarValue::Complex128(Complex::new(-v.re, -v.im)),
        }
    }

    /// Complex conjugate. Real values are returned unchanged.
    pub fn conj(&self) -> ScalarValue {
        match *self {
            ScalarValue::Complex32(v) => ScalarValue::Complex32(Complex::new(v.re, -v.im)),
            ScalarValue::Complex64(v) => ScalarValue::Complex64(Complex::new(v.re, -v.im)),
            ScalarValue::Complex128(v) => ScalarValue::Complex128(Complex::new(v.re, -v.im)),
            other => other,
        }
    }

    /// Absolute value. Complex values yield their magnitude in the matching real dtype.
    pub fn abs(&self) -> ScalarValue {
        match *self {
            ScalarValue::Int8(v) => ScalarValue::Int8(v.wrapping_abs()),
            ScalarValue::Int16(v) => ScalarValue::Int16(v.wrapping_abs()),
            ScalarValue::Int32(v) => ScalarValue::Int32(v.wrapping_abs()),
            ScalarValue::Int64(v) => ScalarValue::Int64(v.wrapping_abs()),
            ScalarValue::Float16(v) => ScalarValue::Float16(f16::from_f64(v.to_f64().abs())),
            ScalarValue::Float32(v) => ScalarValue::Float32(v.abs()),
            ScalarValue::Float64(v) => ScalarValue::Float64(v.abs()),
            ScalarValue::Complex32(_) | ScalarValue::Complex64(_) | ScalarValue::Complex128(_) => {
                let c = self.to_complex128();
                ScalarValue::Float64(c.re.hypot(c.im)).cast(self.dtype().to_real())
            }
            other => other,
        }
    }

    /// Converts the value to `dtype`.
    pub fn cast(&self, dtype: DType) -> ScalarValue {
        if self.dtype() == dtype {
            return *self;
        }
        let int = self.to_i64();
        let c = self.to_complex128();
        match dtype {
            DType::Bool => ScalarValue::Bool(c.re != 0.0 || c.im != 0.0),
            DType::Int8 => ScalarValue::Int8(int as i8),
            DType::Int16 => ScalarValue::Int16(int as i16),
            DType::Int32 => ScalarValue::Int32(int as i32),
            DType::Int64 => ScalarValue::Int64(int),
            DType::UInt8 => ScalarValue::UInt8(int as u8),
            DType::Float16 => ScalarValue::Float16(f16::from_f64(c.re)),
            DType::Float32 => ScalarValue::Float32(c.re as f32),
            DType::Float64 => ScalarValue::Float64(c.re),
            DType::Complex32 => ScalarValue::Complex32(Complex::new(
                f16::from_f64(c.re),
                f16::from_f64(c.im),
            )),
            DType::Complex64 => ScalarValue::Complex64(Complex::new(c.re as f32, c.im as f32)),
            DType::Complex128 => ScalarValue::Complex128(c),
        }
    }
}
