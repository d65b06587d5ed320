use half::f16;
use num_complex::Complex;

use crate::{dtype::DType, scalar::ScalarValue, storage::TensorStorage};

/// A type that can be stored in a [`crate::Tensor`].
///
/// Implemented for the twelve element types listed in [`DType`]; the trait ties the
/// static type to its runtime tag and to the matching [`TensorData`] variant.
pub trait Element: Copy + Send + Sync + PartialEq + std::fmt::Debug + 'static {
    /// The runtime tag of the type.
    const DTYPE: DType;

    /// The additive identity.
    fn zero() -> Self;

    /// Wraps the element into a [`ScalarValue`].
    fn into_value(self) -> ScalarValue;

    /// Converts any [`ScalarValue`] into this type, see [`ScalarValue::cast`].
    fn from_value(value: ScalarValue) -> Self;

    /// Wraps a typed storage into the dtype-erased [`TensorData`].
    fn wrap(storage: TensorStorage<Self>) -> TensorData;

    /// Borrows the typed storage back out, if `data` holds this element type.
    fn storage(data: &TensorData) -> Option<&TensorStorage<Self>>;

    /// Arithmetic negation.
    fn negate(self) -> Self {
        Self::from_value(self.into_value().neg())
    }

    /// Complex conjugate.
    fn conjugate(self) -> Self {
        Self::from_value(self.into_value().conj())
    }
}

/// Dtype-erased storage of a [`crate::Tensor`].
#[derive(Clone, Debug)]
pub enum TensorData {
    /// Boolean storage.
    Bool(TensorStorage<bool>),
    /// Signed 8-bit storage.
    Int8(TensorStorage<i8>),
    /// Signed 16-bit storage.
    Int16(TensorStorage<i16>),
    /// Signed 32-bit storage.
    Int32(TensorStorage<i32>),
    /// Signed 64-bit storage.
    Int64(TensorStorage<i64>),
    /// Unsigned 8-bit storage.
    UInt8(TensorStorage<u8>),
    /// binary16 storage.
    Float16(TensorStorage<f16>),
    /// binary32 storage.
    Float32(TensorStorage<f32>),
    /// binary64 storage.
    Float64(TensorStorage<f64>),
    /// Complex binary16 storage.
    Complex32(TensorStorage<Complex<f16>>),
    /// Complex binary32 storage.
    Complex64(TensorStorage<Complex<f32>>),
    /// Complex binary64 storage.
    Complex128(TensorStorage<Complex<f64>>),
}

/// Runs `$body` with `$s` bound to the typed storage held by a [`TensorData`].
macro_rules! dispatch {
    ($data:expr, $s:ident => $body:expr) => {
        match $data {
            $crate::element::TensorData::Bool($s) => $body,
            $crate::element::TensorData::Int8($s) => $body,
            $crate::element::TensorData::Int16($s) => $body,
            $crate::element::TensorData::Int32($s) => $body,
            $crate::element::TensorData::Int64($s) => $body,
            $crate::element::TensorData::UInt8($s) => $body,
            $crate::element::TensorData::Float16($s) => $body,
            $crate::element::TensorData::Float32($s) => $body,
            $crate::element::TensorData::Float64($s) => $body,
            $crate::element::TensorData::Complex32($s) => $body,
            $crate::element::TensorData::Complex64($s) => $body,
            $crate::element::TensorData::Complex128($s) => $body,
        }
    };
}

/// Runs `$body` with the type alias `$T` naming the element type of a [`DType`].
macro_rules! with_dtype {
    ($dtype:expr, $T:ident => $body:expr) => {
        match $dtype {
            $crate::dtype::DType::Bool => {
                type $T = bool;
                $body
            }
            $crate::dtype::DType::Int8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::Int16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::Int32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::Int64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::UInt8 => {
                type $T = u8;
                $body
            }
            $crate::dtype::DType::Float16 => {
                type $T = ::half::f16;
                $body
            }
            $crate::dtype::DType::Float32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::Float64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::Complex32 => {
                type $T = ::num_complex::Complex<::half::f16>;
                $body
            }
            $crate::dtype::DType::Complex64 => {
                type $T = ::num_complex::Complex<f32>;
                $body
            }
            $crate::dtype::DType::Complex128 => {
                type $T = ::num_complex::Complex<f64>;
                $body
            }
        }
    };
}

pub(crate) use dispatch;
pub(crate) use with_dtype;

impl TensorData {
    /// The dtype of the stored elements.
    pub fn dtype(&self) -> DType {
        match self {
            TensorData::Bool(_) => DType::Bool,
            TensorData::Int8(_) => DType::Int8,
            TensorData::Int16(_) => DType::Int16,
            TensorData::Int32(_) => DType::Int32,
            TensorData::Int64(_) => DType::Int64,
            TensorData::UInt8(_) => DType::UInt8,
            TensorData::Float16(_) => DType::Float16,
            TensorData::Float32(_) => DType::Float32,
            TensorData::Float64(_) => DType::Float64,
            TensorData::Complex32(_) => DType::Complex32,
            TensorData::Complex64(_) => DType::Complex64,
            TensorData::Complex128(_) => DType::Complex128,
        }
    }

    /// Number of elements in the underlying buffer.
    pub fn len(&self) -> usize {
        dispatch!(self, s => s.len())
    }

    /// Returns true if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if both values reference the same buffer.
    pub fn shares_memory(&self, other: &TensorData) -> bool {
        dispatch!(self, s => storage_of(s, other).is_some_and(|o| s.shares_memory(o)))
    }

    /// An empty buffer of `dtype`.
    pub(crate) fn empty(dtype: DType) -> TensorData {
        with_dtype!(dtype, T => T::wrap(TensorStorage::from_vec(Vec::<T>::new())))
    }
}

fn storage_of<'a, T: Element>(
    _witness: &TensorStorage<T>,
    data: &'a TensorData,
) -> Option<&'a TensorStorage<T>> {
    T::storage(data)
}

macro_rules! impl_element {
    ($($t:ty => $variant:ident, $zero:expr);* $(;)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = DType::$variant;

                #[inline]
                fn zero() -> Self {
                    $zero
                }

                #[inline]
                fn into_value(self) -> ScalarValue {
                    ScalarValue::$variant(self)
                }

                #[inline]
                fn from_value(value: ScalarValue) -> Self {
                    match value.cast(DType::$variant) {
                        ScalarValue::$variant(v) => v,
                        _ => $zero,
                    }
                }

                fn wrap(storage: TensorStorage<Self>) -> TensorData {
                    TensorData::$variant(storage)
                }

                fn storage(data: &TensorData) -> Option<&TensorStorage<Self>> {
                    match data {
                        TensorData::$variant(s) => Some(s),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_element!(
    bool => Bool, false;
    i8 => Int8, 0;
    i16 => Int16, 0;
    i32 => Int32, 0;
    i64 => Int64, 0;
    u8 => UInt8, 0;
    f16 => Float16, f16::ZERO;
    f32 => Float32, 0.0;
    f64 => Float64, 0.0;
    Complex<f16> => Complex32, Complex::new(f16::ZERO, f16::ZERO);
    Complex<f32> => Complex64, Complex::new(0.0, 0.0);
    Complex<f64> => Complex128, Complex::new(0.0, 0.0);
);
