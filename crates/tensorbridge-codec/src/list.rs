use half::f16;
use num_complex::Complex;
use tensorbridge_tensor::{checked_numel, DType, Element, ScalarValue, Tensor};

use crate::{error::CodecError, kind::ScalarKind, scalar::TaggedScalar};

/// The two lanes of a complex buffer, stored side by side.
///
/// Both lanes always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexLanes<T> {
    re: Vec<T>,
    im: Vec<T>,
}

impl<T: Copy> ComplexLanes<T> {
    /// Pairs a real and an imaginary lane.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LaneLengthMismatch`] if the lanes differ in length.
    pub fn new(re: Vec<T>, im: Vec<T>) -> Result<Self, CodecError> {
        if re.len() != im.len() {
            return Err(CodecError::LaneLengthMismatch {
                re: re.len(),
                im: im.len(),
            });
        }
        Ok(Self { re, im })
    }

    /// Real parts.
    pub fn re(&self) -> &[T] {
        &self.re
    }

    /// Imaginary parts.
    pub fn im(&self) -> &[T] {
        &self.im
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            re: Vec::with_capacity(capacity),
            im: Vec::with_capacity(capacity),
        }
    }

    fn from_slice(values: &[Complex<T>]) -> Self {
        Self {
            re: values.iter().map(|c| c.re).collect(),
            im: values.iter().map(|c| c.im).collect(),
        }
    }

    fn push(&mut self, value: Complex<T>) {
        self.re.push(value.re);
        self.im.push(value.im);
    }

    fn at(&self, i: usize) -> Complex<T> {
        Complex::new(self.re[i], self.im[i])
    }

    fn into_complex(self) -> Vec<Complex<T>> {
        self.re
            .into_iter()
            .zip(self.im)
            .map(|(re, im)| Complex::new(re, im))
            .collect()
    }

    fn len(&self) -> usize {
        self.re.len()
    }
}

/// A homogeneous native buffer, one variant per scalar kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeBuffer {
    /// Booleans.
    Bool(Vec<bool>),
    /// Signed 8-bit integers.
    Int8(Vec<i8>),
    /// Signed 16-bit integers.
    Int16(Vec<i16>),
    /// Signed 32-bit integers.
    Int32(Vec<i32>),
    /// Signed 64-bit integers.
    Int64(Vec<i64>),
    /// Unsigned 8-bit integers.
    UInt8(Vec<u8>),
    /// binary16 floats.
    Float16(Vec<f16>),
    /// binary32 floats.
    Float32(Vec<f32>),
    /// binary64 floats.
    Float64(Vec<f64>),
    /// Complex numbers with binary16 lanes.
    Complex32(ComplexLanes<f16>),
    /// Complex numbers with binary32 lanes.
    Complex64(ComplexLanes<f32>),
    /// Complex numbers with binary64 lanes.
    Complex128(ComplexLanes<f64>),
}

impl NativeBuffer {
    /// An empty buffer of `kind`.
    pub fn with_capacity(kind: ScalarKind, capacity: usize) -> Self {
        match kind {
            ScalarKind::Bool => NativeBuffer::Bool(Vec::with_capacity(capacity)),
            ScalarKind::Int8 => NativeBuffer::Int8(Vec::with_capacity(capacity)),
            ScalarKind::Int16 => NativeBuffer::Int16(Vec::with_capacity(capacity)),
            ScalarKind::Int32 => NativeBuffer::Int32(Vec::with_capacity(capacity)),
            ScalarKind::Int64 => NativeBuffer::Int64(Vec::with_capacity(capacity)),
            ScalarKind::UInt8 => NativeBuffer::UInt8(Vec::with_capacity(capacity)),
            ScalarKind::Float16 => NativeBuffer::Float16(Vec::with_capacity(capacity)),
            ScalarKind::Float32 => NativeBuffer::Float32(Vec::with_capacity(capacity)),
            ScalarKind::Float64 => NativeBuffer::Float64(Vec::with_capacity(capacity)),
            ScalarKind::Complex32 => NativeBuffer::Complex32(ComplexLanes::with_capacity(capacity)),
            ScalarKind::Complex64 => NativeBuffer::Complex64(ComplexLanes::with_capacity(capacity)),
            ScalarKind::Complex128 => {
                NativeBuffer::Complex128(ComplexLanes::with_capacity(capacity))
            }
        }
    }

    /// The kind of the elements.
    pub fn kind(&self) -> ScalarKind {
        match self {
            NativeBuffer::Bool(_) => ScalarKind::Bool,
            NativeBuffer::Int8(_) => ScalarKind::Int8,
            NativeBuffer::Int16(_) => ScalarKind::Int16,
            NativeBuffer::Int32(_) => ScalarKind::Int32,
            NativeBuffer::Int64(_) => ScalarKind::Int64,
            NativeBuffer::UInt8(_) => ScalarKind::UInt8,
            NativeBuffer::Float16(_) => ScalarKind::Float16,
            NativeBuffer::Float32(_) => ScalarKind::Float32,
            NativeBuffer::Float64(_) => ScalarKind::Float64,
            NativeBuffer::Complex32(_) => ScalarKind::Complex32,
            NativeBuffer::Complex64(_) => ScalarKind::Complex64,
            NativeBuffer::Complex128(_) => ScalarKind::Complex128,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            NativeBuffer::Bool(v) => v.len(),
            NativeBuffer::Int8(v) => v.len(),
            NativeBuffer::Int16(v) => v.len(),
            NativeBuffer::Int32(v) => v.len(),
            NativeBuffer::Int64(v) => v.len(),
            NativeBuffer::UInt8(v) => v.len(),
            NativeBuffer::Float16(v) => v.len(),
            NativeBuffer::Float32(v) => v.len(),
            NativeBuffer::Float64(v) => v.len(),
            NativeBuffer::Complex32(l) => l.len(),
            NativeBuffer::Complex64(l) => l.len(),
            NativeBuffer::Complex128(l) => l.len(),
        }
    }

    /// Returns true if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a value, converting it to the buffer's kind.
    pub fn push(&mut self, value: ScalarValue) {
        match self {
            NativeBuffer::Bool(v) => v.push(bool::from_value(value)),
            NativeBuffer::Int8(v) => v.push(i8::from_value(value)),
            NativeBuffer::Int16(v) => v.push(i16::from_value(value)),
            NativeBuffer::Int32(v) => v.push(i32::from_value(value)),
            NativeBuffer::Int64(v) => v.push(i64::from_value(value)),
            NativeBuffer::UInt8(v) => v.push(u8::from_value(value)),
            NativeBuffer::Float16(v) => v.push(f16::from_value(value)),
            NativeBuffer::Float32(v) => v.push(f32::from_value(value)),
            NativeBuffer::Float64(v) => v.push(f64::from_value(value)),
            NativeBuffer::Complex32(l) => l.push(Complex::<f16>::from_value(value)),
            NativeBuffer::Complex64(l) => l.push(Complex::<f32>::from_value(value)),
            NativeBuffer::Complex128(l) => l.push(Complex::<f64>::from_value(value)),
        }
    }

    /// The element at `i`.
    pub fn get(&self, i: usize) -> Option<ScalarValue> {
        (i < self.len()).then(|| self.at(i))
    }

    fn at(&self, i: usize) -> ScalarValue {
        match self {
            NativeBuffer::Bool(v) => v[i].into_value(),
            NativeBuffer::Int8(v) => v[i].into_value(),
            NativeBuffer::Int16(v) => v[i].into_value(),
            NativeBuffer::Int32(v) => v[i].into_value(),
            NativeBuffer::Int64(v) => v[i].into_value(),
            NativeBuffer::UInt8(v) => v[i].into_value(),
            NativeBuffer::Float16(v) => v[i].into_value(),
            NativeBuffer::Float32(v) => v[i].into_value(),
            NativeBuffer::Float64(v) => v[i].into_value(),
            NativeBuffer::Complex32(l) => l.at(i).into_value(),
            NativeBuffer::Complex64(l) => l.at(i).into_value(),
            NativeBuffer::Complex128(l) => l.at(i).into_value(),
        }
    }

    /// Copies the logical contents of a tensor.
    ///
    /// The tensor is first densified, stripped of pending negation and conjugation and
    /// made contiguous, then its raw memory is read once.
    pub fn from_tensor(tensor: &Tensor) -> Result<Self, CodecError> {
        let t = tensor.resolved();
        if !tensor.is_contiguous() {
            log::debug!("copied {:?} tensor to contiguous memory for extraction", tensor.shape());
        }
        let buffer = match t.dtype() {
            DType::Bool => NativeBuffer::Bool(t.as_contiguous_slice::<bool>()?.to_vec()),
            DType::Int8 => NativeBuffer::Int8(t.as_contiguous_slice::<i8>()?.to_vec()),
            DType::Int16 => NativeBuffer::Int16(t.as_contiguous_slice::<i16>()?.to_vec()),
            DType::Int32 => NativeBuffer::Int32(t.as_contiguous_slice::<i32>()?.to_vec()),
            DType::Int64 => NativeBuffer::Int64(t.as_contiguous_slice::<i64>()?.to_vec()),
            DType::UInt8 => NativeBuffer::UInt8(t.as_contiguous_slice::<u8>()?.to_vec()),
            DType::Float16 => NativeBuffer::Float16(t.as_contiguous_slice::<f16>()?.to_vec()),
            DType::Float32 => NativeBuffer::Float32(t.as_contiguous_slice::<f32>()?.to_vec()),
            DType::Float64 => NativeBuffer::Float64(t.as_contiguous_slice::<f64>()?.to_vec()),
            DType::Complex32 => NativeBuffer::Complex32(ComplexLanes::from_slice(
                t.as_contiguous_slice::<Complex<f16>>()?,
            )),
            DType::Complex64 => NativeBuffer::Complex64(ComplexLanes::from_slice(
                t.as_contiguous_slice::<Complex<f32>>()?,
            )),
            DType::Complex128 => NativeBuffer::Complex128(ComplexLanes::from_slice(
                t.as_contiguous_slice::<Complex<f64>>()?,
            )),
        };
        Ok(buffer)
    }

    /// Builds a tensor of `shape` from the buffer.
    pub fn into_tensor(self, shape: Vec<usize>) -> Result<Tensor, CodecError> {
        let tensor = match self {
            NativeBuffer::Bool(v) => Tensor::from_shape_vec(shape, v),
            NativeBuffer::Int8(v) => Tensor::from_shape_vec(shape, v),
            NativeBuffer::Int16(v) => Tensor::from_shape_vec(shape, v),
            NativeBuffer::Int32(v) => Tensor::from_shape_vec(shape, v),
            NativeBuffer::Int64(v) => Tensor::from_shape_vec(shape, v),
            NativeBuffer::UInt8(v) => Tensor::from_shape_vec(shape, v),
            NativeBuffer::Float16(v) => Tensor::from_shape_vec(shape, v),
            NativeBuffer::Float32(v) => Tensor::from_shape_vec(shape, v),
            NativeBuffer::Float64(v) => Tensor::from_shape_vec(shape, v),
            NativeBuffer::Complex32(l) => Tensor::from_shape_vec(shape, l.into_complex()),
            NativeBuffer::Complex64(l) => Tensor::from_shape_vec(shape, l.into_complex()),
            NativeBuffer::Complex128(l) => Tensor::from_shape_vec(shape, l.into_complex()),
        }?;
        Ok(tensor)
    }
}

/// Decodes a sequence of tagged scalars sharing one kind into a native buffer.
///
/// An empty sequence yields an empty [`ScalarKind::Float32`] buffer.
///
/// # Errors
///
/// Returns [`CodecError::MixedKinds`] at the first element whose kind differs from the
/// first element's, before any value is decoded.
pub fn to_native_buffer(values: &[TaggedScalar]) -> Result<NativeBuffer, CodecError> {
    let kind = values.first().map_or(ScalarKind::Float32, TaggedScalar::kind);
    if let Some(position) = values.iter().position(|v| v.kind() != kind) {
        return Err(CodecError::MixedKinds {
            expected: kind,
            actual: values[position].kind(),
            position,
        });
    }
    let mut buffer = NativeBuffer::with_capacity(kind, values.len());
    for value in values {
        buffer.push(value.decode()?);
    }
    Ok(buffer)
}

/// Encodes every element of a buffer, in order.
pub fn from_native_buffer(buffer: &NativeBuffer) -> Vec<TaggedScalar> {
    (0..buffer.len())
        .map(|i| TaggedScalar::encode(&buffer.at(i)))
        .collect()
}

/// Tagged scalars plus the shape they fill in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedScalarList {
    /// The elements.
    pub values: Vec<TaggedScalar>,
    /// The shape on the host side.
    pub shape: Vec<i64>,
}

fn checked_shape(shape: &[i64], count: usize) -> Result<Vec<usize>, CodecError> {
    let dims = shape
        .iter()
        .map(|&d| usize::try_from(d).map_err(|_| CodecError::InvalidShape(shape.to_vec())))
        .collect::<Result<Vec<_>, _>>()?;
    let expected = checked_numel(&dims).ok_or_else(|| CodecError::InvalidShape(shape.to_vec()))?;
    if expected != count {
        return Err(CodecError::ElementCountMismatch {
            shape: shape.to_vec(),
            expected,
            actual: count,
        });
    }
    Ok(dims)
}

/// Builds a tensor from a tagged scalar list, optionally converting it to `kind`.
pub fn tensor_from_list(
    list: &TaggedScalarList,
    kind: Option<ScalarKind>,
) -> Result<Tensor, CodecError> {
    let shape = checked_shape(&list.shape, list.values.len())?;
    let buffer = to_native_buffer(&list.values)?;
    log::debug!(
        "building {:?} tensor of kind {} from {} tagged scalars",
        shape,
        buffer.kind(),
        list.values.len()
    );
    let tensor = buffer.into_tensor(shape)?;
    match kind {
        Some(kind) if kind.dtype() != tensor.dtype() => Ok(tensor.to_dtype(kind.dtype())?),
        _ => Ok(tensor),
    }
}

/// Extracts the logical contents of a tensor as a tagged scalar list.
pub fn tensor_to_list(tensor: &Tensor) -> Result<TaggedScalarList, CodecError> {
    let buffer = NativeBuffer::from_tensor(tensor)?;
    let values = from_native_buffer(&buffer);
    Ok(TaggedScalarList {
        values,
        shape: tensor.shape().iter().map(|&d| d as i64).collect(),
    })
}
