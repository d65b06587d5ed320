use num_complex::Complex;

use crate::{
    dtype::DType,
    element::{dispatch, with_dtype, Element, TensorData},
    error::TensorError,
    scalar::ScalarValue,
    storage::TensorStorage,
};

/// Computes the strides for a row-major (C-contiguous) tensor layout.
///
/// The rightmost dimension has stride 1, and each dimension's stride is the
/// product of all dimensions to its right.
///
/// # Examples
///
/// ```rust
/// use tensorbridge_tensor::tensor::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape(&[2, 3]), vec![3, 1]);
/// assert_eq!(get_strides_from_shape(&[2, 3, 4]), vec![12, 4, 1]);
/// assert!(get_strides_from_shape(&[]).is_empty());
/// ```
pub fn get_strides_from_shape(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride: usize = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride = stride.saturating_mul(shape[i]);
    }
    strides
}

/// Number of elements of `shape`, or `None` when it does not fit in `usize`.
///
/// A shape with a zero-length axis has no elements whatever its other axes are.
pub fn checked_numel(shape: &[usize]) -> Option<usize> {
    if shape.contains(&0) {
        return Some(0);
    }
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Lazy metadata carried alongside a tensor's storage.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct TensorFlags {
    /// Optional symbolic name per axis.
    pub(crate) names: Option<Vec<Option<String>>>,
    /// The tensor is all zeros and owns no elements.
    pub(crate) zero: bool,
    /// Every element reads as its negation.
    pub(crate) neg: bool,
    /// Every element reads as its complex conjugate.
    pub(crate) conj: bool,
}

/// A dynamic-rank, dtype-tagged, strided tensor.
///
/// `Tensor` combines a dtype-erased, reference-counted storage with shape,
/// strides and an element offset. Views produced by [`Tensor::select`],
/// [`Tensor::slice_axis`] and friends share the storage of their source. The
/// flags for axis names, the zero tensor, negation and conjugation are applied
/// lazily: the storage still holds the original elements and every logical read
/// (for example [`Tensor::to_values`]) applies them on the fly.
///
/// # Examples
///
/// ```rust
/// use tensorbridge_tensor::{DType, Tensor, ScalarValue};
///
/// let t = Tensor::from_shape_vec(vec![2, 2], vec![1i32, 2, 3, 4]).unwrap();
/// assert_eq!(t.dtype(), DType::Int32);
/// assert_eq!(t.get(1).unwrap().to_values(), vec![ScalarValue::Int32(3), ScalarValue::Int32(4)]);
/// ```
#[derive(Clone, Debug)]
pub struct Tensor {
    pub(crate) data: TensorData,
    pub(crate) shape: Vec<usize>,
    pub(crate) strides: Vec<usize>,
    pub(crate) offset: usize,
    pub(crate) flags: TensorFlags,
}

impl Tensor {
    /// Creates a tensor from a shape and row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::InvalidShape`] if the shape product differs from `data.len()`,
    /// or [`TensorError::ShapeOverflow`] if the product does not fit in `usize`.
    pub fn from_shape_vec<T: Element>(shape: Vec<usize>, data: Vec<T>) -> Result<Self, TensorError> {
        let numel =
            checked_numel(&shape).ok_or_else(|| TensorError::ShapeOverflow(shape.clone()))?;
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        Ok(Self::dense(T::wrap(TensorStorage::from_vec(data)), shape))
    }

    /// Creates a tensor of `dtype` from row-major scalar values, casting each one.
    pub fn from_values(
        shape: Vec<usize>,
        values: &[ScalarValue],
        dtype: DType,
    ) -> Result<Self, TensorError> {
        with_dtype!(dtype, T => {
            let data = values.iter().map(|v| T::from_value(*v)).collect::<Vec<T>>();
            Tensor::from_shape_vec(shape, data)
        })
    }

    /// Creates a zero-dimensional tensor holding `value`.
    pub fn scalar(value: ScalarValue) -> Self {
        Self::full(Vec::new(), value)
    }

    /// Creates a tensor of `shape` where every element is `value`.
    pub fn full(shape: Vec<usize>, value: ScalarValue) -> Self {
        let numel = shape.iter().product::<usize>();
        with_dtype!(value.dtype(), T => {
            let data = vec![T::from_value(value); numel];
            Self::dense(T::wrap(TensorStorage::from_vec(data)), shape)
        })
    }

    /// Creates a dense tensor of zeros.
    pub fn zeros(shape: Vec<usize>, dtype: DType) -> Self {
        Self::full(shape, ScalarValue::zero(dtype))
    }

    /// Creates a zero tensor that allocates no elements.
    pub fn zeros_lazy(shape: Vec<usize>, dtype: DType) -> Self {
        let mut tensor = Self::dense(TensorData::empty(dtype), shape);
        tensor.flags.zero = true;
        tensor
    }

    /// Assembles a complex tensor from its real and imaginary parts.
    ///
    /// Both parts must share shape and a real floating point dtype; the result has
    /// the complex dtype of matching lane precision.
    pub fn complex(re: &Tensor, im: &Tensor) -> Result<Self, TensorError> {
        if !re.dtype().is_floating_point() {
            return Err(TensorError::unsupported_operation(
                "complex",
                format!("expected floating point parts, got {}", re.dtype()),
            ));
        }
        if re.dtype() != im.dtype() {
            return Err(TensorError::dtype_mismatch(re.dtype(), im.dtype()));
        }
        if re.shape != im.shape {
            return Err(TensorError::dimension_mismatch(
                "complex parts must have the same shape",
                &re.shape,
                &im.shape,
            ));
        }
        let values = re
            .to_values()
            .into_iter()
            .zip(im.to_values())
            .map(|(r, i)| ScalarValue::Complex128(Complex::new(r.to_f64(), i.to_f64())))
            .collect::<Vec<_>>();
        Self::from_values(re.shape.clone(), &values, re.dtype().to_complex())
    }

    pub(crate) fn dense(data: TensorData, shape: Vec<usize>) -> Self {
        Self {
            data,
            strides: get_strides_from_shape(&shape),
            shape,
            offset: 0,
            flags: TensorFlags::default(),
        }
    }

    /// The size of each axis.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The element stride of each axis in the underlying storage.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of axes.
    #[inline]
    pub fn dim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// The element type.
    #[inline]
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Returns true for real floating point tensors.
    pub fn is_floating_point(&self) -> bool {
        self.dtype().is_floating_point()
    }

    /// Returns true for complex tensors.
    pub fn is_complex(&self) -> bool {
        self.dtype().is_complex()
    }

    /// Returns true if the elements are laid out in standard row-major order.
    ///
    /// Axes of length one are ignored and empty tensors are always contiguous.
    pub fn is_contiguous(&self) -> bool {
        if self.numel() == 0 {
            return true;
        }
        let mut expected = 1;
        for (&size, &stride) in self.shape.iter().zip(&self.strides).rev() {
            if size == 1 {
                continue;
            }
            if stride != expected {
                return false;
            }
            expected *= size;
        }
        true
    }

    /// Returns true if any axis carries a name.
    pub fn has_names(&self) -> bool {
        self.flags
            .names
            .as_ref()
            .is_some_and(|names| names.iter().any(Option::is_some))
    }

    /// The axis names, if the tensor is named.
    pub fn names(&self) -> Option<&[Option<String>]> {
        self.flags.names.as_deref()
    }

    /// Returns true for a zero tensor created by [`Tensor::zeros_lazy`].
    pub fn is_zerotensor(&self) -> bool {
        self.flags.zero
    }

    /// Returns true if the negation bit is set.
    pub fn is_neg(&self) -> bool {
        self.flags.neg
    }

    /// Returns true if the conjugation bit is set.
    pub fn is_conj(&self) -> bool {
        self.flags.conj
    }

    /// Returns true if both tensors read from the same storage.
    pub fn shares_memory(&self, other: &Tensor) -> bool {
        self.data.shares_memory(&other.data)
    }

    /// Storage offsets of every element, in row-major logical order.
    pub(crate) fn offsets(&self) -> Vec<usize> {
        let numel = self.numel();
        let mut out = Vec::with_capacity(numel);
        if numel == 0 {
            return out;
        }
        let mut index = vec![0usize; self.dim()];
        let mut offset = self.offset;
        for _ in 0..numel {
            out.push(offset);
            for axis in (0..self.dim()).rev() {
                index[axis] += 1;
                offset += self.strides[axis];
                if index[axis] < self.shape[axis] {
                    break;
                }
                offset -= self.strides[axis] * self.shape[axis];
                index[axis] = 0;
            }
        }
        out
    }

    /// Reads the elements in row-major order, applying the requested lazy flags.
    pub(crate) fn logical<T: Element>(
        &self,
        storage: &TensorStorage<T>,
        apply_neg: bool,
        apply_conj: bool,
    ) -> Vec<T> {
        if self.flags.zero {
            return vec![T::zero(); self.numel()];
        }
        let slice = storage.as_slice();
        let mut values = self.offsets().into_iter().map(|o| slice[o]).collect::<Vec<T>>();
        if apply_neg && self.flags.neg {
            values.iter_mut().for_each(|v| *v = v.negate());
        }
        if apply_conj && self.flags.conj {
            values.iter_mut().for_each(|v| *v = v.conjugate());
        }
        values
    }

    /// The logical elements in row-major order.
    ///
    /// All lazy flags are honoured: a zero tensor yields zeros, and the negation and
    /// conjugation bits are applied to each value.
    pub fn to_values(&self) -> Vec<ScalarValue> {
        dispatch!(&self.data, s => self
            .logical(s, true, true)
            .into_iter()
            .map(Element::into_value)
            .collect())
    }

    /// The logical elements in row-major order as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::DTypeMismatch`] unless `T` is the tensor's element type.
    pub fn typed_values<T: Element>(&self) -> Result<Vec<T>, TensorError> {
        let storage =
            T::storage(&self.data).ok_or(TensorError::dtype_mismatch(T::DTYPE, self.dtype()))?;
        Ok(self.logical(storage, true, true))
    }

    /// Borrows the raw elements of a contiguous, flag-free tensor.
    ///
    /// # Errors
    ///
    /// Fails on a dtype mismatch, on a zero tensor, when a negation or conjugation bit
    /// is pending, or when the layout is not contiguous.
    pub fn as_contiguous_slice<T: Element>(&self) -> Result<&[T], TensorError> {
        let storage =
            T::storage(&self.data).ok_or(TensorError::dtype_mismatch(T::DTYPE, self.dtype()))?;
        if self.flags.zero || self.flags.neg || self.flags.conj {
            return Err(TensorError::unsupported_operation(
                "as_contiguous_slice",
                "lazy flags must be resolved before reading raw memory",
            ));
        }
        if !self.is_contiguous() {
            return Err(TensorError::unsupported_operation(
                "as_contiguous_slice",
                "tensor is not contiguous",
            ));
        }
        let numel = self.numel();
        if numel == 0 {
            return Ok(&[]);
        }
        Ok(&storage.as_slice()[self.offset..self.offset + numel])
    }

    /// The value of a single-element tensor.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::InvalidShape`] unless the tensor has exactly one element.
    pub fn item(&self) -> Result<ScalarValue, TensorError> {
        if self.numel() != 1 {
            return Err(TensorError::invalid_shape(1, self.numel()));
        }
        self.to_values()
            .into_iter()
            .next()
            .ok_or(TensorError::invalid_shape(1, 0))
    }

    /// Attaches one optional name per axis.
    pub fn with_names(&self, names: Vec<Option<String>>) -> Result<Tensor, TensorError> {
        if names.len() != self.dim() {
            return Err(TensorError::dimension_mismatch(
                "one name per axis required",
                &[self.dim()],
                &[names.len()],
            ));
        }
        let mut out = self.clone();
        out.flags.names = Some(names);
        Ok(out)
    }

    /// Drops all axis names.
    pub fn strip_names(&self) -> Tensor {
        let mut out = self.clone();
        out.flags.names = None;
        out
    }

    /// Lazily negates the tensor by flipping its negation bit.
    ///
    /// # Errors
    ///
    /// Boolean tensors cannot be negated.
    pub fn neg(&self) -> Result<Tensor, TensorError> {
        if self.dtype() == DType::Bool {
            return Err(TensorError::unsupported_operation(
                "neg",
                "negation is not supported on bool tensors",
            ));
        }
        let mut out = self.clone();
        out.flags.neg = !out.flags.neg;
        Ok(out)
    }

    /// Lazily conjugates the tensor. Identity for real tensors.
    pub fn conj(&self) -> Tensor {
        let mut out = self.clone();
        if self.is_complex() {
            out.flags.conj = !out.flags.conj;
        }
        out
    }

    /// Materializes a pending negation into new storage.
    pub fn resolve_neg(&self) -> Tensor {
        if !self.flags.neg {
            return self.clone();
        }
        let mut out = self.clone();
        out.flags.neg = false;
        if self.flags.zero {
            return out;
        }
        log::trace!("resolving negation of {:?} tensor", self.shape);
        out.data = dispatch!(&self.data, s => wrap_vec(self.logical(s, true, false)));
        out.reset_layout();
        out
    }

    /// Materializes a pending conjugation into new storage.
    pub fn resolve_conj(&self) -> Tensor {
        if !self.flags.conj {
            return self.clone();
        }
        let mut out = self.clone();
        out.flags.conj = false;
        if self.flags.zero {
            return out;
        }
        log::trace!("resolving conjugation of {:?} tensor", self.shape);
        out.data = dispatch!(&self.data, s => wrap_vec(self.logical(s, false, true)));
        out.reset_layout();
        out
    }

    /// Replaces a zero tensor by a dense tensor of zeros. Identity otherwise.
    pub fn densify(&self) -> Tensor {
        if !self.flags.zero {
            return self.clone();
        }
        let mut out = Tensor::zeros(self.shape.clone(), self.dtype());
        out.flags.names = self.flags.names.clone();
        out
    }

    /// Copies the elements into standard row-major layout. Identity if already contiguous.
    pub fn contiguous(&self) -> Tensor {
        if self.is_contiguous() {
            return self.clone();
        }
        let mut out = self.clone();
        if !self.flags.zero {
            log::debug!(
                "materializing contiguous copy of {:?} tensor with strides {:?}",
                self.shape,
                self.strides
            );
            out.data = dispatch!(&self.data, s => wrap_vec(self.logical(s, false, false)));
        }
        out.reset_layout();
        out
    }

    /// A dense, contiguous, flag-free tensor holding the logical values.
    ///
    /// Axis names are kept.
    pub fn resolved(&self) -> Tensor {
        self.densify().resolve_neg().resolve_conj().contiguous()
    }

    fn reset_layout(&mut self) {
        self.strides = get_strides_from_shape(&self.shape);
        self.offset = 0;
    }

    fn check_axis(&self, axis: usize) -> Result<(), TensorError> {
        if axis >= self.dim() {
            return Err(TensorError::AxisOutOfRange {
                axis,
                dim: self.dim(),
            });
        }
        Ok(())
    }

    /// Selects position `index` along `axis`, removing that axis.
    ///
    /// Negative indices count from the end.
    pub fn select(&self, axis: usize, index: i64) -> Result<Tensor, TensorError> {
        self.check_axis(axis)?;
        let size = self.shape[axis];
        let position = if index < 0 { index + size as i64 } else { index };
        if position < 0 || position >= size as i64 {
            return Err(TensorError::index_out_of_bounds(index, size));
        }
        let mut out = self.clone();
        out.offset += position as usize * self.strides[axis];
        out.shape.remove(axis);
        out.strides.remove(axis);
        if let Some(names) = out.flags.names.as_mut() {
            names.remove(axis);
        }
        Ok(out)
    }

    /// Selects position `index` along the first axis.
    pub fn get(&self, index: i64) -> Result<Tensor, TensorError> {
        self.select(0, index)
    }

    /// Restricts `axis` to `start..stop` taking every `step`-th element.
    ///
    /// Bounds follow the usual slicing conventions: absent bounds are unbounded,
    /// negative bounds count from the end and out of range bounds are clamped.
    ///
    /// # Errors
    ///
    /// The step must be positive.
    pub fn slice_axis(
        &self,
        axis: usize,
        start: Option<i64>,
        stop: Option<i64>,
        step: i64,
    ) -> Result<Tensor, TensorError> {
        self.check_axis(axis)?;
        if step <= 0 {
            return Err(TensorError::InvalidIndex(format!(
                "slice step must be positive, got {step}"
            )));
        }
        let size = self.shape[axis] as i64;
        let clamp = |bound: i64| {
            let bound = if bound < 0 { bound + size } else { bound };
            bound.clamp(0, size)
        };
        let start = start.map_or(0, clamp);
        let stop = stop.map_or(size, clamp);
        let len = if stop > start {
            (stop - start - 1) / step + 1
        } else {
            0
        };
        // With at most one element left the step never moves through memory.
        let stride = if len > 1 {
            self.strides[axis]
                .checked_mul(step as usize)
                .ok_or_else(|| TensorError::InvalidIndex(format!("slice step {step} overflows")))?
        } else {
            self.strides[axis]
        };
        let mut out = self.clone();
        if len > 0 {
            out.offset += start as usize * self.strides[axis];
        }
        out.shape[axis] = len as usize;
        out.strides[axis] = stride;
        Ok(out)
    }

    /// Inserts a new axis of length `len` (zero or one) before `axis`.
    pub(crate) fn insert_axis(&self, axis: usize, len: usize) -> Tensor {
        let stride = match self.shape.get(axis) {
            Some(&size) => self.strides[axis] * size,
            None => 1,
        };
        let mut out = self.clone();
        out.shape.insert(axis, len);
        out.strides.insert(axis, stride);
        if let Some(names) = out.flags.names.as_mut() {
            names.insert(axis, None);
        }
        out
    }

    /// Inserts a new axis of length one before `axis`.
    pub fn unsqueeze(&self, axis: usize) -> Result<Tensor, TensorError> {
        if axis > self.dim() {
            return Err(TensorError::AxisOutOfRange {
                axis,
                dim: self.dim(),
            });
        }
        Ok(self.insert_axis(axis, 1))
    }

    /// Reinterprets the elements with a new shape, copying only if not contiguous.
    ///
    /// Axis names are dropped.
    pub fn reshape(&self, shape: Vec<usize>) -> Result<Tensor, TensorError> {
        let numel =
            checked_numel(&shape).ok_or_else(|| TensorError::ShapeOverflow(shape.clone()))?;
        if numel != self.numel() {
            return Err(TensorError::invalid_shape(self.numel(), numel));
        }
        let mut out = self.contiguous();
        out.strides = get_strides_from_shape(&shape);
        out.shape = shape;
        out.flags.names = None;
        Ok(out)
    }

    /// Reshapes into a single axis.
    pub fn flatten(&self) -> Tensor {
        let mut out = self.contiguous();
        out.shape = vec![self.numel()];
        out.strides = vec![1];
        out.flags.names = None;
        out
    }

    /// Concatenates tensors of one dtype along the first axis.
    pub fn cat(tensors: &[Tensor]) -> Result<Tensor, TensorError> {
        let first = tensors.first().ok_or_else(|| {
            TensorError::unsupported_operation("cat", "expected a non-empty list of tensors")
        })?;
        if first.dim() == 0 {
            return Err(TensorError::unsupported_operation(
                "cat",
                "zero-dimensional tensors cannot be concatenated",
            ));
        }
        for t in tensors {
            if t.dtype() != first.dtype() {
                return Err(TensorError::dtype_mismatch(first.dtype(), t.dtype()));
            }
            if t.dim() != first.dim() || t.shape[1..] != first.shape[1..] {
                return Err(TensorError::dimension_mismatch(
                    "cat requires matching trailing shapes",
                    &first.shape,
                    &t.shape,
                ));
            }
        }
        dispatch!(&first.data, s => cat_typed(s, tensors))
    }

    /// Converts every element to `dtype`.
    pub fn to_dtype(&self, dtype: DType) -> Result<Tensor, TensorError> {
        if dtype == self.dtype() {
            return Ok(self.clone());
        }
        if self.flags.zero {
            return Ok(Tensor::zeros_lazy(self.shape.clone(), dtype));
        }
        let values = self.to_values();
        Tensor::from_values(self.shape.clone(), &values, dtype)
    }

    /// The real part of a complex tensor. Real tensors are returned unchanged.
    pub fn real(&self) -> Result<Tensor, TensorError> {
        if !self.is_complex() {
            return Ok(self.clone());
        }
        let values = self.to_values().iter().map(ScalarValue::real).collect::<Vec<_>>();
        Tensor::from_values(self.shape.clone(), &values, self.dtype().to_real())
    }

    /// The imaginary part of a complex tensor.
    ///
    /// # Errors
    ///
    /// Real tensors have no imaginary part.
    pub fn imag(&self) -> Result<Tensor, TensorError> {
        if !self.is_complex() {
            return Err(TensorError::unsupported_operation(
                "imag",
                format!("imag is not implemented for {} tensors", self.dtype()),
            ));
        }
        let values = self.to_values().iter().map(ScalarValue::imag).collect::<Vec<_>>();
        Tensor::from_values(self.shape.clone(), &values, self.dtype().to_real())
    }
}

fn wrap_vec<T: Element>(values: Vec<T>) -> TensorData {
    T::wrap(TensorStorage::from_vec(values))
}

fn cat_typed<T: Element>(
    _witness: &TensorStorage<T>,
    tensors: &[Tensor],
) -> Result<Tensor, TensorError> {
    let mut data = Vec::new();
    let mut rows = 0;
    for t in tensors {
        data.extend(t.typed_values::<T>()?);
        rows += t.shape[0];
    }
    let mut shape = tensors[0].shape.clone();
    shape[0] = rows;
    Tensor::from_shape_vec(shape, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    fn arange(shape: Vec<usize>) -> Result<Tensor, TensorError> {
        let numel = shape.iter().product::<usize>();
        Tensor::from_shape_vec(shape, (0..numel as i64).collect::<Vec<_>>())
    }

    fn ints(t: &Tensor) -> Vec<i64> {
        t.to_values().iter().map(ScalarValue::to_i64).collect()
    }

    #[test]
    fn constructor() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(vec![2, 3], vec![1u8, 2, 3, 4, 5, 6])?;
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.strides(), &[3, 1]);
        assert_eq!(t.numel(), 6);
        assert_eq!(t.dtype(), DType::UInt8);
        assert!(t.is_contiguous());
        Ok(())
    }

    #[test]
    fn constructor_rejects_wrong_length() {
        let err = Tensor::from_shape_vec(vec![2, 3], vec![1i32; 5]).unwrap_err();
        assert_eq!(err, TensorError::invalid_shape(6, 5));
    }

    #[test]
    fn scalar_tensor() -> Result<(), TensorError> {
        let t = Tensor::scalar(ScalarValue::Float32(2.5));
        assert_eq!(t.dim(), 0);
        assert_eq!(t.numel(), 1);
        assert_eq!(t.item()?, ScalarValue::Float32(2.5));
        Ok(())
    }

    #[test]
    fn item_requires_single_element() -> Result<(), TensorError> {
        let t = arange(vec![2])?;
        assert_eq!(t.item().unwrap_err(), TensorError::invalid_shape(1, 2));
        Ok(())
    }

    #[test]
    fn select_and_slice_are_views() -> Result<(), TensorError> {
        let t = arange(vec![3, 4])?;
        let row = t.select(0, -1)?;
        assert_eq!(ints(&row), vec![8, 9, 10, 11]);
        assert!(row.shares_memory(&t));

        let col = t.select(1, 2)?;
        assert_eq!(ints(&col), vec![2, 6, 10]);
        assert!(!col.is_contiguous());

        let stepped = t.slice_axis(1, Some(1), None, 2)?;
        assert_eq!(stepped.shape(), &[3, 2]);
        assert_eq!(ints(&stepped), vec![1, 3, 5, 7, 9, 11]);
        Ok(())
    }

    #[test]
    fn slice_clamps_bounds() -> Result<(), TensorError> {
        let t = arange(vec![5])?;
        assert_eq!(ints(&t.slice_axis(0, Some(-2), Some(100), 1)?), vec![3, 4]);
        assert_eq!(ints(&t.slice_axis(0, Some(-100), Some(2), 1)?), vec![0, 1]);
        assert_eq!(t.slice_axis(0, Some(4), Some(1), 1)?.numel(), 0);
        assert_eq!(ints(&t.slice_axis(0, None, None, 3)?), vec![0, 3]);
        assert!(t.slice_axis(0, None, None, 0).is_err());
        assert!(t.slice_axis(0, None, None, -1).is_err());
        Ok(())
    }

    #[test]
    fn slice_with_huge_step() -> Result<(), TensorError> {
        let t = arange(vec![3, 5])?;
        let first = t.slice_axis(0, None, None, i64::MAX)?;
        assert_eq!(first.shape(), &[1, 5]);
        assert_eq!(ints(&first), vec![0, 1, 2, 3, 4]);
        let last = t.slice_axis(1, Some(-1), Some(i64::MAX), i64::MAX)?;
        assert_eq!(ints(&last), vec![4, 9, 14]);
        Ok(())
    }

    #[test]
    fn constructor_rejects_overflowing_shape() -> Result<(), TensorError> {
        let shape = vec![1 << 32, 1 << 32, 1];
        let err = Tensor::from_shape_vec(shape.clone(), Vec::<f32>::new()).unwrap_err();
        assert_eq!(err, TensorError::ShapeOverflow(shape));
        assert_eq!(checked_numel(&[1 << 40, 1 << 40, 0]), Some(0));
        assert_eq!(
            arange(vec![4])?.reshape(vec![usize::MAX, 2]).unwrap_err(),
            TensorError::ShapeOverflow(vec![usize::MAX, 2])
        );
        Ok(())
    }

    #[test]
    fn select_out_of_bounds() -> Result<(), TensorError> {
        let t = arange(vec![3])?;
        assert_eq!(
            t.select(0, 3).unwrap_err(),
            TensorError::index_out_of_bounds(3, 3)
        );
        assert_eq!(
            t.select(0, -4).unwrap_err(),
            TensorError::index_out_of_bounds(-4, 3)
        );
        assert!(matches!(
            t.select(1, 0),
            Err(TensorError::AxisOutOfRange { axis: 1, dim: 1 })
        ));
        Ok(())
    }

    #[test]
    fn contiguous_copies_strided_views() -> Result<(), TensorError> {
        let t = arange(vec![2, 3])?;
        let col = t.select(1, 1)?;
        let dense = col.contiguous();
        assert!(dense.is_contiguous());
        assert!(!dense.shares_memory(&t));
        assert_eq!(dense.as_contiguous_slice::<i64>()?, &[1, 4]);
        assert!(col.as_contiguous_slice::<i64>().is_err());
        Ok(())
    }

    #[test]
    fn contiguous_slice_of_offset_view() -> Result<(), TensorError> {
        let t = arange(vec![3, 2])?;
        let row = t.get(1)?;
        assert!(row.is_contiguous());
        assert_eq!(row.as_contiguous_slice::<i64>()?, &[2, 3]);
        assert!(row.as_contiguous_slice::<i32>().is_err());
        Ok(())
    }

    #[test]
    fn lazy_negation() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(vec![3], vec![1.0f32, -2.0, 0.5])?;
        let n = t.neg()?;
        assert!(n.is_neg());
        assert!(n.shares_memory(&t));
        assert_eq!(n.typed_values::<f32>()?, vec![-1.0, 2.0, -0.5]);
        assert!(n.as_contiguous_slice::<f32>().is_err());

        let r = n.resolve_neg();
        assert!(!r.is_neg());
        assert_eq!(r.as_contiguous_slice::<f32>()?, &[-1.0, 2.0, -0.5]);
        assert!(!n.neg()?.is_neg());
        Ok(())
    }

    #[test]
    fn bool_negation_is_rejected() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(vec![1], vec![true])?;
        assert!(matches!(
            t.neg(),
            Err(TensorError::UnsupportedOperation { .. })
        ));
        Ok(())
    }

    #[test]
    fn lazy_conjugation() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(vec![2], vec![Complex::new(1.0f64, 2.0), Complex::new(0.0, -1.0)])?;
        let c = t.conj();
        assert!(c.is_conj());
        assert_eq!(
            c.typed_values::<Complex<f64>>()?,
            vec![Complex::new(1.0, -2.0), Complex::new(0.0, 1.0)]
        );
        let r = c.resolve_conj();
        assert!(!r.is_conj());
        assert_eq!(r.as_contiguous_slice::<Complex<f64>>()?[0], Complex::new(1.0, -2.0));

        let real = Tensor::from_shape_vec(vec![1], vec![1.0f32])?;
        assert!(!real.conj().is_conj());
        Ok(())
    }

    #[test]
    fn zero_tensor() -> Result<(), TensorError> {
        let z = Tensor::zeros_lazy(vec![2, 2], DType::Float64);
        assert!(z.is_zerotensor());
        assert_eq!(z.typed_values::<f64>()?, vec![0.0; 4]);
        assert!(z.as_contiguous_slice::<f64>().is_err());
        let d = z.densify();
        assert!(!d.is_zerotensor());
        assert_eq!(d.as_contiguous_slice::<f64>()?, &[0.0; 4]);
        assert_eq!(z.get(1)?.to_values().len(), 2);
        Ok(())
    }

    #[test]
    fn named_axes() -> Result<(), TensorError> {
        let t = arange(vec![2, 3])?.with_names(vec![Some("N".into()), None])?;
        assert!(t.has_names());
        let row = t.get(0)?;
        assert_eq!(row.names(), Some(&[None][..]));
        assert!(!t.strip_names().has_names());
        assert!(arange(vec![2])?.with_names(vec![None, None]).is_err());
        Ok(())
    }

    #[test]
    fn unsqueeze_and_reshape() -> Result<(), TensorError> {
        let t = arange(vec![2, 3])?;
        let u = t.unsqueeze(1)?;
        assert_eq!(u.shape(), &[2, 1, 3]);
        assert!(u.is_contiguous());
        assert_eq!(ints(&u), ints(&t));

        let col = t.select(1, 0)?;
        let r = col.reshape(vec![2, 1])?;
        assert_eq!(r.shape(), &[2, 1]);
        assert_eq!(ints(&r), vec![0, 3]);
        assert!(t.reshape(vec![4]).is_err());
        assert_eq!(t.flatten().shape(), &[6]);
        Ok(())
    }

    #[test]
    fn cat_along_first_axis() -> Result<(), TensorError> {
        let a = arange(vec![1, 2])?;
        let b = arange(vec![2, 2])?.neg()?;
        let c = Tensor::cat(&[a, b])?;
        assert_eq!(c.shape(), &[3, 2]);
        assert_eq!(ints(&c), vec![0, 1, 0, -1, -2, -3]);

        let f = Tensor::from_shape_vec(vec![1, 2], vec![1.0f32, 2.0])?;
        assert!(Tensor::cat(&[c.clone(), f]).is_err());
        assert!(Tensor::cat(&[]).is_err());
        Ok(())
    }

    #[test]
    fn dtype_conversions() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(vec![2], vec![1.5f32, -2.0])?;
        let h = t.to_dtype(DType::Float16)?;
        assert_eq!(h.typed_values::<f16>()?, vec![f16::from_f32(1.5), f16::from_f32(-2.0)]);
        let i = t.to_dtype(DType::Int32)?;
        assert_eq!(i.typed_values::<i32>()?, vec![1, -2]);

        let im = Tensor::from_shape_vec(vec![2], vec![0.5f32, 3.0])?;
        let c = Tensor::complex(&t, &im)?;
        assert_eq!(c.dtype(), DType::Complex64);
        assert_eq!(c.real()?.typed_values::<f32>()?, vec![1.5, -2.0]);
        assert_eq!(c.conj().imag()?.typed_values::<f32>()?, vec![-0.5, -3.0]);
        assert!(t.imag().is_err());
        Ok(())
    }

    #[test]
    fn offsets_of_empty_tensor() -> Result<(), TensorError> {
        let t = arange(vec![0, 3])?;
        assert!(t.offsets().is_empty());
        assert!(t.to_values().is_empty());
        assert!(t.is_contiguous());
        Ok(())
    }
}
