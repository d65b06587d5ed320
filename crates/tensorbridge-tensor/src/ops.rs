use crate::{
    dtype::DType,
    element::{dispatch, Element},
    error::TensorError,
    scalar::ScalarValue,
    storage::TensorStorage,
    tensor::Tensor,
};

impl Tensor {
    fn map_to_bool(&self, f: impl Fn(&ScalarValue) -> bool) -> Tensor {
        let data = self.to_values().iter().map(f).collect::<Vec<_>>();
        Tensor::dense(
            bool::wrap(TensorStorage::from_vec(data)),
            self.shape.clone(),
        )
    }

    /// Elementwise test for finite values. Always true for integer and bool tensors.
    pub fn isfinite(&self) -> Tensor {
        self.map_to_bool(ScalarValue::is_finite)
    }

    /// Elementwise test for non-zero values.
    pub fn ne_zero(&self) -> Tensor {
        self.map_to_bool(|v| !v.is_zero())
    }

    /// Elementwise logical and of two tensors of the same shape.
    ///
    /// Non-boolean operands are interpreted by their truthiness.
    pub fn logical_and(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        if self.shape != other.shape {
            return Err(TensorError::dimension_mismatch(
                "logical_and requires equal shapes",
                &self.shape,
                &other.shape,
            ));
        }
        let data = self
            .to_values()
            .iter()
            .zip(other.to_values())
            .map(|(a, b)| !a.is_zero() && !b.is_zero())
            .collect::<Vec<_>>();
        Tensor::from_shape_vec(self.shape.clone(), data)
    }

    /// The elements at the positions where `mask` is true, as a one-dimensional tensor.
    ///
    /// # Errors
    ///
    /// The mask must be a bool tensor with the same shape as `self`.
    pub fn masked_select(&self, mask: &Tensor) -> Result<Tensor, TensorError> {
        if mask.dtype() != DType::Bool {
            return Err(TensorError::dtype_mismatch(DType::Bool, mask.dtype()));
        }
        if mask.shape != self.shape {
            return Err(TensorError::dimension_mismatch(
                "mask shape must match tensor shape",
                &self.shape,
                &mask.shape,
            ));
        }
        let keep = mask.typed_values::<bool>()?;
        dispatch!(&self.data, s => {
            let selected = self
                .logical(s, true, true)
                .into_iter()
                .zip(&keep)
                .filter_map(|(v, &k)| k.then_some(v))
                .collect::<Vec<_>>();
            Ok(one_dim(selected))
        })
    }

    /// Elementwise absolute value; complex tensors yield their magnitude.
    ///
    /// # Errors
    ///
    /// Not defined for bool tensors.
    pub fn abs(&self) -> Result<Tensor, TensorError> {
        if self.dtype() == DType::Bool {
            return Err(TensorError::unsupported_operation(
                "abs",
                "abs is not supported on bool tensors",
            ));
        }
        let values = self.to_values().iter().map(ScalarValue::abs).collect::<Vec<_>>();
        Tensor::from_values(self.shape.clone(), &values, self.dtype().to_real())
    }

    /// The smallest element as `f64`. NaN if any element is NaN.
    pub fn amin(&self) -> Result<f64, TensorError> {
        self.reduce("amin", f64::min)
    }

    /// The largest element as `f64`. NaN if any element is NaN.
    pub fn amax(&self) -> Result<f64, TensorError> {
        self.reduce("amax", f64::max)
    }

    fn reduce(&self, operation: &str, f: fn(f64, f64) -> f64) -> Result<f64, TensorError> {
        let values = self.to_f64_vec()?;
        let (first, rest) = values.split_first().ok_or_else(|| {
            TensorError::unsupported_operation(
                operation,
                "expected a non-empty tensor for a reduction without identity",
            )
        })?;
        let mut acc = *first;
        for &v in rest {
            if v.is_nan() || acc.is_nan() {
                return Ok(f64::NAN);
            }
            acc = f(acc, v);
        }
        Ok(acc)
    }

    /// The logical elements of a real tensor converted to `f64`.
    ///
    /// # Errors
    ///
    /// Complex tensors would lose their imaginary part and are rejected.
    pub fn to_f64_vec(&self) -> Result<Vec<f64>, TensorError> {
        if self.is_complex() {
            return Err(TensorError::unsupported_operation(
                "to_f64_vec",
                "complex tensors have no real ordering",
            ));
        }
        Ok(self.to_values().iter().map(ScalarValue::to_f64).collect())
    }
}

fn one_dim<T: Element>(values: Vec<T>) -> Tensor {
    let len = values.len();
    Tensor::dense(T::wrap(TensorStorage::from_vec(values)), vec![len])
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use num_complex::Complex;

    use crate::{DType, Tensor, TensorError};

    #[test]
    fn finite_and_nonzero_mask() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(
            vec![5],
            vec![0.0f32, 1.5, f32::NAN, f32::INFINITY, -3.0],
        )?;
        let mask = t.isfinite().logical_and(&t.ne_zero())?;
        assert_eq!(mask.typed_values::<bool>()?, vec![false, true, false, false, true]);
        let sel = t.masked_select(&mask)?;
        assert_eq!(sel.shape(), &[2]);
        assert_eq!(sel.typed_values::<f32>()?, vec![1.5, -3.0]);
        Ok(())
    }

    #[test]
    fn masked_select_checks_mask() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(vec![2], vec![1i32, 2])?;
        assert!(matches!(
            t.masked_select(&t),
            Err(TensorError::DTypeMismatch { .. })
        ));
        let short = Tensor::from_shape_vec(vec![1], vec![true])?;
        assert!(t.masked_select(&short).is_err());
        Ok(())
    }

    #[test]
    fn abs_min_max() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(vec![3], vec![-4i16, 2, -1])?;
        let a = t.abs()?;
        assert_eq!(a.dtype(), DType::Int16);
        assert_eq!(a.amin()?, 1.0);
        assert_eq!(a.amax()?, 4.0);

        let c = Tensor::from_shape_vec(vec![1], vec![Complex::new(3.0f64, 4.0)])?;
        let m = c.abs()?;
        assert_eq!(m.dtype(), DType::Float64);
        assert_relative_eq!(m.amax()?, 5.0);

        let b = Tensor::from_shape_vec(vec![1], vec![true])?;
        assert!(b.abs().is_err());
        Ok(())
    }

    #[test]
    fn reductions_propagate_nan_and_reject_empty() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(vec![3], vec![1.0f64, f64::NAN, 2.0])?;
        assert!(t.amax()?.is_nan());
        let empty = Tensor::from_shape_vec(vec![0], Vec::<f64>::new())?;
        assert!(empty.amin().is_err());
        Ok(())
    }

    #[test]
    fn negated_view_is_honoured() -> Result<(), TensorError> {
        let t = Tensor::from_shape_vec(vec![2], vec![1.0f32, -5.0])?.neg()?;
        assert_eq!(t.amax()?, 5.0);
        assert_eq!(t.to_f64_vec()?, vec![-1.0, 5.0]);
        Ok(())
    }
}
