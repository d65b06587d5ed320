use crate::{
    dtype::DType,
    element::{dispatch, Element},
    error::TensorError,
    storage::TensorStorage,
    tensor::Tensor,
};

/// A single native index operation, see [`Tensor::index`].
#[derive(Clone, Debug)]
pub enum TensorIndex {
    /// Inserts a new axis of length one.
    None,
    /// Stands for every axis not addressed by the other indices.
    Ellipsis,
    /// Selects one position and removes the axis. Negative positions count from the end.
    Select(i64),
    /// Inserts a new axis of length one (`true`) or zero (`false`).
    Bool(bool),
    /// Restricts the axis to a strided range.
    Slice {
        /// First position, unbounded when absent.
        start: Option<i64>,
        /// One past the last position, unbounded when absent.
        stop: Option<i64>,
        /// Distance between positions, one when absent.
        step: Option<i64>,
    },
    /// Advanced indexing by an integer or boolean tensor.
    Tensor(Tensor),
}

impl TensorIndex {
    /// Number of source axes the index consumes.
    fn consumed_axes(&self) -> usize {
        match self {
            TensorIndex::None | TensorIndex::Ellipsis | TensorIndex::Bool(_) => 0,
            TensorIndex::Select(_) | TensorIndex::Slice { .. } => 1,
            TensorIndex::Tensor(t) if t.dtype() == DType::Bool => t.dim(),
            TensorIndex::Tensor(_) => 1,
        }
    }
}

impl Tensor {
    /// Applies a sequence of index operations, axis by axis.
    ///
    /// Basic indices (`None`, `Ellipsis`, `Select`, `Bool`, `Slice`) produce views that
    /// share storage with `self`. Tensor indices copy: an integer tensor replaces the
    /// current axis by its own shape, a boolean tensor consumes as many axes as it has
    /// dimensions and replaces them by a single axis holding the selected positions.
    /// Several tensor indices are applied one after another, each on its own axes.
    ///
    /// # Errors
    ///
    /// More than one ellipsis, more indices than axes, out of range positions,
    /// non-positive slice steps, floating point index tensors and mask shape
    /// mismatches are rejected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tensorbridge_tensor::{Tensor, TensorIndex};
    ///
    /// let t = Tensor::zeros(vec![4, 6, 2], tensorbridge_tensor::DType::Float32);
    /// let v = t
    ///     .index(&[
    ///         TensorIndex::Select(0),
    ///         TensorIndex::Slice { start: None, stop: Some(5), step: None },
    ///         TensorIndex::None,
    ///     ])
    ///     .unwrap();
    /// assert_eq!(v.shape(), &[5, 1, 2]);
    /// ```
    pub fn index(&self, indices: &[TensorIndex]) -> Result<Tensor, TensorError> {
        let ellipses = indices
            .iter()
            .filter(|i| matches!(i, TensorIndex::Ellipsis))
            .count();
        if ellipses > 1 {
            return Err(TensorError::InvalidIndex(
                "an index can only have a single ellipsis".to_string(),
            ));
        }
        let consumed = indices.iter().map(TensorIndex::consumed_axes).sum::<usize>();
        if consumed > self.dim() {
            return Err(TensorError::InvalidIndex(format!(
                "too many indices for tensor of dimension {}",
                self.dim()
            )));
        }
        log::trace!("indexing {:?} tensor with {} indices", self.shape, indices.len());

        let mut out = self.clone();
        let mut axis = 0;
        for index in indices {
            match index {
                TensorIndex::None => {
                    out = out.insert_axis(axis, 1);
                    axis += 1;
                }
                TensorIndex::Bool(keep) => {
                    out = out.insert_axis(axis, usize::from(*keep));
                    axis += 1;
                }
                TensorIndex::Ellipsis => axis += self.dim() - consumed,
                TensorIndex::Select(i) => out = out.select(axis, *i)?,
                TensorIndex::Slice { start, stop, step } => {
                    out = out.slice_axis(axis, *start, *stop, step.unwrap_or(1))?;
                    axis += 1;
                }
                TensorIndex::Tensor(t) if t.dtype() == DType::Bool && t.dim() == 0 => {
                    let keep = t.typed_values::<bool>()?.first().copied().unwrap_or(false);
                    out = out.insert_axis(axis, usize::from(keep));
                    axis += 1;
                }
                TensorIndex::Tensor(t) if t.dtype() == DType::Bool => {
                    out = out.mask_axes(axis, t)?;
                    axis += 1;
                }
                TensorIndex::Tensor(t) if t.dtype().is_integral() => {
                    out = out.take_axis(axis, t)?;
                    axis += t.dim();
                }
                TensorIndex::Tensor(t) => {
                    return Err(TensorError::InvalidIndex(format!(
                        "tensors used as indices must be integer or bool tensors, got {}",
                        t.dtype()
                    )))
                }
            }
        }
        Ok(out)
    }

    /// Replaces `axis` by the shape of the integer tensor `index`, gathering positions.
    fn take_axis(&self, axis: usize, index: &Tensor) -> Result<Tensor, TensorError> {
        let size = self.shape[axis];
        let picks = index
            .to_values()
            .iter()
            .map(|v| {
                let i = v.to_i64();
                let position = if i < 0 { i + size as i64 } else { i };
                if position < 0 || position >= size as i64 {
                    Err(TensorError::index_out_of_bounds(i, size))
                } else {
                    Ok(position as usize)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut shape = self.shape[..axis].to_vec();
        shape.extend_from_slice(index.shape());
        shape.extend_from_slice(&self.shape[axis + 1..]);
        Ok(self.gather_block(axis, 1, &picks, shape))
    }

    /// Replaces the axes covered by the boolean `mask` by one axis of the true positions.
    fn mask_axes(&self, axis: usize, mask: &Tensor) -> Result<Tensor, TensorError> {
        let span = mask.dim();
        let covered = &self.shape[axis..axis + span];
        if covered != mask.shape() {
            return Err(TensorError::dimension_mismatch(
                "mask shape must match the indexed axes",
                covered,
                mask.shape(),
            ));
        }
        let picks = mask
            .typed_values::<bool>()?
            .into_iter()
            .enumerate()
            .filter_map(|(i, keep)| keep.then_some(i))
            .collect::<Vec<_>>();
        let mut shape = self.shape[..axis].to_vec();
        shape.push(picks.len());
        shape.extend_from_slice(&self.shape[axis + span..]);
        Ok(self.gather_block(axis, span, &picks, shape))
    }

    /// Gathers `picks` from the flattened block of `span` axes starting at `axis`.
    fn gather_block(&self, axis: usize, span: usize, picks: &[usize], shape: Vec<usize>) -> Tensor {
        let outer = self.shape[..axis].iter().product::<usize>();
        let block = self.shape[axis..axis + span].iter().product::<usize>();
        let inner = self.shape[axis + span..].iter().product::<usize>();
        dispatch!(&self.data, s => {
            let values = self.logical(s, true, true);
            let mut out = Vec::with_capacity(outer * picks.len() * inner);
            for o in 0..outer {
                for &p in picks {
                    let start = (o * block + p) * inner;
                    out.extend_from_slice(&values[start..start + inner]);
                }
            }
            dense_with(out, shape)
        })
    }
}

fn dense_with<T: Element>(values: Vec<T>, shape: Vec<usize>) -> Tensor {
    Tensor::dense(T::wrap(TensorStorage::from_vec(values)), shape)
}

#[cfg(test)]
mod tests {
    use super::TensorIndex;
    use crate::{ScalarValue, Tensor, TensorError};

    fn arange(shape: Vec<usize>) -> Result<Tensor, TensorError> {
        let numel = shape.iter().product::<usize>();
        Tensor::from_shape_vec(shape, (0..numel as i64).collect::<Vec<_>>())
    }

    fn ints(t: &Tensor) -> Vec<i64> {
        t.to_values().iter().map(ScalarValue::to_i64).collect()
    }

    fn slice(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> TensorIndex {
        TensorIndex::Slice { start, stop, step }
    }

    #[test]
    fn select_slice_newaxis() -> Result<(), TensorError> {
        let t = arange(vec![2, 6, 3])?;
        let v = t.index(&[
            TensorIndex::Select(0),
            slice(None, Some(5), None),
            TensorIndex::None,
        ])?;
        assert_eq!(v.shape(), &[5, 1, 3]);
        assert!(v.shares_memory(&t));
        assert_eq!(ints(&v)[..4], [0, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn ellipsis_fills_remaining_axes() -> Result<(), TensorError> {
        let t = arange(vec![2, 3, 4])?;
        let v = t.index(&[TensorIndex::Ellipsis, TensorIndex::Select(-1)])?;
        assert_eq!(v.shape(), &[2, 3]);
        assert_eq!(ints(&v), vec![3, 7, 11, 15, 19, 23]);

        let v = t.index(&[TensorIndex::Select(1), TensorIndex::Ellipsis, TensorIndex::None])?;
        assert_eq!(v.shape(), &[3, 4, 1]);

        let err = t
            .index(&[TensorIndex::Ellipsis, TensorIndex::Ellipsis])
            .unwrap_err();
        assert!(matches!(err, TensorError::InvalidIndex(_)));
        Ok(())
    }

    #[test]
    fn too_many_indices() -> Result<(), TensorError> {
        let t = arange(vec![2])?;
        let err = t
            .index(&[TensorIndex::Select(0), TensorIndex::Select(0)])
            .unwrap_err();
        assert!(matches!(err, TensorError::InvalidIndex(_)));
        Ok(())
    }

    #[test]
    fn boolean_scalar_index() -> Result<(), TensorError> {
        let t = arange(vec![3])?;
        assert_eq!(t.index(&[TensorIndex::Bool(true)])?.shape(), &[1, 3]);
        assert_eq!(t.index(&[TensorIndex::Bool(false)])?.shape(), &[0, 3]);
        let flag = Tensor::from_shape_vec(vec![], vec![true])?;
        assert_eq!(t.index(&[TensorIndex::Tensor(flag)])?.shape(), &[1, 3]);
        Ok(())
    }

    #[test]
    fn integer_tensor_index() -> Result<(), TensorError> {
        let t = arange(vec![3, 2])?;
        let idx = Tensor::from_shape_vec(vec![2, 2], vec![2i32, 0, -1, 1])?;
        let v = t.index(&[TensorIndex::Tensor(idx)])?;
        assert_eq!(v.shape(), &[2, 2, 2]);
        assert_eq!(ints(&v), vec![4, 5, 0, 1, 4, 5, 2, 3]);

        let cols = Tensor::from_shape_vec(vec![1], vec![1u8])?;
        let v = t.index(&[slice(None, None, None), TensorIndex::Tensor(cols)])?;
        assert_eq!(v.shape(), &[3, 1]);
        assert_eq!(ints(&v), vec![1, 3, 5]);

        let oob = Tensor::from_shape_vec(vec![1], vec![3i64])?;
        assert_eq!(
            t.index(&[TensorIndex::Tensor(oob)]).unwrap_err(),
            TensorError::index_out_of_bounds(3, 3)
        );
        Ok(())
    }

    #[test]
    fn boolean_mask_index() -> Result<(), TensorError> {
        let t = arange(vec![2, 2, 3])?;
        let mask = Tensor::from_shape_vec(vec![2, 2], vec![true, false, false, true])?;
        let v = t.index(&[TensorIndex::Tensor(mask)])?;
        assert_eq!(v.shape(), &[2, 3]);
        assert_eq!(ints(&v), vec![0, 1, 2, 9, 10, 11]);

        let bad = Tensor::from_shape_vec(vec![3], vec![true, true, false])?;
        assert!(matches!(
            t.index(&[TensorIndex::Tensor(bad)]),
            Err(TensorError::DimensionMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn float_index_tensor_is_rejected() -> Result<(), TensorError> {
        let t = arange(vec![3])?;
        let idx = Tensor::from_shape_vec(vec![1], vec![0.0f32])?;
        assert!(matches!(
            t.index(&[TensorIndex::Tensor(idx)]),
            Err(TensorError::InvalidIndex(_))
        ));
        Ok(())
    }
}
