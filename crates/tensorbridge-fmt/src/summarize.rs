use tensorbridge_tensor::{Tensor, TensorError};

/// The elements left visible when `tensor` is summarized, flattened to one axis.
///
/// Along every axis longer than `2 * edgeitems` only the first and last `edgeitems`
/// positions are kept. With `edgeitems == 0` nothing is visible. A zero-dimensional
/// tensor is returned unchanged.
pub fn summarized_data(tensor: &Tensor, edgeitems: usize) -> Result<Tensor, TensorError> {
    if tensor.dim() == 0 {
        return Ok(tensor.clone());
    }
    if edgeitems == 0 {
        return Ok(Tensor::zeros(vec![0], tensor.dtype()));
    }
    let len = tensor.shape()[0];
    let edge = edgeitems as i64;
    if tensor.dim() == 1 {
        if len > 2 * edgeitems {
            return Tensor::cat(&[
                tensor.slice_axis(0, None, Some(edge), 1)?,
                tensor.slice_axis(0, Some(-edge), None, 1)?,
            ]);
        }
        return Ok(tensor.clone());
    }

    let rows: Vec<usize> = if len > 2 * edgeitems {
        (0..edgeitems).chain(len - edgeitems..len).collect()
    } else {
        (0..len).collect()
    };
    let parts = rows
        .into_iter()
        .map(|i| summarized_data(&tensor.get(i as i64)?, edgeitems))
        .collect::<Result<Vec<_>, _>>()?;
    if parts.is_empty() {
        return Ok(Tensor::zeros(vec![0], tensor.dtype()));
    }
    Tensor::cat(&parts)
}
