use thiserror::Error;

use crate::dtype::DType;

/// Error type for tensor operations.
///
/// This enum provides detailed error information for tensor creation,
/// view manipulation, casting and indexing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    /// Tensor shape does not match the provided data.
    ///
    /// The product of the shape must equal the number of elements exactly.
    ///
    /// # Example
    /// ```ignore
    /// // Error: shape [2, 3] expects 6 elements, but got 5
    /// let tensor = Tensor::from_shape_vec(vec![2, 3], vec![1i32, 2, 3, 4, 5])?;
    /// ```
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// The product of the shape does not fit in `usize`.
    #[error("Shape overflow: {0:?} has more elements than can be addressed")]
    ShapeOverflow(Vec<usize>),

    /// Index exceeds tensor bounds.
    ///
    /// Negative indices count from the end of the axis; the error reports the index
    /// exactly as it was given.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: i64,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// Axis is not a valid axis of the tensor.
    #[error("Axis {axis} out of range for tensor with {dim} dimensions")]
    AxisOutOfRange {
        /// The requested axis
        axis: usize,
        /// Number of dimensions of the tensor
        dim: usize,
    },

    /// Tensor dimensions incompatible for the requested operation.
    ///
    /// # Examples
    /// - Concatenation of tensors with different trailing shapes
    /// - A boolean mask whose shape differs from the indexed axes
    #[error("Dimension mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },

    /// Element type differs from the one the operation requires.
    #[error("DType mismatch: expected {expected}, got {actual}")]
    DTypeMismatch {
        /// Required element type
        expected: DType,
        /// Element type of the tensor
        actual: DType,
    },

    /// Operation not supported for this tensor configuration.
    ///
    /// # Examples
    /// - Negating a boolean tensor
    /// - Taking the imaginary part of a real tensor
    /// - Reading raw memory of a tensor with pending lazy flags
    #[error("Unsupported operation: {operation} - {reason}")]
    UnsupportedOperation {
        /// Name of the operation that failed
        operation: String,
        /// Reason why the operation is not supported
        reason: String,
    },

    /// Malformed index expression.
    #[error("Invalid index: {0}")]
    InvalidIndex(String),
}

impl TensorError {
    /// Creates an InvalidShape error with clear context.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates an IndexOutOfBounds error with clear context.
    pub fn index_out_of_bounds(index: i64, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    /// Creates a DimensionMismatch error with formatted shapes.
    pub fn dimension_mismatch(
        message: impl Into<String>,
        expected: &[usize],
        actual: &[usize],
    ) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }

    /// Creates a DTypeMismatch error.
    pub fn dtype_mismatch(expected: DType, actual: DType) -> Self {
        Self::DTypeMismatch { expected, actual }
    }

    /// Creates an UnsupportedOperation error with context.
    pub fn unsupported_operation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = TensorError::index_out_of_bounds(-4, 3);
        assert_eq!(err.to_string(), "Index -4 out of bounds for dimension of size 3");
        let err = TensorError::dimension_mismatch("mask shape", &[2, 2], &[4]);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: mask shape. Expected shape: [2, 2], got: [4]"
        );
        let err = TensorError::ShapeOverflow(vec![1 << 33, 1 << 33]);
        assert_eq!(
            err.to_string(),
            "Shape overflow: [8589934592, 8589934592] has more elements than can be addressed"
        );
    }
}
