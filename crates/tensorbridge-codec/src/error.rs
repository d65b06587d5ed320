use tensorbridge_tensor::TensorError;

use crate::kind::ScalarKind;

/// An error type for the boundary codecs.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Kind name that is neither canonical nor a known alias.
    #[error("Unsupported scalar kind `{0}`")]
    UnsupportedKind(String),

    /// Numeric kind tag outside the known range.
    #[error("Unknown scalar kind tag {0}")]
    UnknownKindTag(u8),

    /// Payload length differs from the width of its kind.
    #[error("Scalar of kind {kind} needs {expected} bytes, got {actual}")]
    ByteLength {
        /// Kind of the scalar
        kind: ScalarKind,
        /// Width of that kind
        expected: usize,
        /// Length of the payload
        actual: usize,
    },

    /// A bool payload byte other than `0` or `1`.
    #[error("Invalid bool byte {0:#04x}")]
    InvalidBool(u8),

    /// A value list whose elements do not share one kind.
    #[error("Element {position} has kind {actual}, expected {expected} like the first element")]
    MixedKinds {
        /// Kind of the first element
        expected: ScalarKind,
        /// Kind of the offending element
        actual: ScalarKind,
        /// Position of the offending element
        position: usize,
    },

    /// A shape with a negative dimension, or one whose element count overflows.
    #[error("Invalid shape {0:?}: dimensions must be non-negative and their product addressable")]
    InvalidShape(Vec<i64>),

    /// Value count differs from the product of the shape.
    #[error("Shape {shape:?} holds {expected} elements, got {actual} values")]
    ElementCountMismatch {
        /// The requested shape
        shape: Vec<i64>,
        /// Number of elements the shape holds
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },

    /// Real and imaginary lanes of different lengths.
    #[error("Complex lanes differ in length: {re} real parts, {im} imaginary parts")]
    LaneLengthMismatch {
        /// Length of the real lane
        re: usize,
        /// Length of the imaginary lane
        im: usize,
    },

    /// Index descriptor discriminant outside the known range.
    #[error("Unknown index descriptor discriminant {0}")]
    UnknownDiscriminant(u8),

    /// A tensor index descriptor without a tensor operand.
    #[error("Tensor index descriptor without a tensor operand")]
    MissingTensorOperand,

    /// A slice descriptor with a zero step.
    #[error("Slice step cannot be zero (index descriptor {position})")]
    ZeroStep {
        /// Position of the descriptor
        position: usize,
    },

    /// A tensor converted to a scalar must hold exactly one element.
    #[error("Only tensors with a single element can be converted to a scalar, got {0} elements")]
    NotAScalar(usize),

    /// Error raised by the tensor library.
    #[error(transparent)]
    Tensor(#[from] TensorError),
}
