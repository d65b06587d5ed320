use tensorbridge_tensor::TensorError;

/// An error type for tensor rendering.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Boundary scientific mode outside `0..=2`.
    #[error("Invalid sci_mode {0}: expected 0 (auto), 1 (never) or 2 (always)")]
    InvalidSciMode(u8),

    /// A print option outside its valid range.
    #[error("Invalid print option `{name}`: {reason}")]
    InvalidOption {
        /// Name of the option
        name: &'static str,
        /// What is wrong with its value
        reason: String,
    },

    /// Unknown print options profile name.
    #[error("Unknown print options profile `{0}`, expected `default`, `short` or `full`")]
    UnknownProfile(String),

    /// A formatter was built directly from a complex tensor.
    #[error("Formatter expects a real tensor; format complex tensors by their real and imaginary parts")]
    ComplexInput,

    /// Tensor rank beyond the rendering depth limit.
    #[error("Cannot render tensor with {dim} dimensions, at most {max} are supported")]
    RankTooLarge {
        /// Number of dimensions of the tensor
        dim: usize,
        /// Maximum supported number of dimensions
        max: usize,
    },

    /// Error raised by the tensor library.
    #[error(transparent)]
    Tensor(#[from] TensorError),
}
