use pyo3::exceptions::{PyIndexError, PyTypeError, PyValueError};
use pyo3::PyErr;

use tensorbridge_codec::CodecError;
use tensorbridge_fmt::FormatError;
use tensorbridge_tensor::TensorError;

pub fn tensor_err(e: TensorError) -> PyErr {
    match e {
        TensorError::IndexOutOfBounds { .. }
        | TensorError::AxisOutOfRange { .. }
        | TensorError::InvalidIndex(_) => PyIndexError::new_err(e.to_string()),
        TensorError::DTypeMismatch { .. } | TensorError::UnsupportedOperation { .. } => {
            PyTypeError::new_err(e.to_string())
        }
        _ => PyValueError::new_err(e.to_string()),
    }
}

pub fn codec_err(e: CodecError) -> PyErr {
    match e {
        CodecError::Tensor(inner) => tensor_err(inner),
        CodecError::UnsupportedKind(_)
        | CodecError::UnknownKindTag(_)
        | CodecError::MixedKinds { .. }
        | CodecError::MissingTensorOperand => PyTypeError::new_err(e.to_string()),
        CodecError::ZeroStep { .. } => PyIndexError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

pub fn format_err(e: FormatError) -> PyErr {
    match e {
        FormatError::Tensor(inner) => tensor_err(inner),
        FormatError::ComplexInput => PyTypeError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}
