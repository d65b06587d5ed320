#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `tensorbridge-tensor` is the array library behind the tensorbridge binding layer. A
//! [`Tensor`] has a runtime rank and a runtime [`DType`]; its elements live in a
//! reference-counted [`TensorStorage`] shared by every view taken from it.
//!
//! Besides shape and strides a tensor carries lazy flags: optional axis names, a
//! storage-free zero tensor, a negation bit and a conjugation bit. Logical reads
//! apply them, raw reads through [`Tensor::as_contiguous_slice`] refuse to run until
//! they are resolved.
//!
//! # Quick Start
//!
//! ```rust
//! use tensorbridge_tensor::{DType, ScalarValue, Tensor, TensorIndex};
//!
//! let t = Tensor::from_shape_vec(vec![2, 3], vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//!
//! // Strided view of the second column
//! let col = t.index(&[TensorIndex::Ellipsis, TensorIndex::Select(1)]).unwrap();
//! assert_eq!(col.shape(), &[2]);
//! assert!(!col.is_contiguous());
//!
//! // Lazy negation, resolved into a dense contiguous copy
//! let neg = col.neg().unwrap().resolved();
//! assert_eq!(neg.as_contiguous_slice::<f32>().unwrap(), &[-2.0, -5.0]);
//!
//! assert_eq!(t.to_dtype(DType::Int8).unwrap().dtype(), DType::Int8);
//! assert_eq!(Tensor::scalar(ScalarValue::Int64(7)).item().unwrap(), ScalarValue::Int64(7));
//! ```

/// Element type tags and their metadata.
pub mod dtype;

/// Typed element trait and the dtype-erased storage enum.
pub mod element;

/// Error types for tensor operations.
pub mod error;

/// Native index operations.
pub mod index;

/// Elementwise predicates and reductions.
pub mod ops;

/// Exact-typed scalar values.
pub mod scalar;

/// Reference-counted element buffers.
pub mod storage;

/// The tensor type, its constructors, views and lazy flags.
pub mod tensor;

pub use crate::dtype::DType;
pub use crate::element::{Element, TensorData};
pub use crate::error::TensorError;
pub use crate::index::TensorIndex;
pub use crate::scalar::ScalarValue;
pub use crate::storage::TensorStorage;
pub use crate::tensor::{checked_numel, get_strides_from_shape, Tensor};
