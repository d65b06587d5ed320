#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Values cross the boundary in three shapes:
//!
//! - [`TaggedScalar`]: a [`ScalarKind`] tag plus a fixed-width little-endian payload.
//! - [`TaggedScalarList`]: tagged scalars plus a shape, used to build tensors from host
//!   literals and to read a tensor's contents back.
//! - [`IndexDescriptor`]: one per-axis index operation, translated into
//!   [`tensorbridge_tensor::TensorIndex`].
//!
//! ```rust
//! use tensorbridge_codec::{tensor_from_list, tensor_to_list, ScalarKind, TaggedScalar, TaggedScalarList};
//! use tensorbridge_tensor::ScalarValue;
//!
//! let list = TaggedScalarList {
//!     values: [1, 2, 3, 4].map(|v| TaggedScalar::encode(&ScalarValue::Int32(v))).to_vec(),
//!     shape: vec![2, 2],
//! };
//! let t = tensor_from_list(&list, Some(ScalarKind::Float64)).unwrap();
//! let back = tensor_to_list(&t).unwrap();
//! assert_eq!(back.values[3].decode().unwrap(), ScalarValue::Float64(4.0));
//! ```

/// Error types for the codecs.
pub mod error;

/// Index descriptor translation.
pub mod index;

/// Scalar kind tags and their dtype mapping.
pub mod kind;

/// Bulk conversion between tagged scalar lists and native buffers.
pub mod list;

/// The tagged scalar codec.
pub mod scalar;

pub use crate::error::CodecError;
pub use crate::index::{
    index, translate, IndexDescriptor, IndexKind, RawIndexDescriptor, RawSlice, SliceSpec,
};
pub use crate::kind::ScalarKind;
pub use crate::list::{
    from_native_buffer, tensor_from_list, tensor_to_list, to_native_buffer, ComplexLanes,
    NativeBuffer, TaggedScalarList,
};
pub use crate::scalar::{item, RawTaggedScalar, TaggedScalar};
