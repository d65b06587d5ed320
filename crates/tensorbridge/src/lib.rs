#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use tensorbridge_tensor as tensor;

#[doc(inline)]
pub use tensorbridge_codec as codec;

#[doc(inline)]
pub use tensorbridge_fmt as fmt;
