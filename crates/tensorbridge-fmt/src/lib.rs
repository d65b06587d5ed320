#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! [`render`] turns a tensor of any rank and dtype into the familiar nested bracket
//! text: columns are aligned by a per-tensor [`Formatter`], large tensors are
//! summarized around `...` markers, long rows wrap at [`PrintOptions::linewidth`]
//! and complex elements print as `<real>+<imag>j`.
//!
//! ```rust
//! use tensorbridge_fmt::{repr, PrintOptions};
//! use tensorbridge_tensor::Tensor;
//!
//! let t = Tensor::from_shape_vec(vec![10], (0..10i64).collect::<Vec<_>>()).unwrap();
//! let opts = PrintOptions { threshold: 5, edgeitems: 2, ..Default::default() };
//! assert_eq!(repr(&t, &opts).unwrap(), "[0, 1, ..., 8, 9]");
//! ```

/// Error types for rendering.
pub mod error;

/// Per-tensor number rendering policy.
pub mod formatter;

/// printf compatible number rendering.
pub mod number;

/// Print options and presets.
pub mod options;

/// Recursive tensor rendering.
pub mod render;

/// Edge item selection for summarized tensors.
pub mod summarize;

pub use crate::error::FormatError;
pub use crate::formatter::Formatter;
pub use crate::options::{PrintOptions, SciMode, MAX_PRECISION};
pub use crate::render::{render, repr, TensorDisplay, MAX_RENDER_DEPTH};
pub use crate::summarize::summarized_data;
