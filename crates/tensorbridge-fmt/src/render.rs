use std::fmt;

use tensorbridge_tensor::{DType, ScalarValue, Tensor};

use crate::{
    error::FormatError, formatter::Formatter, options::PrintOptions,
    summarize::summarized_data,
};

/// Deepest tensor rank [`render`] accepts.
pub const MAX_RENDER_DEPTH: usize = 64;

/// Renders `tensor` as nested bracketed rows.
///
/// `indent` is the column the opening bracket sits at; wrapped rows and nested
/// sub-tensors are aligned one column to its right. Empty tensors render as `[]`
/// whatever the options are; otherwise the options are validated first.
///
/// ```rust
/// use tensorbridge_fmt::{render, PrintOptions};
/// use tensorbridge_tensor::Tensor;
///
/// let t = Tensor::from_shape_vec(vec![2, 2], vec![1i32, 2, 3, 4]).unwrap();
/// assert_eq!(render(&t, 0, &PrintOptions::default()).unwrap(), "[[1, 2],\n [3, 4]]");
/// ```
pub fn render(tensor: &Tensor, indent: usize, opts: &PrintOptions) -> Result<String, FormatError> {
    if tensor.numel() == 0 {
        return Ok("[]".to_string());
    }
    opts.validate()?;
    if tensor.dim() > MAX_RENDER_DEPTH {
        return Err(FormatError::RankTooLarge {
            dim: tensor.dim(),
            max: MAX_RENDER_DEPTH,
        });
    }

    let summarize = opts.summarizes(tensor.numel());
    let edgeitems = opts.edge_items();
    if summarize {
        log::debug!(
            "summarizing {:?} tensor with {} edge items",
            tensor.shape(),
            edgeitems
        );
    }
    let tensor = normalize(tensor)?;
    let sample = |part: &Tensor| -> Result<Formatter, FormatError> {
        if summarize {
            Formatter::new(&summarized_data(part, edgeitems)?, opts)
        } else {
            Formatter::new(part, opts)
        }
    };

    let (real, imag) = if tensor.is_complex() {
        (sample(&tensor.real()?)?, Some(sample(&tensor.imag()?)?))
    } else {
        (sample(&tensor)?, None)
    };
    let renderer = Renderer {
        opts,
        edgeitems,
        summarize,
        real,
        imag,
    };
    renderer.tensor_str(&tensor, indent)
}

/// Renders `tensor` at indent zero.
pub fn repr(tensor: &Tensor, opts: &PrintOptions) -> Result<String, FormatError> {
    render(tensor, 0, opts)
}

/// Normalizes the layout and element type of a tensor for rendering.
///
/// Axis names are dropped, a zero tensor is densified, the layout made contiguous,
/// pending negation and conjugation resolved, binary16 widened to binary32 and the
/// narrow complex types widened to double precision complex.
fn normalize(tensor: &Tensor) -> Result<Tensor, FormatError> {
    let mut t = tensor.strip_names().densify().contiguous().resolve_neg();
    t = match t.dtype() {
        DType::Float16 => t.to_dtype(DType::Float32)?,
        DType::Complex32 | DType::Complex64 => t.to_dtype(DType::Complex128)?,
        _ => t,
    };
    Ok(t.resolve_conj())
}

/// Joins the parts of a complex number, adding `+` unless the imaginary part is signed.
fn complex_str(real: &str, imag: &str) -> String {
    let imag = imag.trim_start();
    if imag.starts_with('+') || imag.starts_with('-') {
        format!("{real}{imag}j")
    } else {
        format!("{real}+{imag}j")
    }
}

struct Renderer<'a> {
    opts: &'a PrintOptions,
    edgeitems: usize,
    summarize: bool,
    real: Formatter,
    imag: Option<Formatter>,
}

impl Renderer<'_> {
    fn scalar_str(&self, value: &ScalarValue) -> String {
        match &self.imag {
            Some(imag) => complex_str(
                &self.real.format(&value.real()),
                &imag.format(&value.imag()),
            ),
            None => self.real.format(value),
        }
    }

    fn visible(&self, len: usize) -> Visible {
        if !self.summarize {
            Visible::All
        } else if self.edgeitems == 0 {
            Visible::Nothing
        } else if len > 2 * self.edgeitems {
            Visible::Edges
        } else {
            Visible::All
        }
    }

    fn vector_str(&self, tensor: &Tensor, indent: usize) -> String {
        let mut element_length = self.real.width() + 2;
        if let Some(imag) = &self.imag {
            element_length += imag.width() + 1;
        }
        let available = self.opts.linewidth.saturating_sub(indent as i64);
        let per_line = available.div_euclid(element_length as i64).max(1) as usize;

        let values = tensor.to_values();
        let len = values.len();
        let data: Vec<String> = match self.visible(len) {
            Visible::Nothing => vec!["...".to_string()],
            Visible::Edges => values[..self.edgeitems]
                .iter()
                .map(|v| self.scalar_str(v))
                .chain(std::iter::once("...".to_string()))
                .chain(values[len - self.edgeitems..].iter().map(|v| self.scalar_str(v)))
                .collect(),
            Visible::All => values.iter().map(|v| self.scalar_str(v)).collect(),
        };

        let separator = format!(",\n{}", " ".repeat(indent + 1));
        let lines = data
            .chunks(per_line)
            .map(|chunk| chunk.join(", "))
            .collect::<Vec<_>>();
        format!("[{}]", lines.join(&separator))
    }

    fn tensor_str(&self, tensor: &Tensor, indent: usize) -> Result<String, FormatError> {
        match tensor.dim() {
            0 => Ok(self.scalar_str(&tensor.item()?)),
            1 => Ok(self.vector_str(tensor, indent)),
            dim => {
                let len = tensor.shape()[0];
                let sub = |i: usize| self.tensor_str(&tensor.get(i as i64)?, indent + 1);
                let slices = match self.visible(len) {
                    Visible::Nothing => vec!["...".to_string()],
                    Visible::Edges => {
                        let mut slices = (0..self.edgeitems).map(&sub).collect::<Result<Vec<_>, _>>()?;
                        slices.push("...".to_string());
                        for i in len - self.edgeitems..len {
                            slices.push(sub(i)?);
                        }
                        slices
                    }
                    Visible::All => (0..len).map(&sub).collect::<Result<Vec<_>, _>>()?,
                };
                let separator = format!(",{}{}", "\n".repeat(dim - 1), " ".repeat(indent + 1));
                Ok(format!("[{}]", slices.join(&separator)))
            }
        }
    }
}

enum Visible {
    All,
    Edges,
    Nothing,
}

/// A tensor paired with print options, rendered through [`fmt::Display`].
///
/// ```rust
/// use tensorbridge_fmt::{PrintOptions, TensorDisplay};
/// use tensorbridge_tensor::Tensor;
///
/// let t = Tensor::from_shape_vec(vec![3], vec![1i64, 22, 333]).unwrap();
/// let opts = PrintOptions::default();
/// assert_eq!(TensorDisplay::new(&t, &opts).to_string(), "[  1,  22, 333]");
/// ```
pub struct TensorDisplay<'a> {
    tensor: &'a Tensor,
    opts: &'a PrintOptions,
}

impl<'a> TensorDisplay<'a> {
    /// Pairs `tensor` with `opts`.
    pub fn new(tensor: &'a Tensor, opts: &'a PrintOptions) -> Self {
        Self { tensor, opts }
    }
}

impl fmt::Display for TensorDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = repr(self.tensor, self.opts).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SciMode;
    use num_complex::Complex;
    use tensorbridge_tensor::TensorError;

    fn arange(shape: Vec<usize>) -> Result<Tensor, TensorError> {
        let numel = shape.iter().product::<usize>();
        Tensor::from_shape_vec(shape, (0..numel as i64).collect::<Vec<_>>())
    }

    fn show(t: &Tensor) -> Result<String, FormatError> {
        repr(t, &PrintOptions::default())
    }

    #[test]
    fn integer_row() -> Result<(), FormatError> {
        let t = Tensor::from_shape_vec(vec![3], vec![1i32, 22, 333])?;
        assert_eq!(show(&t)?, "[  1,  22, 333]");
        Ok(())
    }

    #[test]
    fn float_rows() -> Result<(), FormatError> {
        let t = Tensor::from_shape_vec(vec![2], vec![1.0f32, 22.0])?;
        assert_eq!(show(&t)?, "[ 1., 22.]");
        let t = Tensor::from_shape_vec(vec![2], vec![1.0f64, 2000.0])?;
        assert_eq!(show(&t)?, "[1.0000e+00, 2.0000e+03]");
        let t = Tensor::from_shape_vec(vec![3], vec![0.5f64, f64::NAN, -1.25])?;
        assert_eq!(show(&t)?, "[ 0.5000,     nan, -1.2500]");
        Ok(())
    }

    #[test]
    fn scalars() -> Result<(), FormatError> {
        assert_eq!(show(&Tensor::scalar(ScalarValue::Float32(3.5)))?, "3.5000");
        assert_eq!(show(&Tensor::scalar(ScalarValue::Int16(-7)))?, "-7");
        assert_eq!(show(&Tensor::scalar(ScalarValue::Bool(true)))?, "true");
        Ok(())
    }

    #[test]
    fn summarized_row() -> Result<(), FormatError> {
        let opts = PrintOptions {
            threshold: 5,
            edgeitems: 2,
            ..Default::default()
        };
        assert_eq!(repr(&arange(vec![10])?, &opts)?, "[0, 1, ..., 8, 9]");
        let none = PrintOptions {
            edgeitems: 0,
            ..opts.clone()
        };
        assert_eq!(repr(&arange(vec![10])?, &none)?, "[...]");
        assert_eq!(repr(&arange(vec![4, 4])?, &none)?, "[...]");
        Ok(())
    }

    #[test]
    fn matrices() -> Result<(), FormatError> {
        let t = Tensor::from_shape_vec(vec![2, 2], vec![1i32, 2, 3, 4])?;
        assert_eq!(show(&t)?, "[[1, 2],\n [3, 4]]");
        let t = arange(vec![2, 1, 2])?;
        assert_eq!(show(&t)?, "[[[0, 1]],\n\n [[2, 3]]]");
        Ok(())
    }

    #[test]
    fn summarized_matrix() -> Result<(), FormatError> {
        let _ = env_logger::builder().is_test(true).try_init();
        let opts = PrintOptions {
            threshold: 10,
            edgeitems: 1,
            ..Default::default()
        };
        let t = arange(vec![4, 4])?;
        assert_eq!(repr(&t, &opts)?, "[[ 0, ...,  3],\n ...,\n [12, ..., 15]]");
        Ok(())
    }

    #[test]
    fn row_wrapping() -> Result<(), FormatError> {
        let opts = PrintOptions {
            linewidth: 12,
            ..Default::default()
        };
        let t = arange(vec![6])?;
        assert_eq!(repr(&t, &opts)?, "[0, 1, 2, 3,\n 4, 5]");
        assert_eq!(render(&t, 4, &opts)?, "[0, 1,\n     2, 3,\n     4, 5]");
        let narrow = PrintOptions {
            linewidth: 0,
            ..Default::default()
        };
        assert_eq!(repr(&arange(vec![2])?, &narrow)?, "[0,\n 1]");
        Ok(())
    }

    #[test]
    fn complex_values() -> Result<(), FormatError> {
        assert_eq!(complex_str("1.5", "-2.0"), "1.5-2.0j");
        assert_eq!(complex_str("1.5", "  2.0"), "1.5+2.0j");

        let opts = PrintOptions {
            precision: 1,
            ..Default::default()
        };
        let t = Tensor::from_shape_vec(vec![1], vec![Complex::new(1.5f64, -2.5)])?;
        assert_eq!(repr(&t, &opts)?, "[1.5-2.5j]");
        let t = Tensor::from_shape_vec(
            vec![2],
            vec![Complex::new(1.0f32, 2.0), Complex::new(-3.0, 0.5)],
        )?;
        assert_eq!(repr(&t, &opts)?, "[ 1.+2.0j, -3.+0.5j]");
        let conj = t.conj();
        assert_eq!(repr(&conj, &opts)?, "[ 1.-2.0j, -3.-0.5j]");
        Ok(())
    }

    #[test]
    fn lazy_flags_are_resolved() -> Result<(), FormatError> {
        let t = Tensor::from_shape_vec(vec![2], vec![1i8, -2])?.neg()?;
        assert_eq!(show(&t)?, "[-1,  2]");
        let z = Tensor::zeros_lazy(vec![2], DType::Float64);
        assert_eq!(show(&z)?, "[0., 0.]");
        let named = arange(vec![2])?.with_names(vec![Some("x".to_string())])?;
        assert_eq!(show(&named)?, "[0, 1]");
        let strided = arange(vec![2, 2])?.select(1, 1)?;
        assert_eq!(show(&strided)?, "[1, 3]");
        Ok(())
    }

    #[test]
    fn half_precision_is_widened() -> Result<(), FormatError> {
        let t = Tensor::from_shape_vec(vec![2], vec![0.5f32, 0.25])?.to_dtype(DType::Float16)?;
        assert_eq!(show(&t)?, "[0.5000, 0.2500]");
        Ok(())
    }

    #[test]
    fn sci_override() -> Result<(), FormatError> {
        let opts = PrintOptions {
            sci_mode: SciMode::Always,
            precision: 2,
            ..Default::default()
        };
        let t = Tensor::from_shape_vec(vec![2], vec![1.0f64, -0.5])?;
        assert_eq!(repr(&t, &opts)?, "[ 1.00e+00, -5.00e-01]");
        Ok(())
    }

    #[test]
    fn empty_tensors() -> Result<(), FormatError> {
        for shape in [vec![0], vec![3, 0], vec![0, 2, 2]] {
            let t = Tensor::zeros(shape, DType::Complex64);
            assert_eq!(show(&t)?, "[]");
        }
        let opts = PrintOptions {
            threshold: -1,
            edgeitems: 0,
            ..Default::default()
        };
        assert_eq!(repr(&arange(vec![0])?, &opts)?, "[]");
        let opts = PrintOptions {
            edgeitems: -1,
            precision: u32::MAX,
            ..Default::default()
        };
        assert_eq!(repr(&Tensor::zeros(vec![0, 3], DType::Float32), &opts)?, "[]");
        assert!(repr(&arange(vec![2])?, &opts).is_err());
        Ok(())
    }

    #[test]
    fn rendering_is_idempotent() -> Result<(), FormatError> {
        let t = arange(vec![3, 4, 5])?;
        let opts = PrintOptions {
            threshold: 20,
            ..Default::default()
        };
        assert_eq!(repr(&t, &opts)?, repr(&t, &opts)?);
        Ok(())
    }

    #[test]
    fn rank_limit() -> Result<(), FormatError> {
        let t = Tensor::zeros(vec![1; MAX_RENDER_DEPTH + 1], DType::Int8);
        assert!(matches!(
            show(&t),
            Err(FormatError::RankTooLarge { dim: 65, max: 64 })
        ));
        let deep = Tensor::zeros(vec![1; MAX_RENDER_DEPTH], DType::Int8);
        let text = show(&deep)?;
        assert!(text.starts_with(&"[".repeat(MAX_RENDER_DEPTH)));
        Ok(())
    }

    #[test]
    fn display_wrapper() -> Result<(), FormatError> {
        let t = arange(vec![2])?;
        let opts = PrintOptions::default();
        assert_eq!(format!("{}", TensorDisplay::new(&t, &opts)), "[0, 1]");
        Ok(())
    }
}
