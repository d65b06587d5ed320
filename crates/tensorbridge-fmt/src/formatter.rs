use tensorbridge_tensor::{ScalarValue, Tensor};

use crate::{
    error::FormatError,
    number::{format_fixed, format_integer, format_scientific, non_finite_token},
    options::PrintOptions,
};

/// Ratio of the largest to the smallest magnitude beyond which numbers go scientific.
const SCI_RATIO: f64 = 1000.0;
/// Magnitude beyond which numbers go scientific.
const SCI_MAX: f64 = 1.0e8;
/// Magnitude below which non-integral numbers go scientific.
const SCI_MIN: f64 = 1.0e-4;

/// Number rendering policy of one real tensor.
///
/// Built once from the values to display and reused for every element, so that all
/// elements share one mode and one column width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    precision: usize,
    floating: bool,
    int_mode: bool,
    sci_mode: bool,
    max_width: usize,
}

impl Formatter {
    /// Derives the policy from the elements of `tensor`.
    ///
    /// Integer and bool tensors print as integers and their column width is the
    /// longest element. Floating point tensors are sampled on their finite non-zero
    /// elements: integral samples print as `<n>.`, a wide magnitude range prints in
    /// scientific notation and everything else uses fixed point. The scientific mode
    /// of `opts` overrides the sampled decision before the width is measured.
    ///
    /// When no element qualifies for sampling, the width stays at its default of one.
    ///
    /// # Errors
    ///
    /// Complex tensors must be split into their parts first, and `opts` must pass
    /// [`PrintOptions::validate`].
    pub fn new(tensor: &Tensor, opts: &PrintOptions) -> Result<Self, FormatError> {
        opts.validate()?;
        if tensor.is_complex() {
            return Err(FormatError::ComplexInput);
        }
        let mut formatter = Self {
            precision: opts.precision as usize,
            floating: tensor.is_floating_point(),
            int_mode: true,
            sci_mode: false,
            max_width: 1,
        };

        if !formatter.floating {
            formatter.max_width = tensor
                .to_values()
                .iter()
                .map(|v| format_integer(v).len())
                .fold(1, usize::max);
            return Ok(formatter);
        }

        let mask = tensor.isfinite().logical_and(&tensor.ne_zero())?;
        let sampled = tensor.masked_select(&mask)?;
        let values = sampled.to_f64_vec()?;

        if !values.is_empty() {
            let magnitudes = sampled.abs()?;
            let min = magnitudes.amin()?;
            let max = magnitudes.amax()?;
            formatter.int_mode = values.iter().all(|v| *v == v.ceil());
            formatter.sci_mode = max / min > SCI_RATIO
                || max > SCI_MAX
                || (!formatter.int_mode && min < SCI_MIN);
            log::trace!(
                "sampled {} values: min {min}, max {max}, int_mode {}, sci_mode {}",
                values.len(),
                formatter.int_mode,
                formatter.sci_mode
            );
        }
        if let Some(sci) = opts.sci_mode.as_override() {
            formatter.sci_mode = sci;
        }

        formatter.max_width = values
            .iter()
            .map(|v| formatter.render_float(*v).len())
            .fold(1, usize::max);
        Ok(formatter)
    }

    /// The column width every element is padded to.
    pub fn width(&self) -> usize {
        self.max_width
    }

    /// Returns true if the tensor was floating point.
    pub fn is_floating(&self) -> bool {
        self.floating
    }

    /// Returns true if floating values print as integers with a trailing dot.
    pub fn int_mode(&self) -> bool {
        self.int_mode
    }

    /// Returns true if floating values print in scientific notation.
    pub fn sci_mode(&self) -> bool {
        self.sci_mode
    }

    fn render_float(&self, value: f64) -> String {
        if let Some(token) = non_finite_token(value) {
            token.to_string()
        } else if self.sci_mode {
            format_scientific(value, self.precision)
        } else if self.int_mode {
            format!("{}.", format_fixed(value, 0))
        } else {
            format_fixed(value, self.precision)
        }
    }

    /// Renders one element, right-justified to [`Formatter::width`].
    ///
    /// Text wider than the column is never truncated.
    pub fn format(&self, value: &ScalarValue) -> String {
        let text = if self.floating {
            self.render_float(value.to_f64())
        } else {
            format_integer(value)
        };
        format!("{text:>width$}", width = self.max_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SciMode;
    use tensorbridge_tensor::DType;

    fn floats(values: Vec<f64>) -> Result<Tensor, FormatError> {
        let n = values.len();
        Ok(Tensor::from_shape_vec(vec![n], values)?)
    }

    #[test]
    fn integer_width() -> Result<(), FormatError> {
        let t = Tensor::from_shape_vec(vec![3], vec![1i64, 22, 333])?;
        let f = Formatter::new(&t, &PrintOptions::default())?;
        assert_eq!(f.width(), 3);
        assert!(!f.is_floating());
        assert_eq!(f.format(&ScalarValue::Int64(1)), "  1");
        assert_eq!(f.format(&ScalarValue::Int64(-4444)), "-4444");
        Ok(())
    }

    #[test]
    fn bool_tokens() -> Result<(), FormatError> {
        let t = Tensor::from_shape_vec(vec![2], vec![true, false])?;
        let f = Formatter::new(&t, &PrintOptions::default())?;
        assert_eq!(f.width(), 5);
        assert_eq!(f.format(&ScalarValue::Bool(true)), " true");
        Ok(())
    }

    #[test]
    fn integral_floats() -> Result<(), FormatError> {
        let f = Formatter::new(&floats(vec![1.0, 22.0])?, &PrintOptions::default())?;
        assert!(f.int_mode());
        assert!(!f.sci_mode());
        assert_eq!(f.width(), 3);
        assert_eq!(f.format(&ScalarValue::Float64(1.0)), " 1.");
        assert_eq!(f.format(&ScalarValue::Float64(f64::INFINITY)), "inf");
        Ok(())
    }

    #[test]
    fn wide_range_goes_scientific() -> Result<(), FormatError> {
        let f = Formatter::new(&floats(vec![1.0, 2000.0])?, &PrintOptions::default())?;
        assert!(f.int_mode());
        assert!(f.sci_mode());
        assert_eq!(f.format(&ScalarValue::Float64(2000.0)), "2.0000e+03");

        let f = Formatter::new(&floats(vec![1.5e9])?, &PrintOptions::default())?;
        assert!(f.sci_mode());
        Ok(())
    }

    #[test]
    fn small_fractions_go_scientific() -> Result<(), FormatError> {
        let f = Formatter::new(&floats(vec![0.00005, 0.0001])?, &PrintOptions::default())?;
        assert!(!f.int_mode());
        assert!(f.sci_mode());
        assert_eq!(f.format(&ScalarValue::Float64(0.00005)), "5.0000e-05");
        Ok(())
    }

    #[test]
    fn fixed_point() -> Result<(), FormatError> {
        let t = floats(vec![0.5, -12.25, f64::NAN, 0.0])?;
        let f = Formatter::new(&t, &PrintOptions::default())?;
        assert!(!f.int_mode());
        assert!(!f.sci_mode());
        assert_eq!(f.width(), 8);
        assert_eq!(f.format(&ScalarValue::Float64(0.5)), "  0.5000");
        assert_eq!(f.format(&ScalarValue::Float64(f64::NAN)), "     nan");
        assert_eq!(f.format(&ScalarValue::Float64(0.0)), "  0.0000");
        Ok(())
    }

    #[test]
    fn override_applies_before_measuring() -> Result<(), FormatError> {
        let opts = PrintOptions {
            sci_mode: SciMode::Always,
            ..Default::default()
        };
        let f = Formatter::new(&floats(vec![1.0, 2.0])?, &opts)?;
        assert!(f.sci_mode());
        assert_eq!(f.width(), 10);

        let opts = PrintOptions {
            sci_mode: SciMode::Never,
            ..Default::default()
        };
        let f = Formatter::new(&floats(vec![1.0, 2000.0])?, &opts)?;
        assert!(!f.sci_mode());
        assert_eq!(f.format(&ScalarValue::Float64(1.0)), "   1.");
        Ok(())
    }

    #[test]
    fn degenerate_values_fall_back() -> Result<(), FormatError> {
        let zeros = Tensor::zeros(vec![3], DType::Float32);
        let f = Formatter::new(&zeros, &PrintOptions::default())?;
        assert!(f.int_mode());
        assert!(!f.sci_mode());
        assert_eq!(f.width(), 1);
        assert_eq!(f.format(&ScalarValue::Float32(0.0)), "0.");

        let f = Formatter::new(&floats(vec![f64::NAN, f64::NEG_INFINITY])?, &PrintOptions::default())?;
        assert_eq!(f.width(), 1);
        assert_eq!(f.format(&ScalarValue::Float64(f64::NAN)), "nan");
        assert_eq!(f.format(&ScalarValue::Float64(f64::NEG_INFINITY)), "-inf");

        let empty = floats(Vec::new())?;
        assert_eq!(Formatter::new(&empty, &PrintOptions::default())?.width(), 1);
        Ok(())
    }

    #[test]
    fn complex_input_is_rejected() -> Result<(), FormatError> {
        let t = Tensor::zeros(vec![1], DType::Complex128);
        assert_eq!(
            Formatter::new(&t, &PrintOptions::default()),
            Err(FormatError::ComplexInput)
        );
        Ok(())
    }
}
