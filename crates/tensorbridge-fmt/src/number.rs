use tensorbridge_tensor::ScalarValue;

/// The token printed for NaN and the infinities, `None` for finite values.
pub fn non_finite_token(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("nan")
    } else if value == f64::INFINITY {
        Some("inf")
    } else if value == f64::NEG_INFINITY {
        Some("-inf")
    } else {
        None
    }
}

/// Fixed point with `precision` decimals, like `%.<precision>f`.
pub fn format_fixed(value: f64, precision: usize) -> String {
    match non_finite_token(value) {
        Some(token) => token.to_string(),
        None => format!("{value:.precision$}"),
    }
}

/// Scientific notation like `%.<precision>e`: a signed exponent of at least two digits.
///
/// ```rust
/// use tensorbridge_fmt::number::format_scientific;
///
/// assert_eq!(format_scientific(2000.0, 4), "2.0000e+03");
/// assert_eq!(format_scientific(-1.5e-7, 2), "-1.50e-07");
/// ```
pub fn format_scientific(value: f64, precision: usize) -> String {
    if let Some(token) = non_finite_token(value) {
        return token.to_string();
    }
    let formatted = format!("{value:.precision$e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

/// Decimal text of an integer or bool value.
pub fn format_integer(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Bool(b) => b.to_string(),
        other => other.to_i64().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed() {
        assert_eq!(format_fixed(1.0, 4), "1.0000");
        assert_eq!(format_fixed(-0.5, 1), "-0.5");
        assert_eq!(format_fixed(22.0, 0), "22");
        assert_eq!(format_fixed(f64::NAN, 4), "nan");
        assert_eq!(format_fixed(f64::NEG_INFINITY, 4), "-inf");
    }

    #[test]
    fn scientific() {
        assert_eq!(format_scientific(1.0, 4), "1.0000e+00");
        assert_eq!(format_scientific(0.0, 4), "0.0000e+00");
        assert_eq!(format_scientific(1e-5, 4), "1.0000e-05");
        assert_eq!(format_scientific(1e300, 1), "1.0e+300");
        assert_eq!(format_scientific(123456.0, 0), "1e+05");
        assert_eq!(format_scientific(f64::INFINITY, 4), "inf");
    }

    #[test]
    fn integers() {
        assert_eq!(format_integer(&ScalarValue::Int8(-128)), "-128");
        assert_eq!(format_integer(&ScalarValue::UInt8(255)), "255");
        assert_eq!(format_integer(&ScalarValue::Bool(true)), "true");
    }
}
