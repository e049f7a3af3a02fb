/// Turns free-form field text into the number the calculator sees.
///
/// Never fails: empty, unparsable, non-finite and negative input all become 0.
pub fn coerce_numeric(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let parsed = match trimmed.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            tracing::trace!(input = %trimmed, "non-numeric field input coerced to zero");
            return 0.0;
        }
    };

    sanitize(parsed)
}

/// Applies the same clamping to values that arrive already numeric, e.g. from a scenario file.
pub fn sanitize(value: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        return 0.0;
    }
    // Collapses -0.0 as well.
    value + 0.0
}

#[cfg(test)]
mod tests {
    use super::{coerce_numeric, sanitize};

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(coerce_numeric("1260"), 1260.0);
        assert_eq!(coerce_numeric(" 12.5 "), 12.5);
        assert_eq!(coerce_numeric(".5"), 0.5);
        assert_eq!(coerce_numeric("1e3"), 1000.0);
    }

    #[test]
    fn coerces_garbage_to_zero() {
        assert_eq!(coerce_numeric(""), 0.0);
        assert_eq!(coerce_numeric("   "), 0.0);
        assert_eq!(coerce_numeric("abc"), 0.0);
        assert_eq!(coerce_numeric("12abc"), 0.0);
        assert_eq!(coerce_numeric("$100"), 0.0);
    }

    #[test]
    fn coerces_negative_and_non_finite_to_zero() {
        assert_eq!(coerce_numeric("-5"), 0.0);
        assert_eq!(coerce_numeric("inf"), 0.0);
        assert_eq!(coerce_numeric("NaN"), 0.0);
        assert_eq!(sanitize(f64::NEG_INFINITY), 0.0);
        assert!(sanitize(-0.0).is_sign_positive());
    }
}
