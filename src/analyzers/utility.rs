/// Computes the arithmetic mean of a slice of values. Returns NaN for empty
/// input so that "no data" is never mistaken for a zero average.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Returns `(min, max)` of the values, or `None` for empty input.
pub fn extrema(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_extrema() {
        assert_eq!(extrema([3.0, -1.0, 2.5]), Some((-1.0, 3.0)));
        assert_eq!(extrema([7.0]), Some((7.0, 7.0)));
        assert_eq!(extrema(Vec::<f64>::new()), None);
    }
}
