//! Small numeric helpers shared by the analytics stages

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n, not n - 1)
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Least-squares slope of `values` against their index `0..n`.
///
/// Fewer than two points have no defined slope; a flat 0 is returned.
pub fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Percentage `part / whole * 100`, 0 when `whole` is 0
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_population_std_dev() {
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[5.0]), 0.0);
        assert_eq!(population_std_dev(&[0.0, 0.0, 0.0, 0.0]), 0.0);
        // population variance of [2,4,4,4,5,5,7,9] is exactly 4
        assert_abs_diff_eq!(
            population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]),
            2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_ols_slope() {
        assert_eq!(ols_slope(&[]), 0.0);
        assert_eq!(ols_slope(&[42.0]), 0.0);
        assert_abs_diff_eq!(ols_slope(&[1.0, 3.0, 5.0, 7.0]), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ols_slope(&[10.0, 10.0, 10.0]), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ols_slope(&[3.0, 1.0, 2.0]), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(3.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 4.0), 25.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(87.46, 1), 87.5);
        assert_eq!(round_to(-2.25, 0), -2.0);
        assert_eq!(round_to(1234.5, 0), 1235.0);
    }
}
