//! Summary statistics shared by replicate reduction and fit diagnostics.

/// Arithmetic mean. Returns `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n-1 denominator).
///
/// Returns `None` for fewer than 2 values, where spread is undefined.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Coefficient of determination: `1 - Σ(y - ŷ)² / Σ(y - ȳ)²`.
///
/// Residuals are squared before summing. Returns `None` when the observations
/// carry no variance (the statistic is undefined, not 1.0).
pub fn r_squared(observed: &[f64], fitted: &[f64]) -> Option<f64> {
    debug_assert_eq!(observed.len(), fitted.len());
    let y_bar = mean(observed)?;

    let mut rss = 0.0;
    let mut tss = 0.0;
    for (y, y_hat) in observed.iter().zip(fitted.iter()) {
        rss += (y - y_hat) * (y - y_hat);
        tss += (y - y_bar) * (y - y_bar);
    }

    if tss <= 0.0 || !tss.is_finite() {
        return None;
    }
    Some(1.0 - rss / tss)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std_basics() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values).unwrap() - 5.0).abs() < 1e-12);
        // Sample std of this classic series is sqrt(32/7).
        let expected = (32.0f64 / 7.0).sqrt();
        assert!((sample_std(&values).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn std_undefined_for_single_value() {
        assert!(sample_std(&[3.0]).is_none());
    }

    #[test]
    fn r_squared_is_one_for_exact_fit() {
        let y = [1.0, 2.0, 3.0];
        assert!((r_squared(&y, &y).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn r_squared_is_zero_for_mean_prediction() {
        let y = [1.0, 2.0, 3.0];
        let fitted = [2.0, 2.0, 2.0];
        assert!(r_squared(&y, &fitted).unwrap().abs() < 1e-12);
    }

    #[test]
    fn r_squared_undefined_without_variance() {
        let y = [2.0, 2.0, 2.0];
        assert!(r_squared(&y, &y).is_none());
    }
}
