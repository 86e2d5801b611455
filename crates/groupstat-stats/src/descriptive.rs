/// Descriptive statistics summarizing a sample.
///
/// Variance and standard deviation use the unbiased (`n - 1`) estimator, the
/// same one the t-tests and ANOVA are built on.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of observations.
    pub count: usize,
    /// The minimum value in the sample.
    pub min: f64,
    /// The maximum value in the sample.
    pub max: f64,
    /// The arithmetic mean of the sample.
    pub mean: f64,
    /// The sample variance (`n - 1` denominator); `NaN` for a single observation.
    pub variance: f64,
    /// The sample standard deviation; `NaN` for a single observation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from a sample.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the sample contains at least one value
    /// * `None` - if the sample is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use groupstat_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new(&[5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.variance, 2.5);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(values: &[f64]) -> Option<Self> {
        let count = values.len();
        if count == 0 {
            return None;
        }

        let n = count as f64;
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let mean = values.iter().sum::<f64>() / n;
        let variance = if count > 1 {
            sum_of_squares(values, mean) / (n - 1.0)
        } else {
            f64::NAN
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}

/// Arithmetic mean; `NaN` for an empty slice.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sum of squared deviations from `center`.
#[must_use]
pub fn sum_of_squares(values: &[f64], center: f64) -> f64 {
    values.iter().map(|v| (v - center).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        assert!(DescriptiveStats::new(&[]).is_none());
    }

    #[test]
    fn test_single_value_has_undefined_spread() {
        let stats = DescriptiveStats::new(&[42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 42.0);
        assert!(stats.variance.is_nan());
        assert!(stats.std_dev.is_nan());
    }

    #[test]
    fn test_sample_variance_uses_n_minus_one() {
        let stats = DescriptiveStats::new(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.mean, 2.5);
        crate::assert_close(stats.variance, 5.0 / 3.0, 1e-12);
        crate::assert_close(stats.std_dev, (5.0_f64 / 3.0).sqrt(), 1e-12);
    }

    #[test]
    fn test_sum_of_squares() {
        assert_eq!(sum_of_squares(&[1.0, 2.0, 3.0], 2.0), 2.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }
}
