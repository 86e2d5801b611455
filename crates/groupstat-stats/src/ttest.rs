//! Student's t-tests.
//!
//! All tests are two-sided. The independent test assumes equal population
//! variances and pools them.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::{
    StatsError,
    descriptive::{mean, sum_of_squares},
};

/// Outcome of a t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTestResult {
    /// The t statistic.
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Degrees of freedom.
    pub df: f64,
}

/// Two-sample t-test with pooled variance: H₀: μ₁ = μ₂.
///
/// `t = (x̄₁ - x̄₂) / sqrt(s²ₚ (1/n₁ + 1/n₂))`, `df = n₁ + n₂ - 2`.
///
/// # Examples
///
/// ```
/// use groupstat_stats::ttest;
///
/// let a = [5.1, 4.9, 5.2, 5.0, 4.8];
/// let b = [7.1, 6.9, 7.2, 7.0, 6.8];
/// let result = ttest::independent(&a, &b).unwrap();
/// assert!(result.statistic < 0.0);
/// assert!(result.p_value < 0.01);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn independent(first: &[f64], second: &[f64]) -> Result<TTestResult, StatsError> {
    const TEST: &str = "independent t-test";

    check_finite(first)?;
    check_finite(second)?;
    for (index, sample) in [first, second].into_iter().enumerate() {
        if sample.is_empty() {
            return Err(StatsError::EmptyGroup { index });
        }
    }
    let total = first.len() + second.len();
    if total < 3 {
        return Err(StatsError::InsufficientData {
            test: TEST,
            needed: 3,
            actual: total,
        });
    }

    let (n1, n2) = (first.len() as f64, second.len() as f64);
    let (mean1, mean2) = (mean(first), mean(second));
    let df = n1 + n2 - 2.0;
    let pooled_variance =
        (sum_of_squares(first, mean1) + sum_of_squares(second, mean2)) / df;
    let standard_error = (pooled_variance * (1.0 / n1 + 1.0 / n2)).sqrt();
    if standard_error == 0.0 {
        return Err(StatsError::ZeroVariance { test: TEST });
    }

    let statistic = (mean1 - mean2) / standard_error;
    Ok(TTestResult {
        statistic,
        p_value: two_sided_p_value(statistic, df)?,
        df,
    })
}

/// Paired t-test: H₀: the mean of `first[i] - second[i]` is zero.
///
/// # Examples
///
/// ```
/// use groupstat_stats::ttest;
///
/// let before = [5.0, 6.0, 7.0, 8.0, 9.0];
/// let after = [5.5, 6.2, 7.1, 8.3, 9.4];
/// let result = ttest::paired(&before, &after).unwrap();
/// assert!(result.statistic < 0.0);
/// ```
pub fn paired(first: &[f64], second: &[f64]) -> Result<TTestResult, StatsError> {
    if first.len() != second.len() {
        return Err(StatsError::LengthMismatch {
            first: first.len(),
            second: second.len(),
        });
    }
    let differences = first
        .iter()
        .zip(second)
        .map(|(a, b)| a - b)
        .collect::<Vec<_>>();
    location_test("paired t-test", &differences, 0.0)
}

/// One-sample t-test: H₀: μ = `population_mean`.
///
/// `t = (x̄ - μ₀) / (s / √n)`, `df = n - 1`.
///
/// # Examples
///
/// ```
/// use groupstat_stats::ttest;
///
/// let result = ttest::one_sample(&[2.0, 4.0, 6.0, 8.0, 10.0], 6.0).unwrap();
/// assert_eq!(result.statistic, 0.0);
/// assert!((result.p_value - 1.0).abs() < 1e-12);
/// ```
pub fn one_sample(sample: &[f64], population_mean: f64) -> Result<TTestResult, StatsError> {
    if !population_mean.is_finite() {
        return Err(StatsError::NonFinite);
    }
    location_test("one-sample t-test", sample, population_mean)
}

#[expect(clippy::cast_precision_loss)]
fn location_test(
    test: &'static str,
    sample: &[f64],
    population_mean: f64,
) -> Result<TTestResult, StatsError> {
    check_finite(sample)?;
    if sample.len() < 2 {
        return Err(StatsError::InsufficientData {
            test,
            needed: 2,
            actual: sample.len(),
        });
    }

    let n = sample.len() as f64;
    let sample_mean = mean(sample);
    let df = n - 1.0;
    let standard_error = (sum_of_squares(sample, sample_mean) / df / n).sqrt();
    if standard_error == 0.0 {
        return Err(StatsError::ZeroVariance { test });
    }

    let statistic = (sample_mean - population_mean) / standard_error;
    Ok(TTestResult {
        statistic,
        p_value: two_sided_p_value(statistic, df)?,
        df,
    })
}

/// Two-sided tail probability `P(|T| >= |t|)` of Student's t with `df` degrees of freedom.
pub fn two_sided_p_value(statistic: f64, df: f64) -> Result<f64, StatsError> {
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution {
        reason: e.to_string(),
    })?;
    Ok((2.0 * dist.sf(statistic.abs())).min(1.0))
}

pub(crate) fn check_finite(values: &[f64]) -> Result<(), StatsError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(StatsError::NonFinite)
    }
}
