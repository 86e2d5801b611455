//! Multiple-comparison correction and Bonferroni-corrected pairwise t-tests.

use crate::{StatsError, descriptive::mean, ttest};

/// Bonferroni-adjusts a family of p-values: `min(1, m · pᵢ)` for a family of size `m`.
///
/// An undefined (`NaN`) p-value stays undefined.
///
/// # Examples
///
/// ```
/// use groupstat_stats::correction::bonferroni;
///
/// let adjusted = bonferroni(&[0.01, 0.04, 0.5]);
/// assert!((adjusted[0] - 0.03).abs() < 1e-12);
/// assert!((adjusted[1] - 0.12).abs() < 1e-12);
/// assert_eq!(adjusted[2], 1.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn bonferroni(p_values: &[f64]) -> Vec<f64> {
    let family_size = p_values.len() as f64;
    p_values
        .iter()
        .map(|p| if p.is_nan() { *p } else { (p * family_size).min(1.0) })
        .collect()
}

/// One pairwise t-test after Bonferroni correction.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseComparison {
    /// Index of the first group.
    pub first: usize,
    /// Index of the second group.
    pub second: usize,
    /// The uncorrected t-test.
    ///
    /// Two constant groups with different means give an infinite statistic
    /// and a p-value of 0. Pairs whose t-test is undefined (equal constant
    /// groups, or fewer than three observations in the pair) carry `NaN` for
    /// both.
    pub test: ttest::TTestResult,
    /// Bonferroni-adjusted p-value.
    pub p_adjusted: f64,
    /// Whether the null hypothesis is rejected at the family-wise `alpha`.
    pub reject: bool,
}

/// Runs an independent t-test on every unordered pair of groups and corrects
/// all of their p-values together.
///
/// Pairs come out in index order: `(0, 1), (0, 2), …, (k-2, k-1)`, and every
/// pair is reported even when its own t-test is degenerate.
///
/// # Examples
///
/// ```
/// use groupstat_stats::correction::bonferroni_pairwise;
///
/// let groups: [&[f64]; 3] = [&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]];
/// let comparisons = bonferroni_pairwise(&groups, 0.05).unwrap();
/// assert_eq!(comparisons.len(), 3);
/// assert!(comparisons.iter().all(|c| c.p_adjusted >= c.test.p_value));
/// ```
pub fn bonferroni_pairwise(
    groups: &[&[f64]],
    alpha: f64,
) -> Result<Vec<PairwiseComparison>, StatsError> {
    if groups.len() < 2 {
        return Err(StatsError::TooFewGroups {
            test: "pairwise t-tests",
            needed: 2,
            actual: groups.len(),
        });
    }

    for (index, group) in groups.iter().enumerate() {
        if group.is_empty() {
            return Err(StatsError::EmptyGroup { index });
        }
    }

    let mut raw = Vec::new();
    for first in 0..groups.len() {
        for second in first + 1..groups.len() {
            let test = pairwise_t_test(groups[first], groups[second])?;
            raw.push((first, second, test));
        }
    }

    let p_values = raw.iter().map(|(_, _, t)| t.p_value).collect::<Vec<_>>();
    let adjusted = bonferroni(&p_values);
    Ok(raw
        .into_iter()
        .zip(adjusted)
        .map(|((first, second, test), p_adjusted)| PairwiseComparison {
            first,
            second,
            test,
            p_adjusted,
            reject: p_adjusted < alpha,
        })
        .collect())
}

/// Independent t-test that yields a result for degenerate pairs instead of failing.
#[expect(clippy::cast_precision_loss)]
fn pairwise_t_test(first: &[f64], second: &[f64]) -> Result<ttest::TTestResult, StatsError> {
    let df = (first.len() + second.len()) as f64 - 2.0;
    match ttest::independent(first, second) {
        Err(StatsError::ZeroVariance { .. }) => {
            let difference = mean(first) - mean(second);
            let (statistic, p_value) = if difference == 0.0 {
                (f64::NAN, f64::NAN)
            } else {
                (f64::INFINITY.copysign(difference), 0.0)
            };
            Ok(ttest::TTestResult {
                statistic,
                p_value,
                df,
            })
        }
        Err(StatsError::InsufficientData { .. }) => Ok(ttest::TTestResult {
            statistic: f64::NAN,
            p_value: f64::NAN,
            df,
        }),
        result => result,
    }
}
