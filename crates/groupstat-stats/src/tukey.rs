//! Tukey's honestly significant difference test.
//!
//! Uses the Tukey–Kramer standard error so unequal group sizes are allowed.

use crate::{StatsError, anova::OneWayAnova, descriptive::mean, studentized_range};

/// One pairwise comparison in a Tukey HSD table.
#[derive(Debug, Clone, PartialEq)]
pub struct TukeyComparison {
    /// Index of the first group.
    pub first: usize,
    /// Index of the second group.
    pub second: usize,
    /// `mean(second) - mean(first)`.
    pub mean_difference: f64,
    /// Family-wise adjusted p-value.
    pub p_adjusted: f64,
    /// Lower confidence bound of the mean difference.
    pub lower: f64,
    /// Upper confidence bound of the mean difference.
    pub upper: f64,
    /// Whether the null hypothesis of equal means is rejected at `alpha`.
    pub reject: bool,
}

/// Tukey HSD over all pairs of groups.
#[derive(Debug, Clone, PartialEq)]
pub struct TukeyHsd {
    /// Family-wise error rate the table was computed at.
    pub alpha: f64,
    /// Error degrees of freedom (`N - k`).
    pub df: f64,
    /// Pooled within-group variance.
    pub mean_square_error: f64,
    /// Critical value of the studentized range at `1 - alpha`.
    pub critical_q: f64,
    /// Comparisons for every pair `first < second`, in index order.
    pub comparisons: Vec<TukeyComparison>,
}

impl TukeyHsd {
    /// Runs Tukey HSD on `groups` at family-wise error rate `alpha`.
    ///
    /// # Examples
    ///
    /// ```
    /// use groupstat_stats::tukey::TukeyHsd;
    ///
    /// let groups: [&[f64]; 3] = [&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]];
    /// let hsd = TukeyHsd::new(&groups, 0.05).unwrap();
    /// assert_eq!(hsd.comparisons.len(), 3);
    /// assert_eq!(hsd.comparisons[0].mean_difference, 3.0);
    /// assert!(hsd.comparisons[1].reject);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn new(groups: &[&[f64]], alpha: f64) -> Result<Self, StatsError> {
        let anova = OneWayAnova::new(groups)?;
        let df = anova.df_within;
        let mean_square_error = anova.mean_square_within();
        let critical_q = studentized_range::quantile(1.0 - alpha, groups.len(), df)?;
        let means = groups.iter().map(|g| mean(g)).collect::<Vec<_>>();

        let mut comparisons = Vec::new();
        for first in 0..groups.len() {
            for second in first + 1..groups.len() {
                let (n1, n2) = (groups[first].len() as f64, groups[second].len() as f64);
                let mean_difference = means[second] - means[first];
                let standard_error = (mean_square_error / 2.0 * (1.0 / n1 + 1.0 / n2)).sqrt();
                let q = mean_difference.abs() / standard_error;
                let p_adjusted =
                    (1.0 - studentized_range::cdf(q, groups.len(), df)?).clamp(0.0, 1.0);
                let margin = critical_q * standard_error;
                comparisons.push(TukeyComparison {
                    first,
                    second,
                    mean_difference,
                    p_adjusted,
                    lower: mean_difference - margin,
                    upper: mean_difference + margin,
                    reject: p_adjusted < alpha,
                });
            }
        }

        Ok(Self {
            alpha,
            df,
            mean_square_error,
            critical_q,
            comparisons,
        })
    }
}
