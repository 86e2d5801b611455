//! One-way analysis of variance.

use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::{
    StatsError,
    descriptive::{mean, sum_of_squares},
    ttest::check_finite,
};

/// Result of a one-way ANOVA.
#[derive(Debug, Clone, PartialEq)]
pub struct OneWayAnova {
    /// F statistic (`MS_between / MS_within`).
    pub f_statistic: f64,
    /// Upper-tail p-value of the F distribution.
    pub p_value: f64,
    /// Between-group degrees of freedom (`k - 1`).
    pub df_between: f64,
    /// Within-group degrees of freedom (`N - k`).
    pub df_within: f64,
    /// Between-group sum of squares.
    pub ss_between: f64,
    /// Within-group sum of squares.
    pub ss_within: f64,
}

impl OneWayAnova {
    /// Tests H₀: all group means are equal.
    ///
    /// Needs at least two groups, no empty group, and more observations
    /// than groups.
    ///
    /// # Examples
    ///
    /// ```
    /// use groupstat_stats::anova::OneWayAnova;
    ///
    /// let groups: [&[f64]; 3] = [
    ///     &[5.0, 6.0, 7.0, 5.5, 6.5],
    ///     &[8.0, 9.0, 8.5, 9.5, 8.0],
    ///     &[4.0, 3.0, 3.5, 4.5, 4.0],
    /// ];
    /// let anova = OneWayAnova::new(&groups).unwrap();
    /// assert!(anova.p_value < 0.01);
    /// assert_eq!(anova.df_between, 2.0);
    /// assert_eq!(anova.df_within, 12.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn new(groups: &[&[f64]]) -> Result<Self, StatsError> {
        const TEST: &str = "one-way ANOVA";

        if groups.len() < 2 {
            return Err(StatsError::TooFewGroups {
                test: TEST,
                needed: 2,
                actual: groups.len(),
            });
        }
        for (index, group) in groups.iter().enumerate() {
            if group.is_empty() {
                return Err(StatsError::EmptyGroup { index });
            }
            check_finite(group)?;
        }

        let total = groups.iter().map(|g| g.len()).sum::<usize>();
        if total <= groups.len() {
            return Err(StatsError::InsufficientData {
                test: TEST,
                needed: groups.len() + 1,
                actual: total,
            });
        }

        let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / total as f64;
        let (ss_between, ss_within) =
            groups
                .iter()
                .fold((0.0, 0.0), |(between, within), group| {
                    let group_mean = mean(group);
                    (
                        between + group.len() as f64 * (group_mean - grand_mean).powi(2),
                        within + sum_of_squares(group, group_mean),
                    )
                });
        if ss_within == 0.0 {
            return Err(StatsError::ZeroVariance { test: TEST });
        }

        let df_between = (groups.len() - 1) as f64;
        let df_within = (total - groups.len()) as f64;
        let f_statistic = (ss_between / df_between) / (ss_within / df_within);
        let dist = FisherSnedecor::new(df_between, df_within).map_err(|e| {
            StatsError::Distribution {
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            f_statistic,
            p_value: dist.sf(f_statistic),
            df_between,
            df_within,
            ss_between,
            ss_within,
        })
    }

    /// Within-group mean square, the pooled error variance.
    #[must_use]
    pub fn mean_square_within(&self) -> f64 {
        self.ss_within / self.df_within
    }
}
