//! Classical hypothesis tests for grouped samples.
//!
//! This crate provides the numerical side of `groupstat`:
//!
//! - **Descriptive statistics**: sample size, mean, sample variance, standard deviation
//! - **t-tests**: independent (pooled variance), paired, and one-sample Student's t-tests
//! - **One-way ANOVA**: F-test across any number of groups
//! - **Post-hoc procedures**: Tukey HSD and Bonferroni-corrected pairwise t-tests
//!
//! Tail probabilities of the t and F distributions come from [`statrs`]. The
//! studentized range distribution needed by Tukey HSD is computed in
//! [`studentized_range`].
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing a sample
//! - [`ttest`]: Student's t-tests
//! - [`anova`]: One-way analysis of variance
//! - [`studentized_range`]: CDF and quantile of the studentized range distribution
//! - [`tukey`]: Tukey's honestly significant difference test
//! - [`correction`]: Multiple-comparison correction and pairwise t-tests
//!
//! # Examples
//!
//! ## Comparing two groups
//!
//! ```
//! use groupstat_stats::ttest;
//!
//! let result = ttest::independent(&[1.0, 2.0], &[3.0, 4.0]).unwrap();
//! assert!((result.statistic - (-2.828_427)).abs() < 1e-6);
//! assert_eq!(result.df, 2.0);
//! ```
//!
//! ## Comparing many groups
//!
//! ```
//! use groupstat_stats::anova::OneWayAnova;
//!
//! let groups: [&[f64]; 3] = [&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]];
//! let anova = OneWayAnova::new(&groups).unwrap();
//! assert!((anova.f_statistic - 27.0).abs() < 1e-9);
//! assert!(anova.p_value < 0.05);
//! ```

pub mod anova;
pub mod correction;
pub mod descriptive;
pub mod studentized_range;
pub mod ttest;
pub mod tukey;

/// Errors raised when a test's preconditions are not met by the data.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    #[display("{test} needs at least {needed} observations, got {actual}")]
    InsufficientData {
        test: &'static str,
        needed: usize,
        actual: usize,
    },
    #[display("{test} needs at least {needed} groups, got {actual}")]
    TooFewGroups {
        test: &'static str,
        needed: usize,
        actual: usize,
    },
    #[display("group {index} has no observations")]
    EmptyGroup { index: usize },
    #[display("paired samples differ in length ({first} vs {second})")]
    LengthMismatch { first: usize, second: usize },
    #[display("{test} is undefined when the samples have zero variance")]
    ZeroVariance { test: &'static str },
    #[display("non-finite value in sample")]
    NonFinite,
    #[display("invalid distribution parameters: {reason}")]
    Distribution { reason: String },
}

#[cfg(test)]
pub(crate) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual} (tolerance {tolerance})"
    );
}
