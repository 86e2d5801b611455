//! Console formatting of loads, summaries and test results.
//!
//! Everything here writes to a caller-supplied [`Write`] sink and performs no
//! computation beyond descriptive summaries.

use std::{fmt, io::Write};

use groupstat_data::{cell::GroupLabel, dataset::Dataset};
use groupstat_stats::{
    anova::OneWayAnova, correction::PairwiseComparison, descriptive::DescriptiveStats,
    ttest::TTestResult, tukey::TukeyHsd,
};

const LABEL_WIDTH: usize = 20;

pub(crate) fn write_no_file_selected<W>(out: &mut W) -> anyhow::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(out, "No file selected. Exiting.")?;
    Ok(())
}

pub(crate) fn write_load_summary<W>(
    out: &mut W,
    file_name: &str,
    dataset: &Dataset,
) -> anyhow::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(
        out,
        "Loaded {file_name} with {} rows and {} columns.",
        dataset.row_count(),
        dataset.column_count()
    )?;
    Ok(())
}

/// Prints label, n, mean and standard deviation of each sample.
pub(crate) fn write_sample_summaries<W, L>(
    out: &mut W,
    samples: &[(L, &[f64])],
) -> anyhow::Result<()>
where
    W: Write + ?Sized,
    L: fmt::Display,
{
    writeln!(
        out,
        "{:<LABEL_WIDTH$} {:>6} {:>10} {:>10}",
        "Group", "n", "Mean", "Std Dev"
    )?;
    for (label, values) in samples {
        let label = label.to_string();
        match DescriptiveStats::new(values) {
            Some(stats) => writeln!(
                out,
                "{label:<LABEL_WIDTH$} {:>6} {:>10.4} {:>10.4}",
                stats.count, stats.mean, stats.std_dev
            )?,
            None => writeln!(out, "{label:<LABEL_WIDTH$} {:>6} {:>10} {:>10}", 0, "-", "-")?,
        }
    }
    Ok(())
}

pub(crate) fn write_t_test<W>(out: &mut W, result: &TTestResult) -> anyhow::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(
        out,
        "T-test results: t={:.4}, p={:.4} (df={})",
        result.statistic, result.p_value, result.df
    )?;
    Ok(())
}

pub(crate) fn write_anova<W>(out: &mut W, anova: &OneWayAnova) -> anyhow::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(
        out,
        "ANOVA results: F={:.4}, p={:.4} (df={}, {})",
        anova.f_statistic, anova.p_value, anova.df_between, anova.df_within
    )?;
    Ok(())
}

/// Prints the Tukey HSD summary table; `labels` are indexed like the groups.
pub(crate) fn write_tukey<W>(
    out: &mut W,
    hsd: &TukeyHsd,
    labels: &[GroupLabel],
) -> anyhow::Result<()>
where
    W: Write + ?Sized,
{
    let header = format!(
        "{:<12} {:<12} {:>9} {:>7} {:>9} {:>9} {:>6}",
        "group1", "group2", "meandiff", "p-adj", "lower", "upper", "reject"
    );
    let rule_width = header.len();
    writeln!(out, "Multiple Comparison of Means - Tukey HSD, FWER={:.2}", hsd.alpha)?;
    writeln!(out, "{}", "=".repeat(rule_width))?;
    writeln!(out, "{header}")?;
    writeln!(out, "{}", "-".repeat(rule_width))?;
    for c in &hsd.comparisons {
        writeln!(
            out,
            "{:<12} {:<12} {:>9.4} {:>7.4} {:>9.4} {:>9.4} {:>6}",
            labels[c.first].to_string(),
            labels[c.second].to_string(),
            c.mean_difference,
            c.p_adjusted,
            c.lower,
            c.upper,
            c.reject
        )?;
    }
    writeln!(out, "{}", "-".repeat(rule_width))?;
    Ok(())
}

/// Prints one line per pair of Bonferroni-corrected comparisons.
pub(crate) fn write_bonferroni<W>(
    out: &mut W,
    comparisons: &[PairwiseComparison],
    labels: &[GroupLabel],
) -> anyhow::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(out, "Bonferroni-corrected pairwise t-tests:")?;
    for c in comparisons {
        writeln!(
            out,
            "{} vs {}: p={:.4}, adjusted p={:.4}, reject null: {}",
            labels[c.first],
            labels[c.second],
            c.test.p_value,
            c.p_adjusted,
            if c.reject { "yes" } else { "no" }
        )?;
    }
    Ok(())
}

pub(crate) fn write_warning<W>(out: &mut W, message: impl fmt::Display) -> anyhow::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(out, "Warning: {message}")?;
    Ok(())
}

pub(crate) fn write_error<W>(out: &mut W, message: impl fmt::Display) -> anyhow::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(out, "Error: {message}")?;
    Ok(())
}
