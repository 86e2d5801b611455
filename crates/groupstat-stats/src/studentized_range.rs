//! The studentized range distribution.
//!
//! `Q = (max - min of k independent standard normals) / sqrt(χ²_ν / ν)`.
//! The CDF is evaluated by Gauss–Legendre quadrature over the range
//! distribution of the normals and the chi density (Copenhaver & Holland,
//! 1988). The quantile inverts the CDF with secant steps.
//!
//! # References
//!
//! Copenhaver, M. D. and Holland, B. S. (1988). "Computation of the
//! distribution of the maximum studentized range statistic with application
//! to multiple significance testing of simple effects". Journal of
//! Statistical Computation and Simulation, 30, 1–15.

use std::f64::consts::{LN_2, SQRT_2};

use statrs::function::{erf::erfc, gamma::ln_gamma};

use crate::StatsError;

/// Degrees of freedom above which the chi factor is treated as constant 1.
const LARGE_DF: f64 = 25_000.0;

// 12-point Gauss–Legendre nodes/weights (positive half).
const RANGE_NODES: [f64; 6] = [
    0.981_560_634_246_719_3,
    0.904_117_256_370_474_9,
    0.769_902_674_194_304_7,
    0.587_317_954_286_617_4,
    0.367_831_498_998_180_2,
    0.125_233_408_511_468_9,
];
const RANGE_WEIGHTS: [f64; 6] = [
    0.047_175_336_386_511_83,
    0.106_939_325_995_318_4,
    0.160_078_328_543_346_2,
    0.203_167_426_723_065_9,
    0.233_492_536_538_354_8,
    0.249_147_045_813_402_8,
];

// 16-point Gauss–Legendre nodes/weights (positive half).
const CHI_NODES: [f64; 8] = [
    0.989_400_934_991_649_9,
    0.944_575_023_073_232_6,
    0.865_631_202_387_831_7,
    0.755_404_408_355_003,
    0.617_876_244_402_643_7,
    0.458_016_777_657_227_4,
    0.281_603_550_779_258_9,
    0.095_012_509_837_637_44,
];
const CHI_WEIGHTS: [f64; 8] = [
    0.027_152_459_411_754_09,
    0.062_253_523_938_647_89,
    0.095_158_511_682_492_78,
    0.124_628_971_255_533_9,
    0.149_595_988_816_576_7,
    0.169_156_519_395_002_5,
    0.182_603_415_044_923_6,
    0.189_450_610_455_068_5,
];

fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Both halves of a symmetric Gauss–Legendre rule as (node, weight) pairs.
fn symmetric_rule<'a>(
    nodes: &'a [f64],
    weights: &'a [f64],
) -> impl Iterator<Item = (f64, f64)> + 'a {
    nodes
        .iter()
        .zip(weights)
        .flat_map(|(&x, &w)| [(-x, w), (x, w)])
}

/// `P(R < w)` for the range `R` of `groups` standard normal variables.
fn range_cdf(w: f64, groups: f64) -> f64 {
    const UPPER: f64 = 8.0;

    let half = w * 0.5;
    if half >= UPPER {
        return 1.0;
    }

    // First term of Hartley's form: (2Φ(w/2) - 1)^k.
    let central = 2.0 * normal_cdf(half) - 1.0;
    let mut total = if central >= (-50.0 / groups).exp() {
        central.powf(groups)
    } else {
        0.0
    };

    let intervals: u32 = if w > 3.0 { 2 } else { 3 };
    let step = (UPPER - half) / f64::from(intervals);
    let exponent = groups - 1.0;
    let cutoff = (-30.0 / exponent).exp();
    for i in 0..intervals {
        let lower = half + f64::from(i) * step;
        let center = lower + 0.5 * step;
        let radius = 0.5 * step;
        let mut interval_sum = 0.0;
        for (x, weight) in symmetric_rule(&RANGE_NODES, &RANGE_WEIGHTS) {
            let point = center + radius * x;
            let squared = point * point;
            if squared > 60.0 {
                continue;
            }
            let inner = normal_cdf(point) - normal_cdf(point - w);
            if inner >= cutoff {
                interval_sum += weight * (-0.5 * squared).exp() * inner.powf(exponent);
            }
        }
        total += interval_sum * (2.0 * radius * groups) / (2.0 * std::f64::consts::PI).sqrt();
    }

    if total <= (-30.0_f64).exp() {
        return 0.0;
    }
    total.min(1.0)
}

/// CDF of the studentized range: `P(Q < q)` for `groups` means and `df` error degrees of freedom.
///
/// # Examples
///
/// ```
/// use groupstat_stats::studentized_range;
///
/// // Tabulated 5% critical value for k = 3, ν = 10 is 3.877.
/// let p = studentized_range::cdf(3.877, 3, 10.0).unwrap();
/// assert!((p - 0.95).abs() < 1e-3);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn cdf(q: f64, groups: usize, df: f64) -> Result<f64, StatsError> {
    validate(groups, df)?;
    if q.is_nan() {
        return Err(StatsError::NonFinite);
    }
    if q <= 0.0 {
        return Ok(0.0);
    }
    if q.is_infinite() {
        return Ok(1.0);
    }

    let k = groups as f64;
    if df > LARGE_DF {
        return Ok(range_cdf(q, k));
    }

    let half_df = df * 0.5;
    let step: f64 = if df <= 100.0 {
        1.0
    } else if df <= 800.0 {
        0.5
    } else if df <= 5000.0 {
        0.25
    } else {
        0.125
    };
    let log_constant = half_df * df.ln() - df * LN_2 - ln_gamma(half_df) + step.ln();
    let power = half_df - 1.0;
    let quarter_df = df * 0.25;

    let mut total = 0.0;
    for i in 1..=50_u32 {
        let midpoint = f64::from(2 * i - 1) * step;
        let mut interval_sum = 0.0;
        for (x, weight) in symmetric_rule(&CHI_NODES, &CHI_WEIGHTS) {
            let u = midpoint + x * step;
            let log_density = log_constant + power * u.ln() - u * quarter_df;
            if log_density >= -30.0 {
                let range_prob = range_cdf(q * (u * 0.5).sqrt(), k);
                interval_sum += range_prob * weight * log_density.exp();
            }
        }
        if f64::from(i) * step >= 1.0 && interval_sum <= 1e-14 {
            break;
        }
        total += interval_sum;
    }

    Ok(total.min(1.0))
}

/// Quantile of the studentized range: the `q` with `cdf(q, groups, df) = p`.
///
/// # Examples
///
/// ```
/// use groupstat_stats::studentized_range;
///
/// let q = studentized_range::quantile(0.95, 3, 10.0).unwrap();
/// assert!((q - 3.877).abs() < 1e-2);
/// ```
pub fn quantile(p: f64, groups: usize, df: f64) -> Result<f64, StatsError> {
    const TOLERANCE: f64 = 1e-4;
    const MAX_ITER: usize = 50;

    validate(groups, df)?;
    if !(0.0..1.0).contains(&p) {
        return Err(StatsError::Distribution {
            reason: format!("probability {p} outside [0, 1)"),
        });
    }
    if p == 0.0 {
        return Ok(0.0);
    }

    let mut x0 = initial_quantile(p, groups, df);
    let mut f0 = cdf(x0, groups, df)? - p;
    let mut x1 = if f0 > 0.0 {
        (x0 - 1.0).max(0.0)
    } else {
        x0 + 1.0
    };
    let mut f1 = cdf(x1, groups, df)? - p;

    for _ in 1..MAX_ITER {
        if f1 == f0 {
            break;
        }
        let next = (x1 - f1 * (x1 - x0) / (f1 - f0)).max(0.0);
        x0 = x1;
        f0 = f1;
        x1 = next;
        f1 = cdf(x1, groups, df)? - p;
        if (x1 - x0).abs() < TOLERANCE {
            break;
        }
    }
    Ok(x1)
}

/// Starting point for the secant search (Odeh & Evans normal quantile,
/// scaled by an empirical fit in `groups` and `df`).
#[expect(clippy::cast_precision_loss)]
fn initial_quantile(p: f64, groups: usize, df: f64) -> f64 {
    const P: [f64; 5] = [
        0.322_232_421_088,
        -1.0,
        -0.342_242_088_547,
        -0.204_231_210_125,
        -0.453_642_210_148e-4,
    ];
    const Q: [f64; 5] = [
        0.993_484_626_060e-1,
        0.588_581_570_495,
        0.531_103_462_366,
        0.103_537_752_850,
        0.385_607_006_340e-2,
    ];
    const DF_MAX: f64 = 120.0;

    let tail = 0.5 - 0.5 * p;
    let y = (1.0 / (tail * tail)).ln().sqrt();
    let numerator = P.iter().rev().fold(0.0, |acc, c| acc * y + c);
    let denominator = Q.iter().rev().fold(0.0, |acc, c| acc * y + c);
    let mut t = y + numerator / denominator;
    if df < DF_MAX {
        t += (t * t * t + t) / df / 4.0;
    }
    let mut scale = 0.8832 - 0.2368 * t;
    if df < DF_MAX {
        scale += -1.214 / df + 1.208 * t / df;
    }
    t * (scale * (groups as f64 - 1.0).ln() + 1.4142)
}

fn validate(groups: usize, df: f64) -> Result<(), StatsError> {
    if groups < 2 {
        return Err(StatsError::TooFewGroups {
            test: "studentized range",
            needed: 2,
            actual: groups,
        });
    }
    if df.is_nan() || df < 2.0 {
        return Err(StatsError::Distribution {
            reason: format!("studentized range needs at least 2 degrees of freedom, got {df}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use statrs::distribution::{ContinuousCDF, StudentsT};

    use super::*;
    use crate::assert_close;

    #[test]
    fn test_two_groups_reduce_to_students_t() {
        // For k = 2, Q = √2·|T|.
        for df in [2.0, 5.0, 30.0] {
            let t = StudentsT::new(0.0, 1.0, df).unwrap();
            for q in [0.5, 1.5, 3.0, 6.0] {
                let expected = 2.0 * t.cdf(q / SQRT_2) - 1.0;
                // The quadrature is accurate to about 1e-5 at small q.
                assert_close(cdf(q, 2, df).unwrap(), expected, 1e-5);
            }
        }
    }

    #[test]
    fn test_tabulated_critical_values() {
        // 5% upper points of the studentized range.
        for (groups, df, q) in [(3, 10.0, 3.877), (4, 20.0, 3.958), (5, 60.0, 3.977)] {
            assert_close(cdf(q, groups, df).unwrap(), 0.95, 1e-3);
            assert_close(quantile(0.95, groups, df).unwrap(), q, 5e-3);
        }
    }

    #[test]
    fn test_cdf_is_monotonic() {
        let values = [0.5, 1.0, 2.0, 3.0, 4.0, 6.0]
            .map(|q| cdf(q, 4, 12.0).unwrap());
        assert!(values.is_sorted_by(|a, b| a <= b));
        assert!(values[0] > 0.0);
        assert!(values[5] < 1.0 + 1e-12);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(cdf(0.0, 3, 10.0).unwrap(), 0.0);
        assert_eq!(cdf(f64::INFINITY, 3, 10.0).unwrap(), 1.0);
        assert_eq!(quantile(0.0, 3, 10.0).unwrap(), 0.0);
        assert!(cdf(1.0, 1, 10.0).is_err());
        assert!(cdf(1.0, 3, 1.0).is_err());
        assert!(quantile(1.0, 3, 10.0).is_err());
    }
}
