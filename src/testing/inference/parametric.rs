//! Parametric two-sample tests: Welch's unequal-variance t-test and the paired t-test.
//!
//! Both tests report a two-tailed p-value and a confidence interval for the mean
//! difference. Degenerate inputs are not rejected: non-finite statistics flow
//! through to the result so that callers decide how to present them.

use crate::testing::distributions::{student_t_cdf, student_t_inv};
use crate::testing::{AnalysisConfig, PairedTTestResult, TTestResult};
use log::debug;

/// Welch's t-test from summary statistics of two independent samples.
///
/// # Arguments
///
/// * `mean1`, `sd1`, `n1` - Mean, sample standard deviation and size of the first sample
/// * `mean2`, `sd2`, `n2` - Mean, sample standard deviation and size of the second sample
///
/// # Returns
///
/// Always a `TTestResult`; `n <= 1` or `sd <= 0` propagate as non-finite values.
pub fn welch(mean1: f64, sd1: f64, n1: f64, mean2: f64, sd2: f64, n2: f64) -> TTestResult {
    welch_with_config(mean1, sd1, n1, mean2, sd2, n2, &AnalysisConfig::default())
}

/// [`welch`] with an explicit confidence level.
pub fn welch_with_config(
    mean1: f64,
    sd1: f64,
    n1: f64,
    mean2: f64,
    sd2: f64,
    n2: f64,
    config: &AnalysisConfig,
) -> TTestResult {
    let v1 = sd1 * sd1;
    let v2 = sd2 * sd2;
    let diff = mean1 - mean2;

    let term1 = v1 / n1;
    let term2 = v2 / n2;
    let se = (term1 + term2).sqrt();
    let t = diff / se;

    // Welch-Satterthwaite equation for degrees of freedom
    let df = (term1 + term2).powi(2) / (term1.powi(2) / (n1 - 1.0) + term2.powi(2) / (n2 - 1.0));

    finish_t_test(t, df, diff, se, config)
}

/// Paired t-test on matched observations `a[i]` / `b[i]`.
///
/// Returns `None` when the samples are empty or of different lengths. A zero
/// standard error (all differences identical) yields `t = 0`.
pub fn paired_t_test(a: &[f64], b: &[f64]) -> Option<PairedTTestResult> {
    paired_t_test_with_config(a, b, &AnalysisConfig::default())
}

/// [`paired_t_test`] with an explicit confidence level.
pub fn paired_t_test_with_config(
    a: &[f64],
    b: &[f64],
    config: &AnalysisConfig,
) -> Option<PairedTTestResult> {
    let n = a.len();
    if n == 0 || n != b.len() {
        debug!("paired t-test rejected: sample sizes {} and {}", a.len(), b.len());
        return None;
    }

    let diffs: Vec<f64> = a.iter().zip(b).map(|(x, y)| x - y).collect();
    let n_f = n as f64;
    let mean_diff = diffs.iter().sum::<f64>() / n_f;
    let variance = diffs.iter().map(|d| (d - mean_diff).powi(2)).sum::<f64>() / (n_f - 1.0);
    let sd_diff = variance.sqrt();
    let se = sd_diff / n_f.sqrt();

    let t = if se == 0.0 { 0.0 } else { mean_diff / se };
    let df = n_f - 1.0;

    Some(PairedTTestResult {
        test: finish_t_test(t, df, mean_diff, se, config),
        mean_diff,
        sd_diff,
        n,
    })
}

fn finish_t_test(t: f64, df: f64, diff: f64, se: f64, config: &AnalysisConfig) -> TTestResult {
    let p = two_tailed_p_value(t, df);
    let t_critical = if df.is_finite() && df > 0.0 {
        student_t_inv(config.critical_quantile(), df)
    } else {
        f64::NAN
    };
    let margin = t_critical * se;

    TTestResult {
        t,
        df,
        p,
        ci_low: diff - margin,
        ci_high: diff + margin,
    }
}

#[inline]
fn two_tailed_p_value(t: f64, df: f64) -> f64 {
    if !t.is_finite() || !df.is_finite() || df <= 0.0 {
        return f64::NAN;
    }
    let cdf = student_t_cdf(t.abs(), df);
    if cdf.is_nan() {
        return f64::NAN;
    }
    (2.0 * (1.0 - cdf)).clamp(0.0, 1.0)
}
