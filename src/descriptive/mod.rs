//! Descriptive statistics for a single sample.
//!
//! - [`describe`]: central tendency and dispersion summary
//! - [`summarize`]: mean, sample standard deviation and size, as used by the
//!   two-sample and k-sample calculators

use crate::format::number_label;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Most frequent value(s) of a sample.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// No data
    Empty,
    /// No value repeats, or every value is equally frequent
    NoMode,
    /// The modal values, ascending
    Values(Vec<f64>),
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Empty => f.write_str("-"),
            Mode::NoMode => f.write_str("No"),
            Mode::Values(values) => {
                let labels: Vec<String> = values.iter().map(|&v| number_label(v)).collect();
                f.write_str(&labels.join(", "))
            }
        }
    }
}

impl Serialize for Mode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: Mode,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    /// Quartile deviation, `iqr / 2`
    pub qd: f64,
    pub variance: f64,
    pub std_dev: f64,
    /// Mean absolute deviation around the mean
    pub mad: f64,
}

impl DescriptiveStats {
    fn empty() -> Self {
        DescriptiveStats {
            count: 0,
            mean: 0.0,
            median: 0.0,
            mode: Mode::Empty,
            min: 0.0,
            max: 0.0,
            range: 0.0,
            q1: 0.0,
            q3: 0.0,
            iqr: 0.0,
            qd: 0.0,
            variance: 0.0,
            std_dev: 0.0,
            mad: 0.0,
        }
    }
}

/// Summarize a sample. `is_population` selects the `n` variance denominator,
/// otherwise `max(1, n - 1)` is used.
///
/// Empty input gives an all-zero record with mode [`Mode::Empty`].
pub fn describe(numbers: &[f64], is_population: bool) -> DescriptiveStats {
    if numbers.is_empty() {
        return DescriptiveStats::empty();
    }

    let n = numbers.len();
    let n_f = n as f64;
    let mut sorted = numbers.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mean = sorted.iter().sum::<f64>() / n_f;

    let mid = n / 2;
    let median = if n % 2 != 0 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    };

    let min = sorted[0];
    let max = sorted[n - 1];

    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;

    let denominator = if is_population {
        n_f
    } else {
        (n_f - 1.0).max(1.0)
    };
    let variance = numbers.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / denominator;
    let mad = numbers.iter().map(|x| (x - mean).abs()).sum::<f64>() / n_f;

    DescriptiveStats {
        count: n,
        mean,
        median,
        mode: mode(numbers),
        min,
        max,
        range: max - min,
        q1,
        q3,
        iqr,
        qd: iqr / 2.0,
        variance,
        std_dev: variance.sqrt(),
        mad,
    }
}

/// Linear interpolation between the order statistics around `(n - 1) * q`.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let base = pos.floor() as usize;
    let rest = pos - base as f64;
    match sorted.get(base + 1) {
        Some(&next) => sorted[base] + rest * (next - sorted[base]),
        None => sorted[base],
    }
}

/// Values are grouped after rounding to 8 decimal places.
fn mode(numbers: &[f64]) -> Mode {
    let mut rounded: Vec<f64> = numbers
        .iter()
        .map(|&x| (x * 1e8 + 0.5).floor() / 1e8 + 0.0)
        .collect();
    rounded.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut groups: Vec<(f64, usize)> = Vec::new();
    for value in rounded {
        match groups.last_mut() {
            Some((last, count)) if *last == value => *count += 1,
            _ => groups.push((value, 1)),
        }
    }

    let max_count = groups.iter().map(|&(_, c)| c).max().unwrap_or(0);
    if max_count <= 1 {
        return Mode::NoMode;
    }

    let modes: Vec<f64> = groups
        .into_iter()
        .filter(|&(_, c)| c == max_count)
        .map(|(v, _)| v)
        .collect();

    if modes.len() == numbers.len() {
        Mode::NoMode
    } else {
        Mode::Values(modes)
    }
}

/// Mean, sample standard deviation and size of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleSummary {
    pub mean: f64,
    /// `NaN` for a single observation
    pub sd: f64,
    pub n: usize,
}

/// `None` for an empty sample.
pub fn summarize(numbers: &[f64]) -> Option<SampleSummary> {
    let n = numbers.len();
    if n == 0 {
        return None;
    }

    let mean = numbers.iter().sum::<f64>() / n as f64;
    if n == 1 {
        return Some(SampleSummary {
            mean,
            sd: f64::NAN,
            n,
        });
    }

    let variance = numbers.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(SampleSummary {
        mean,
        sd: variance.sqrt(),
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_constant_sample() {
        let stats = describe(&[3.0, 3.0, 3.0, 3.0], true);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.mode.to_string(), "3");
        assert_eq!(stats.min, 3.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.range, 0.0);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_varied_population() {
        let stats = describe(&[10.0, 2.0, 38.0, 23.0, 38.0, 23.0, 21.0], true);
        assert_eq!(stats.count, 7);
        assert_abs_diff_eq!(stats.mean, 22.142857, epsilon = 1e-4);
        assert_eq!(stats.median, 23.0);
        assert_eq!(stats.mode, Mode::Values(vec![23.0, 38.0]));
        assert_eq!(stats.mode.to_string(), "23, 38");
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 38.0);
    }

    #[test]
    fn test_population_vs_sample_variance() {
        let data = [1.0, 2.0, 3.0];
        assert_eq!(describe(&data, true).variance, 2.0 / 3.0);
        assert_eq!(describe(&data, false).variance, 1.0);
    }

    #[test]
    fn test_single_value_sample_variance() {
        let stats = describe(&[7.0], false);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.q1, 7.0);
        assert_eq!(stats.q3, 7.0);
    }

    #[test]
    fn test_empty() {
        let stats = describe(&[], true);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.mode.to_string(), "-");
    }

    #[test]
    fn test_quartiles() {
        let stats = describe(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], true);
        assert_eq!(stats.q1, 2.75);
        assert_eq!(stats.q3, 6.25);
        assert_eq!(stats.iqr, 3.5);
        assert_eq!(stats.qd, 1.75);
    }

    #[test]
    fn test_mode_rules() {
        assert_eq!(describe(&[1.0, 2.0, 3.0], true).mode, Mode::NoMode);
        assert_eq!(describe(&[1.0, 1.0, 2.0, 2.0], true).mode.to_string(), "1, 2");
        assert_eq!(describe(&[0.1 + 0.2, 0.3, 5.0], true).mode.to_string(), "0.3");
        assert_eq!(describe(&[-0.0, 0.0, 1.0], true).mode.to_string(), "0");
    }

    #[test]
    fn test_mode_many_ties() {
        let data = [
            2.0, 2.0, 19.0, 61.0, 64.0, 64.0, 70.0, 176.0, 176.0, 546.0, 546.0, 593.0, 593.0,
            680.0, 680.0, 700.0,
        ];
        assert_eq!(describe(&data, false).mode.to_string(), "2, 64, 176, 546, 593, 680");
    }

    #[test]
    fn test_mad() {
        let stats = describe(&[1.0, 2.0, 3.0, 6.0], true);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.mad, 1.5);
    }

    #[test]
    fn test_summarize() {
        let s = summarize(&[10.0, 12.0, 23.0, 23.0, 16.0, 23.0, 21.0, 16.0]).unwrap();
        assert_eq!(s.n, 8);
        assert_eq!(s.mean, 18.0);
        assert_abs_diff_eq!(s.sd, 5.2372, epsilon = 1e-4);

        let single = summarize(&[4.0]).unwrap();
        assert_eq!(single.mean, 4.0);
        assert!(single.sd.is_nan());

        assert!(summarize(&[]).is_none());
    }
}
