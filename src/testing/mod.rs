use serde::{Deserialize, Serialize};
use std::fmt;

pub mod distributions;
pub mod inference;

pub mod utils;

/// Tunable thresholds shared by the hypothesis tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// ANOVA p-value below which Tukey HSD comparisons are attached
    pub post_hoc_alpha: f64,
    /// Coverage of the confidence interval reported by the t-tests
    pub confidence_level: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            post_hoc_alpha: 0.05,
            confidence_level: 0.95,
        }
    }
}

impl AnalysisConfig {
    /// Upper quantile used for the two-sided critical value (0.975 by default).
    pub fn critical_quantile(&self) -> f64 {
        1.0 - (1.0 - self.confidence_level) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTestResult {
    /// The t-statistic
    pub t: f64,
    /// Degrees of freedom (fractional for Welch)
    pub df: f64,
    /// Two-tailed p-value
    pub p: f64,
    /// Lower bound of the confidence interval for the mean difference
    pub ci_low: f64,
    /// Upper bound of the confidence interval for the mean difference
    pub ci_high: f64,
}

impl TTestResult {
    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p < alpha
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairedTTestResult {
    #[serde(flatten)]
    pub test: TTestResult,
    /// Mean of the pairwise differences `a - b`
    pub mean_diff: f64,
    /// Sample standard deviation of the differences
    pub sd_diff: f64,
    /// Number of pairs
    pub n: usize,
}

/// Result of a Mann-Whitney U test.
///
/// `u_a` and `u_b` are ordered by magnitude: `u_a` is the smaller of the two U
/// statistics and `u_b` the larger. They do not identify which input sample
/// produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MannWhitneyResult {
    pub u_a: f64,
    pub u_b: f64,
    /// Normal approximation with continuity correction
    pub z: f64,
    /// Two-tailed p-value
    pub p: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KruskalWallisResult {
    /// Tie-corrected H statistic
    pub h: f64,
    pub df: usize,
    pub p: f64,
}

/// Error-term breakdown that differs between the ANOVA designs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "design", rename_all = "snake_case")]
pub enum VariancePartition {
    Independent {
        ss_within: f64,
        ms_within: f64,
    },
    RepeatedMeasures {
        ss_subjects: f64,
        df_subjects: usize,
        ss_error: f64,
        ms_error: f64,
    },
}

impl VariancePartition {
    /// Mean square used as the F-ratio denominator.
    pub fn ms_error(&self) -> f64 {
        match *self {
            VariancePartition::Independent { ms_within, .. } => ms_within,
            VariancePartition::RepeatedMeasures { ms_error, .. } => ms_error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaResult {
    pub f_value: f64,
    pub df_between: usize,
    /// Denominator degrees of freedom: `N - k` for independent groups,
    /// `(k - 1)(n - 1)` for repeated measures
    pub df_within: usize,
    pub p_value: f64,
    pub ss_between: f64,
    pub ms_between: f64,
    pub partition: VariancePartition,
    /// Pairwise comparisons, present only when the omnibus test is significant
    pub tukey_results: Option<Vec<TukeyResult>>,
}

impl AnovaResult {
    /// Attach post-hoc comparisons to the result
    pub fn with_tukey_results(mut self, results: Vec<TukeyResult>) -> Self {
        self.tukey_results = Some(results);
        self
    }

    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TukeyResult {
    pub group_a: usize,
    pub group_b: usize,
    /// Signed difference `mean[group_a] - mean[group_b]`
    pub difference: f64,
    pub p_value: f64,
}

impl TukeyResult {
    pub fn significance(&self) -> Significance {
        Significance::from_p_value(self.p_value)
    }
}

/// Display bucket for post-hoc p-values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Significance {
    Insignificant,
    Below001,
    Below01,
    Below05,
}

impl Significance {
    pub fn from_p_value(p: f64) -> Self {
        if p >= 0.05 {
            Significance::Insignificant
        } else if p < 0.001 {
            Significance::Below001
        } else if p < 0.01 {
            Significance::Below01
        } else {
            Significance::Below05
        }
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Significance::Insignificant => "insignificant",
            Significance::Below001 => "< 0.001",
            Significance::Below01 => "< 0.01",
            Significance::Below05 => "< 0.05",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significance_buckets() {
        assert_eq!(Significance::from_p_value(0.2).to_string(), "insignificant");
        assert_eq!(Significance::from_p_value(0.05).to_string(), "insignificant");
        assert_eq!(Significance::from_p_value(0.0004).to_string(), "< 0.001");
        assert_eq!(Significance::from_p_value(0.005).to_string(), "< 0.01");
        assert_eq!(Significance::from_p_value(0.03).to_string(), "< 0.05");
    }

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.post_hoc_alpha, 0.05);
        assert!((config.critical_quantile() - 0.975).abs() < 1e-12);
    }

    #[test]
    fn test_config_partial_json() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"post_hoc_alpha": 0.01}"#).unwrap();
        assert_eq!(config.post_hoc_alpha, 0.01);
        assert_eq!(config.confidence_level, 0.95);
    }
}
