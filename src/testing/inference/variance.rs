//! Analysis of variance for independent groups and for repeated measures.
//!
//! Both designs share the F-ratio policy: a zero error mean square gives
//! `F = 0` when the between-groups mean square is also zero and `F = +inf`
//! otherwise. A significant omnibus result (`p < post_hoc_alpha`) attaches
//! Tukey HSD comparisons of the group (or treatment) means.

use crate::testing::distributions::f_cdf;
use crate::testing::inference::posthoc::tukey_hsd;
use crate::testing::utils::mean;
use crate::testing::{AnalysisConfig, AnovaResult, VariancePartition};
use log::debug;
use ndarray::Array2;

/// One-way ANOVA over `k` independent groups.
///
/// Returns `None` when there are fewer than two groups, any group is empty,
/// or the total count does not exceed `k`.
pub fn anova(groups: &[&[f64]]) -> Option<AnovaResult> {
    anova_with_config(groups, &AnalysisConfig::default())
}

/// [`anova`] with an explicit post-hoc threshold.
pub fn anova_with_config(groups: &[&[f64]], config: &AnalysisConfig) -> Option<AnovaResult> {
    let k = groups.len();
    if k < 2 || groups.iter().any(|g| g.is_empty()) {
        debug!("ANOVA rejected: {} groups, some possibly empty", k);
        return None;
    }

    let total_n: usize = groups.iter().map(|g| g.len()).sum();
    if total_n <= k {
        debug!("ANOVA rejected: {} observations for {} groups", total_n, k);
        return None;
    }

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / total_n as f64;
    let group_means: Vec<f64> = groups.iter().map(|g| mean(g)).collect();

    let ss_between: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, &gm)| g.len() as f64 * (gm - grand_mean).powi(2))
        .sum();
    let ss_within: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, &gm)| g.iter().map(|&x| (x - gm).powi(2)).sum::<f64>())
        .sum();

    let df_between = k - 1;
    let df_within = total_n - k;
    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;

    let (f_value, p_value) = f_test(ms_between, ms_within, df_between, df_within);

    let result = AnovaResult {
        f_value,
        df_between,
        df_within,
        p_value,
        ss_between,
        ms_between,
        partition: VariancePartition::Independent {
            ss_within,
            ms_within,
        },
        tukey_results: None,
    };

    if p_value < config.post_hoc_alpha {
        let sizes: Vec<usize> = groups.iter().map(|g| g.len()).collect();
        debug!("ANOVA significant (p = {}), running Tukey HSD", p_value);
        let tukey = tukey_hsd(&group_means, &sizes, ms_within, df_within as f64);
        return Some(result.with_tukey_results(tukey));
    }

    Some(result)
}

/// Within-subjects one-way ANOVA. `treatments[t][s]` is the measurement of
/// subject `s` under treatment `t`.
///
/// Returns `None` when there are fewer than two treatments, fewer than two
/// subjects, or the treatments have different lengths.
pub fn rm_anova(treatments: &[&[f64]]) -> Option<AnovaResult> {
    rm_anova_with_config(treatments, &AnalysisConfig::default())
}

/// [`rm_anova`] with an explicit post-hoc threshold.
pub fn rm_anova_with_config(treatments: &[&[f64]], config: &AnalysisConfig) -> Option<AnovaResult> {
    let k = treatments.len();
    if k < 2 {
        debug!("repeated-measures ANOVA rejected: {} treatments", k);
        return None;
    }

    let n = treatments[0].len();
    if n < 2 || treatments.iter().any(|t| t.len() != n) {
        debug!("repeated-measures ANOVA rejected: unequal or too few subjects");
        return None;
    }

    let flat: Vec<f64> = treatments.iter().flat_map(|t| t.iter().copied()).collect();
    let data = Array2::from_shape_vec((k, n), flat).ok()?;

    // sequential sums, matching the independent-groups path
    let grand_mean = data.iter().sum::<f64>() / (k * n) as f64;
    let ss_total: f64 = data.iter().map(|&x| (x - grand_mean).powi(2)).sum();

    let treatment_means: Vec<f64> = data
        .rows()
        .into_iter()
        .map(|row| row.iter().sum::<f64>() / n as f64)
        .collect();
    let subject_means: Vec<f64> = data
        .columns()
        .into_iter()
        .map(|col| col.iter().sum::<f64>() / k as f64)
        .collect();

    let ss_between =
        n as f64 * treatment_means.iter().map(|&m| (m - grand_mean).powi(2)).sum::<f64>();
    let ss_subjects =
        k as f64 * subject_means.iter().map(|&m| (m - grand_mean).powi(2)).sum::<f64>();
    let ss_error = ss_total - ss_between - ss_subjects;

    let df_between = k - 1;
    let df_subjects = n - 1;
    let df_error = df_between * df_subjects;
    let ms_between = ss_between / df_between as f64;
    let ms_error = ss_error / df_error as f64;

    let (f_value, p_value) = f_test(ms_between, ms_error, df_between, df_error);

    let result = AnovaResult {
        f_value,
        df_between,
        df_within: df_error,
        p_value,
        ss_between,
        ms_between,
        partition: VariancePartition::RepeatedMeasures {
            ss_subjects,
            df_subjects,
            ss_error,
            ms_error,
        },
        tukey_results: None,
    };

    if p_value < config.post_hoc_alpha {
        debug!("repeated-measures ANOVA significant (p = {}), running Tukey HSD", p_value);
        let tukey = tukey_hsd(&treatment_means, &vec![n; k], ms_error, df_error as f64);
        return Some(result.with_tukey_results(tukey));
    }

    Some(result)
}

fn f_test(ms_between: f64, ms_error: f64, df_between: usize, df_error: usize) -> (f64, f64) {
    let f_value = if ms_error == 0.0 {
        if ms_between == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        ms_between / ms_error
    };
    let p_value = 1.0 - f_cdf(f_value, df_between as f64, df_error as f64);
    (f_value, p_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_anova_three_groups() {
        let g1 = [10.0, 12.0, 11.0, 13.0, 11.0];
        let g2 = [14.0, 15.0, 13.0, 16.0, 14.0];
        let g3 = [18.0, 17.0, 19.0, 17.0, 18.0];
        let r = anova(&[&g1, &g2, &g3]).unwrap();

        assert_eq!(r.df_between, 2);
        assert_eq!(r.df_within, 12);
        assert_abs_diff_eq!(r.f_value, 46.606, epsilon = 1e-3);
        assert_abs_diff_eq!(r.ss_between, 102.5333, epsilon = 1e-4);
        assert!(r.p_value < 0.0001);

        match r.partition {
            VariancePartition::Independent { ss_within, ms_within } => {
                assert_abs_diff_eq!(ss_within, 13.2, epsilon = 1e-9);
                assert_abs_diff_eq!(ms_within, 1.1, epsilon = 1e-9);
            }
            _ => panic!("expected an independent-groups partition"),
        }

        let tukey = r.tukey_results.unwrap();
        assert_eq!(tukey.len(), 3);
        assert_abs_diff_eq!(tukey[0].difference, -3.0, epsilon = 1e-9);
        assert!(tukey.iter().all(|t| t.p_value < 0.01));
    }

    #[test]
    fn test_anova_not_significant_has_no_post_hoc() {
        let g1 = [1.0, 2.0, 3.0];
        let g2 = [2.0, 3.0, 1.0];
        let r = anova(&[&g1, &g2]).unwrap();
        assert_abs_diff_eq!(r.f_value, 0.0, epsilon = 1e-12);
        assert!(r.p_value > 0.05);
        assert!(r.tukey_results.is_none());
    }

    #[test]
    fn test_anova_zero_within_variance() {
        let r = anova(&[&[1.0, 1.0], &[2.0, 2.0]]).unwrap();
        assert_eq!(r.f_value, f64::INFINITY);
        assert_eq!(r.p_value, 0.0);

        let r = anova(&[&[3.0, 3.0], &[3.0, 3.0]]).unwrap();
        assert_eq!(r.f_value, 0.0);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn test_anova_rejects_insufficient_data() {
        assert!(anova(&[&[1.0, 2.0]]).is_none());
        assert!(anova(&[&[1.0, 2.0], &[]]).is_none());
        assert!(anova(&[&[1.0], &[2.0]]).is_none());
    }

    #[test]
    fn test_anova_post_hoc_threshold_from_config() {
        let g1 = [10.0, 12.0, 11.0, 13.0, 11.0];
        let g2 = [14.0, 15.0, 13.0, 16.0, 14.0];
        let g3 = [18.0, 17.0, 19.0, 17.0, 18.0];
        let strict = AnalysisConfig {
            post_hoc_alpha: 0.0,
            ..AnalysisConfig::default()
        };
        let r = anova_with_config(&[&g1, &g2, &g3], &strict).unwrap();
        assert!(r.tukey_results.is_none());
    }

    #[test]
    fn test_rm_anova_three_treatments() {
        let t1 = [10.0, 12.0, 11.0, 13.0];
        let t2 = [14.0, 15.0, 13.0, 16.0];
        let t3 = [18.0, 17.0, 19.0, 17.0];
        let r = rm_anova(&[&t1, &t2, &t3]).unwrap();

        assert_eq!(r.df_between, 2);
        assert_eq!(r.df_within, 6);
        assert!(r.f_value > 0.0);
        assert_abs_diff_eq!(r.f_value, 23.8475, epsilon = 1e-3);
        assert!(r.p_value < 0.05);

        match r.partition {
            VariancePartition::RepeatedMeasures {
                ss_subjects,
                df_subjects,
                ss_error,
                ms_error,
            } => {
                assert_eq!(df_subjects, 3);
                assert_abs_diff_eq!(ss_subjects, 2.916667, epsilon = 1e-5);
                assert_abs_diff_eq!(ss_error, 9.833333, epsilon = 1e-5);
                assert_abs_diff_eq!(ms_error, 1.638889, epsilon = 1e-5);
            }
            _ => panic!("expected a repeated-measures partition"),
        }

        let tukey = r.tukey_results.unwrap();
        assert_eq!(tukey.len(), 3);
        assert_abs_diff_eq!(tukey[2].difference, -3.25, epsilon = 1e-9);
    }

    #[test]
    fn test_rm_anova_zero_error_variance() {
        // treatment effect plus subject effect, no residual
        let r = rm_anova(&[&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]]).unwrap();
        assert_eq!(r.f_value, f64::INFINITY);
        assert_eq!(r.p_value, 0.0);
        assert_eq!(r.partition.ms_error(), 0.0);

        let r = rm_anova(&[&[1.0, 2.0], &[1.0, 2.0]]).unwrap();
        assert_eq!(r.f_value, 0.0);
        assert_abs_diff_eq!(r.p_value, 1.0, epsilon = 1e-12);
        assert!(r.tukey_results.is_none());
    }

    #[test]
    fn test_rm_anova_rejects_bad_shapes() {
        assert!(rm_anova(&[&[1.0, 2.0], &[3.0, 4.0, 5.0]]).is_none());
        assert!(rm_anova(&[&[1.0, 2.0]]).is_none());
        assert!(rm_anova(&[&[1.0], &[2.0]]).is_none());
    }
}
