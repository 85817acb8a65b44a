use crate::testing::TukeyResult;
use crate::testing::distributions::studentized_range_tail;
use log::debug;

/// Tukey HSD pairwise comparisons with the Tukey-Kramer standard error.
///
/// # Arguments
///
/// * `means` - Group means
/// * `sizes` - Group sizes, parallel to `means`
/// * `ms_error` - Error mean square from the omnibus ANOVA
/// * `df_error` - Error degrees of freedom from the omnibus ANOVA
///
/// # Returns
///
/// One entry per pair `i < j`, in lexicographic order, reporting the signed
/// difference `means[i] - means[j]`. Empty when `sizes` does not match `means`.
pub fn tukey_hsd(means: &[f64], sizes: &[usize], ms_error: f64, df_error: f64) -> Vec<TukeyResult> {
    let k = means.len();
    if sizes.len() != k {
        debug!("Tukey HSD skipped: {} means but {} group sizes", k, sizes.len());
        return Vec::new();
    }
    let mut results = Vec::with_capacity(k * k.saturating_sub(1) / 2);

    for i in 0..k {
        for j in (i + 1)..k {
            let diff = (means[i] - means[j]).abs();
            let se = ((ms_error / 2.0) * (1.0 / sizes[i] as f64 + 1.0 / sizes[j] as f64)).sqrt();
            let q = diff / se;

            results.push(TukeyResult {
                group_a: i,
                group_b: j,
                difference: means[i] - means[j],
                p_value: studentized_range_tail(q, k as f64, df_error),
            });
        }
    }

    results
}
