use crate::testing::distributions::{chi_square_cdf, normal_cdf};
use crate::testing::utils::rank_pooled;
use crate::testing::{KruskalWallisResult, MannWhitneyResult};
use log::debug;

/// Mann-Whitney U test for two independent samples (two-sided, normal
/// approximation with continuity and tie correction).
///
/// The reported `u_a` is the smaller U statistic and `u_b` the larger,
/// regardless of which sample each belongs to.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Option<MannWhitneyResult> {
    let nx = x.len();
    let ny = y.len();

    if nx == 0 || ny == 0 {
        debug!("Mann-Whitney U rejected: sample sizes {} and {}", nx, ny);
        return None;
    }

    let pooled = rank_pooled(&[x, y]);
    let rank_sum_x = pooled.rank_sums(2)[0];

    let nx_f = nx as f64;
    let ny_f = ny as f64;
    let u_x = rank_sum_x - nx_f * (nx_f + 1.0) / 2.0;
    let u_y = nx_f * ny_f - u_x;
    let u_smallest = u_x.min(u_y);

    let mean_u = nx_f * ny_f / 2.0;
    let n = nx_f + ny_f;

    let mut sigma = (nx_f * ny_f * (n + 1.0) / 12.0).sqrt();
    if pooled.tie_sum > 0.0 && n > 1.0 {
        sigma = ((nx_f * ny_f / (n * (n - 1.0)))
            * ((n.powi(3) - n) / 12.0 - pooled.tie_sum / 12.0))
            .sqrt();
    }

    let z = if sigma == 0.0 {
        0.0
    } else {
        ((u_smallest - mean_u).abs() - 0.5) / sigma
    };
    let p = 2.0 * (1.0 - normal_cdf(z.abs()));

    Some(MannWhitneyResult {
        u_a: u_smallest,
        u_b: u_x.max(u_y),
        z,
        p,
    })
}

/// Kruskal-Wallis H test for `k` independent samples.
///
/// Returns `None` for fewer than two groups or when any group is empty.
pub fn kruskal_wallis(groups: &[&[f64]]) -> Option<KruskalWallisResult> {
    let k = groups.len();
    if k < 2 || groups.iter().any(|g| g.is_empty()) {
        debug!("Kruskal-Wallis rejected: {} groups, some possibly empty", k);
        return None;
    }

    let pooled = rank_pooled(groups);
    let n = pooled.len() as f64;
    let rank_sums = pooled.rank_sums(k);

    let weighted: f64 = rank_sums
        .iter()
        .zip(groups)
        .map(|(r, g)| r * r / g.len() as f64)
        .sum();
    let h = 12.0 / (n * (n + 1.0)) * weighted - 3.0 * (n + 1.0);

    // every observation tied leaves nothing to correct against
    let correction = 1.0 - pooled.tie_sum / (n.powi(3) - n);
    let h = if correction > 0.0 { h / correction } else { h };

    let df = k - 1;
    let p = 1.0 - chi_square_cdf(h, df as f64);

    Some(KruskalWallisResult { h, df, p })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mann_whitney_with_ties() {
        let a = [12.0, 15.0, 11.0, 18.0, 14.0];
        let b = [9.0, 13.0, 10.0, 12.0, 8.0];
        let r = mann_whitney_u(&a, &b).unwrap();
        assert_eq!(r.u_a, 3.5);
        assert_eq!(r.u_b, 21.5);
        assert_abs_diff_eq!(r.z, 1.78, epsilon = 0.01);
        assert_abs_diff_eq!(r.p, 0.075, epsilon = 0.001);
    }

    #[test]
    fn test_mann_whitney_without_ties() {
        let r = mann_whitney_u(&[1.0, 3.0, 5.0], &[2.0, 4.0, 6.0]).unwrap();
        assert_eq!(r.u_a, 3.0);
        assert_eq!(r.u_b, 6.0);
        assert_abs_diff_eq!(r.z, 0.4364, epsilon = 1e-4);
    }

    #[test]
    fn test_mann_whitney_orders_by_magnitude() {
        let low = [1.0, 2.0, 3.0];
        let high = [10.0, 11.0, 12.0];
        let forward = mann_whitney_u(&low, &high).unwrap();
        let backward = mann_whitney_u(&high, &low).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.u_a, 0.0);
        assert_eq!(forward.u_b, 9.0);
    }

    #[test]
    fn test_mann_whitney_all_tied() {
        let r = mann_whitney_u(&[4.0, 4.0], &[4.0, 4.0]).unwrap();
        assert_eq!(r.z, 0.0);
        assert_abs_diff_eq!(r.p, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mann_whitney_empty() {
        assert!(mann_whitney_u(&[], &[1.0]).is_none());
        assert!(mann_whitney_u(&[1.0], &[]).is_none());
    }

    #[test]
    fn test_kruskal_wallis_separated_groups() {
        let g1 = [1.0, 2.0, 3.0];
        let g2 = [4.0, 5.0, 6.0];
        let g3 = [7.0, 8.0, 9.0];
        let r = kruskal_wallis(&[&g1, &g2, &g3]).unwrap();
        assert_abs_diff_eq!(r.h, 7.2, epsilon = 1e-9);
        assert_eq!(r.df, 2);
        assert_abs_diff_eq!(r.p, 0.0273, epsilon = 1e-4);
    }

    #[test]
    fn test_kruskal_wallis_tie_correction_increases_h() {
        let g1 = [1.0, 2.0, 2.0];
        let g2 = [2.0, 3.0, 4.0];
        let pooled = rank_pooled(&[&g1, &g2]);
        let n = pooled.len() as f64;
        let sums = pooled.rank_sums(2);
        let raw = 12.0 / (n * (n + 1.0)) * (sums[0].powi(2) / 3.0 + sums[1].powi(2) / 3.0)
            - 3.0 * (n + 1.0);

        let r = kruskal_wallis(&[&g1, &g2]).unwrap();
        assert!(r.h > raw);
        assert_abs_diff_eq!(r.h, raw / (1.0 - 24.0 / 210.0), epsilon = 1e-12);
    }

    #[test]
    fn test_kruskal_wallis_rejects() {
        let g = [1.0, 2.0];
        assert!(kruskal_wallis(&[&g]).is_none());
        assert!(kruskal_wallis(&[&g, &[]]).is_none());
    }
}
