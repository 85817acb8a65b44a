use std::cmp::Ordering;

/// Observations from several groups ranked together, ties receiving midranks.
#[derive(Debug, Clone)]
pub struct PooledRanks {
    /// `(rank, group index)` in ascending value order
    pub ranked: Vec<(f64, usize)>,
    /// Sum of `t^3 - t` over every tie block of size `t > 1`
    pub tie_sum: f64,
}

impl PooledRanks {
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Rank sum for every group, indexed by group
    pub fn rank_sums(&self, n_groups: usize) -> Vec<f64> {
        let mut sums = vec![0.0; n_groups];
        for &(rank, group) in &self.ranked {
            sums[group] += rank;
        }
        sums
    }
}

/// Pool the groups, sort ascending and assign midranks.
///
/// A run of equal values occupying sorted positions `[i, j)` gets rank
/// `(i + 1 + j) / 2` for every member.
pub fn rank_pooled(groups: &[&[f64]]) -> PooledRanks {
    let total: usize = groups.iter().map(|g| g.len()).sum();
    let mut combined: Vec<(f64, usize)> = Vec::with_capacity(total);
    for (group, values) in groups.iter().enumerate() {
        combined.extend(values.iter().map(|&v| (v, group)));
    }

    combined.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut ranked = Vec::with_capacity(total);
    let mut tie_sum = 0.0;
    let mut i = 0;
    while i < combined.len() {
        let val = combined[i].0;
        let mut j = i + 1;
        while j < combined.len() && combined[j].0 == val {
            j += 1;
        }

        let rank = (i + 1 + j) as f64 / 2.0;
        ranked.extend(combined[i..j].iter().map(|&(_, group)| (rank, group)));

        let block = (j - i) as f64;
        if j - i > 1 {
            tie_sum += block.powi(3) - block;
        }
        i = j;
    }

    PooledRanks { ranked, tie_sum }
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
