//! Hypothesis tests over raw samples or summary statistics.
//!
//! - [`parametric`]: Welch's and paired t-tests
//! - [`nonparametric`]: Mann-Whitney U and Kruskal-Wallis H
//! - [`variance`]: one-way and repeated-measures ANOVA
//! - [`posthoc`]: Tukey HSD pairwise comparisons

pub mod parametric;

pub mod nonparametric;

pub mod variance;

pub mod posthoc;

pub use nonparametric::{kruskal_wallis, mann_whitney_u};
pub use parametric::{paired_t_test, paired_t_test_with_config, welch, welch_with_config};
pub use posthoc::tukey_hsd;
pub use variance::{anova, anova_with_config, rm_anova, rm_anova_with_config};
