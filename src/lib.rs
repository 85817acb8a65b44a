//! # quickstat
//!
//! A small statistics engine for interactive calculators: free-text numeric
//! input in, descriptive summaries and classical hypothesis tests out.
//!
//! The engine functions are pure and never panic on bad input. Tests that
//! cannot be computed return `None`, and numerically undefined quantities
//! (for example a p-value with zero variance) are reported as `NaN` rather
//! than as errors.
//!
//! ## Core Features
//!
//! - **Input Parsing**: tokenizes comma/whitespace separated numbers, keeping
//!   delimiter and invalid tokens so the input can be re-highlighted
//! - **Descriptive Statistics**: mean, median, mode, quartiles, variance and
//!   mean absolute deviation
//! - **Two-Sample Tests**: Welch's t-test, paired t-test, Mann-Whitney U
//! - **k-Sample Tests**: one-way and repeated-measures ANOVA with Tukey HSD
//!   post-hoc comparisons, Kruskal-Wallis H
//!
//! ## Quick Start
//!
//! ```
//! use quickstat::input::parse;
//! use quickstat::testing::inference::anova;
//!
//! let a = parse("10, 12, 11, 13, 11").numbers;
//! let b = parse("14 15 13 16 14").numbers;
//! let c = parse("18, 17, 19, 17, 18").numbers;
//!
//! let result = anova(&[&a, &b, &c]).unwrap();
//! assert!(result.p_value < 0.001);
//! assert_eq!(result.tukey_results.map(|t| t.len()), Some(3));
//! ```
//!
//! ## Module Organization
//!
//! - **[`input`]**: free-text tokenizer
//! - **[`descriptive`]**: single-sample summaries
//! - **[`testing`]**: hypothesis tests and the distribution functions behind them
//! - **[`format`]**: display formatting of results
//! - **[`store`]** and **[`calculators`]**: persisted calculator state and the
//!   selectors that drive the engine from it

pub mod calculators;
pub mod descriptive;
pub mod format;
pub mod input;
pub mod store;
pub mod testing;
