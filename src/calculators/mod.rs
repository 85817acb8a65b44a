//! State holders for the interactive calculators.
//!
//! Each calculator owns the raw text (or toggles) a user has entered and
//! recomputes its result on demand through pure selector methods. Results that
//! cannot be computed come back as [`Unavailable`], whose message is meant to
//! be shown in place of the result panel. State can be loaded from and saved
//! to a [`KeyValueStore`](crate::store::KeyValueStore).

use crate::descriptive::{SampleSummary, summarize};
use crate::input::{ParsedInput, parse};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod general;
pub mod k_sample;
pub mod two_sample;

pub use general::DescriptiveCalculator;
pub use k_sample::{AnovaCalculator, KruskalWallisCalculator};
pub use two_sample::{MannWhitneyCalculator, PairedCalculator, WelchCalculator, WelchMode};

/// Why a calculator cannot show a result.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Unavailable {
    #[error("Sample {0} is empty.")]
    EmptySample(usize),

    #[error("Sample {0} contains entries that are not numbers.")]
    SampleHasErrors(usize),

    #[error("Sample sizes must be equal for a paired test ({0} vs {1}).")]
    UnequalSizes(usize, usize),

    #[error("Each sample needs at least {0} values.")]
    TooFewValues(usize),

    #[error("Field '{0}' is not a number.")]
    InvalidSummaryField(&'static str),

    #[error("Sample sizes must exceed 1 and standard deviations must be positive.")]
    InvalidSummary,

    #[error("At least {0} non-empty samples are required.")]
    TooFewSamples(usize),

    #[error("Not enough data to compute the test.")]
    InsufficientData,
}

/// One entry of a dynamic sample list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleEntry {
    pub id: u64,
    pub value: String,
}

/// Ordered, editable list of raw samples with stable ids.
///
/// Serialized as the bare entry array; the id counter is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SampleEntry>", into = "Vec<SampleEntry>")]
pub struct SampleList {
    entries: Vec<SampleEntry>,
    next_id: u64,
}

impl SampleList {
    /// Minimum number of samples kept by [`SampleList::remove`]
    pub const MIN_SAMPLES: usize = 2;

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| SampleEntry {
                id: i as u64,
                value: v.into(),
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Rebuild a list from stored entries, continuing the id sequence.
    pub fn from_entries(entries: Vec<SampleEntry>) -> Self {
        let next_id = entries.iter().map(|e| e.id + 1).max().unwrap_or(0);
        SampleList { entries, next_id }
    }

    pub fn entries(&self) -> &[SampleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an empty sample and return its id.
    pub fn add(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(SampleEntry {
            id,
            value: String::new(),
        });
        id
    }

    /// Remove a sample unless that would leave fewer than two. Returns whether
    /// anything was removed.
    pub fn remove(&mut self, id: u64) -> bool {
        if self.entries.len() <= Self::MIN_SAMPLES {
            return false;
        }
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Replace the text of a sample. Returns `false` for an unknown id.
    pub fn update(&mut self, id: u64, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Parse every sample. Samples are independent, so this runs in parallel.
    pub fn parse_all(&self) -> Vec<ParsedInput> {
        self.entries.par_iter().map(|e| parse(&e.value)).collect()
    }

    /// Per-sample mean / sd / n for display next to each input.
    pub fn summaries(&self) -> Vec<Option<SampleSummary>> {
        self.entries
            .par_iter()
            .map(|e| summarize(&parse(&e.value).numbers))
            .collect()
    }
}

impl From<Vec<SampleEntry>> for SampleList {
    fn from(entries: Vec<SampleEntry>) -> Self {
        SampleList::from_entries(entries)
    }
}

impl From<SampleList> for Vec<SampleEntry> {
    fn from(list: SampleList) -> Self {
        list.entries
    }
}

impl Default for SampleList {
    fn default() -> Self {
        SampleList::from_values(["10, 12, 11, 13, 11", "14, 15, 13, 16, 14", "18, 17, 19, 17, 18"])
    }
}

/// Numbers of every non-empty sample, in list order.
pub(crate) fn non_empty_samples(parsed: &[ParsedInput]) -> Vec<&[f64]> {
    parsed
        .iter()
        .map(|p| p.numbers.as_slice())
        .filter(|n| !n.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let mut list = SampleList::default();
        assert_eq!(list.len(), 3);
        let a = list.add();
        let b = list.add();
        assert_eq!(a, 3);
        assert_eq!(b, 4);

        assert!(list.remove(a));
        let c = list.add();
        assert_eq!(c, 5);
    }

    #[test]
    fn test_remove_keeps_two_samples() {
        let mut list = SampleList::from_values(["1", "2", "3"]);
        assert!(list.remove(0));
        assert!(!list.remove(1));
        assert_eq!(list.len(), 2);
        assert!(!SampleList::from_values(["1", "2", "3"]).remove(42));
    }

    #[test]
    fn test_update_and_parse() {
        let mut list = SampleList::from_values(["1, 2", "x"]);
        assert!(list.update(1, "3 4 5"));
        assert!(!list.update(9, "nope"));

        let parsed = list.parse_all();
        assert_eq!(parsed[0].numbers, vec![1.0, 2.0]);
        assert_eq!(parsed[1].numbers, vec![3.0, 4.0, 5.0]);

        let summaries = list.summaries();
        assert_eq!(summaries[1].unwrap().mean, 4.0);
    }

    #[test]
    fn test_from_entries_continues_ids() {
        let mut list = SampleList::from_entries(vec![
            SampleEntry { id: 7, value: "1".into() },
            SampleEntry { id: 2, value: "2".into() },
        ]);
        assert_eq!(list.add(), 8);
    }

    #[test]
    fn test_serializes_as_entry_array() {
        let list = SampleList::from_values(["1, 2", "3"]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"[{"id":0,"value":"1, 2"},{"id":1,"value":"3"}]"#);

        let mut back: SampleList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
        assert_eq!(back.add(), 2);
    }

    #[test]
    fn test_unavailable_messages() {
        assert_eq!(
            Unavailable::UnequalSizes(3, 4).to_string(),
            "Sample sizes must be equal for a paired test (3 vs 4)."
        );
        assert_eq!(Unavailable::TooFewSamples(2).to_string(), "At least 2 non-empty samples are required.");
    }
}
