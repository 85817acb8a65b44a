use crate::descriptive::{DescriptiveStats, describe};
use crate::input::{ParsedInput, parse};
use crate::store::{KeyValueStore, get_stored_value, set_stored_value};
use serde::{Deserialize, Serialize};

const DATA_KEY: &str = "stats.general.data";
const POPULATION_KEY: &str = "stats.general.population";

/// Descriptive statistics over one free-text sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveCalculator {
    pub data: String,
    /// Use the population variance denominator
    pub is_population: bool,
}

impl Default for DescriptiveCalculator {
    fn default() -> Self {
        DescriptiveCalculator {
            data: "10.5, 20\n-5.2  42\n100".to_string(),
            is_population: true,
        }
    }
}

impl DescriptiveCalculator {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let defaults = Self::default();
        DescriptiveCalculator {
            data: get_stored_value(store, DATA_KEY, defaults.data),
            is_population: get_stored_value(store, POPULATION_KEY, defaults.is_population),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        set_stored_value(store, DATA_KEY, &self.data);
        set_stored_value(store, POPULATION_KEY, &self.is_population);
    }

    pub fn parsed(&self) -> ParsedInput {
        parse(&self.data)
    }

    /// Statistics over the valid numbers; invalid entries are skipped.
    pub fn stats(&self) -> DescriptiveStats {
        describe(&self.parsed().numbers, self.is_population)
    }
}
