//! Calculators over a dynamic list of samples: one-way / repeated-measures
//! ANOVA and Kruskal-Wallis.

use super::{SampleList, Unavailable, non_empty_samples};
use crate::descriptive::SampleSummary;
use crate::input::ParsedInput;
use crate::store::{KeyValueStore, get_stored_value, set_stored_value};
use crate::testing::inference::{anova_with_config, kruskal_wallis, rm_anova_with_config};
use crate::testing::{AnalysisConfig, AnovaResult, KruskalWallisResult};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnovaCalculator {
    pub samples: SampleList,
    /// Treat samples as repeated measurements on the same subjects
    pub paired: bool,
    #[serde(skip)]
    pub config: AnalysisConfig,
}

impl AnovaCalculator {
    const SAMPLES_KEY: &'static str = "stats.anova.samples";
    const PAIRED_KEY: &'static str = "stats.anova.paired";

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        AnovaCalculator {
            samples: get_stored_value(store, Self::SAMPLES_KEY, SampleList::default()),
            paired: get_stored_value(store, Self::PAIRED_KEY, false),
            config: AnalysisConfig::default(),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        set_stored_value(store, Self::SAMPLES_KEY, &self.samples);
        set_stored_value(store, Self::PAIRED_KEY, &self.paired);
    }

    pub fn parsed(&self) -> Vec<ParsedInput> {
        self.samples.parse_all()
    }

    pub fn summaries(&self) -> Vec<Option<SampleSummary>> {
        self.samples.summaries()
    }

    /// Empty samples are ignored; invalid entries are skipped, not rejected.
    pub fn result(&self) -> Result<AnovaResult, Unavailable> {
        let parsed = self.parsed();
        let data = non_empty_samples(&parsed);
        if data.len() < 2 {
            return Err(Unavailable::TooFewSamples(2));
        }

        if !self.paired {
            return anova_with_config(&data, &self.config).ok_or(Unavailable::InsufficientData);
        }

        rm_anova_with_config(&data, &self.config).ok_or_else(|| {
            let n = data[0].len();
            match data.iter().find(|d| d.len() != n) {
                Some(other) => Unavailable::UnequalSizes(n, other.len()),
                None => Unavailable::TooFewValues(2),
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KruskalWallisCalculator {
    pub samples: SampleList,
}

impl KruskalWallisCalculator {
    const SAMPLES_KEY: &'static str = "stats.kruskal.samples";

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        KruskalWallisCalculator {
            samples: get_stored_value(store, Self::SAMPLES_KEY, SampleList::default()),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        set_stored_value(store, Self::SAMPLES_KEY, &self.samples);
    }

    pub fn parsed(&self) -> Vec<ParsedInput> {
        self.samples.parse_all()
    }

    pub fn summaries(&self) -> Vec<Option<SampleSummary>> {
        self.samples.summaries()
    }

    pub fn result(&self) -> Result<KruskalWallisResult, Unavailable> {
        let parsed = self.parsed();
        let data = non_empty_samples(&parsed);
        if data.len() < 2 {
            debug!("Kruskal-Wallis needs two non-empty samples, got {}", data.len());
            return Err(Unavailable::TooFewSamples(2));
        }

        kruskal_wallis(&data).ok_or(Unavailable::InsufficientData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testing::VariancePartition;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_anova_defaults() {
        let calc = AnovaCalculator::default();
        let result = calc.result().unwrap();
        assert_abs_diff_eq!(result.f_value, 46.6061, epsilon = 1e-4);
        assert_eq!(result.df_between, 2);
        assert_eq!(result.df_within, 12);
        assert_eq!(result.tukey_results.as_ref().map(Vec::len), Some(3));

        let summaries = calc.summaries();
        assert_eq!(summaries.len(), 3);
        assert_abs_diff_eq!(summaries[2].unwrap().mean, 17.8, epsilon = 1e-12);
    }

    #[test]
    fn test_repeated_measures_defaults() {
        let calc = AnovaCalculator {
            paired: true,
            ..Default::default()
        };
        let result = calc.result().unwrap();
        assert_abs_diff_eq!(result.f_value, 40.4737, epsilon = 1e-4);
        assert_eq!(result.df_within, 8);
        match result.partition {
            VariancePartition::RepeatedMeasures { ss_subjects, df_subjects, .. } => {
                assert_abs_diff_eq!(ss_subjects, 3.0667, epsilon = 1e-4);
                assert_eq!(df_subjects, 4);
            }
            other => panic!("unexpected partition {:?}", other),
        }
    }

    #[test]
    fn test_empty_samples_are_dropped() {
        let mut calc = AnovaCalculator::default();
        let id = calc.samples.add();
        assert!(calc.result().is_ok());

        calc.samples.update(0, "");
        calc.samples.update(1, "  ,  ");
        assert_eq!(calc.result(), Err(Unavailable::TooFewSamples(2)));

        calc.samples.update(id, "1, 2, 3");
        assert!(calc.result().is_ok());
    }

    #[test]
    fn test_repeated_measures_unequal_sizes() {
        let calc = AnovaCalculator {
            samples: SampleList::from_values(["1, 2, 3", "4, 5"]),
            paired: true,
            config: AnalysisConfig::default(),
        };
        assert_eq!(calc.result(), Err(Unavailable::UnequalSizes(3, 2)));
    }

    #[test]
    fn test_kruskal_defaults() {
        let result = KruskalWallisCalculator::default().result().unwrap();
        assert_abs_diff_eq!(result.h, 12.3654, epsilon = 1e-4);
        assert_eq!(result.df, 2);
        assert!(result.p < 0.01);
    }

    #[test]
    fn test_load_save() {
        let mut store = MemoryStore::new();
        let mut anova = AnovaCalculator::load(&store);
        assert_eq!(anova, AnovaCalculator::default());

        anova.paired = true;
        anova.samples.add();
        anova.save(&mut store);
        let restored = AnovaCalculator::load(&store);
        assert_eq!(restored, anova);

        let kw = KruskalWallisCalculator {
            samples: SampleList::from_values(["1 2", "3 4"]),
        };
        kw.save(&mut store);
        assert_eq!(KruskalWallisCalculator::load(&store), kw);
    }
}
