//! Calculators comparing two samples: Welch's t-test, the paired t-test and
//! the Mann-Whitney U test.

use super::Unavailable;
use crate::descriptive::{SampleSummary, summarize};
use crate::input::{ParsedInput, parse, parse_number};
use crate::store::{KeyValueStore, get_stored_value, set_stored_value};
use crate::testing::AnalysisConfig;
use crate::testing::inference::{mann_whitney_u, paired_t_test_with_config, welch_with_config};
use crate::testing::{MannWhitneyResult, PairedTTestResult, TTestResult};
use log::debug;
use serde::{Deserialize, Serialize};

const DEFAULT_RAW1: &str = "12, 15, 11, 18, 14";
const DEFAULT_RAW2: &str = "9, 13, 10, 12, 8";

/// Which inputs feed the Welch test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WelchMode {
    /// Six summary fields (mean, sd, n per sample)
    #[default]
    Summary,
    /// Two free-text samples
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelchCalculator {
    pub mode: WelchMode,
    pub mean1: String,
    pub sd1: String,
    pub n1: String,
    pub mean2: String,
    pub sd2: String,
    pub n2: String,
    pub raw1: String,
    pub raw2: String,
    #[serde(skip)]
    pub config: AnalysisConfig,
}

impl Default for WelchCalculator {
    fn default() -> Self {
        WelchCalculator {
            mode: WelchMode::Summary,
            mean1: "25".to_string(),
            sd1: "5".to_string(),
            n1: "30".to_string(),
            mean2: "22".to_string(),
            sd2: "6".to_string(),
            n2: "28".to_string(),
            raw1: DEFAULT_RAW1.to_string(),
            raw2: DEFAULT_RAW2.to_string(),
            config: AnalysisConfig::default(),
        }
    }
}

impl WelchCalculator {
    const MODE_KEY: &'static str = "stats.welch.mode";
    const TEXT_KEYS: [&'static str; 8] = [
        "stats.welch.sample1.mean",
        "stats.welch.sample1.sd",
        "stats.welch.sample1.n",
        "stats.welch.sample2.mean",
        "stats.welch.sample2.sd",
        "stats.welch.sample2.n",
        "stats.welch.sample1.raw",
        "stats.welch.sample2.raw",
    ];

    fn text_fields_mut(&mut self) -> [&mut String; 8] {
        [
            &mut self.mean1,
            &mut self.sd1,
            &mut self.n1,
            &mut self.mean2,
            &mut self.sd2,
            &mut self.n2,
            &mut self.raw1,
            &mut self.raw2,
        ]
    }

    fn text_fields(&self) -> [&String; 8] {
        [
            &self.mean1,
            &self.sd1,
            &self.n1,
            &self.mean2,
            &self.sd2,
            &self.n2,
            &self.raw1,
            &self.raw2,
        ]
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let mut calc = Self::default();
        calc.mode = get_stored_value(store, Self::MODE_KEY, calc.mode);
        for (field, key) in calc.text_fields_mut().into_iter().zip(Self::TEXT_KEYS) {
            *field = get_stored_value(store, key, std::mem::take(field));
        }
        calc
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        set_stored_value(store, Self::MODE_KEY, &self.mode);
        for (field, key) in self.text_fields().into_iter().zip(Self::TEXT_KEYS) {
            set_stored_value(store, key, field);
        }
    }

    pub fn parsed(&self) -> (ParsedInput, ParsedInput) {
        (parse(&self.raw1), parse(&self.raw2))
    }

    /// Summaries of the raw samples, shown alongside the raw inputs.
    pub fn summaries(&self) -> (Option<SampleSummary>, Option<SampleSummary>) {
        let (p1, p2) = self.parsed();
        (summarize(&p1.numbers), summarize(&p2.numbers))
    }

    pub fn result(&self) -> Result<TTestResult, Unavailable> {
        match self.mode {
            WelchMode::Summary => self.summary_result(),
            WelchMode::Raw => self.raw_result(),
        }
    }

    fn summary_result(&self) -> Result<TTestResult, Unavailable> {
        let field = |text: &str, name: &'static str| {
            parse_number(text).ok_or(Unavailable::InvalidSummaryField(name))
        };
        let m1 = field(&self.mean1, "mean1")?;
        let s1 = field(&self.sd1, "sd1")?;
        let n1 = field(&self.n1, "n1")?;
        let m2 = field(&self.mean2, "mean2")?;
        let s2 = field(&self.sd2, "sd2")?;
        let n2 = field(&self.n2, "n2")?;

        if n1 <= 1.0 || n2 <= 1.0 || s1 <= 0.0 || s2 <= 0.0 {
            return Err(Unavailable::InvalidSummary);
        }

        Ok(welch_with_config(m1, s1, n1, m2, s2, n2, &self.config))
    }

    fn raw_result(&self) -> Result<TTestResult, Unavailable> {
        let (p1, p2) = self.parsed();
        let s1 = summarize(&p1.numbers).ok_or(Unavailable::EmptySample(1))?;
        let s2 = summarize(&p2.numbers).ok_or(Unavailable::EmptySample(2))?;
        check_parse_errors(&p1, &p2)?;

        if !s1.sd.is_finite() || !s2.sd.is_finite() || s1.n <= 1 || s2.n <= 1 {
            return Err(Unavailable::TooFewValues(2));
        }

        Ok(welch_with_config(
            s1.mean,
            s1.sd,
            s1.n as f64,
            s2.mean,
            s2.sd,
            s2.n as f64,
            &self.config,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedCalculator {
    pub raw1: String,
    pub raw2: String,
    #[serde(skip)]
    pub config: AnalysisConfig,
}

impl Default for PairedCalculator {
    fn default() -> Self {
        PairedCalculator {
            raw1: DEFAULT_RAW1.to_string(),
            raw2: DEFAULT_RAW2.to_string(),
            config: AnalysisConfig::default(),
        }
    }
}

impl PairedCalculator {
    const RAW1_KEY: &'static str = "stats.paired.sample1.raw";
    const RAW2_KEY: &'static str = "stats.paired.sample2.raw";

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        PairedCalculator {
            raw1: get_stored_value(store, Self::RAW1_KEY, DEFAULT_RAW1.to_string()),
            raw2: get_stored_value(store, Self::RAW2_KEY, DEFAULT_RAW2.to_string()),
            config: AnalysisConfig::default(),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        set_stored_value(store, Self::RAW1_KEY, &self.raw1);
        set_stored_value(store, Self::RAW2_KEY, &self.raw2);
    }

    pub fn parsed(&self) -> (ParsedInput, ParsedInput) {
        (parse(&self.raw1), parse(&self.raw2))
    }

    pub fn result(&self) -> Result<PairedTTestResult, Unavailable> {
        let (p1, p2) = self.parsed();
        let (a, b) = (&p1.numbers, &p2.numbers);

        if a.is_empty() {
            return Err(Unavailable::EmptySample(1));
        }
        if b.is_empty() {
            return Err(Unavailable::EmptySample(2));
        }
        if a.len() != b.len() {
            return Err(Unavailable::UnequalSizes(a.len(), b.len()));
        }
        if a.len() < 2 {
            return Err(Unavailable::TooFewValues(2));
        }
        check_parse_errors(&p1, &p2)?;

        paired_t_test_with_config(a, b, &self.config).ok_or(Unavailable::InsufficientData)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MannWhitneyCalculator {
    pub raw1: String,
    pub raw2: String,
}

impl Default for MannWhitneyCalculator {
    fn default() -> Self {
        MannWhitneyCalculator {
            raw1: DEFAULT_RAW1.to_string(),
            raw2: DEFAULT_RAW2.to_string(),
        }
    }
}

impl MannWhitneyCalculator {
    const RAW1_KEY: &'static str = "stats.mannwhitney.sample1.raw";
    const RAW2_KEY: &'static str = "stats.mannwhitney.sample2.raw";

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        MannWhitneyCalculator {
            raw1: get_stored_value(store, Self::RAW1_KEY, DEFAULT_RAW1.to_string()),
            raw2: get_stored_value(store, Self::RAW2_KEY, DEFAULT_RAW2.to_string()),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        set_stored_value(store, Self::RAW1_KEY, &self.raw1);
        set_stored_value(store, Self::RAW2_KEY, &self.raw2);
    }

    pub fn parsed(&self) -> (ParsedInput, ParsedInput) {
        (parse(&self.raw1), parse(&self.raw2))
    }

    pub fn result(&self) -> Result<MannWhitneyResult, Unavailable> {
        let (p1, p2) = self.parsed();
        if p1.numbers.is_empty() {
            return Err(Unavailable::EmptySample(1));
        }
        if p2.numbers.is_empty() {
            return Err(Unavailable::EmptySample(2));
        }
        check_parse_errors(&p1, &p2)?;

        mann_whitney_u(&p1.numbers, &p2.numbers).ok_or(Unavailable::InsufficientData)
    }
}

fn check_parse_errors(p1: &ParsedInput, p2: &ParsedInput) -> Result<(), Unavailable> {
    for (idx, parsed) in [p1, p2].into_iter().enumerate() {
        if parsed.has_errors() {
            debug!("sample {} has {} invalid entries", idx + 1, parsed.errors);
            return Err(Unavailable::SampleHasErrors(idx + 1));
        }
    }
    Ok(())
}
