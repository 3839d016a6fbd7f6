//! Configuration for survey repair and generation.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SurveyError};

/// Configuration for the analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Codes excluded from domain and violation checks
    #[serde(default = "default_ignored_codes")]
    pub ignored_codes: Vec<String>,
    /// Total number of rows wanted after generation
    #[serde(default = "default_needed_answers_count")]
    pub needed_answers_count: usize,
    /// Smoothing coefficient for frequency tables (0 disables smoothing)
    #[serde(default = "default_static_error")]
    pub static_error: f64,
    /// Correlation threshold above which two questions form a strong pair
    #[serde(default = "default_strong_pairs_coefficient")]
    pub strong_pairs_coefficient: f64,
    /// Whether identical rows are allowed
    #[serde(default)]
    pub may_repeat: bool,
    /// Directory holding questionnaire, answer and condition files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Extension of the questionnaire file
    #[serde(default = "default_question_data_ext")]
    pub question_data_ext: String,
    /// Extensions of answer files
    #[serde(default = "default_answer_data_ext")]
    pub answer_data_ext: Vec<String>,
    /// Extension of the conditions file
    #[serde(default = "default_conditions_ext")]
    pub conditions_ext: String,
    /// Upper bound on correction passes before reporting non-convergence
    #[serde(default = "default_max_correction_passes")]
    pub max_correction_passes: usize,
    /// Upper bound on generate-then-correct rounds
    #[serde(default = "default_max_generation_rounds")]
    pub max_generation_rounds: usize,
    /// Optional seed for reproducible runs
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Text appended to bare open-ended codes in the final answer set
    #[serde(default = "default_open_answer_placeholder")]
    pub open_answer_placeholder: String,
}

fn default_ignored_codes() -> Vec<String> {
    vec!["999".to_string()]
}

const fn default_needed_answers_count() -> usize {
    600
}

const fn default_static_error() -> f64 {
    0.005
}

const fn default_strong_pairs_coefficient() -> f64 {
    0.5
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_question_data_ext() -> String {
    ".anc".to_string()
}

fn default_answer_data_ext() -> Vec<String> {
    vec![".opr".to_string(), ".txt".to_string()]
}

fn default_conditions_ext() -> String {
    ".cnf".to_string()
}

const fn default_max_correction_passes() -> usize {
    100
}

const fn default_max_generation_rounds() -> usize {
    50
}

fn default_open_answer_placeholder() -> String {
    "укажите_______________________".to_string()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            ignored_codes: default_ignored_codes(),
            needed_answers_count: default_needed_answers_count(),
            static_error: default_static_error(),
            strong_pairs_coefficient: default_strong_pairs_coefficient(),
            may_repeat: false,
            data_dir: default_data_dir(),
            question_data_ext: default_question_data_ext(),
            answer_data_ext: default_answer_data_ext(),
            conditions_ext: default_conditions_ext(),
            max_correction_passes: default_max_correction_passes(),
            max_generation_rounds: default_max_generation_rounds(),
            random_seed: None,
            open_answer_placeholder: default_open_answer_placeholder(),
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder for constructing a configuration
    #[must_use]
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::new()
    }

    /// Load the configuration from a JSON file
    ///
    /// A missing file is created with the default configuration, which is then returned.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            let json = serde_json::to_string_pretty(&config)?;
            fs::write(path, json)
                .map_err(|e| SurveyError::io("Failed to write default configuration to", path, e))?;
            info!("Created default configuration: {}", path.display());
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SurveyError::io("Failed to read configuration", path, e))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.static_error) {
            return Err(SurveyError::Config(format!(
                "static_error must be in [0, 1), got {}",
                self.static_error
            )));
        }
        if self.answer_data_ext.is_empty() {
            return Err(SurveyError::Config(
                "answer_data_ext must list at least one extension".to_string(),
            ));
        }
        if self.max_correction_passes == 0 {
            return Err(SurveyError::Config(
                "max_correction_passes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analyzer Configuration:")?;
        writeln!(f, "  Ignored Codes: {}", self.ignored_codes.join(","))?;
        writeln!(f, "  Needed Answers: {}", self.needed_answers_count)?;
        writeln!(f, "  Static Error: {}", self.static_error)?;
        writeln!(f, "  Strong Pairs Coefficient: {}", self.strong_pairs_coefficient)?;
        writeln!(f, "  May Repeat: {}", self.may_repeat)?;
        writeln!(f, "  Data Directory: {}", self.data_dir.display())?;
        if let Some(seed) = self.random_seed {
            writeln!(f, "  Random Seed: {seed}")?;
        }
        Ok(())
    }
}

/// Builder for constructing an analyzer configuration
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    /// Create a new builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ignored codes
    #[must_use]
    pub fn ignored_codes(mut self, codes: Vec<String>) -> Self {
        self.config.ignored_codes = codes;
        self
    }

    /// Set the target row count
    #[must_use]
    pub fn needed_answers_count(mut self, count: usize) -> Self {
        self.config.needed_answers_count = count;
        self
    }

    /// Set the smoothing coefficient
    #[must_use]
    pub fn static_error(mut self, error: f64) -> Self {
        self.config.static_error = error;
        self
    }

    /// Set the strong pair correlation threshold
    #[must_use]
    pub fn strong_pairs_coefficient(mut self, coefficient: f64) -> Self {
        self.config.strong_pairs_coefficient = coefficient;
        self
    }

    /// Set whether identical rows are allowed
    #[must_use]
    pub fn may_repeat(mut self, may_repeat: bool) -> Self {
        self.config.may_repeat = may_repeat;
        self
    }

    /// Set the data directory
    #[must_use]
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = dir.into();
        self
    }

    /// Set the correction pass bound
    #[must_use]
    pub fn max_correction_passes(mut self, passes: usize) -> Self {
        self.config.max_correction_passes = passes;
        self
    }

    /// Set the generation round bound
    #[must_use]
    pub fn max_generation_rounds(mut self, rounds: usize) -> Self {
        self.config.max_generation_rounds = rounds;
        self
    }

    /// Set the random seed
    #[must_use]
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = Some(seed);
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> AnalyzerConfig {
        self.config
    }
}
