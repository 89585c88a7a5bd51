//! Configuration types for the profiler.
//!
//! Everything that used to be a constant in a one-off analysis script lives
//! here: the input files, the output directory, the classification
//! thresholds, the null tokens and the grouping rule table.

use crate::error::{ProfilingError, Result};
use crate::grouping::{GroupingRule, default_grouping_rules};
use crate::utils::{default_null_tokens, normalize_token};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Execution backend used to hold a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Columnar polars `DataFrame`.
    #[default]
    Frame,
    /// Plain in-memory rows.
    Records,
}

/// Configuration for a profiling batch.
///
/// Use [`ProfilerConfig::builder()`] for a validated configuration, or
/// [`ProfilerConfig::from_json_file`] to load one from disk.
///
/// # Example
///
/// ```rust
/// use lex_profiler::ProfilerConfig;
///
/// let config = ProfilerConfig::builder()
///     .source("data/ads.csv")
///     .output_dir("results")
///     .sample_size(50)
///     .build()
///     .unwrap();
/// assert_eq!(config.sample_size, 50);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Input CSV files, one report each.
    pub sources: Vec<PathBuf>,

    /// Directory receiving the reports; created if absent.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// Number of leading rows examined by the type inferencer.
    /// Default: 20
    pub sample_size: usize,

    /// Minimum share of parseable sampled values for a numeric column (0.0 - 1.0).
    /// Default: 0.8
    pub min_numeric_ratio: f64,

    /// Values treated as missing by the categorical summarizer, compared
    /// case-insensitively after trimming.
    /// Default: NA, N/A, NULL
    pub null_tokens: Vec<String>,

    /// Suffix appended to the input file stem to name the report.
    /// Default: "_stats.txt"
    pub report_suffix: String,

    /// Grouping rule table, checked in order.
    pub grouping_rules: Vec<GroupingRule>,

    /// Backend holding each loaded dataset.
    /// Default: Frame
    pub backend: Backend,

    /// Profile datasets concurrently.
    /// Default: true
    pub parallel: bool,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            output_dir: PathBuf::from("output"),
            sample_size: 20,
            min_numeric_ratio: 0.8,
            null_tokens: default_null_tokens(),
            report_suffix: "_stats.txt".to_string(),
            grouping_rules: default_grouping_rules(),
            backend: Backend::default(),
            parallel: true,
        }
    }
}

impl ProfilerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProfilingError::Io(e).with_context(format!("Reading config {}", path.display()))
        })?;
        let config: ProfilerConfig = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| ProfilingError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.min_numeric_ratio) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "min_numeric_ratio".to_string(),
                value: self.min_numeric_ratio,
            });
        }

        if self.sample_size == 0 {
            return Err(ConfigValidationError::InvalidSampleSize(self.sample_size));
        }

        if self.report_suffix.is_empty() {
            return Err(ConfigValidationError::EmptyReportSuffix);
        }

        for rule in &self.grouping_rules {
            if rule.requires.is_empty()
                || rule.key_sets.is_empty()
                || rule.key_sets.iter().any(|key_set| key_set.is_empty())
            {
                return Err(ConfigValidationError::InvalidGroupingRule(rule.name.clone()));
            }
        }

        Ok(())
    }

    /// Null tokens in their normalized comparison form.
    pub fn normalized_null_tokens(&self) -> Vec<String> {
        self.null_tokens.iter().map(|t| normalize_token(t)).collect()
    }

    /// Path of the report written for `source`.
    pub fn report_path_for(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset");
        self.output_dir.join(format!("{}{}", stem, self.report_suffix))
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid sample size: {0} (must be at least 1)")]
    InvalidSampleSize(usize),

    #[error("Report suffix must not be empty")]
    EmptyReportSuffix,

    #[error("Grouping rule '{0}' needs required columns and non-empty key-sets")]
    InvalidGroupingRule(String),
}

impl From<ConfigValidationError> for ProfilingError {
    fn from(e: ConfigValidationError) -> Self {
        ProfilingError::InvalidConfig(e.to_string())
    }
}

/// Builder for [`ProfilerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProfilerConfigBuilder {
    sources: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    sample_size: Option<usize>,
    min_numeric_ratio: Option<f64>,
    null_tokens: Option<Vec<String>>,
    report_suffix: Option<String>,
    grouping_rules: Option<Vec<GroupingRule>>,
    backend: Option<Backend>,
    parallel: Option<bool>,
}

impl ProfilerConfigBuilder {
    /// Start from an existing configuration, e.g. one loaded from JSON.
    pub fn from_config(config: ProfilerConfig) -> Self {
        Self {
            sources: config.sources,
            output_dir: Some(config.output_dir),
            sample_size: Some(config.sample_size),
            min_numeric_ratio: Some(config.min_numeric_ratio),
            null_tokens: Some(config.null_tokens),
            report_suffix: Some(config.report_suffix),
            grouping_rules: Some(config.grouping_rules),
            backend: Some(config.backend),
            parallel: Some(config.parallel),
        }
    }

    /// Add an input file.
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    /// Add several input files.
    pub fn sources<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Set the output directory for reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the number of rows sampled for type inference.
    pub fn sample_size(mut self, rows: usize) -> Self {
        self.sample_size = Some(rows);
        self
    }

    /// Set the minimum parseable share for numeric classification.
    ///
    /// # Arguments
    /// * `ratio` - Value between 0.0 and 1.0 (e.g., 0.8 = 80%)
    pub fn min_numeric_ratio(mut self, ratio: f64) -> Self {
        self.min_numeric_ratio = Some(ratio);
        self
    }

    /// Replace the null-token set.
    pub fn null_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Set the report file suffix.
    pub fn report_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.report_suffix = Some(suffix.into());
        self
    }

    /// Replace the grouping rule table.
    pub fn grouping_rules(mut self, rules: Vec<GroupingRule>) -> Self {
        self.grouping_rules = Some(rules);
        self
    }

    /// Select the dataset backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Enable or disable concurrent profiling of datasets.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProfilerConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<ProfilerConfig, ConfigValidationError> {
        let defaults = ProfilerConfig::default();
        let config = ProfilerConfig {
            sources: self.sources,
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            sample_size: self.sample_size.unwrap_or(defaults.sample_size),
            min_numeric_ratio: self.min_numeric_ratio.unwrap_or(defaults.min_numeric_ratio),
            null_tokens: self.null_tokens.unwrap_or(defaults.null_tokens),
            report_suffix: self.report_suffix.unwrap_or(defaults.report_suffix),
            grouping_rules: self.grouping_rules.unwrap_or(defaults.grouping_rules),
            backend: self.backend.unwrap_or_default(),
            parallel: self.parallel.unwrap_or(defaults.parallel),
        };

        config.validate()?;
        Ok(config)
    }
}
