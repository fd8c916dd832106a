//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.feedback-insights.toml` files. The analysis thresholds live here
//! so the classification cutoffs and top-theme limit are explicit,
//! stated defaults rather than literals buried in the engine.

use crate::analysis::AnalysisThresholds;
use crate::insights::InsightThresholds;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Analysis thresholds.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report output path used when the CLI does not give one.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "feedback_report.md".to_string()
}

/// Analysis threshold settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Sentiment scores strictly above this classify as positive.
    #[serde(default = "default_positive_cutoff")]
    pub positive_cutoff: f64,

    /// Sentiment scores strictly below this classify as negative.
    #[serde(default = "default_negative_cutoff")]
    pub negative_cutoff: f64,

    /// Number of top themes to rank.
    #[serde(default = "default_top_themes")]
    pub top_themes: usize,

    /// Average ratings strictly above this read as "very highly rated".
    #[serde(default = "default_high_rating")]
    pub high_rating: f64,

    /// Average ratings strictly above this read as "good".
    #[serde(default = "default_good_rating")]
    pub good_rating: f64,

    /// Trend deltas with magnitude below this read as stable.
    #[serde(default = "default_stable_delta")]
    pub stable_delta: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            positive_cutoff: default_positive_cutoff(),
            negative_cutoff: default_negative_cutoff(),
            top_themes: default_top_themes(),
            high_rating: default_high_rating(),
            good_rating: default_good_rating(),
            stable_delta: default_stable_delta(),
        }
    }
}

fn default_positive_cutoff() -> f64 {
    0.2
}

fn default_negative_cutoff() -> f64 {
    -0.2
}

fn default_top_themes() -> usize {
    5
}

fn default_high_rating() -> f64 {
    4.0
}

fn default_good_rating() -> f64 {
    3.0
}

fn default_stable_delta() -> f64 {
    0.2
}

impl From<&AnalysisConfig> for AnalysisThresholds {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            positive_cutoff: config.positive_cutoff,
            negative_cutoff: config.negative_cutoff,
            theme_limit: config.top_themes,
        }
    }
}

impl From<&AnalysisConfig> for InsightThresholds {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            positive_cutoff: config.positive_cutoff,
            negative_cutoff: config.negative_cutoff,
            high_rating: config.high_rating,
            good_rating: config.good_rating,
            stable_delta: config.stable_delta,
        }
    }
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include sample feedback entries in the report.
    #[serde(default = "default_true")]
    pub include_samples: bool,

    /// Maximum sample feedback entries to include.
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,

    /// Include the segmented AI narrative section.
    #[serde(default = "default_true")]
    pub include_narrative: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_samples: true,
            sample_count: default_sample_count(),
            include_narrative: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sample_count() -> usize {
    5
}

impl ReportConfig {
    /// Number of sample records to include, honoring the enable flag.
    ///
    /// Returns 0 when samples are disabled so disabled samples never
    /// reach the report, regardless of output format.
    pub fn effective_sample_count(&self, available: usize) -> usize {
        if self.include_samples {
            self.sample_count.min(available)
        } else {
            0
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".feedback-insights.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; optional
    /// arguments only override when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(top_themes) = args.top_themes {
            self.analysis.top_themes = top_themes;
        }

        if let Some(samples) = args.samples {
            self.report.include_samples = samples > 0;
            if samples > 0 {
                self.report.sample_count = samples;
            }
        }
    }

    /// Resolve the report output path: an explicit CLI path wins over
    /// the config file's `general.output`.
    pub fn output_path(&self, cli_output: Option<&Path>) -> PathBuf {
        match cli_output {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(&self.general.output),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
