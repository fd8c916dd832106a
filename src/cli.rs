//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Feedback Insights - analytics and AI narrative reports for customer feedback
///
/// Derive sentiment/rating/category distributions, monthly trends,
/// ranked themes, and rule-based insight statements from a feedback
/// export, and fold in an AI-generated narrative summary.
///
/// Examples:
///   feedback-insights --input feedback_data.json
///   feedback-insights --input feedback_data.json --narrative summary.txt
///   feedback-insights --input feedback.csv --start-date 2026-01-01 --end-date 2026-03-31
///   feedback-insights --input feedback_data.json --format json --output report.json
///   feedback-insights --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Feedback records file to analyze (JSON or CSV)
    ///
    /// Not required when using --init-config.
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// AI-generated narrative text file to segment into the report
    ///
    /// The narrative is produced by an external summarization service;
    /// this tool only consumes its output.
    #[arg(short, long, value_name = "FILE")]
    pub narrative: Option<PathBuf>,

    /// Start of the analysis date range (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<NaiveDate>,

    /// End of the analysis date range (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<NaiveDate>,

    /// Output file path for the report
    ///
    /// Defaults to the config file's `general.output` setting, or
    /// feedback_report.md.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Number of top themes to rank
    ///
    /// Overrides the config file setting. Default: 5.
    #[arg(long, value_name = "COUNT")]
    pub top_themes: Option<usize>,

    /// Number of sample feedback entries to include in the report
    ///
    /// 0 disables the samples section. Overrides the config file setting.
    #[arg(long, value_name = "COUNT")]
    pub samples: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .feedback-insights.toml in the
    /// current directory.
    #[arg(short, long, value_name = "FILE", env = "FEEDBACK_INSIGHTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .feedback-insights.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    ///
    /// Date-range validation happens here, before the engine runs: an
    /// inverted range is a precondition failure, not an analysis result.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(format!(
                    "Start date {} is after end date {}",
                    start, end
                ));
            }
        }

        if self.top_themes == Some(0) {
            return Err("Top themes count must be at least 1".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The date range the analysis is scoped to.
    pub fn date_range(&self) -> crate::models::DateRange {
        crate::models::DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: Some(PathBuf::from("feedback_data.json")),
            narrative: None,
            start_date: None,
            end_date: None,
            output: None,
            format: OutputFormat::Markdown,
            top_themes: None,
            samples: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_default_args_validate() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_inverted_date_range() {
        let mut args = make_args();
        args.start_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        args.end_date = NaiveDate::from_ymd_opt(2026, 1, 1);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_equal_dates_are_allowed() {
        let mut args = make_args();
        args.start_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        args.end_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_top_themes() {
        let mut args = make_args();
        args.top_themes = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_date_range_from_args() {
        let mut args = make_args();
        args.start_date = NaiveDate::from_ymd_opt(2026, 1, 1);

        let range = args.date_range();
        assert_eq!(range.start, args.start_date);
        assert_eq!(range.end, None);
    }
}
