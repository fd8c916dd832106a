//! Feedback Insights - Customer Feedback Analytics CLI
//!
//! A CLI tool that derives statistical aggregates, rule-based insight
//! statements, and a segmented AI narrative from a customer feedback
//! export, and renders a Markdown or JSON analysis report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime or precondition error (bad input, inverted date range, etc.)

mod analysis;
mod cli;
mod config;
mod ingest;
mod insights;
mod models;
mod narrative;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use models::{AnalysisReport, ReportMetadata};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments (date range, flag conflicts)
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Feedback Insights v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the analysis
    if let Err(e) = run_analysis(args) {
        error!("Analysis failed: {}", e);
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .feedback-insights.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".feedback-insights.toml");

    if path.exists() {
        eprintln!(
            "⚠️  .feedback-insights.toml already exists. Remove it first or edit it manually."
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .feedback-insights.toml")?;

    println!("✅ Created .feedback-insights.toml with default settings.");
    println!("   Edit it to customize thresholds, theme limits, and report sections.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete analysis workflow.
fn run_analysis(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let input = args
        .input
        .clone()
        .context("--input is required unless --init-config is used")?;
    let output_path = config.output_path(args.output.as_deref());
    let range = args.date_range();

    // Step 1: Ingest the record collection
    println!("📥 Loading feedback records: {}", input.display());
    let (records, warnings) = ingest::load_records(&input)?;
    let total_records = records.len() + warnings.len();

    for warning in &warnings {
        warn!("{}", warning);
    }
    if !warnings.is_empty() {
        println!("⚠️  Dropped {} malformed records", warnings.len());
    }

    // Step 2: Scope to the requested date range
    let analyzed = ingest::filter_by_range(records, &range);
    info!(
        "{} of {} records fall inside the analysis period",
        analyzed.len(),
        total_records
    );

    // Step 3: Derive the analytics snapshot
    println!("📊 Analyzing {} feedback records...", analyzed.len());
    let thresholds = analysis::AnalysisThresholds::from(&config.analysis);
    let snapshot = analysis::aggregate(&analyzed, &thresholds);

    // Step 4: Compose the insight statements
    let insight_thresholds = insights::InsightThresholds::from(&config.analysis);
    let statements = insights::compose(&snapshot, &insight_thresholds);

    // Step 5: Segment the AI narrative, if one was supplied
    let narrative_sections = match args.narrative {
        Some(ref path) => {
            println!("📝 Segmenting AI narrative: {}", path.display());
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read narrative file {}", path.display()))?;
            Some(narrative::segment(&text))
        }
        None => None,
    };

    // Step 6: Assemble and render the report
    let metadata = ReportMetadata {
        input_path: input.display().to_string(),
        generated_at: Utc::now(),
        date_range: range,
        total_records,
        records_analyzed: analyzed.len(),
        records_dropped: warnings.len(),
    };

    let sample_count = config.report.effective_sample_count(analyzed.len());
    let report = AnalysisReport {
        metadata,
        snapshot,
        insights: statements,
        narrative: narrative_sections,
        sample_records: analyzed.iter().take(sample_count).cloned().collect(),
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Analysis Summary:");
    println!("   Records analyzed: {}", report.metadata.records_analyzed);
    if let Some(avg) = report.snapshot.average_rating {
        println!("   Average rating: {:.1}/5", avg);
    }
    let dist = report.snapshot.sentiment_distribution;
    println!(
        "   Sentiment: 🟢 {} positive | 🟡 {} neutral | 🔴 {} negative",
        dist.positive, dist.neutral, dist.negative
    );
    println!("   Insights: {}", report.insights.len());
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        output_path.display()
    );

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .feedback-insights.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
