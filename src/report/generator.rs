//! Markdown report generation.
//!
//! This module renders the complete feedback analysis report from the
//! derived data: metadata, distributions, trend series, themes, the
//! rule-based insights, the segmented AI narrative, and a pass-through
//! sample of the analyzed records.

use crate::config::ReportConfig;
use crate::models::{
    AnalysisReport, AnalyticsSnapshot, FeedbackRecord, NarrativeSections, ReportMetadata,
};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &AnalysisReport, config: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Customer Feedback Analysis Report\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    // Headline statistics
    output.push_str(&generate_summary_section(&report.snapshot));

    // Distributions and trends (skipped entirely for the empty snapshot)
    if !report.snapshot.is_empty() {
        output.push_str(&generate_distributions_section(&report.snapshot));
        output.push_str(&generate_trend_section(&report.snapshot));
        output.push_str(&generate_themes_section(&report.snapshot));
    }

    // Insight statements
    output.push_str(&generate_insights_section(&report.insights));

    // Segmented AI narrative
    if config.include_narrative {
        if let Some(ref narrative) = report.narrative {
            output.push_str(&generate_narrative_section(narrative));
        }
    }

    // Sample records
    if config.include_samples && !report.sample_records.is_empty() {
        output.push_str(&generate_samples_section(&report.sample_records));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    let period = match (metadata.date_range.start, metadata.date_range.end) {
        (Some(start), Some(end)) => format!("{} to {}", start, end),
        (Some(start), None) => format!("from {}", start),
        (None, Some(end)) => format!("through {}", end),
        (None, None) => "All time".to_string(),
    };

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Input:** `{}`\n", metadata.input_path));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Analysis Period:** {}\n", period));
    section.push_str(&format!(
        "- **Records Analyzed:** {} of {}\n",
        metadata.records_analyzed, metadata.total_records
    ));
    if metadata.records_dropped > 0 {
        section.push_str(&format!(
            "- **Records Dropped:** {} (malformed)\n",
            metadata.records_dropped
        ));
    }
    section.push('\n');

    section
}

/// Generate the headline statistics section.
fn generate_summary_section(snapshot: &AnalyticsSnapshot) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");

    let average_rating = snapshot
        .average_rating
        .map(|avg| format!("{:.1}/5", avg))
        .unwrap_or_else(|| "N/A".to_string());

    let sentiment = match snapshot.avg_sentiment {
        Some(avg) => format!(
            "{} ({:.2})",
            snapshot.sentiment_distribution.dominant(),
            avg
        ),
        None => "N/A".to_string(),
    };

    section.push_str("| Total Feedback | Average Rating | Overall Sentiment |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        snapshot.total_feedback, average_rating, sentiment
    ));

    section
}

/// Generate the rating, sentiment, and category distribution tables.
fn generate_distributions_section(snapshot: &AnalyticsSnapshot) -> String {
    let mut section = String::new();

    section.push_str("## Rating Distribution\n\n");
    section.push_str("| Rating | Count |\n");
    section.push_str("|:---|:---:|\n");
    // All five rows, even when a rating value never occurred.
    for rating in 1..=5u8 {
        let count = snapshot.rating_distribution.get(&rating).copied().unwrap_or(0);
        section.push_str(&format!("| {}/5 | {} |\n", rating, count));
    }
    section.push('\n');

    section.push_str("## Sentiment Distribution\n\n");
    section.push_str("| Sentiment | Count |\n");
    section.push_str("|:---|:---:|\n");
    let dist = snapshot.sentiment_distribution;
    section.push_str(&format!("| Positive | {} |\n", dist.positive));
    section.push_str(&format!("| Neutral | {} |\n", dist.neutral));
    section.push_str(&format!("| Negative | {} |\n\n", dist.negative));

    if !snapshot.category_distribution.is_empty() {
        section.push_str("## Feedback by Category\n\n");
        section.push_str("| Category | Count |\n");
        section.push_str("|:---|:---:|\n");

        let mut categories: Vec<_> = snapshot.category_distribution.iter().collect();
        categories.sort_by_key(|(_, count)| std::cmp::Reverse(**count));

        for (category, count) in categories {
            section.push_str(&format!("| {} | {} |\n", category, count));
        }
        section.push('\n');
    }

    section
}

/// Generate the monthly trend table.
fn generate_trend_section(snapshot: &AnalyticsSnapshot) -> String {
    if snapshot.trend_series.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Rating & Satisfaction Trend\n\n");
    section.push_str("| Period | Average Rating | Satisfaction Rate | Feedback |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");

    for point in &snapshot.trend_series {
        let rating = point
            .average_rating
            .map(|avg| format!("{:.1}", avg))
            .unwrap_or_else(|| "-".to_string());
        section.push_str(&format!(
            "| {} | {} | {:.0}% | {} |\n",
            point.period_label(),
            rating,
            point.satisfaction_rate,
            point.feedback_count
        ));
    }
    section.push('\n');

    section
}

/// Generate the top themes section.
fn generate_themes_section(snapshot: &AnalyticsSnapshot) -> String {
    if snapshot.top_themes.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Top Themes\n\n");
    for theme in &snapshot.top_themes {
        section.push_str(&format!("- **{}** ({} mentions)\n", theme.label, theme.count));
    }
    section.push('\n');

    section
}

/// Generate the insight statements section.
fn generate_insights_section(insights: &[String]) -> String {
    if insights.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Key Insights\n\n");
    for (i, insight) in insights.iter().enumerate() {
        section.push_str(&format!("{}. {}\n", i + 1, insight));
    }
    section.push('\n');

    section
}

/// Generate the segmented AI narrative section.
fn generate_narrative_section(narrative: &NarrativeSections) -> String {
    let mut section = String::new();

    section.push_str("## AI-Generated Summary\n\n");

    if let Some(ref intro) = narrative.intro {
        if !intro.trim().is_empty() {
            section.push_str(intro.trim());
            section.push_str("\n\n");
        }
    }

    for finding in &narrative.findings {
        section.push_str(finding.trim());
        section.push_str("\n\n");
    }

    if let Some(ref conclusion) = narrative.conclusion {
        if !conclusion.trim().is_empty() {
            section.push_str(&format!("> {}\n\n", conclusion.trim().replace('\n', "\n> ")));
        }
    }

    section
}

/// Generate the sample feedback entries section (original fields
/// passed through unmodified).
fn generate_samples_section(samples: &[FeedbackRecord]) -> String {
    let mut section = String::new();

    section.push_str("## Sample Feedback Entries\n\n");

    for record in samples {
        let heading = match (&record.product, &record.category) {
            (Some(product), Some(category)) => format!("{} - {}", product, category),
            (Some(product), None) => product.clone(),
            (None, Some(category)) => category.clone(),
            (None, None) => "Feedback".to_string(),
        };

        section.push_str(&format!(
            "### Customer {} - {}\n\n",
            record.customer_id, heading
        ));
        if let Some(rating) = record.rating {
            section.push_str(&format!("**Rating:** {}/5  \n", rating));
        }
        section.push_str(&format!("**Date:** {}\n\n", record.date));
        if !record.feedback_text.is_empty() {
            section.push_str(&format!("> {}\n\n", record.feedback_text));
        }
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by feedback-insights*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
