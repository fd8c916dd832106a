//! Data models for the feedback analytics engine.
//!
//! This module contains all the core data structures used throughout
//! the application for representing feedback records, derived
//! analytics, and the final report.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sentiment bucket assigned to a record or to a whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Score above the positive cutoff.
    Positive,
    /// Score between the cutoffs.
    Neutral,
    /// Score below the negative cutoff.
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Neutral => write!(f, "Neutral"),
            Sentiment::Negative => write!(f, "Negative"),
        }
    }
}

/// One validated customer feedback submission.
///
/// Field names on the wire match the upstream feedback export
/// (`CustomerID`, `Date`, ...) so sample records pass through to the
/// report unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Opaque customer identifier.
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    /// Calendar date of the submission.
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Product the feedback refers to, if given.
    #[serde(rename = "Product", skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    /// Feedback category label, if given.
    #[serde(rename = "Category", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Star rating 1-5, absent if the customer did not rate.
    #[serde(rename = "Rating", skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Free-text feedback body.
    #[serde(rename = "FeedbackText")]
    pub feedback_text: String,
    /// Precomputed sentiment score in [-1, 1] from the external classifier.
    #[serde(rename = "SentimentScore")]
    pub sentiment_score: f64,
    /// Theme labels attached by the external classifier.
    #[serde(rename = "Themes", default, skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<String>,
}

/// Counts of records per sentiment bucket. Always partitions the
/// collection: the three counts sum to the record total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentDistribution {
    /// Total records across all three buckets.
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// The dominant bucket, ties resolved positive > neutral > negative.
    pub fn dominant(&self) -> Sentiment {
        if self.positive >= self.neutral && self.positive >= self.negative {
            Sentiment::Positive
        } else if self.neutral >= self.negative {
            Sentiment::Neutral
        } else {
            Sentiment::Negative
        }
    }
}

/// One calendar-month bucket of the trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// First day of the calendar month this bucket covers.
    pub period: NaiveDate,
    /// Mean rating across the month's rated records, if any were rated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// Percentage (0-100) of the month's records classified positive.
    pub satisfaction_rate: f64,
    /// Number of records in the month.
    pub feedback_count: usize,
}

impl TrendPoint {
    /// Human-readable period label, e.g. `2026-03`.
    pub fn period_label(&self) -> String {
        self.period.format("%Y-%m").to_string()
    }
}

/// A theme label with its mention count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeCount {
    pub label: String,
    pub count: usize,
}

/// The complete set of aggregates derived from one record collection.
///
/// Constructed fresh per analysis request and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    /// Count of validated records analyzed.
    pub total_feedback: usize,
    /// Mean of present ratings; `None` when no record carried a rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// Mean sentiment score across all records; `None` when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_sentiment: Option<f64>,
    /// Positive/neutral/negative partition of all records.
    pub sentiment_distribution: SentimentDistribution,
    /// Rating value (1-5) to count, covering only rated records.
    pub rating_distribution: BTreeMap<u8, usize>,
    /// Category label to count, covering only categorized records.
    pub category_distribution: BTreeMap<String, usize>,
    /// Month buckets in strictly ascending period order; empty months
    /// are omitted.
    pub trend_series: Vec<TrendPoint>,
    /// Themes ranked by mention count, descending, first-seen tie order.
    pub top_themes: Vec<ThemeCount>,
}

impl AnalyticsSnapshot {
    /// True when the snapshot was derived from zero records.
    pub fn is_empty(&self) -> bool {
        self.total_feedback == 0
    }
}

/// Segments of an AI-generated narrative summary.
///
/// Absent sections are `None` rather than empty strings so callers can
/// tell "no conclusion" apart from an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSections {
    /// Leading prose before the first numbered finding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    /// Numbered findings in original order.
    pub findings: Vec<String>,
    /// Trailing prose after the last numbered finding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
}

/// An inclusive calendar date range, optionally open at either end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// True when the date falls inside the range (bounds inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }

    /// True when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Metadata about one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the records file that was analyzed.
    pub input_path: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Date range the records were filtered to.
    #[serde(default, skip_serializing_if = "DateRange::is_unbounded")]
    pub date_range: DateRange,
    /// Records present in the input file.
    pub total_records: usize,
    /// Records that passed validation and the date filter.
    pub records_analyzed: usize,
    /// Malformed records dropped during ingestion.
    pub records_dropped: usize,
}

/// The complete feedback analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Metadata about the run.
    pub metadata: ReportMetadata,
    /// Derived statistical aggregates.
    pub snapshot: AnalyticsSnapshot,
    /// Ordered rule-based insight statements.
    pub insights: Vec<String>,
    /// Segmented AI narrative, when one was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<NarrativeSections>,
    /// Sample of the analyzed records, fields unmodified.
    pub sample_records: Vec<FeedbackRecord>,
}
