//! Feedback record ingestion.
//!
//! This module loads raw record collections from JSON or CSV files,
//! validates each entry into a typed [`FeedbackRecord`], and collects
//! human-readable warnings for the entries it drops. A malformed record
//! is never fatal; only a structurally invalid input (unreadable file,
//! body that is not a record collection) aborts ingestion.

use crate::models::{DateRange, FeedbackRecord};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Fatal ingestion failures.
///
/// Individual malformed records never land here; they are dropped and
/// surfaced as warnings instead.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a feedback record collection: {source}")]
    InvalidCollection {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read CSV records from {path}: {source}")]
    InvalidCsv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported input format for {path} (expected .json or .csv)")]
    UnsupportedFormat { path: String },
}

/// A record as it appears on disk, before validation.
///
/// Fields are deliberately lenient (`Value` for the rating, string for
/// the date) so one bad entry degrades to a warning instead of failing
/// the whole collection.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawRecord {
    #[serde(rename = "CustomerID", default)]
    customer_id: Option<Value>,
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Product", default)]
    product: Option<String>,
    #[serde(rename = "Category", default)]
    category: Option<String>,
    #[serde(rename = "Rating", default)]
    rating: Option<Value>,
    #[serde(rename = "FeedbackText", default)]
    feedback_text: String,
    #[serde(rename = "SentimentScore", default)]
    sentiment_score: Option<f64>,
    #[serde(rename = "Themes", default)]
    themes: Vec<String>,
}

/// CSV row shape. Themes are a semicolon-separated list in one column.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "CustomerID")]
    customer_id: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Product", default)]
    product: Option<String>,
    #[serde(rename = "Category", default)]
    category: Option<String>,
    #[serde(rename = "Rating", default)]
    rating: Option<String>,
    #[serde(rename = "FeedbackText", default)]
    feedback_text: String,
    #[serde(rename = "SentimentScore", default)]
    sentiment_score: Option<f64>,
    #[serde(rename = "Themes", default)]
    themes: Option<String>,
}

impl From<CsvRow> for RawRecord {
    fn from(row: CsvRow) -> Self {
        let rating = row
            .rating
            .filter(|s| !s.trim().is_empty())
            .map(|s| match s.trim().parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => match s.trim().parse::<f64>() {
                    Ok(f) => Value::from(f),
                    Err(_) => Value::String(s),
                },
            });

        let themes = row
            .themes
            .map(|s| {
                s.split(';')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        RawRecord {
            customer_id: Some(Value::String(row.customer_id)),
            date: Some(row.date),
            product: row.product,
            category: row.category,
            rating,
            feedback_text: row.feedback_text,
            sentiment_score: row.sentiment_score,
            themes,
        }
    }
}

/// Load and validate a record collection from a JSON or CSV file.
///
/// Returns the validated records plus one warning per dropped entry.
pub fn load_records(path: &Path) -> Result<(Vec<FeedbackRecord>, Vec<String>), IngestError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => {
            let raw = load_json(path)?;
            debug!("Loaded {} raw records from {}", raw.len(), path.display());
            Ok(validate_records(raw))
        }
        "csv" => {
            let (raw, mut warnings) = load_csv(path)?;
            debug!("Loaded {} raw records from {}", raw.len(), path.display());
            let (records, mut validation_warnings) = validate_records(raw);
            warnings.append(&mut validation_warnings);
            Ok((records, warnings))
        }
        _ => Err(IngestError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Parse a JSON file into raw records. A body that is not an array of
/// objects is a fatal precondition failure.
fn load_json(path: &Path) -> Result<Vec<RawRecord>, IngestError> {
    let content = std::fs::read_to_string(path).map_err(|source| IngestError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| IngestError::InvalidCollection {
        path: path.display().to_string(),
        source,
    })
}

/// Parse a CSV file into raw records. Rows that fail to deserialize
/// become warnings; an unreadable file or bad header row is fatal.
fn load_csv(path: &Path) -> Result<(Vec<RawRecord>, Vec<String>), IngestError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| IngestError::InvalidCsv {
        path: path.display().to_string(),
        source,
    })?;

    let mut raw = Vec::new();
    let mut warnings = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        match result {
            Ok(row) => raw.push(RawRecord::from(row)),
            Err(e) => warnings.push(format!("record {}: unreadable CSV row ({})", index + 1, e)),
        }
    }

    Ok((raw, warnings))
}

/// Validate raw records into typed [`FeedbackRecord`]s.
///
/// A record is dropped (with a warning) when its rating is present but
/// not an integer in 1-5, or its date is missing or unparsable.
fn validate_records(raw: Vec<RawRecord>) -> (Vec<FeedbackRecord>, Vec<String>) {
    let mut records = Vec::with_capacity(raw.len());
    let mut warnings = Vec::new();

    for (index, entry) in raw.into_iter().enumerate() {
        let position = index + 1;
        let customer_id = normalize_customer_id(entry.customer_id);

        let date = match entry.date.as_deref().map(str::parse::<NaiveDate>) {
            Some(Ok(date)) => date,
            Some(Err(_)) => {
                warnings.push(format!(
                    "record {} (customer {}): unparsable date {:?}, dropped",
                    position,
                    customer_id,
                    entry.date.unwrap_or_default()
                ));
                continue;
            }
            None => {
                warnings.push(format!(
                    "record {} (customer {}): missing date, dropped",
                    position, customer_id
                ));
                continue;
            }
        };

        let rating = match entry.rating {
            None => None,
            Some(value) => match parse_rating(&value) {
                Some(rating) => Some(rating),
                None => {
                    warnings.push(format!(
                        "record {} (customer {}): rating {} is not an integer between 1 and 5, dropped",
                        position, customer_id, value
                    ));
                    continue;
                }
            },
        };

        records.push(FeedbackRecord {
            customer_id,
            date,
            product: non_empty(entry.product),
            category: non_empty(entry.category),
            rating,
            feedback_text: entry.feedback_text,
            // Score is assumed precomputed by the external classifier;
            // a missing score reads as neutral.
            sentiment_score: entry.sentiment_score.unwrap_or(0.0),
            themes: entry.themes,
        });
    }

    if !warnings.is_empty() {
        warn!("Dropped {} malformed records during ingestion", warnings.len());
    }

    (records, warnings)
}

/// Keep the records whose date falls inside the range (bounds inclusive).
pub fn filter_by_range(records: Vec<FeedbackRecord>, range: &DateRange) -> Vec<FeedbackRecord> {
    if range.is_unbounded() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| range.contains(record.date))
        .collect()
}

/// Accept a rating only when it is an integral JSON number in 1-5.
fn parse_rating(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => {
            if let Some(int) = n.as_i64() {
                int as f64
            } else {
                n.as_f64()?
            }
        }
        _ => return None,
    };

    if number.fract() != 0.0 || !(1.0..=5.0).contains(&number) {
        return None;
    }

    Some(number as u8)
}

/// Customer identifiers arrive as strings or bare numbers upstream.
fn normalize_customer_id(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => "unknown".to_string(),
    }
}

/// Treat whitespace-only optional strings as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
