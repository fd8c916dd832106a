//! Statistical aggregation over validated feedback records.
//!
//! This module derives the [`AnalyticsSnapshot`] for one analysis
//! request: distributions, calendar-month trend series, and the theme
//! ranking. The derivation is a pure function of its input; permuting
//! the record order never changes the snapshot.

use crate::analysis::themes;
use crate::models::{
    AnalyticsSnapshot, FeedbackRecord, Sentiment, SentimentDistribution, TrendPoint,
};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Sentiment classification cutoffs.
///
/// Fixed for one analysis run; callers needing different cutoffs pass
/// their own instead of mutating shared state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisThresholds {
    /// Scores strictly above this are positive.
    pub positive_cutoff: f64,
    /// Scores strictly below this are negative.
    pub negative_cutoff: f64,
    /// Maximum number of themes kept in the ranking.
    pub theme_limit: usize,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            positive_cutoff: 0.2,
            negative_cutoff: -0.2,
            theme_limit: themes::DEFAULT_THEME_LIMIT,
        }
    }
}

/// Classify a sentiment score against the cutoffs.
pub fn classify_sentiment(score: f64, thresholds: &AnalysisThresholds) -> Sentiment {
    if score > thresholds.positive_cutoff {
        Sentiment::Positive
    } else if score < thresholds.negative_cutoff {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Per-month accumulator for the trend series.
#[derive(Debug, Default)]
struct MonthBucket {
    rating_sum: u32,
    rated_count: usize,
    positive_count: usize,
    feedback_count: usize,
}

/// Derive the complete analytics snapshot for a record collection.
///
/// An empty collection yields the zero snapshot: all distributions
/// empty, both averages absent, no trend points.
pub fn aggregate(records: &[FeedbackRecord], thresholds: &AnalysisThresholds) -> AnalyticsSnapshot {
    let mut snapshot = AnalyticsSnapshot {
        total_feedback: records.len(),
        ..AnalyticsSnapshot::default()
    };

    let mut rating_sum: u32 = 0;
    let mut rated_count: usize = 0;
    let mut sentiment_sum: f64 = 0.0;
    let mut months: BTreeMap<NaiveDate, MonthBucket> = BTreeMap::new();

    for record in records {
        sentiment_sum += record.sentiment_score;

        let sentiment = classify_sentiment(record.sentiment_score, thresholds);
        match sentiment {
            Sentiment::Positive => snapshot.sentiment_distribution.positive += 1,
            Sentiment::Neutral => snapshot.sentiment_distribution.neutral += 1,
            Sentiment::Negative => snapshot.sentiment_distribution.negative += 1,
        }

        if let Some(rating) = record.rating {
            rating_sum += u32::from(rating);
            rated_count += 1;
            *snapshot.rating_distribution.entry(rating).or_insert(0) += 1;
        }

        if let Some(ref category) = record.category {
            *snapshot
                .category_distribution
                .entry(category.clone())
                .or_insert(0) += 1;
        }

        let bucket = months.entry(month_start(record.date)).or_default();
        bucket.feedback_count += 1;
        if let Some(rating) = record.rating {
            bucket.rating_sum += u32::from(rating);
            bucket.rated_count += 1;
        }
        if sentiment == Sentiment::Positive {
            bucket.positive_count += 1;
        }
    }

    if rated_count > 0 {
        snapshot.average_rating = Some(f64::from(rating_sum) / rated_count as f64);
    }
    if !records.is_empty() {
        snapshot.avg_sentiment = Some(sentiment_sum / records.len() as f64);
    }

    // BTreeMap iteration gives strictly ascending periods for free.
    snapshot.trend_series = months
        .into_iter()
        .map(|(period, bucket)| TrendPoint {
            period,
            average_rating: if bucket.rated_count > 0 {
                Some(f64::from(bucket.rating_sum) / bucket.rated_count as f64)
            } else {
                None
            },
            satisfaction_rate: (bucket.positive_count as f64 / bucket.feedback_count as f64)
                * 100.0,
            feedback_count: bucket.feedback_count,
        })
        .collect();

    snapshot.top_themes = themes::rank_themes(
        records.iter().flat_map(|r| r.themes.iter()),
        thresholds.theme_limit,
    );

    snapshot
}

/// First day of the calendar month containing `date`.
fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, rating: Option<u8>, score: f64) -> FeedbackRecord {
        FeedbackRecord {
            customer_id: "C-1".to_string(),
            date: date.parse().unwrap(),
            product: None,
            category: None,
            rating,
            feedback_text: String::new(),
            sentiment_score: score,
            themes: Vec::new(),
        }
    }

    #[test]
    fn test_sentiment_classification_cutoffs() {
        let thresholds = AnalysisThresholds::default();
        assert_eq!(classify_sentiment(0.5, &thresholds), Sentiment::Positive);
        assert_eq!(classify_sentiment(-0.5, &thresholds), Sentiment::Negative);
        assert_eq!(classify_sentiment(0.0, &thresholds), Sentiment::Neutral);
        // Cutoffs themselves are neutral: the comparison is strict.
        assert_eq!(classify_sentiment(0.2, &thresholds), Sentiment::Neutral);
        assert_eq!(classify_sentiment(-0.2, &thresholds), Sentiment::Neutral);
    }

    #[test]
    fn test_average_rating_and_distribution() {
        let records = vec![
            record("2026-01-05", Some(5), 0.5),
            record("2026-01-06", Some(5), 0.5),
            record("2026-01-07", Some(4), 0.3),
            record("2026-01-08", Some(2), -0.4),
            record("2026-01-09", Some(1), -0.8),
        ];

        let snapshot = aggregate(&records, &AnalysisThresholds::default());

        assert_eq!(snapshot.total_feedback, 5);
        let avg = snapshot.average_rating.unwrap();
        assert!((avg - 3.4).abs() < 1e-9);
        assert_eq!(snapshot.rating_distribution.get(&5), Some(&2));
        assert_eq!(snapshot.rating_distribution.get(&4), Some(&1));
        assert_eq!(snapshot.rating_distribution.get(&2), Some(&1));
        assert_eq!(snapshot.rating_distribution.get(&1), Some(&1));
        assert_eq!(snapshot.rating_distribution.get(&3), None);
    }

    #[test]
    fn test_sentiment_distribution_partitions_all_records() {
        let records = vec![
            record("2026-01-05", None, 0.9),
            record("2026-01-06", None, 0.0),
            record("2026-01-07", None, -0.9),
            record("2026-01-08", None, 0.21),
        ];

        let snapshot = aggregate(&records, &AnalysisThresholds::default());
        let dist = snapshot.sentiment_distribution;

        assert_eq!(dist.positive, 2);
        assert_eq!(dist.neutral, 1);
        assert_eq!(dist.negative, 1);
        assert_eq!(dist.total(), snapshot.total_feedback);
    }

    #[test]
    fn test_unrated_records_count_toward_total_only() {
        let records = vec![
            record("2026-01-05", Some(4), 0.5),
            record("2026-01-06", None, 0.5),
        ];

        let snapshot = aggregate(&records, &AnalysisThresholds::default());

        assert_eq!(snapshot.total_feedback, 2);
        assert_eq!(snapshot.average_rating, Some(4.0));
        let rated: usize = snapshot.rating_distribution.values().sum();
        assert_eq!(rated, 1);
    }

    #[test]
    fn test_category_distribution_skips_uncategorized() {
        let mut with_category = record("2026-01-05", None, 0.0);
        with_category.category = Some("Support".to_string());
        let records = vec![with_category, record("2026-01-06", None, 0.0)];

        let snapshot = aggregate(&records, &AnalysisThresholds::default());

        assert_eq!(snapshot.category_distribution.len(), 1);
        assert_eq!(snapshot.category_distribution.get("Support"), Some(&1));
    }

    #[test]
    fn test_trend_series_buckets_by_month_ascending() {
        let records = vec![
            record("2026-03-15", Some(5), 0.8),
            record("2026-01-10", Some(3), 0.0),
            record("2026-03-02", Some(4), 0.5),
            record("2026-01-20", None, -0.6),
        ];

        let snapshot = aggregate(&records, &AnalysisThresholds::default());
        let series = &snapshot.trend_series;

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].period_label(), "2026-01");
        assert_eq!(series[1].period_label(), "2026-03");
        assert!(series.windows(2).all(|w| w[0].period < w[1].period));

        // January: one rated record (3), no positives out of two.
        assert_eq!(series[0].average_rating, Some(3.0));
        assert_eq!(series[0].satisfaction_rate, 0.0);
        assert_eq!(series[0].feedback_count, 2);

        // March: both rated and positive.
        assert_eq!(series[1].average_rating, Some(4.5));
        assert_eq!(series[1].satisfaction_rate, 100.0);
    }

    #[test]
    fn test_unrated_month_has_no_average_rating() {
        let records = vec![record("2026-02-10", None, 0.9)];
        let snapshot = aggregate(&records, &AnalysisThresholds::default());

        assert_eq!(snapshot.trend_series.len(), 1);
        assert_eq!(snapshot.trend_series[0].average_rating, None);
        assert_eq!(snapshot.trend_series[0].satisfaction_rate, 100.0);
    }

    #[test]
    fn test_empty_records_yield_zero_snapshot() {
        let snapshot = aggregate(&[], &AnalysisThresholds::default());

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.average_rating, None);
        assert_eq!(snapshot.avg_sentiment, None);
        assert_eq!(snapshot.sentiment_distribution.total(), 0);
        assert!(snapshot.rating_distribution.is_empty());
        assert!(snapshot.trend_series.is_empty());
        assert!(snapshot.top_themes.is_empty());
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let mut records = vec![
            record("2026-01-05", Some(5), 0.5),
            record("2026-02-06", Some(2), -0.5),
            record("2026-03-07", None, 0.1),
            record("2026-01-08", Some(4), 0.3),
        ];
        records[0].themes = vec!["pricing".to_string()];
        records[1].themes = vec!["support".to_string(), "pricing".to_string()];

        let forward = aggregate(&records, &AnalysisThresholds::default());
        records.reverse();
        let reversed = aggregate(&records, &AnalysisThresholds::default());

        // Distributions and trend buckets do not depend on record order.
        assert_eq!(forward.total_feedback, reversed.total_feedback);
        assert_eq!(forward.average_rating, reversed.average_rating);
        assert_eq!(forward.sentiment_distribution, reversed.sentiment_distribution);
        assert_eq!(forward.rating_distribution, reversed.rating_distribution);
        assert_eq!(forward.trend_series, reversed.trend_series);
    }

    #[test]
    fn test_themes_flow_into_snapshot() {
        let mut a = record("2026-01-05", None, 0.0);
        a.themes = vec!["support".to_string(), "pricing".to_string()];
        let mut b = record("2026-01-06", None, 0.0);
        b.themes = vec!["support".to_string()];

        let snapshot = aggregate(&[a, b], &AnalysisThresholds::default());

        assert_eq!(snapshot.top_themes[0].label, "support");
        assert_eq!(snapshot.top_themes[0].count, 2);
        assert_eq!(snapshot.top_themes[1].label, "pricing");
    }
}
