//! Rule-based insight composition.
//!
//! This module turns an [`AnalyticsSnapshot`] into a short ordered list
//! of natural-language statements. Rules are an explicit ordered table
//! of predicate functions evaluated top-to-bottom (rule order is output
//! order), never nested conditionals, so precedence stays visible and
//! each rule is testable on its own. Composition is idempotent and
//! never mutates the snapshot.

use crate::models::AnalyticsSnapshot;

/// Thresholds the insight rules compare against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsightThresholds {
    /// Average sentiment strictly above this reads as positive.
    pub positive_cutoff: f64,
    /// Average sentiment strictly below this reads as concerning.
    pub negative_cutoff: f64,
    /// Average rating strictly above this reads as "very highly rated".
    pub high_rating: f64,
    /// Average rating strictly above this (but not high) reads as "good".
    pub good_rating: f64,
    /// Trend deltas with magnitude below this read as stable.
    pub stable_delta: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            positive_cutoff: 0.2,
            negative_cutoff: -0.2,
            high_rating: 4.0,
            good_rating: 3.0,
            stable_delta: 0.2,
        }
    }
}

/// One entry in the rule table. Returning `None` skips the rule.
type InsightRule = fn(&AnalyticsSnapshot, &InsightThresholds) -> Option<String>;

/// Rule table. Order here is the order of statements in the output.
const RULES: [InsightRule; 4] = [sentiment_rule, theme_rule, rating_rule, trend_rule];

/// Compose the ordered insight statements for a snapshot.
pub fn compose(snapshot: &AnalyticsSnapshot, thresholds: &InsightThresholds) -> Vec<String> {
    if snapshot.is_empty() {
        return vec![
            "No feedback records were available for this analysis period.".to_string(),
        ];
    }

    RULES
        .iter()
        .filter_map(|rule| rule(snapshot, thresholds))
        .collect()
}

/// Rule 1: overall sentiment. An undefined average falls through to
/// the mixed branch, worded without a number.
fn sentiment_rule(snapshot: &AnalyticsSnapshot, thresholds: &InsightThresholds) -> Option<String> {
    let statement = match snapshot.avg_sentiment {
        Some(avg) if avg > thresholds.positive_cutoff => format!(
            "Overall customer sentiment is positive (average score {:.1}).",
            avg
        ),
        Some(avg) if avg < thresholds.negative_cutoff => format!(
            "Customer feedback shows notable concerns (average score {:.1}).",
            avg
        ),
        Some(avg) => format!(
            "Customer sentiment is mixed, with praise and criticism roughly balanced (average score {:.1}).",
            avg
        ),
        None => {
            "Customer sentiment is mixed: no sentiment scores were available to average."
                .to_string()
        }
    };

    Some(statement)
}

/// Rule 2: dominant theme.
fn theme_rule(snapshot: &AnalyticsSnapshot, _thresholds: &InsightThresholds) -> Option<String> {
    let statement = match snapshot.top_themes.first() {
        Some(theme) => format!(
            "The most mentioned theme is \"{}\" with {} mentions.",
            theme.label, theme.count
        ),
        None => "No clear recurring theme was identified in this feedback set.".to_string(),
    };

    Some(statement)
}

/// Rule 3: rating level. An undefined average falls through to the
/// "significant issues" branch, worded without a number.
fn rating_rule(snapshot: &AnalyticsSnapshot, thresholds: &InsightThresholds) -> Option<String> {
    let statement = match snapshot.average_rating {
        Some(avg) if avg > thresholds.high_rating => format!(
            "Products are very highly rated, averaging {:.1} out of 5.",
            avg
        ),
        Some(avg) if avg > thresholds.good_rating => format!(
            "Ratings are good at {:.1} out of 5, with room to improve.",
            avg
        ),
        Some(avg) => format!(
            "Ratings point to significant issues, averaging {:.1} out of 5.",
            avg
        ),
        None => {
            "Ratings point to significant issues: no usable ratings were supplied.".to_string()
        }
    };

    Some(statement)
}

/// Rule 4: rating trend. Fires only with at least two trend points,
/// both carrying an average rating.
fn trend_rule(snapshot: &AnalyticsSnapshot, thresholds: &InsightThresholds) -> Option<String> {
    let series = &snapshot.trend_series;
    if series.len() < 2 {
        return None;
    }

    let first = series.first()?.average_rating?;
    let last = series.last()?.average_rating?;
    let delta = last - first;

    let statement = if delta.abs() < thresholds.stable_delta {
        "Ratings have remained stable across the analysis period.".to_string()
    } else if delta > 0.0 {
        format!(
            "Ratings show an upward trend, improving by {:.1} points over the period.",
            delta
        )
    } else {
        format!(
            "Ratings show a downward trend, declining by {:.1} points over the period.",
            delta.abs()
        )
    };

    Some(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ThemeCount, TrendPoint};
    use chrono::NaiveDate;

    fn snapshot_with(avg_sentiment: f64) -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            total_feedback: 10,
            avg_sentiment: Some(avg_sentiment),
            average_rating: Some(3.5),
            ..AnalyticsSnapshot::default()
        }
    }

    fn trend_point(year: i32, month: u32, rating: Option<f64>) -> TrendPoint {
        TrendPoint {
            period: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            average_rating: rating,
            satisfaction_rate: 50.0,
            feedback_count: 5,
        }
    }

    #[test]
    fn test_positive_sentiment_statement() {
        let insights = compose(&snapshot_with(0.5), &InsightThresholds::default());
        assert!(insights[0].contains("sentiment is positive"));
    }

    #[test]
    fn test_negative_sentiment_statement() {
        let insights = compose(&snapshot_with(-0.5), &InsightThresholds::default());
        assert!(insights[0].contains("notable concerns"));
    }

    #[test]
    fn test_sentiment_statement_without_scores() {
        let mut snapshot = snapshot_with(0.0);
        snapshot.avg_sentiment = None;

        let insights = compose(&snapshot, &InsightThresholds::default());

        // Rule 1 still fires; the statement just carries no number.
        assert_eq!(insights.len(), 3);
        assert!(insights[0].contains("no sentiment scores"));
    }

    #[test]
    fn test_mixed_sentiment_statement() {
        let insights = compose(&snapshot_with(0.0), &InsightThresholds::default());
        assert!(insights[0].contains("sentiment is mixed"));
    }

    #[test]
    fn test_rule_order_matches_output_order() {
        let mut snapshot = snapshot_with(0.5);
        snapshot.top_themes = vec![ThemeCount {
            label: "support".to_string(),
            count: 7,
        }];
        snapshot.trend_series =
            vec![trend_point(2026, 1, Some(3.0)), trend_point(2026, 2, Some(4.0))];

        let insights = compose(&snapshot, &InsightThresholds::default());

        assert_eq!(insights.len(), 4);
        assert!(insights[0].contains("sentiment"));
        assert!(insights[1].contains("theme"));
        assert!(insights[2].contains("Ratings"));
        assert!(insights[3].contains("trend"));
    }

    #[test]
    fn test_theme_statement_names_top_theme() {
        let mut snapshot = snapshot_with(0.0);
        snapshot.top_themes = vec![
            ThemeCount {
                label: "pricing".to_string(),
                count: 12,
            },
            ThemeCount {
                label: "support".to_string(),
                count: 4,
            },
        ];

        let insights = compose(&snapshot, &InsightThresholds::default());
        assert!(insights[1].contains("\"pricing\" with 12 mentions"));
    }

    #[test]
    fn test_no_theme_statement_when_none_found() {
        let insights = compose(&snapshot_with(0.0), &InsightThresholds::default());
        assert!(insights[1].contains("No clear recurring theme"));
    }

    #[test]
    fn test_rating_branches() {
        let thresholds = InsightThresholds::default();

        let mut snapshot = snapshot_with(0.0);
        snapshot.average_rating = Some(4.5);
        assert!(compose(&snapshot, &thresholds)[2].contains("very highly rated"));

        snapshot.average_rating = Some(3.4);
        assert!(compose(&snapshot, &thresholds)[2].contains("room to improve"));

        snapshot.average_rating = Some(2.1);
        assert!(compose(&snapshot, &thresholds)[2].contains("significant issues"));

        snapshot.average_rating = None;
        assert!(compose(&snapshot, &thresholds)[2].contains("significant issues"));
    }

    #[test]
    fn test_trend_upward_quotes_delta() {
        let mut snapshot = snapshot_with(0.0);
        snapshot.trend_series = vec![
            trend_point(2026, 1, Some(3.8)),
            trend_point(2026, 2, Some(4.0)),
            trend_point(2026, 3, Some(4.4)),
        ];

        let insights = compose(&snapshot, &InsightThresholds::default());
        let trend = insights.last().unwrap();
        assert!(trend.contains("upward trend"));
        assert!(trend.contains("0.6"));
    }

    #[test]
    fn test_trend_downward_quotes_absolute_delta() {
        let mut snapshot = snapshot_with(0.0);
        snapshot.trend_series =
            vec![trend_point(2026, 1, Some(4.4)), trend_point(2026, 2, Some(3.8))];

        let insights = compose(&snapshot, &InsightThresholds::default());
        let trend = insights.last().unwrap();
        assert!(trend.contains("downward trend"));
        assert!(trend.contains("0.6"));
    }

    #[test]
    fn test_trend_stable_below_delta_threshold() {
        let mut snapshot = snapshot_with(0.0);
        snapshot.trend_series =
            vec![trend_point(2026, 1, Some(4.0)), trend_point(2026, 2, Some(4.1))];

        let insights = compose(&snapshot, &InsightThresholds::default());
        assert!(insights.last().unwrap().contains("stable"));
    }

    #[test]
    fn test_trend_skipped_with_single_period() {
        let mut snapshot = snapshot_with(0.0);
        snapshot.trend_series = vec![trend_point(2026, 1, Some(4.0))];

        let insights = compose(&snapshot, &InsightThresholds::default());
        assert_eq!(insights.len(), 3);
    }

    #[test]
    fn test_trend_skipped_when_endpoint_unrated() {
        let mut snapshot = snapshot_with(0.0);
        snapshot.trend_series = vec![trend_point(2026, 1, None), trend_point(2026, 2, Some(4.0))];

        let insights = compose(&snapshot, &InsightThresholds::default());
        assert_eq!(insights.len(), 3);
    }

    #[test]
    fn test_empty_snapshot_yields_no_data_statement() {
        let insights = compose(&AnalyticsSnapshot::default(), &InsightThresholds::default());
        assert_eq!(insights.len(), 1);
        assert!(insights[0].contains("No feedback records"));
    }

    #[test]
    fn test_compose_is_idempotent() {
        let mut snapshot = snapshot_with(0.4);
        snapshot.trend_series =
            vec![trend_point(2026, 1, Some(3.0)), trend_point(2026, 2, Some(4.2))];

        let first = compose(&snapshot, &InsightThresholds::default());
        let second = compose(&snapshot, &InsightThresholds::default());
        assert_eq!(first, second);
    }
}
