//! Analytics derivation: aggregation and theme ranking.

pub mod aggregator;
pub mod themes;

pub use aggregator::{aggregate, classify_sentiment, AnalysisThresholds};
pub use themes::{rank_themes, DEFAULT_THEME_LIMIT};
