//! Theme mention ranking.
//!
//! Theme labels are attached to records by an external classifier; this
//! module only tallies and ranks them.

use crate::models::ThemeCount;
use std::collections::HashMap;

/// Default number of themes to keep in a ranking.
pub const DEFAULT_THEME_LIMIT: usize = 5;

/// Tally theme mentions and return the top `limit` by count.
///
/// Distinct labels keep their first-seen order through the tally, and
/// the descending sort is stable, so equal counts stay in first-seen
/// order rather than being reordered alphabetically.
pub fn rank_themes<I, S>(mentions: I, limit: usize) -> Vec<ThemeCount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: Vec<ThemeCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for mention in mentions {
        let label = mention.as_ref();
        match index.get(label) {
            Some(&position) => counts[position].count += 1,
            None => {
                index.insert(label.to_string(), counts.len());
                counts.push(ThemeCount {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by_key(|theme| std::cmp::Reverse(theme.count));
    counts.truncate(limit);
    counts
}
