//! Aggregate summaries over the merged master table.
//!
//! Every summary groups on the top-ranked image label (`label_rank1`),
//! the classifier's best guess for the post's image. Rank 2 and 3
//! guesses stay in the master table but do not participate here.

use std::collections::BTreeMap;

use barkive_core::MergedRecord;

/// How many posts carry a given top-ranked label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCount {
    pub label: String,
    pub posts: usize,
}

/// Per-label means over the merged table's numeric columns.
///
/// The four stage-of-life columns are booleans in the master table, so
/// their means read as the share of posts in the group carrying the tag.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSummary {
    pub label: String,
    pub posts: usize,
    pub mean_confidence: f64,
    pub mean_rating_numerator: f64,
    pub mean_rating_denominator: f64,
    pub mean_doggo: f64,
    pub mean_floofer: f64,
    pub mean_pupper: f64,
    pub mean_puppo: f64,
    pub mean_retweet_count: f64,
    pub mean_favorite_count: f64,
}

/// Top-ranked label frequencies, most common first. Ties break
/// alphabetically so the ranking is stable across runs.
#[must_use]
pub fn label_frequency(records: &[MergedRecord]) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = group_by_top_label(records)
        .into_iter()
        .map(|(label, rows)| LabelCount {
            label: label.to_string(),
            posts: rows.len(),
        })
        .collect();
    counts.sort_by(|a, b| b.posts.cmp(&a.posts).then_with(|| a.label.cmp(&b.label)));
    counts
}

/// Per-label means, sorted by label for stable output.
#[must_use]
pub fn label_means(records: &[MergedRecord]) -> Vec<LabelSummary> {
    group_by_top_label(records)
        .into_iter()
        .map(|(label, rows)| summarize_group(label, &rows))
        .collect()
}

/// The `n` labels whose posts draw the most favorites on average. Ties
/// break alphabetically.
#[must_use]
pub fn top_by_mean_favorites(summaries: &[LabelSummary], n: usize) -> Vec<LabelSummary> {
    let mut ranked = summaries.to_vec();
    ranked.sort_by(|a, b| {
        b.mean_favorite_count
            .total_cmp(&a.mean_favorite_count)
            .then_with(|| a.label.cmp(&b.label))
    });
    ranked.truncate(n);
    ranked
}

fn group_by_top_label(records: &[MergedRecord]) -> BTreeMap<&str, Vec<&MergedRecord>> {
    let mut groups: BTreeMap<&str, Vec<&MergedRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.prediction.guesses[0].label.as_str())
            .or_default()
            .push(record);
    }
    groups
}

// Counter sums fit i64 comfortably; the f64 casts at the end trade
// precision no analysis at this scale can observe.
#[allow(clippy::cast_precision_loss)]
fn summarize_group(label: &str, rows: &[&MergedRecord]) -> LabelSummary {
    let n = rows.len() as f64;
    let mut confidence_sum = 0.0_f64;
    let mut numerator_sum = 0_i64;
    let mut denominator_sum = 0_i64;
    let mut retweet_sum = 0_i64;
    let mut favorite_sum = 0_i64;
    let mut doggo_posts = 0_usize;
    let mut floofer_posts = 0_usize;
    let mut pupper_posts = 0_usize;
    let mut puppo_posts = 0_usize;
    for row in rows {
        confidence_sum += row.prediction.guesses[0].confidence;
        numerator_sum += row.archive.rating_numerator;
        denominator_sum += row.archive.rating_denominator;
        retweet_sum += row.metadata.retweet_count;
        favorite_sum += row.metadata.favorite_count;
        doggo_posts += usize::from(row.archive.doggo);
        floofer_posts += usize::from(row.archive.floofer);
        pupper_posts += usize::from(row.archive.pupper);
        puppo_posts += usize::from(row.archive.puppo);
    }
    LabelSummary {
        label: label.to_string(),
        posts: rows.len(),
        mean_confidence: confidence_sum / n,
        mean_rating_numerator: numerator_sum as f64 / n,
        mean_rating_denominator: denominator_sum as f64 / n,
        mean_doggo: doggo_posts as f64 / n,
        mean_floofer: floofer_posts as f64 / n,
        mean_pupper: pupper_posts as f64 / n,
        mean_puppo: puppo_posts as f64 / n,
        mean_retweet_count: retweet_sum as f64 / n,
        mean_favorite_count: favorite_sum as f64 / n,
    }
}
