//! Canonical record types shared across the pipeline.
//!
//! These are the *cleaned* shapes: the raw on-disk encodings (string
//! sentinels, markup client strings, repost reference columns) live in the
//! wrangle crate's loader types and never escape it. Repost references are
//! deliberately absent here: repost rows are removed during cleaning and
//! the reference columns dropped, so the canonical types cannot carry them.

use chrono::{DateTime, Utc};

/// Closed category set for the client a post was published from.
///
/// Raw archive rows carry an HTML anchor string; cleaning maps it onto one
/// of these four categories (or none, for unrecognized clients).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceClient {
    MobileApp,
    ShortVideoClient,
    WebClient,
    ThirdPartyDashboardClient,
}

impl SourceClient {
    /// Canonical label, as written to the master table.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceClient::MobileApp => "mobile-app",
            SourceClient::ShortVideoClient => "short-video-client",
            SourceClient::WebClient => "web-client",
            SourceClient::ThirdPartyDashboardClient => "third-party-dashboard-client",
        }
    }
}

impl std::fmt::Display for SourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cleaned row of the primary post archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRecord {
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
    /// Present only when the post is a reply.
    pub in_reply_to_post_id: Option<i64>,
    pub in_reply_to_user_id: Option<i64>,
    /// `None` when the raw client string matched no known category.
    pub source_client: Option<SourceClient>,
    pub text: String,
    pub expanded_urls: Option<String>,
    pub rating_numerator: i64,
    pub rating_denominator: i64,
    /// `None` for posts that never named a subject, and for the known
    /// placeholder token nulled during cleaning.
    pub display_name: Option<String>,
    pub doggo: bool,
    pub floofer: bool,
    pub pupper: bool,
    pub puppo: bool,
}

/// One normalized per-post metadata record from the NDJSON source.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
    pub full_text: String,
    pub display_text_range: Option<[i64; 2]>,
    pub retweet_count: i64,
    pub favorite_count: i64,
}

/// One ranked label guess from the image classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelGuess {
    pub label: String,
    /// Classifier confidence. The upstream export documents `[0, 1]`; the
    /// value is passed through unvalidated.
    pub confidence: f64,
    pub is_canine: bool,
}

/// One row of the image-prediction table.
///
/// The three ranked guesses stay in their row-wide form; pivoting them to a
/// long `(post_id, rank)` table is an unresolved tidiness gap in the source
/// data and is not performed here.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub post_id: i64,
    pub image_url: String,
    /// Which of the post's images the classification ran on (1-based).
    pub image_slot: i32,
    pub guesses: [LabelGuess; 3],
}

/// One post surviving both inner joins, with its full metadata, archive
/// data, and image classification. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub metadata: MetadataRecord,
    pub archive: ArchiveRecord,
    pub prediction: PredictionRecord,
}

impl MergedRecord {
    /// The shared join key. All three constituent records agree on it by
    /// construction.
    #[must_use]
    pub fn post_id(&self) -> i64 {
        self.metadata.post_id
    }
}

// ---------------------------------------------------------------------------
// Flat column registry
// ---------------------------------------------------------------------------

/// Flat columns contributed by the metadata table, join key first.
pub const METADATA_COLUMNS: [&str; 6] = [
    "post_id",
    "created_at",
    "full_text",
    "display_text_range",
    "retweet_count",
    "favorite_count",
];

/// Flat columns contributed by the archive table, join key first.
///
/// The archive's creation timestamp is labeled `archive_created_at`: both
/// the archive and the metadata source carry one, and the merge engine
/// requires flat column names to be collision-free.
pub const ARCHIVE_COLUMNS: [&str; 14] = [
    "post_id",
    "archive_created_at",
    "in_reply_to_post_id",
    "in_reply_to_user_id",
    "source_client",
    "text",
    "expanded_urls",
    "rating_numerator",
    "rating_denominator",
    "display_name",
    "doggo",
    "floofer",
    "pupper",
    "puppo",
];

/// Flat columns contributed by the prediction table, join key first.
pub const PREDICTION_COLUMNS: [&str; 12] = [
    "post_id",
    "image_url",
    "image_slot",
    "label_rank1",
    "confidence_rank1",
    "is_canine_rank1",
    "label_rank2",
    "confidence_rank2",
    "is_canine_rank2",
    "label_rank3",
    "confidence_rank3",
    "is_canine_rank3",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_client_labels() {
        assert_eq!(SourceClient::MobileApp.to_string(), "mobile-app");
        assert_eq!(SourceClient::ShortVideoClient.to_string(), "short-video-client");
        assert_eq!(SourceClient::WebClient.to_string(), "web-client");
        assert_eq!(
            SourceClient::ThirdPartyDashboardClient.to_string(),
            "third-party-dashboard-client"
        );
    }

    #[test]
    fn column_registries_share_only_the_join_key() {
        let mut seen = std::collections::HashMap::new();
        for col in METADATA_COLUMNS
            .iter()
            .chain(ARCHIVE_COLUMNS.iter())
            .chain(PREDICTION_COLUMNS.iter())
        {
            *seen.entry(*col).or_insert(0u32) += 1;
        }
        for (col, count) in seen {
            if col == "post_id" {
                assert_eq!(count, 3, "join key must appear in every registry");
            } else {
                assert_eq!(count, 1, "column '{col}' registered more than once");
            }
        }
    }
}
