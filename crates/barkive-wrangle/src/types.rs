//! Raw row shapes for the three sources, as they appear on disk.
//!
//! ## Observed encodings
//!
//! ### Archive CSV (`post-archive-enhanced.csv`)
//! Comma-delimited, headered. Timestamps are strings like
//! `"2017-08-01 16:23:56 +0000"`. The `source` column is an HTML anchor,
//! e.g. `<a href="http://pawter.com/download/iphone" rel="nofollow">Pawter
//! for iPhone</a>`; cleaning reduces it to a closed category set. The
//! optional integer columns (`in_reply_to_*`, `retweet_of_*`) are empty
//! when absent. `display_name` uses the literal none-token `"None"` for
//! posts that never named a subject; the loader decodes that to absent.
//! Each of the four category-flag columns holds the none-token (or an
//! empty field) for "absent" and echoes its own column name for
//! "present" (`doggo` holds `"doggo"`). Flags stay as raw strings here:
//! decoding them is a cleaning step with its own error case.
//!
//! ### Predictions TSV (`image-predictions.tsv`)
//! Tab-delimited, headered:
//! `post_id  image_url  image_slot  p1  p1_conf  p1_dog  p2 ... p3_dog`.
//! The `p*_dog` booleans come out of the classifier export capitalized
//! (`True`/`False`); both capitalizations are accepted.
//!
//! ### Metadata NDJSON (`post-metadata.ndjson`)
//! One JSON object per line. Only the fields modeled below are consumed;
//! everything else in the payload is ignored. `retweeted_status` is a
//! sub-object on reposts and `null` (or absent) otherwise. `created_at`
//! is a string like `"Tue Aug 01 16:23:56 +0000 2017"`.

use serde::{Deserialize, Deserializer};

use barkive_core::{LabelGuess, PredictionRecord};

/// One archive row as read from the CSV, before cleaning.
#[derive(Debug, Clone, Deserialize)]
pub struct RawArchiveRow {
    pub post_id: i64,
    pub in_reply_to_post_id: Option<i64>,
    pub in_reply_to_user_id: Option<i64>,
    pub created_at: String,
    pub source: String,
    pub text: String,
    pub retweet_of_post_id: Option<i64>,
    pub retweet_of_user_id: Option<i64>,
    pub retweet_of_timestamp: Option<String>,
    pub expanded_urls: Option<String>,
    pub rating_numerator: i64,
    pub rating_denominator: i64,
    #[serde(deserialize_with = "de_none_token")]
    pub display_name: Option<String>,
    pub doggo: String,
    pub floofer: String,
    pub pupper: String,
    pub puppo: String,
}

/// One predictions row as read from the TSV.
///
/// The wide `p1..p3` columns are the on-disk encoding of the three ranked
/// guesses; [`RawPredictionRow::into_record`] folds them into the
/// canonical array form.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPredictionRow {
    pub post_id: i64,
    pub image_url: String,
    pub image_slot: i32,
    pub p1: String,
    pub p1_conf: f64,
    #[serde(deserialize_with = "de_loose_bool")]
    pub p1_dog: bool,
    pub p2: String,
    pub p2_conf: f64,
    #[serde(deserialize_with = "de_loose_bool")]
    pub p2_dog: bool,
    pub p3: String,
    pub p3_conf: f64,
    #[serde(deserialize_with = "de_loose_bool")]
    pub p3_dog: bool,
}

impl RawPredictionRow {
    /// Converts the wide row into the canonical ranked-guess form.
    #[must_use]
    pub fn into_record(self) -> PredictionRecord {
        PredictionRecord {
            post_id: self.post_id,
            image_url: self.image_url,
            image_slot: self.image_slot,
            guesses: [
                LabelGuess {
                    label: self.p1,
                    confidence: self.p1_conf,
                    is_canine: self.p1_dog,
                },
                LabelGuess {
                    label: self.p2,
                    confidence: self.p2_conf,
                    is_canine: self.p2_dog,
                },
                LabelGuess {
                    label: self.p3,
                    confidence: self.p3_conf,
                    is_canine: self.p3_dog,
                },
            ],
        }
    }
}

/// One metadata record as read from the NDJSON source, before
/// normalization. The join key is literally named `id` here; rename to
/// `post_id` happens in normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMetadataRecord {
    pub id: i64,
    pub created_at: String,
    pub full_text: String,
    #[serde(default)]
    pub display_text_range: Option<[i64; 2]>,
    pub retweet_count: i64,
    pub favorite_count: i64,
    #[serde(default)]
    pub retweeted_status: Option<serde_json::Value>,
}

impl RawMetadataRecord {
    /// True when the record carries a populated repost sub-object.
    /// An explicit `null` is not a repost marker.
    #[must_use]
    pub fn is_repost(&self) -> bool {
        self.retweeted_status.as_ref().is_some_and(|v| !v.is_null())
    }
}

/// Decodes the archive's none-token: `""` and `"None"` mean absent.
fn de_none_token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.is_empty() || raw == "None" {
        Ok(None)
    } else {
        Ok(Some(raw))
    }
}

/// Accepts both `true`/`false` and the classifier export's `True`/`False`.
fn de_loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.as_str() {
        "True" | "true" => Ok(true),
        "False" | "false" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean, got \"{other}\""
        ))),
    }
}
