//! Metadata normalizer: raw NDJSON records to canonical
//! [`MetadataRecord`]s.
//!
//! Repost exclusion runs first, with the same irreversible policy as the
//! archive cleaner but keyed on this source's own repost marker (the
//! populated `retweeted_status` sub-object). Excluded records are never
//! parsed further. Surviving records are projected down to the canonical
//! field set and the source's `id` field is renamed to `post_id`, the key
//! name the merge engine assumes on all inputs.

use barkive_core::MetadataRecord;

use crate::clean::parse_timestamp;
use crate::error::WrangleError;
use crate::types::RawMetadataRecord;

/// Timestamp encoding used by the metadata source.
pub const METADATA_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Normalizes a loaded metadata table.
///
/// # Errors
///
/// Returns [`WrangleError::Timestamp`] if a surviving record's
/// `created_at` fails to parse.
pub fn normalize_metadata(
    records: Vec<RawMetadataRecord>,
) -> Result<Vec<MetadataRecord>, WrangleError> {
    let input = records.len();
    let mut normalized = Vec::with_capacity(records.len());
    for raw in records {
        if raw.is_repost() {
            continue;
        }
        let created_at = parse_timestamp(
            &raw.created_at,
            METADATA_TIMESTAMP_FORMAT,
            "created_at",
            raw.id,
        )?;
        normalized.push(MetadataRecord {
            post_id: raw.id,
            created_at,
            full_text: raw.full_text,
            display_text_range: raw.display_text_range,
            retweet_count: raw.retweet_count,
            favorite_count: raw.favorite_count,
        });
    }
    tracing::debug!(
        input,
        kept = normalized.len(),
        excluded = input - normalized.len(),
        "metadata normalized"
    );
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_raw_metadata(id: i64) -> RawMetadataRecord {
        RawMetadataRecord {
            id,
            created_at: "Tue Aug 01 16:23:56 +0000 2017".to_string(),
            full_text: "This is Phineas. 13/10 would pet".to_string(),
            display_text_range: Some([0, 85]),
            retweet_count: 10,
            favorite_count: 50,
            retweeted_status: None,
        }
    }

    #[test]
    fn normalize_renames_id_to_post_id() {
        let normalized = normalize_metadata(vec![make_raw_metadata(42)]).expect("should normalize");
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].post_id, 42);
        assert_eq!(
            normalized[0].created_at.to_rfc3339(),
            "2017-08-01T16:23:56+00:00"
        );
        assert_eq!(normalized[0].display_text_range, Some([0, 85]));
        assert_eq!(normalized[0].favorite_count, 50);
    }

    #[test]
    fn normalize_excludes_reposts() {
        let mut repost = make_raw_metadata(2);
        repost.retweeted_status = Some(serde_json::json!({"id": 1}));
        let normalized = normalize_metadata(vec![make_raw_metadata(1), repost, make_raw_metadata(3)])
            .expect("should normalize");
        let ids: Vec<i64> = normalized.iter().map(|r| r.post_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn normalize_keeps_records_with_null_repost_marker() {
        let mut record = make_raw_metadata(1);
        record.retweeted_status = Some(serde_json::Value::Null);
        let normalized = normalize_metadata(vec![record]).expect("should normalize");
        assert_eq!(normalized.len(), 1);
    }

    #[test]
    fn unparseable_created_at_is_fatal() {
        let mut record = make_raw_metadata(9);
        record.created_at = "August 1st".to_string();
        let result = normalize_metadata(vec![record]);
        assert!(
            matches!(
                result,
                Err(WrangleError::Timestamp { field: "created_at", post_id: 9, .. })
            ),
            "expected Timestamp error, got: {result:?}"
        );
    }

    #[test]
    fn excluded_reposts_are_not_timestamp_parsed() {
        let mut repost = make_raw_metadata(2);
        repost.retweeted_status = Some(serde_json::json!({"id": 1}));
        repost.created_at = "garbage".to_string();
        let normalized = normalize_metadata(vec![repost]).expect("repost should be skipped whole");
        assert!(normalized.is_empty());
    }

    #[test]
    fn absent_display_text_range_stays_absent() {
        let mut record = make_raw_metadata(1);
        record.display_text_range = None;
        let normalized = normalize_metadata(vec![record]).expect("should normalize");
        assert!(normalized[0].display_text_range.is_none());
    }
}
