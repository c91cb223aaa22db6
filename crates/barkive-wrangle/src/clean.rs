//! Archive cleaner: raw archive rows to canonical [`ArchiveRecord`]s.
//!
//! The steps run per row, in a fixed order: temporal coercion, placeholder
//! name removal, category-flag decoding, client normalization, repost
//! exclusion. Later steps rely on earlier ones having produced consistent
//! types, so the order is part of the contract. Repost rows are dropped
//! entirely and the repost reference columns do not exist on the output
//! type.

use chrono::{DateTime, Utc};

use barkive_core::{ArchiveRecord, SourceClient};

use crate::error::WrangleError;
use crate::types::RawArchiveRow;

/// Timestamp encoding used by both archive timestamp columns.
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// The one known bad `display_name` token: an article mis-extracted from
/// post text. Replaced with "no value present"; no broader name validation
/// is attempted.
pub const PLACEHOLDER_DISPLAY_NAME: &str = "a";

/// Sentinel meaning "absent" in the raw category-flag columns.
const FLAG_ABSENT_TOKEN: &str = "None";

/// Substring markers for each client category, checked in priority order.
/// Each category also recognizes its own canonical label, so re-cleaning
/// an already-normalized value maps it back to the same category.
const CLIENT_MARKERS: [(SourceClient, [&str; 2]); 4] = [
    (SourceClient::MobileApp, ["iphone", "mobile-app"]),
    (SourceClient::ShortVideoClient, ["vine", "short-video-client"]),
    (SourceClient::WebClient, ["Web Client", "web-client"]),
    (
        SourceClient::ThirdPartyDashboardClient,
        ["DeckHub", "third-party-dashboard-client"],
    ),
];

/// Cleans a loaded archive table.
///
/// Repost rows are removed (not flagged); everything else is transformed
/// per the module docs. Row order is preserved for surviving rows.
///
/// # Errors
///
/// - [`WrangleError::Timestamp`] if either timestamp column fails to parse.
/// - [`WrangleError::FlagToken`] if a category-flag column holds anything
///   other than the absent sentinel or its own name.
pub fn clean_archive(rows: Vec<RawArchiveRow>) -> Result<Vec<ArchiveRecord>, WrangleError> {
    let input = rows.len();
    let mut cleaned = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(record) = clean_row(row)? {
            cleaned.push(record);
        }
    }
    tracing::debug!(
        input,
        kept = cleaned.len(),
        excluded = input - cleaned.len(),
        "archive cleaned"
    );
    Ok(cleaned)
}

/// Cleans one raw row. `Ok(None)` means the row was a repost and is
/// excluded from the canonical table.
fn clean_row(row: RawArchiveRow) -> Result<Option<ArchiveRecord>, WrangleError> {
    // Temporal coercion. Both timestamp columns must parse, including the
    // repost timestamp of rows that are about to be excluded: a value that
    // fails to parse is a data defect, not a silent null.
    let created_at = parse_timestamp(
        &row.created_at,
        ARCHIVE_TIMESTAMP_FORMAT,
        "created_at",
        row.post_id,
    )?;
    if let Some(raw) = row.retweet_of_timestamp.as_deref() {
        parse_timestamp(
            raw,
            ARCHIVE_TIMESTAMP_FORMAT,
            "retweet_of_timestamp",
            row.post_id,
        )?;
    }

    // Placeholder-name removal. Only the single known token; all other
    // names pass through untouched.
    let display_name = row
        .display_name
        .filter(|name| name != PLACEHOLDER_DISPLAY_NAME);

    // Category-flag decoding, each column independently. More than one
    // true flag per row is observed behavior and is preserved.
    let doggo = decode_category_flag(&row.doggo, "doggo", row.post_id)?;
    let floofer = decode_category_flag(&row.floofer, "floofer", row.post_id)?;
    let pupper = decode_category_flag(&row.pupper, "pupper", row.post_id)?;
    let puppo = decode_category_flag(&row.puppo, "puppo", row.post_id)?;

    // Client normalization. Unrecognized clients are tolerated as absent.
    let source_client = classify_source_client(&row.source);

    // Repost exclusion, decided last so the steps above validated the row
    // either way. The reference columns are dropped with the raw row.
    if row.retweet_of_post_id.is_some() {
        return Ok(None);
    }

    Ok(Some(ArchiveRecord {
        post_id: row.post_id,
        created_at,
        in_reply_to_post_id: row.in_reply_to_post_id,
        in_reply_to_user_id: row.in_reply_to_user_id,
        source_client,
        text: row.text,
        expanded_urls: row.expanded_urls,
        rating_numerator: row.rating_numerator,
        rating_denominator: row.rating_denominator,
        display_name,
        doggo,
        floofer,
        pupper,
        puppo,
    }))
}

/// Parses a timestamp string with the given `chrono` format, failing with
/// the field name and offending value.
pub(crate) fn parse_timestamp(
    raw: &str,
    format: &str,
    field: &'static str,
    post_id: i64,
) -> Result<DateTime<Utc>, WrangleError> {
    DateTime::parse_from_str(raw, format)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| WrangleError::Timestamp {
            field,
            post_id,
            value: raw.to_string(),
            source: e,
        })
}

/// Decodes one category-flag column: absent sentinel (or empty) to false,
/// the flag's own name to true, anything else is a fatal typed error.
fn decode_category_flag(
    raw: &str,
    flag: &'static str,
    post_id: i64,
) -> Result<bool, WrangleError> {
    if raw.is_empty() || raw == FLAG_ABSENT_TOKEN {
        return Ok(false);
    }
    if raw == flag {
        return Ok(true);
    }
    Err(WrangleError::FlagToken {
        flag,
        post_id,
        value: raw.to_string(),
    })
}

/// Maps a raw client string onto the closed category set by substring, in
/// priority order. Returns `None` for unrecognized clients.
pub(crate) fn classify_source_client(raw: &str) -> Option<SourceClient> {
    CLIENT_MARKERS.iter().find_map(|(client, markers)| {
        markers
            .iter()
            .any(|marker| raw.contains(marker))
            .then_some(*client)
    })
}

#[cfg(test)]
#[path = "clean_test.rs"]
mod tests;
