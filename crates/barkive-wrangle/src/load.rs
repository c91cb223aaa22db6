//! Record loaders for the three raw sources.
//!
//! All three loaders are all-or-nothing: one malformed row fails the whole
//! load. This is a batch tool, not a streaming ingester, and partial tables
//! would silently skew every downstream aggregate.

use std::path::Path;

use barkive_core::PredictionRecord;

use crate::error::WrangleError;
use crate::types::{RawArchiveRow, RawMetadataRecord, RawPredictionRow};

/// Loads the primary post archive from a comma-delimited file.
///
/// Rows come back raw: sentinel decoding and client normalization belong
/// to the cleaner.
///
/// # Errors
///
/// Returns [`WrangleError::Csv`] if the file cannot be opened or any row
/// fails to parse.
pub fn load_archive(path: &Path) -> Result<Vec<RawArchiveRow>, WrangleError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: RawArchiveRow = result.map_err(|e| csv_error(path, e))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Loads the image-predictions table from a tab-delimited file.
///
/// There is no separate cleaning stage for this source, so the wide
/// `p1..p3` columns are folded into canonical records here.
///
/// # Errors
///
/// Returns [`WrangleError::Csv`] if the file cannot be opened or any row
/// fails to parse.
pub fn load_predictions(path: &Path) -> Result<Vec<PredictionRecord>, WrangleError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let row: RawPredictionRow = result.map_err(|e| csv_error(path, e))?;
        records.push(row.into_record());
    }
    Ok(records)
}

/// Loads per-post metadata from a newline-delimited JSON file.
///
/// The source contract is one JSON object per line. A file framed as a
/// JSON array is rejected outright rather than being partially read, and
/// any unparseable non-blank line is fatal with its 1-based line number.
/// Blank lines (a trailing newline, padding) are skipped.
///
/// # Errors
///
/// - [`WrangleError::Io`] if the file cannot be read.
/// - [`WrangleError::ArrayFraming`] if the content is a JSON array.
/// - [`WrangleError::JsonLine`] if any line fails to parse.
pub fn load_metadata(path: &Path) -> Result<Vec<RawMetadataRecord>, WrangleError> {
    let content = std::fs::read_to_string(path).map_err(|e| WrangleError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    if content.trim_start().starts_with('[') {
        return Err(WrangleError::ArrayFraming {
            path: path.display().to_string(),
        });
    }

    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: RawMetadataRecord =
            serde_json::from_str(line).map_err(|e| WrangleError::JsonLine {
                path: path.display().to_string(),
                line: idx + 1,
                source: e,
            })?;
        records.push(record);
    }
    Ok(records)
}

pub(crate) fn csv_error(path: &Path, source: csv::Error) -> WrangleError {
    WrangleError::Csv {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_fixture(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(content.as_bytes()).expect("write fixture");
        file
    }

    const ARCHIVE_HEADER: &str = "post_id,in_reply_to_post_id,in_reply_to_user_id,created_at,source,text,retweet_of_post_id,retweet_of_user_id,retweet_of_timestamp,expanded_urls,rating_numerator,rating_denominator,display_name,doggo,floofer,pupper,puppo";

    #[test]
    fn load_archive_parses_typed_columns() {
        let file = write_fixture(&format!(
            "{ARCHIVE_HEADER}\n\
             1,,,2017-08-01 16:23:56 +0000,<a href=\"http://pawter.com/download/iphone\" rel=\"nofollow\">Pawter for iPhone</a>,good dog,,,,https://pawter.com/p/1,13,10,Phineas,None,None,None,None\n"
        ));
        let rows = load_archive(file.path()).expect("archive should load");
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.post_id, 1);
        assert!(row.in_reply_to_post_id.is_none());
        assert!(row.retweet_of_post_id.is_none());
        assert_eq!(row.created_at, "2017-08-01 16:23:56 +0000");
        assert_eq!(row.display_name.as_deref(), Some("Phineas"));
        assert_eq!(row.doggo, "None");
        assert_eq!(row.rating_numerator, 13);
    }

    #[test]
    fn load_archive_decodes_none_token_display_name() {
        let file = write_fixture(&format!(
            "{ARCHIVE_HEADER}\n\
             1,,,2017-08-01 16:23:56 +0000,src,text,,,,,10,10,None,None,None,None,None\n"
        ));
        let rows = load_archive(file.path()).expect("archive should load");
        assert!(rows[0].display_name.is_none());
    }

    #[test]
    fn load_archive_keeps_optional_reply_and_repost_ids() {
        let file = write_fixture(&format!(
            "{ARCHIVE_HEADER}\n\
             2,42,77,2017-08-01 16:23:56 +0000,src,text,999,888,2017-07-01 10:00:00 +0000,,10,10,None,None,None,None,None\n"
        ));
        let rows = load_archive(file.path()).expect("archive should load");
        assert_eq!(rows[0].in_reply_to_post_id, Some(42));
        assert_eq!(rows[0].retweet_of_post_id, Some(999));
        assert_eq!(
            rows[0].retweet_of_timestamp.as_deref(),
            Some("2017-07-01 10:00:00 +0000")
        );
    }

    #[test]
    fn load_archive_fails_on_malformed_row() {
        let file = write_fixture(&format!(
            "{ARCHIVE_HEADER}\n\
             not-a-number,,,2017-08-01 16:23:56 +0000,src,text,,,,,10,10,None,None,None,None,None\n"
        ));
        let result = load_archive(file.path());
        assert!(matches!(result, Err(WrangleError::Csv { .. })));
    }

    #[test]
    fn load_archive_missing_file_is_csv_error() {
        let result = load_archive(Path::new("no/such/archive.csv"));
        assert!(matches!(result, Err(WrangleError::Csv { .. })));
    }

    const PREDICTIONS_HEADER: &str =
        "post_id\timage_url\timage_slot\tp1\tp1_conf\tp1_dog\tp2\tp2_conf\tp2_dog\tp3\tp3_conf\tp3_dog";

    #[test]
    fn load_predictions_parses_tab_delimited_rows() {
        let file = write_fixture(&format!(
            "{PREDICTIONS_HEADER}\n\
             1\thttps://img.example.com/1.jpg\t1\tlabrador\t0.9\tTrue\tkuvasz\t0.08\tTrue\tbanana\t0.02\tFalse\n"
        ));
        let records = load_predictions(file.path()).expect("predictions should load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].post_id, 1);
        assert_eq!(records[0].image_slot, 1);
        assert_eq!(records[0].guesses[0].label, "labrador");
        assert!(records[0].guesses[0].is_canine);
        assert_eq!(records[0].guesses[2].label, "banana");
        assert!(!records[0].guesses[2].is_canine);
    }

    #[test]
    fn load_predictions_accepts_lowercase_booleans() {
        let file = write_fixture(&format!(
            "{PREDICTIONS_HEADER}\n\
             1\tu\t1\ta\t0.5\ttrue\tb\t0.3\tfalse\tc\t0.2\tfalse\n"
        ));
        let records = load_predictions(file.path()).expect("predictions should load");
        assert!(records[0].guesses[0].is_canine);
        assert!(!records[0].guesses[1].is_canine);
    }

    #[test]
    fn load_predictions_fails_on_bad_boolean_token() {
        let file = write_fixture(&format!(
            "{PREDICTIONS_HEADER}\n\
             1\tu\t1\ta\t0.5\tyes\tb\t0.3\tfalse\tc\t0.2\tfalse\n"
        ));
        let result = load_predictions(file.path());
        assert!(matches!(result, Err(WrangleError::Csv { .. })));
    }

    fn metadata_line(id: i64) -> String {
        format!(
            r#"{{"id": {id}, "created_at": "Tue Aug 01 16:23:56 +0000 2017", "full_text": "good dog", "display_text_range": [0, 85], "retweet_count": 10, "favorite_count": 50}}"#
        )
    }

    #[test]
    fn load_metadata_reads_one_record_per_line() {
        let file = write_fixture(&format!("{}\n{}\n", metadata_line(1), metadata_line(2)));
        let records = load_metadata(file.path()).expect("metadata should load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[1].id, 2);
    }

    #[test]
    fn load_metadata_skips_blank_lines() {
        let file = write_fixture(&format!("{}\n\n{}\n\n", metadata_line(1), metadata_line(2)));
        let records = load_metadata(file.path()).expect("metadata should load");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn load_metadata_rejects_array_framing() {
        let file = write_fixture("[\n  {\"id\": 1}\n]\n");
        let result = load_metadata(file.path());
        assert!(matches!(result, Err(WrangleError::ArrayFraming { .. })));
    }

    #[test]
    fn load_metadata_reports_failing_line_number() {
        let file = write_fixture(&format!("{}\nnot json\n", metadata_line(1)));
        let result = load_metadata(file.path());
        match result {
            Err(WrangleError::JsonLine { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected JsonLine error, got: {other:?}"),
        }
    }

    #[test]
    fn load_metadata_missing_file_is_io_error() {
        let result = load_metadata(Path::new("no/such/metadata.ndjson"));
        assert!(matches!(result, Err(WrangleError::Io { .. })));
    }
}
