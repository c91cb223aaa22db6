//! CSV writers for the master table and the summary reports.
//!
//! The master table is the pipeline's one durable artifact. Optional
//! values serialize as empty fields, timestamps as RFC 3339, and the
//! column order is fixed by the registries in `barkive_core` so the file
//! round-trips through any downstream CSV reader without a schema.

use std::path::Path;

use barkive_core::MergedRecord;

use crate::error::WrangleError;
use crate::load::csv_error;
use crate::merge::merged_header;
use crate::report::{LabelCount, LabelSummary};

/// Writes the merged table to `path` as a flat CSV.
///
/// # Errors
///
/// Returns [`WrangleError::ColumnCollision`] if the column registries
/// overlap, [`WrangleError::Csv`] on serialization failure, and
/// [`WrangleError::Io`] if the flush fails.
pub fn write_master_csv(path: &Path, records: &[MergedRecord]) -> Result<(), WrangleError> {
    let header = merged_header()?;
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    writer.write_record(&header).map_err(|e| csv_error(path, e))?;
    for record in records {
        writer
            .write_record(&master_row(record))
            .map_err(|e| csv_error(path, e))?;
    }
    flush(writer, path)?;
    tracing::info!(path = %path.display(), rows = records.len(), "wrote master table");
    Ok(())
}

/// Writes the label frequency report.
///
/// # Errors
///
/// Returns [`WrangleError::Csv`] on serialization failure and
/// [`WrangleError::Io`] if the flush fails.
pub fn write_label_counts_csv(path: &Path, counts: &[LabelCount]) -> Result<(), WrangleError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    writer
        .write_record(["label", "posts"])
        .map_err(|e| csv_error(path, e))?;
    for count in counts {
        writer
            .write_record([count.label.as_str(), &count.posts.to_string()])
            .map_err(|e| csv_error(path, e))?;
    }
    flush(writer, path)
}

/// Writes the per-label means report.
///
/// # Errors
///
/// Returns [`WrangleError::Csv`] on serialization failure and
/// [`WrangleError::Io`] if the flush fails.
pub fn write_label_means_csv(path: &Path, summaries: &[LabelSummary]) -> Result<(), WrangleError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    writer
        .write_record([
            "label",
            "posts",
            "mean_confidence",
            "mean_rating_numerator",
            "mean_rating_denominator",
            "mean_doggo",
            "mean_floofer",
            "mean_pupper",
            "mean_puppo",
            "mean_retweet_count",
            "mean_favorite_count",
        ])
        .map_err(|e| csv_error(path, e))?;
    for summary in summaries {
        writer
            .write_record([
                summary.label.clone(),
                summary.posts.to_string(),
                summary.mean_confidence.to_string(),
                summary.mean_rating_numerator.to_string(),
                summary.mean_rating_denominator.to_string(),
                summary.mean_doggo.to_string(),
                summary.mean_floofer.to_string(),
                summary.mean_pupper.to_string(),
                summary.mean_puppo.to_string(),
                summary.mean_retweet_count.to_string(),
                summary.mean_favorite_count.to_string(),
            ])
            .map_err(|e| csv_error(path, e))?;
    }
    flush(writer, path)
}

fn flush<W: std::io::Write>(mut writer: csv::Writer<W>, path: &Path) -> Result<(), WrangleError> {
    writer.flush().map_err(|source| WrangleError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// One master-table row, in registry column order with the join key
/// emitted once.
fn master_row(record: &MergedRecord) -> Vec<String> {
    let metadata = &record.metadata;
    let archive = &record.archive;
    let prediction = &record.prediction;
    let mut row = vec![
        metadata.post_id.to_string(),
        metadata.created_at.to_rfc3339(),
        metadata.full_text.clone(),
        metadata
            .display_text_range
            .map_or_else(String::new, |[lo, hi]| format!("[{lo}, {hi}]")),
        metadata.retweet_count.to_string(),
        metadata.favorite_count.to_string(),
        archive.created_at.to_rfc3339(),
        archive
            .in_reply_to_post_id
            .map_or_else(String::new, |id| id.to_string()),
        archive
            .in_reply_to_user_id
            .map_or_else(String::new, |id| id.to_string()),
        archive
            .source_client
            .map_or_else(String::new, |client| client.as_str().to_string()),
        archive.text.clone(),
        archive.expanded_urls.clone().unwrap_or_default(),
        archive.rating_numerator.to_string(),
        archive.rating_denominator.to_string(),
        archive.display_name.clone().unwrap_or_default(),
        archive.doggo.to_string(),
        archive.floofer.to_string(),
        archive.pupper.to_string(),
        archive.puppo.to_string(),
        prediction.image_url.clone(),
        prediction.image_slot.to_string(),
    ];
    for guess in &prediction.guesses {
        row.push(guess.label.clone());
        row.push(guess.confidence.to_string());
        row.push(guess.is_canine.to_string());
    }
    row
}
