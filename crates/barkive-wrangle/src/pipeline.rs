//! End-to-end wrangle pass: load, clean, merge.
//!
//! The export step stays out of this module so callers can inspect the
//! merged records (or run reports on them) without touching the
//! filesystem again.

use std::path::Path;

use barkive_core::MergedRecord;

use crate::clean::clean_archive;
use crate::error::WrangleError;
use crate::load::{load_archive, load_metadata, load_predictions};
use crate::merge::merge_records;
use crate::normalize::normalize_metadata;

/// Paths to the three source tables.
#[derive(Debug, Clone, Copy)]
pub struct WrangleInputs<'a> {
    pub archive_path: &'a Path,
    pub predictions_path: &'a Path,
    pub metadata_path: &'a Path,
}

/// Row counts observed during a wrangle pass, for operator-facing
/// summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrangleSummary {
    pub archive_rows: usize,
    pub archive_kept: usize,
    pub metadata_rows: usize,
    pub metadata_kept: usize,
    pub prediction_rows: usize,
    pub merged_rows: usize,
}

/// Runs the full wrangle pass over the three sources.
///
/// # Errors
///
/// Fails on unreadable or malformed inputs, on unparseable timestamps or
/// category-flag tokens, and on a flat column collision. Any failure
/// aborts the pass; there is no partial output.
pub fn run_wrangle(
    inputs: &WrangleInputs<'_>,
) -> Result<(Vec<MergedRecord>, WrangleSummary), WrangleError> {
    tracing::info!(path = %inputs.archive_path.display(), "loading archive");
    let raw_archive = load_archive(inputs.archive_path)?;
    let archive_rows = raw_archive.len();
    let archive = clean_archive(raw_archive)?;

    tracing::info!(path = %inputs.metadata_path.display(), "loading metadata");
    let raw_metadata = load_metadata(inputs.metadata_path)?;
    let metadata_rows = raw_metadata.len();
    let metadata = normalize_metadata(raw_metadata)?;

    tracing::info!(path = %inputs.predictions_path.display(), "loading predictions");
    let predictions = load_predictions(inputs.predictions_path)?;
    let prediction_rows = predictions.len();

    let archive_kept = archive.len();
    let metadata_kept = metadata.len();
    let merged = merge_records(metadata, archive, predictions)?;
    let summary = WrangleSummary {
        archive_rows,
        archive_kept,
        metadata_rows,
        metadata_kept,
        prediction_rows,
        merged_rows: merged.len(),
    };
    Ok((merged, summary))
}
