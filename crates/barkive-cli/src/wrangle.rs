//! Wrangle command handler: run the cleaning pipeline and write the
//! master table.

use std::path::PathBuf;

use anyhow::Context;

use barkive_core::DatasetManifest;
use barkive_wrangle::{run_wrangle, write_master_csv, WrangleInputs};

use crate::ensure_parent_dir;

/// Clean the three sources, merge them, and write the master table.
///
/// # Errors
///
/// Returns an error if any input is missing or malformed, or the master
/// table cannot be written. Nothing is written on failure.
pub(crate) fn run_wrangle_cmd(
    manifest: &DatasetManifest,
    archive: Option<PathBuf>,
    predictions: Option<PathBuf>,
    metadata: Option<PathBuf>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let archive_path = archive.unwrap_or_else(|| manifest.archive_path.clone());
    let predictions_path = predictions.unwrap_or_else(|| manifest.predictions_path.clone());
    let metadata_path = metadata.unwrap_or_else(|| manifest.metadata_path.clone());
    let master_path = out.unwrap_or_else(|| manifest.master_path.clone());

    let (merged, summary) = run_wrangle(&WrangleInputs {
        archive_path: &archive_path,
        predictions_path: &predictions_path,
        metadata_path: &metadata_path,
    })?;

    ensure_parent_dir(&master_path)?;
    write_master_csv(&master_path, &merged)
        .with_context(|| format!("writing master table to {}", master_path.display()))?;

    println!(
        "archive:     {} rows read, {} kept",
        summary.archive_rows, summary.archive_kept
    );
    println!(
        "metadata:    {} rows read, {} kept",
        summary.metadata_rows, summary.metadata_kept
    );
    println!("predictions: {} rows read", summary.prediction_rows);
    println!(
        "master:      {} rows written to {}",
        summary.merged_rows,
        master_path.display()
    );
    Ok(())
}
