//! Merge engine: two sequential inner joins on `post_id`.
//!
//! Metadata joins archive first, then the pair joins predictions. A post
//! missing from any source is absent from the result; the merged table's
//! unit of analysis is "a post with full metadata, archive data, and an
//! image classification", and partial records are out of scope rather
//! than null-padded. Row order follows the metadata table.
//!
//! Join keys are assumed unique per input at merge time. When an input
//! does carry duplicates, matching rows are multiplied rather than
//! rejected; this mirrors the source artifact's behavior and is logged as
//! a warning. See DESIGN.md for the decision record.

use std::collections::{HashMap, HashSet};

use barkive_core::{
    ArchiveRecord, MergedRecord, MetadataRecord, PredictionRecord, ARCHIVE_COLUMNS,
    METADATA_COLUMNS, PREDICTION_COLUMNS,
};

use crate::error::WrangleError;

const JOIN_KEY: &str = "post_id";

/// The master table's flat header: the three column registries
/// concatenated, with the join key emitted once.
///
/// # Errors
///
/// Returns [`WrangleError::ColumnCollision`] if any non-key column is
/// registered by more than one table. A silent collision would corrupt
/// the analysis, so this is checked every run even though the registries
/// are constants.
pub fn merged_header() -> Result<Vec<&'static str>, WrangleError> {
    collect_unique_columns(&[&METADATA_COLUMNS, &ARCHIVE_COLUMNS, &PREDICTION_COLUMNS])
}

fn collect_unique_columns(
    tables: &[&[&'static str]],
) -> Result<Vec<&'static str>, WrangleError> {
    let mut header = Vec::new();
    let mut seen = HashSet::new();
    for columns in tables {
        for &column in *columns {
            if column == JOIN_KEY {
                if seen.insert(column) {
                    header.push(column);
                }
                continue;
            }
            if !seen.insert(column) {
                return Err(WrangleError::ColumnCollision {
                    column: column.to_string(),
                });
            }
            header.push(column);
        }
    }
    Ok(header)
}

/// Merges the three cleaned tables into one.
///
/// # Errors
///
/// Returns [`WrangleError::ColumnCollision`] if the flat column
/// registries overlap; the join itself cannot fail.
pub fn merge_records(
    metadata: Vec<MetadataRecord>,
    archive: Vec<ArchiveRecord>,
    predictions: Vec<PredictionRecord>,
) -> Result<Vec<MergedRecord>, WrangleError> {
    merged_header()?;

    for (table, duplicates) in [
        ("metadata", duplicate_key_count(metadata.iter().map(|r| r.post_id))),
        ("archive", duplicate_key_count(archive.iter().map(|r| r.post_id))),
        (
            "predictions",
            duplicate_key_count(predictions.iter().map(|r| r.post_id)),
        ),
    ] {
        if duplicates > 0 {
            tracing::warn!(
                table,
                duplicates,
                "duplicate join keys; matching rows are multiplied in the merge"
            );
        }
    }

    let archive_index = index_by_id(archive, |r| r.post_id);
    let prediction_index = index_by_id(predictions, |r| r.post_id);

    let paired = inner_join(metadata, &archive_index, |m| m.post_id);
    let merged: Vec<MergedRecord> = inner_join(paired, &prediction_index, |(m, _)| m.post_id)
        .into_iter()
        .map(|((metadata, archive), prediction)| MergedRecord {
            metadata,
            archive,
            prediction,
        })
        .collect();

    tracing::info!(rows = merged.len(), "merge complete");
    Ok(merged)
}

fn index_by_id<T>(rows: Vec<T>, key: impl Fn(&T) -> i64) -> HashMap<i64, Vec<T>> {
    let mut index: HashMap<i64, Vec<T>> = HashMap::new();
    for row in rows {
        index.entry(key(&row)).or_default().push(row);
    }
    index
}

fn duplicate_key_count(ids: impl Iterator<Item = i64>) -> usize {
    let mut seen = HashSet::new();
    let mut duplicated = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            duplicated.insert(id);
        }
    }
    duplicated.len()
}

/// One inner join pass: left rows in order, each matched against the
/// right-side index. Left rows without a match are dropped; multiple
/// matches multiply.
fn inner_join<L: Clone, R: Clone>(
    left: Vec<L>,
    right: &HashMap<i64, Vec<R>>,
    key: impl Fn(&L) -> i64,
) -> Vec<(L, R)> {
    let mut joined = Vec::new();
    for l in left {
        if let Some(matches) = right.get(&key(&l)) {
            for r in matches {
                joined.push((l.clone(), r.clone()));
            }
        }
    }
    joined
}
