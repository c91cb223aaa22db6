//! Report command handler: label summaries over the merged table.

use anyhow::Context;

use barkive_core::DatasetManifest;
use barkive_wrangle::{
    label_frequency, label_means, run_wrangle, top_by_mean_favorites, write_label_counts_csv,
    write_label_means_csv, WrangleInputs,
};

/// Re-run the pipeline from the manifest's inputs and print the label
/// rankings.
///
/// The merge is cheap enough to redo on demand, and reading back the
/// master CSV would only reintroduce the stringly-typed columns the
/// pipeline just escaped.
///
/// # Errors
///
/// Returns an error if the pipeline fails or, with `--write-csv`, the
/// report files cannot be written.
pub(crate) fn run_report(
    manifest: &DatasetManifest,
    top: usize,
    write_csv: bool,
) -> anyhow::Result<()> {
    let (merged, _) = run_wrangle(&WrangleInputs {
        archive_path: &manifest.archive_path,
        predictions_path: &manifest.predictions_path,
        metadata_path: &manifest.metadata_path,
    })?;

    let counts = label_frequency(&merged);
    let summaries = label_means(&merged);

    println!("top {top} labels by post count");
    println!("{:<30}{:>8}", "LABEL", "POSTS");
    for count in counts.iter().take(top) {
        println!("{:<30}{:>8}", count.label, count.posts);
    }

    println!();
    println!("top {top} labels by mean favorites");
    println!("{:<30}{:>12}", "LABEL", "FAVORITES");
    for summary in top_by_mean_favorites(&summaries, top) {
        println!("{:<30}{:>12.1}", summary.label, summary.mean_favorite_count);
    }

    if write_csv {
        std::fs::create_dir_all(&manifest.reports_dir)
            .with_context(|| format!("creating {}", manifest.reports_dir.display()))?;
        let counts_path = manifest.reports_dir.join("label-counts.csv");
        let means_path = manifest.reports_dir.join("label-means.csv");
        write_label_counts_csv(&counts_path, &counts)?;
        write_label_means_csv(&means_path, &summaries)?;
        println!();
        println!("wrote {} and {}", counts_path.display(), means_path.display());
    }
    Ok(())
}
