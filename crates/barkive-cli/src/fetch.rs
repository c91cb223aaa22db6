//! Dataset download command handlers for the CLI.
//!
//! `fetch predictions` pulls the published classifier export over plain
//! HTTP. `fetch metadata` walks the cleaned archive's post ids and asks
//! the metadata API for each one, so it needs `BARKIVE_API_TOKEN` set.

use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;

use barkive_core::{AppConfig, DatasetManifest};
use barkive_fetch::{MetadataApiConfig, MetadataClient, DEFAULT_API_BASE_URL};

use crate::ensure_parent_dir;

/// Sub-commands available under `fetch`.
#[derive(Debug, Subcommand)]
pub enum FetchCommands {
    /// Download the published image-predictions export
    Predictions {
        /// Source URL (defaults to the manifest's predictions_url)
        #[arg(long)]
        url: Option<String>,
        /// Destination path (defaults to the manifest's predictions_path)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Fetch per-post metadata from the API for every post kept by cleaning
    Metadata {
        /// Archive CSV providing the post ids (defaults to the manifest's archive_path)
        #[arg(long)]
        archive: Option<PathBuf>,
        /// Destination path (defaults to the manifest's metadata_path)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub(crate) async fn run_fetch(
    command: FetchCommands,
    config: &AppConfig,
    manifest: &DatasetManifest,
) -> anyhow::Result<()> {
    match command {
        FetchCommands::Predictions { url, out } => {
            run_fetch_predictions(config, manifest, url, out).await
        }
        FetchCommands::Metadata { archive, out } => {
            run_fetch_metadata(config, manifest, archive, out).await
        }
    }
}

/// Download the image-predictions export to its configured location.
///
/// # Errors
///
/// Returns an error if the download fails after retries or the
/// destination cannot be written.
async fn run_fetch_predictions(
    config: &AppConfig,
    manifest: &DatasetManifest,
    url: Option<String>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let url = url.unwrap_or_else(|| manifest.predictions_url.clone());
    let dest = out.unwrap_or_else(|| manifest.predictions_path.clone());
    ensure_parent_dir(&dest)?;

    let client =
        barkive_fetch::build_http_client(config.fetch_timeout_secs, &config.fetch_user_agent)?;
    let bytes = barkive_fetch::download_predictions(
        &client,
        &url,
        &dest,
        config.fetch_max_retries,
        config.fetch_backoff_base_secs,
    )
    .await
    .with_context(|| format!("downloading predictions from {url}"))?;

    println!("downloaded {bytes} bytes to {}", dest.display());
    Ok(())
}

/// Fetch per-post metadata for every post the cleaned archive keeps.
///
/// Reposts are excluded from the master table, so their metadata is never
/// requested in the first place.
///
/// # Errors
///
/// Returns an error if no API token is configured, the archive cannot be
/// loaded or cleaned, or every metadata request fails.
async fn run_fetch_metadata(
    config: &AppConfig,
    manifest: &DatasetManifest,
    archive: Option<PathBuf>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let api_token = config.metadata_api_token.clone().ok_or_else(|| {
        anyhow::anyhow!("BARKIVE_API_TOKEN is not set; the metadata API requires a credential")
    })?;
    let archive_path = archive.unwrap_or_else(|| manifest.archive_path.clone());
    let dest = out.unwrap_or_else(|| manifest.metadata_path.clone());
    ensure_parent_dir(&dest)?;

    let raw = barkive_wrangle::load_archive(&archive_path)
        .with_context(|| format!("loading archive {}", archive_path.display()))?;
    let cleaned = barkive_wrangle::clean_archive(raw)?;
    let post_ids: Vec<i64> = cleaned.iter().map(|r| r.post_id).collect();
    println!("fetching metadata for {} posts", post_ids.len());

    let client = MetadataClient::new(MetadataApiConfig {
        base_url: config
            .metadata_api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned()),
        api_token,
        timeout_secs: config.fetch_timeout_secs,
        user_agent: config.fetch_user_agent.clone(),
        max_retries: config.fetch_max_retries,
        backoff_base_secs: config.fetch_backoff_base_secs,
        max_concurrency: config.fetch_max_concurrency,
    })?;

    let report = barkive_fetch::fetch_metadata_to_file(&client, &post_ids, &dest).await?;
    for failure in &report.failures {
        tracing::warn!(
            post_id = failure.post_id,
            reason = %failure.reason,
            "metadata fetch failure"
        );
    }
    println!(
        "wrote {} of {} metadata records to {}",
        report.written,
        report.requested,
        dest.display()
    );
    Ok(())
}
