//! Bounded-concurrency metadata fetch to an NDJSON file.
//!
//! Requests run through a worker pool capped at the client's configured
//! concurrency, but results are written in input order (`buffered`, not
//! `buffer_unordered`) so two runs over the same id list produce
//! byte-identical files. A failed post is recorded and skipped; only a
//! run where every request fails is an error.

use std::path::Path;

use futures::stream::{self, StreamExt};
use tokio::io::AsyncWriteExt;

use crate::client::MetadataClient;
use crate::error::FetchError;

/// One post the API run could not serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFailure {
    pub post_id: i64,
    pub reason: String,
}

/// Outcome of a metadata fetch run.
#[derive(Debug)]
pub struct FetchReport {
    pub requested: usize,
    pub written: usize,
    pub failures: Vec<PostFailure>,
}

/// Fetches metadata for every id in `post_ids` and writes one compact
/// JSON record per line to `dest`.
///
/// Payloads are re-serialized from parsed JSON, so each record occupies
/// exactly one line regardless of how the API formatted its response.
///
/// # Errors
///
/// Returns [`FetchError::Io`] if the destination cannot be created or
/// written, and [`FetchError::AllFailed`] if `post_ids` is non-empty and
/// no request succeeded. Individual failures are reported in the
/// returned [`FetchReport`], not as errors.
pub async fn fetch_metadata_to_file(
    client: &MetadataClient,
    post_ids: &[i64],
    dest: &Path,
) -> Result<FetchReport, FetchError> {
    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|source| io_error(dest, source))?;

    let concurrency = client.max_concurrency().max(1);
    let mut results = stream::iter(post_ids.iter().copied())
        .map(|post_id| async move { (post_id, client.fetch_post(post_id).await) })
        .buffered(concurrency);

    let mut written = 0usize;
    let mut failures = Vec::new();
    while let Some((post_id, outcome)) = results.next().await {
        match outcome {
            Ok(payload) => {
                let line = payload.to_string();
                file.write_all(line.as_bytes())
                    .await
                    .map_err(|source| io_error(dest, source))?;
                file.write_all(b"\n")
                    .await
                    .map_err(|source| io_error(dest, source))?;
                written += 1;
            }
            Err(err) => {
                tracing::warn!(post_id, error = %err, "metadata fetch failed for post");
                failures.push(PostFailure {
                    post_id,
                    reason: err.to_string(),
                });
            }
        }
    }
    file.flush().await.map_err(|source| io_error(dest, source))?;

    if written == 0 && !post_ids.is_empty() {
        return Err(FetchError::AllFailed {
            failed: failures.len(),
        });
    }

    tracing::info!(
        requested = post_ids.len(),
        written,
        failed = failures.len(),
        path = %dest.display(),
        "metadata fetch complete"
    );
    Ok(FetchReport {
        requested: post_ids.len(),
        written,
        failures,
    })
}

fn io_error(path: &Path, source: std::io::Error) -> FetchError {
    FetchError::Io {
        path: path.display().to_string(),
        source,
    }
}
