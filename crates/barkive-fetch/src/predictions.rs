//! Download of the published image-predictions export.

use std::path::Path;

use reqwest::Client;

use crate::client::host_of;
use crate::error::FetchError;
use crate::retry::retry_with_backoff;

/// Downloads the predictions export at `url` into `dest`, returning the
/// number of bytes written.
///
/// The body is buffered in memory and written in one pass; the export is
/// a few megabytes at most. Transient failures retry with exponential
/// backoff before anything touches the destination file.
///
/// # Errors
///
/// - [`FetchError::RateLimited`]: HTTP 429 after all retries exhausted.
/// - [`FetchError::NotFound`]: HTTP 404 (not retried).
/// - [`FetchError::UnexpectedStatus`]: any other non-2xx status (not retried).
/// - [`FetchError::Http`]: network failure after all retries exhausted.
/// - [`FetchError::Io`]: the destination file cannot be written.
pub async fn download_predictions(
    client: &Client,
    url: &str,
    dest: &Path,
    max_retries: u32,
    backoff_base_secs: u64,
) -> Result<usize, FetchError> {
    let body = retry_with_backoff(max_retries, backoff_base_secs, || async move {
        let response = client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(FetchError::RateLimited {
                host: host_of(url),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    })
    .await?;

    tokio::fs::write(dest, &body)
        .await
        .map_err(|source| FetchError::Io {
            path: dest.display().to_string(),
            source,
        })?;

    tracing::info!(
        url,
        path = %dest.display(),
        bytes = body.len(),
        "downloaded predictions export"
    );
    Ok(body.len())
}
