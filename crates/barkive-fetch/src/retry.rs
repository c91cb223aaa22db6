//! Retry with exponential backoff for transient HTTP errors.
//!
//! Wraps any fallible async operation and retries on rate limiting (429)
//! and network-level failures. Everything else is propagated immediately:
//! a 404 or a malformed payload returns the same result on every attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Returns `true` if `err` represents a transient condition worth retrying
/// after a backoff delay.
///
/// Retriable:
/// - [`FetchError::RateLimited`]: HTTP 429; the server has asked us to back off.
/// - [`FetchError::Http`]: network-level failure (connection reset, timeout).
///
/// Non-retriable (propagated immediately):
/// - [`FetchError::NotFound`]: 404; retrying would return the same result.
/// - [`FetchError::UnexpectedStatus`]: non-retriable HTTP status.
/// - [`FetchError::Deserialize`]: payload does not parse; retrying won't fix it.
/// - [`FetchError::Io`], [`FetchError::InvalidBaseUrl`], [`FetchError::AllFailed`]:
///   local conditions, not network weather.
fn is_retriable(err: &FetchError) -> bool {
    matches!(err, FetchError::RateLimited { .. } | FetchError::Http(_))
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for
/// `backoff_base_secs * 2^attempt` seconds and tries again, up to
/// `max_retries` additional attempts after the first try. If all retries
/// are exhausted the last error is returned. Non-retriable errors are
/// returned immediately without sleeping.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        // Shift capped to keep the multiply in range on extreme configs.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error; retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
