//! HTTP send with automatic retry and backoff.
//!
//! Wraps metadata requests to the upstream platform (search, track/format
//! resolution). Audio byte streams are never sent through here — once a
//! stream has started there is no retry.

use reqwest::{RequestBuilder, Response};
use std::time::Duration;
use tracing::warn;

/// Default number of attempts (1 initial + 1 retry).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Default backoff between attempts in milliseconds.
pub const DEFAULT_BACKOFF_MS: u64 = 500;

/// Configuration for [`send_with_retry`].
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts (minimum 1; 0 is treated as 1).
    pub max_attempts: u32,
    /// Sleep duration between consecutive attempts.
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
        }
    }
}

/// Send a prepared request with automatic retry and backoff.
///
/// Attempts the request up to `config.max_attempts` times, sleeping
/// `config.backoff` between attempts. Works for any method: each retry
/// re-sends a [`RequestBuilder::try_clone`] of the original, so requests with
/// a non-cloneable (streaming) body get exactly one attempt.
///
/// Returns the first successful (2xx) [`Response`], or the last error once
/// all attempts are exhausted.
///
/// # Errors
///
/// Returns the last network or non-2xx error after all retries fail.
pub async fn send_with_retry(
    request: RequestBuilder,
    config: &RetryConfig,
) -> Result<Response, reqwest::Error> {
    let max_attempts = config.max_attempts.max(1);

    // Attempts 1 through N-1 each send a clone; the original builder is kept
    // for the final attempt so a return is guaranteed without panic paths.
    for attempt in 1..max_attempts {
        let Some(cloned) = request.try_clone() else {
            break;
        };

        match cloned.send().await {
            Ok(response) if response.status().is_success() => return Ok(response),

            Ok(response) => {
                warn!(
                    "Upstream returned {} (attempt {}/{})",
                    response.status(),
                    attempt,
                    max_attempts
                );
            }

            Err(e) => {
                warn!(
                    "Upstream request failed (attempt {}/{}): {}",
                    attempt, max_attempts, e
                );
            }
        }

        tokio::time::sleep(config.backoff).await;
    }

    // Final attempt — returns directly, no further retry
    let response = request.send().await.map_err(|e| {
        warn!("Upstream request failed on final attempt: {}", e);
        e
    })?;

    response.error_for_status()
}
