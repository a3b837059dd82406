//! Byte-stream plumbing between upstream downloads and HTTP response bodies.
//!
//! Both helpers produce pull-based streams: nothing is fetched from upstream
//! until the response body asks for the next chunk, so backpressure from a
//! slow client reaches the platform download. A producer error terminates the
//! stream; there is no mid-stream recovery.

use crate::error::{LullError, Result};
use axum::body::Bytes;
use futures_util::{
    StreamExt, TryStreamExt,
    stream::{self, BoxStream},
};
use reqwest::{Client, header::RANGE};

/// Read-buffer bound for ranged downloads. Each chunk is fetched with its own
/// Range request and held in memory only until the consumer takes it.
pub const DEFAULT_CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// Download `url` in discrete ranged chunks of at most `chunk_size` bytes.
///
/// Issues sequential `Range: bytes=start-end` requests, yielding each chunk
/// in order until `total_len` bytes have been delivered or the upstream stops
/// short. Memory use is bounded by one chunk.
pub fn ranged_byte_stream(
    client: Client,
    url: String,
    total_len: u64,
    chunk_size: u64,
) -> BoxStream<'static, Result<Bytes>> {
    let chunk_size = chunk_size.max(1);

    stream::try_unfold(
        (client, url, 0u64),
        move |(client, url, offset)| async move {
            if offset >= total_len {
                return Ok::<_, LullError>(None);
            }

            let end = (offset + chunk_size).min(total_len) - 1;
            let response = client
                .get(&url)
                .header(RANGE, format!("bytes={offset}-{end}"))
                .send()
                .await?
                .error_for_status()?;

            let chunk = response.bytes().await?;
            if chunk.is_empty() {
                // Upstream ended earlier than the advertised length.
                return Ok(None);
            }

            let next = offset + chunk.len() as u64;
            Ok(Some((chunk, (client, url, next))))
        },
    )
    .boxed()
}

/// Relay a response body as-is, chunk for chunk, converting transport errors
/// into application errors. Used for progressive sources that stream from a
/// single GET.
pub fn passthrough_byte_stream(response: reqwest::Response) -> BoxStream<'static, Result<Bytes>> {
    response.bytes_stream().map_err(LullError::from).boxed()
}
