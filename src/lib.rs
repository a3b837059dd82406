//! lull — ambient audio relay for a browser focus timer.
//!
//! One endpoint: `GET /api/audio?theme=<mood>`. Searches the configured
//! platform (YouTube or SoundCloud) for long-form ambient tracks matching the
//! theme, picks one uniformly at random, and relays its audio bytes as a
//! chunked stream. Also serves the static timer UI, a health endpoint, and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod http_retry;
pub mod media;
pub mod metrics;
pub mod server;
