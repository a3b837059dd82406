pub mod select;
pub mod soundcloud;
pub mod stream;
pub mod youtube;

use crate::error::Result;
use async_trait::async_trait;
use axum::body::Bytes;
use futures_util::stream::BoxStream;

/// Content type for relayed audio. Upstream containers vary (mp3, m4a, webm);
/// the frontend's `<audio>` element sniffs the actual codec.
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Fixed suffix appended to every theme to steer platform search
/// toward ambient material.
const QUERY_SUFFIX: &str = "ambient music";

/// A validated, non-empty search theme.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    theme: String,
}

impl SearchQuery {
    /// Build a query from a raw `theme` parameter. Returns `None` for an
    /// empty or whitespace-only theme.
    pub fn new(theme: &str) -> Option<Self> {
        let theme = theme.trim();
        if theme.is_empty() {
            return None;
        }
        Some(Self {
            theme: theme.to_string(),
        })
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// The full query string sent to the platform.
    pub fn platform_query(&self) -> String {
        format!("{} {}", self.theme, QUERY_SUFFIX)
    }
}

/// A search-result item with the metadata the filter needs.
/// Transient — produced by a search call, discarded after selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Platform-specific track/video id
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Parsed defensively — upstream duration fields may be absent or
    /// malformed, and such candidates never qualify.
    pub duration_secs: Option<u64>,
}

/// An open audio byte stream plus its content type. Owned by the response for
/// the rest of the request; chunks are pulled as the client consumes them.
pub struct AudioStream {
    pub content_type: String,
    pub bytes: BoxStream<'static, Result<Bytes>>,
}

/// A media platform that can search for candidates and open an audio stream
/// for a selected one.
///
/// Implementations are injected into [`AppState`](crate::server::state::AppState)
/// so handlers stay decoupled from the backing platform and tests can supply
/// doubles.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Search the platform for candidates matching the query, preferring
    /// long-form results where the platform supports that natively.
    ///
    /// Result order is whatever the platform returned — not stable, not
    /// meaningful.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>>;

    /// Resolve a playable audio source for the candidate and open a stream.
    ///
    /// Policy: lowest-bitrate audio-only format available — this relay
    /// minimizes bandwidth, not quality.
    async fn open_stream(&self, candidate: &Candidate) -> Result<AudioStream>;

    /// Noun used in the empty-result message ("videos" or "tracks").
    fn media_noun(&self) -> &'static str;

    /// Short platform name for logs and the health endpoint.
    fn source_name(&self) -> &'static str;
}
