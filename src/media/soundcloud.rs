//! SoundCloud adapter backed by the api-v2 endpoints the web player uses.
//!
//! Requires a client id. Stream resolution is two hops: track details list
//! the available transcodings, the progressive transcoding resolves to a CDN
//! location, and the CDN download is relayed as-is.

use crate::error::{LullError, Result};
use crate::http_retry::{RetryConfig, send_with_retry};
use crate::media::stream::passthrough_byte_stream;
use crate::media::{AUDIO_CONTENT_TYPE, AudioStream, Candidate, MediaProvider, SearchQuery};
use crate::metrics;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

pub struct SoundCloudProvider {
    client: Client,
    base_url: String,
    client_id: String,
    limit: u32,
}

impl SoundCloudProvider {
    pub fn new(client: Client, base_url: String, client_id: String, limit: u32) -> Self {
        Self {
            client,
            base_url,
            client_id,
            limit,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    collection: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    id: u64,
    title: Option<String>,
    description: Option<String>,
    /// Track length in milliseconds
    duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TrackDetails {
    media: Option<TrackMedia>,
}

#[derive(Debug, Deserialize)]
struct TrackMedia {
    #[serde(default)]
    transcodings: Vec<Transcoding>,
}

#[derive(Debug, Deserialize)]
struct Transcoding {
    url: String,
    format: TranscodingFormat,
}

#[derive(Debug, Deserialize)]
struct TranscodingFormat {
    protocol: String,
}

#[derive(Debug, Deserialize)]
struct StreamLocation {
    url: String,
}

impl From<TrackItem> for Candidate {
    fn from(item: TrackItem) -> Self {
        Candidate {
            id: item.id.to_string(),
            title: item.title.unwrap_or_default(),
            description: item.description,
            duration_secs: item.duration.map(|ms| ms / 1000),
        }
    }
}

/// The non-HLS transcoding, downloadable with a single GET.
fn pick_progressive(transcodings: Vec<Transcoding>) -> Option<Transcoding> {
    transcodings
        .into_iter()
        .find(|t| t.format.protocol == "progressive")
}

#[async_trait]
impl MediaProvider for SoundCloudProvider {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>> {
        let url = format!("{}/search/tracks", self.base_url);
        let request = self.client.get(&url).query(&[
            ("q", query.platform_query().as_str()),
            ("client_id", self.client_id.as_str()),
            ("limit", self.limit.to_string().as_str()),
            // Native long-form hint; the duration filter downstream decides.
            ("filter.duration", "long"),
        ]);

        let response = send_with_retry(request, &RetryConfig::default())
            .await
            .inspect_err(|_| metrics::record_upstream_error("soundcloud"))?;

        let page: SearchPage = response.json().await?;
        let candidates: Vec<Candidate> = page
            .collection
            .into_iter()
            .filter(|item| item.title.is_some())
            .map(Candidate::from)
            .collect();

        info!(
            "SoundCloud search for \"{}\" returned {} candidates",
            query.platform_query(),
            candidates.len()
        );
        Ok(candidates)
    }

    async fn open_stream(&self, candidate: &Candidate) -> Result<AudioStream> {
        // Hop 1: track details → transcoding list
        let details_url = format!("{}/tracks/{}", self.base_url, candidate.id);
        let request = self
            .client
            .get(&details_url)
            .query(&[("client_id", self.client_id.as_str())]);
        let response = send_with_retry(request, &RetryConfig::default())
            .await
            .inspect_err(|_| metrics::record_upstream_error("soundcloud"))?;
        let details: TrackDetails = response.json().await?;

        let transcoding = pick_progressive(
            details.media.map(|m| m.transcodings).unwrap_or_default(),
        )
        .ok_or_else(|| LullError::NoPlayableFormat(candidate.id.clone()))?;

        // Hop 2: transcoding → signed CDN location
        let request = self
            .client
            .get(&transcoding.url)
            .query(&[("client_id", self.client_id.as_str())]);
        let response = send_with_retry(request, &RetryConfig::default())
            .await
            .inspect_err(|_| metrics::record_upstream_error("soundcloud"))?;
        let location: StreamLocation = response.json().await?;

        info!("Streaming track {} from CDN", candidate.id);

        // Hop 3: the download itself — no retry once bytes flow
        let response = self
            .client
            .get(&location.url)
            .send()
            .await?
            .error_for_status()?;

        Ok(AudioStream {
            content_type: AUDIO_CONTENT_TYPE.to_string(),
            bytes: passthrough_byte_stream(response),
        })
    }

    fn media_noun(&self) -> &'static str {
        "tracks"
    }

    fn source_name(&self) -> &'static str {
        "soundcloud"
    }
}
