use crate::config::{Config, MediaPlatform};
use crate::media::MediaProvider;
use crate::media::select::{RandomSource, ThreadRngSource};
use crate::media::soundcloud::SoundCloudProvider;
use crate::media::youtube::YouTubeProvider;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Application state shared across all handlers.
///
/// Collaborators are injected explicitly — the provider and random source are
/// trait objects so tests can swap in doubles without process-wide globals.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Shared HTTP client for connection pooling
    pub http_client: Client,
    /// Media platform behind /api/audio
    pub provider: Arc<dyn MediaProvider>,
    /// Uniform random index source for track selection
    pub rng: Arc<dyn RandomSource>,
    /// Process start, for the health endpoint
    pub started_at: Instant,
}

fn pooled_client() -> Client {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to create HTTP client")
}

impl AppState {
    /// Create an AppState with the provider selected by the configuration.
    pub fn new(config: Config) -> Self {
        let http_client = pooled_client();

        let provider: Arc<dyn MediaProvider> = match config.platform {
            MediaPlatform::YouTube => Arc::new(YouTubeProvider::new(
                http_client.clone(),
                config.youtube_base_url.clone(),
            )),
            MediaPlatform::SoundCloud => Arc::new(SoundCloudProvider::new(
                http_client.clone(),
                config.soundcloud_base_url.clone(),
                config
                    .soundcloud_client_id
                    .clone()
                    .expect("SoundCloud platform requires SOUNDCLOUD_CLIENT_ID"),
                config.search_limit,
            )),
        };

        Self {
            config: Arc::new(config),
            http_client,
            provider,
            rng: Arc::new(ThreadRngSource),
            started_at: Instant::now(),
        }
    }

    /// Create an AppState around explicit collaborators. Test entry point.
    pub fn with_provider(
        config: Config,
        provider: Arc<dyn MediaProvider>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            http_client: pooled_client(),
            provider,
            rng,
            started_at: Instant::now(),
        }
    }
}
