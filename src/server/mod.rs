pub mod handlers;
pub mod state;

use crate::config::Config;
use crate::metrics;
use axum::{
    Router,
    http::{HeaderValue, header},
    routing::get,
};
use state::AppState;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};

/// Build the router with state assembled from the configuration.
pub fn build_router(config: Config) -> Router {
    build_router_with(AppState::new(config))
}

/// Build the router around an explicit AppState. Tests inject provider and
/// random-source doubles through this entry point.
pub fn build_router_with(state: AppState) -> Router {
    let prometheus = metrics::install();
    let www_root = state.config.www_root.clone();

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(move || async move { prometheus.render() }))
        .route(
            "/api/audio",
            get(handlers::audio::serve_audio)
                .post(handlers::audio::serve_audio)
                .options(handlers::audio::preflight),
        )
        // Static timer frontend; anything unrouted falls through to it
        .fallback_service(ServeDir::new(www_root))
        // Frontend is served cross-origin during development
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::HeaderName::from_static("x-lull-version"),
            HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
        ))
        .with_state(state)
}

/// Start the Axum HTTP server
pub async fn start(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("0.0.0.0:{}", config.port);
    let app = build_router(config);

    // Bind TCP listener
    let listener = match tokio::net::TcpListener::bind(addr.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    info!("🎧 Server listening on http://{}", addr);

    // Start serving
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
