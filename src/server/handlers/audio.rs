use crate::{
    error::{LullError, Result},
    media::SearchQuery,
    media::select::{filter_candidates, pick},
    metrics,
    server::state::AppState,
};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::time::Instant;
use tracing::info;

/// Relayed audio is cacheable for an hour.
const CACHE_CONTROL_VALUE: &str = "public, max-age=3600";

/// GET /api/audio?theme=<string>
///
/// Search the platform for long-form ambient tracks matching the theme, pick
/// one at random, and relay its audio bytes. Runs the whole
/// search → filter → select → stream pipeline per request; nothing is shared
/// between invocations.
pub async fn serve_audio(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Response {
    let start = Instant::now();
    let result = relay_audio(&params, &state).await;

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => match e {
            LullError::MissingTheme => StatusCode::BAD_REQUEST,
            LullError::NoCandidates(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
    };
    metrics::record_request("audio", status.as_u16());
    metrics::record_duration("audio", start);

    match result {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn relay_audio(params: &HashMap<String, String>, state: &AppState) -> Result<Response> {
    let theme = params.get("theme").map(String::as_str).unwrap_or("");
    let query = SearchQuery::new(theme).ok_or(LullError::MissingTheme)?;

    info!(
        "Audio request: theme \"{}\" via {}",
        query.theme(),
        state.provider.source_name()
    );

    let search_start = Instant::now();
    let candidates = state.provider.search(&query).await?;
    info!(
        "Search returned {} candidates in {}ms",
        candidates.len(),
        search_start.elapsed().as_millis()
    );

    let shortlist = filter_candidates(candidates);
    let track = pick(&shortlist, state.rng.as_ref())
        .ok_or_else(|| LullError::NoCandidates(state.provider.media_noun()))?
        .clone();

    info!(
        "Selected \"{}\" ({}) from {} qualifying candidates",
        track.title,
        track.id,
        shortlist.len()
    );

    let stream_start = Instant::now();
    let audio = state.provider.open_stream(&track).await?;
    info!(
        "Stream opened in {}ms, relaying",
        stream_start.elapsed().as_millis()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, audio.content_type),
            (header::CACHE_CONTROL, CACHE_CONTROL_VALUE.to_string()),
        ],
        Body::from_stream(audio.bytes),
    )
        .into_response())
}

/// OPTIONS /api/audio — CORS preflight.
///
/// The allow-origin header is stamped on every response by the router layer;
/// the preflight adds the method/header grants.
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
        ],
    )
}
