use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Application-level errors, mapped onto the HTTP error contract in
/// [`IntoResponse`]. Everything that is not a validation or empty-result
/// outcome collapses into a generic 500 — upstream details stay in the log.
#[derive(thiserror::Error, Debug)]
pub enum LullError {
    /// The `theme` query parameter was missing, empty, or whitespace.
    #[error("Theme parameter is required")]
    MissingTheme,

    /// The filtered candidate set was empty. Carries the platform's noun
    /// ("videos" or "tracks") for the response body.
    #[error("No suitable {0} found")]
    NoCandidates(&'static str),

    /// Network or HTTP failure talking to the upstream platform.
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The upstream answered, but the payload did not have the shape we need.
    #[error("Unexpected upstream payload: {0}")]
    UpstreamPayload(String),

    /// The selected item exposes no audio format we can stream.
    #[error("No playable audio format for {0}")]
    NoPlayableFormat(String),
}

impl IntoResponse for LullError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            LullError::MissingTheme => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            LullError::NoCandidates(_) => (StatusCode::NOT_FOUND, self.to_string()),
            LullError::Upstream(_)
            | LullError::UpstreamPayload(_)
            | LullError::NoPlayableFormat(_) => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process request".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, LullError>;
