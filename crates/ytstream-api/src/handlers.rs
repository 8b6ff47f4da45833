//! Request handlers

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;
use ytstream_core::{MediaKind, MediaPayload};

use crate::error::ApiError;
use crate::server::AppState;

pub const SERVICE_NAME: &str = "YouTube Stream API";

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Health {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Deserialize)]
pub struct MediaQuery {
    /// YouTube video URL
    pub url: String,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

pub async fn stream_video(
    State(state): State<AppState>,
    query: Result<Query<MediaQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    relay(state, query, MediaKind::Video).await
}

pub async fn download_audio(
    State(state): State<AppState>,
    query: Result<Query<MediaQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    relay(state, query, MediaKind::Audio).await
}

async fn relay(
    state: AppState,
    query: Result<Query<MediaQuery>, QueryRejection>,
    kind: MediaKind,
) -> Result<Response, ApiError> {
    let Query(params) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    match state.relay.fetch(&params.url, kind).await {
        Ok(payload) => Ok(attachment(payload)),
        Err(e) => {
            warn!("{} request for {} failed: {}", kind, params.url, e);
            Err(ApiError::from_relay(kind, e))
        }
    }
}

fn attachment(payload: MediaPayload) -> Response {
    let disposition = payload.content_disposition();
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, payload.content_type.to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        payload.bytes,
    )
        .into_response()
}
