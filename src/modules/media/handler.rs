use super::dto::{MediaEntry, StreamResponse, playlist_url};
use super::service::MediaService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::modules::transcode::error::StreamError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tokio_util::io::ReaderStream;
use tracing::error;

const PLAYLIST_MIME: &str = "application/vnd.apple.mpegurl";

pub async fn index(State(state): State<AppState>) -> Response {
    match MediaService::index_page(&state).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to list media: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to list media").into_response()
        }
    }
}

/// Make sure the file is (being) transcoded, then send the client to its playlist.
pub async fn stream_media(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match MediaService::stream(&state, &id).await {
        Ok(status) => (StatusCode::FOUND, [(header::LOCATION, playlist_url(&status.key))]).into_response(),
        Err(StreamError::NotFound(_)) => (StatusCode::NOT_FOUND, "File not found").into_response(),
        Err(e) => {
            error!("Failed to start stream for {}: {}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to start transcoding").into_response()
        }
    }
}

/// Stream the playlist as it is on disk right now.
pub async fn serve_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match MediaService::open_playlist(&state, &id).await {
        Ok(Some(file)) => {
            let body = Body::from_stream(ReaderStream::new(file));
            (
                [
                    (header::CONTENT_TYPE, PLAYLIST_MIME),
                    (header::CACHE_CONTROL, "no-cache"),
                ],
                body,
            )
                .into_response()
        }
        Ok(None) | Err(StreamError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "Playlist not found").into_response()
        }
        Err(e) => {
            error!("Failed to read playlist {}: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/media",
    responses(
        (status = 200, description = "List Media", body = ApiResponse<Vec<MediaEntry>>),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Media"
)]
pub async fn list_media(State(state): State<AppState>) -> impl IntoResponse {
    match MediaService::list(&state).await {
        Ok(res) => ApiSuccess(ApiResponse::success(res, "Media retrieved successfully"), StatusCode::OK).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Start (or join) the transcode for a media file
#[utoipa::path(
    post,
    path = "/api/v1/media/{id}/stream",
    params(
        ("id" = String, Path, description = "Media ID")
    ),
    responses(
        (status = 200, description = "Stream is complete", body = ApiResponse<StreamResponse>),
        (status = 202, description = "Transcode running", body = ApiResponse<StreamResponse>),
        (status = 404, description = "Media Not Found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Media"
)]
pub async fn start_stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match MediaService::stream(&state, &id).await {
        Ok(status) => {
            let code = if status.ready { StatusCode::OK } else { StatusCode::ACCEPTED };
            let message = if status.ready { "Stream is ready" } else { "Stream is being transcoded" };
            ApiSuccess(ApiResponse::success(StreamResponse::from(status), message), code).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
