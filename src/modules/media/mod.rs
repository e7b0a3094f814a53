use axum::Router;
use axum::routing::{get, post};
use crate::state::AppState;

pub mod catalog;
pub mod dto;
pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::index))
        .route("/media/{id}", get(handler::stream_media))
        .route("/playlist/{id}", get(handler::serve_playlist))
}

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/media", get(handler::list_media))
        .route("/media/{id}/stream", post(handler::start_stream))
}
