use axum::Router;
use axum::routing::get;
use crate::state::AppState;

pub mod coordinator;
pub mod error;
pub mod events;
pub mod handler;
pub mod identity;
pub mod inspector;
pub mod launcher;
pub mod registry;

pub fn router() -> Router<AppState> {
    Router::new().route("/jobs", get(handler::list_jobs))
}
