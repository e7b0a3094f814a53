use super::registry::ActiveJob;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

/// List transcodes that are currently running
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    responses(
        (status = 200, description = "Active jobs", body = ApiResponse<Vec<ActiveJob>>)
    ),
    tag = "Jobs"
)]
pub async fn list_jobs(State(state): State<AppState>) -> impl IntoResponse {
    let jobs = state.coordinator.registry().snapshot();
    ApiSuccess(
        ApiResponse::success(jobs, "Active jobs retrieved successfully"),
        StatusCode::OK,
    )
}
