use utoipa::OpenApi;

use crate::modules::media::dto::{MediaEntry, StreamResponse};
use crate::modules::transcode::coordinator::Decision;
use crate::modules::transcode::inspector::ArtifactState;
use crate::modules::transcode::registry::ActiveJob;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::media::handler::list_media,
        crate::modules::media::handler::start_stream,
        crate::modules::transcode::handler::list_jobs,
    ),
    components(
        schemas(MediaEntry, StreamResponse, ActiveJob, ArtifactState, Decision)
    ),
    tags(
        (name = "Media", description = "Media library and on-demand HLS"),
        (name = "Jobs", description = "Running transcodes")
    )
)]
pub struct ApiDoc;
