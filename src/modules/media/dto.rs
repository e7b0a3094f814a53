use serde::Serialize;
use utoipa::ToSchema;

use crate::modules::transcode::coordinator::{Decision, StreamStatus};
use crate::modules::transcode::identity::JobKey;
use crate::modules::transcode::inspector::{ArtifactState, PLAYLIST_FILE};

pub fn stream_url(key: &JobKey) -> String {
    format!("/media/{key}")
}

pub fn playlist_url(key: &JobKey) -> String {
    format!("/playlist/{key}")
}

pub fn hls_url(key: &JobKey) -> String {
    format!("/hls/{key}/{PLAYLIST_FILE}")
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MediaEntry {
    pub id: String,
    pub filename: String,
    pub state: ArtifactState,
    /// A transcode is currently running for this file.
    pub active: bool,
    pub stream_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StreamResponse {
    pub id: String,
    pub ready: bool,
    pub decision: Decision,
    pub playlist_url: String,
    pub hls_url: String,
}

impl From<StreamStatus> for StreamResponse {
    fn from(status: StreamStatus) -> Self {
        Self {
            id: status.key.to_string(),
            ready: status.ready,
            decision: status.decision,
            playlist_url: playlist_url(&status.key),
            hls_url: hls_url(&status.key),
        }
    }
}
