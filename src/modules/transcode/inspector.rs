use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use utoipa::ToSchema;

use super::identity::JobKey;

pub const PLAYLIST_FILE: &str = "index.m3u8";
pub const SEGMENT_PATTERN: &str = "segment%03d.ts";
/// HLS end-of-stream directive. Its presence is the only signal of completion.
pub const END_MARKER: &str = "#EXT-X-ENDLIST";

/// State of the transcoded output for one key, as found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactState {
    Absent,
    Partial,
    Complete,
}

/// Knows where output for a key lives and how far along it is.
///
/// Nothing is cached: the playlist may be rewritten by a running ffmpeg at any
/// moment, so each inspection opens and reads the file from scratch.
#[derive(Debug, Clone)]
pub struct OutputInspector {
    root: PathBuf,
}

impl OutputInspector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_dir(&self, key: &JobKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    pub fn playlist_path(&self, key: &JobKey) -> PathBuf {
        self.output_dir(key).join(PLAYLIST_FILE)
    }

    pub fn segment_pattern(&self, key: &JobKey) -> PathBuf {
        self.output_dir(key).join(SEGMENT_PATTERN)
    }

    pub async fn inspect(&self, key: &JobKey) -> io::Result<ArtifactState> {
        match tokio::fs::read(self.playlist_path(key)).await {
            Ok(bytes) => Ok(classify_playlist(&bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ArtifactState::Absent),
            Err(e) => Err(e),
        }
    }
}

/// Classify playlist bytes. A prefix of a playlist still being written is
/// simply `Partial`.
pub fn classify_playlist(bytes: &[u8]) -> ArtifactState {
    let text = String::from_utf8_lossy(bytes);
    if text.lines().any(|line| line.trim() == END_MARKER) {
        ArtifactState::Complete
    } else {
        ArtifactState::Partial
    }
}
