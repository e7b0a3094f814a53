use axum::http::StatusCode;
use std::io;
use std::path::PathBuf;

use super::launcher::LaunchError;

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("media not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StreamError {
    pub fn filesystem(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Filesystem { path, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Launch(_) | Self::Filesystem { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
