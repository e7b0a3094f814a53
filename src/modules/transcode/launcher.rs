use futures_util::future::BoxFuture;
use std::io;

use super::events::{JobOutcome, ProcessHandle, TranscodeJob};

/// A started transcode process. `exit` resolves once the process is gone.
pub struct Launched {
    pub handle: ProcessHandle,
    pub exit: BoxFuture<'static, JobOutcome>,
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("transcoder stderr was not captured")]
    NoStderr,
}

/// Starts transcode processes. `launch` must return as soon as the process
/// exists; it never waits for it to finish.
pub trait Launcher: Send + Sync {
    fn launch(&self, job: &TranscodeJob) -> Result<Launched, LaunchError>;
}
