use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use utoipa::ToSchema;

use super::identity::JobKey;

/// Encoder family, fixed for the lifetime of the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EncodeProfile {
    #[default]
    Software,
    Hardware,
}

impl EncodeProfile {
    pub fn from_hwaccel(enabled: bool) -> Self {
        if enabled { Self::Hardware } else { Self::Software }
    }
}

/// Everything a launcher needs to produce HLS output for one media file.
#[derive(Debug, Clone)]
pub struct TranscodeJob {
    pub key: JobKey,
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub playlist: PathBuf,
    pub segment_pattern: PathBuf,
    pub profile: EncodeProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessHandle {
    pub pid: Option<u32>,
}

/// How a transcode process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    /// Non-zero exit. `None` when the process was killed by a signal.
    Failed { code: Option<i32> },
    TimedOut,
    /// The process could not be waited on.
    Lost(String),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed { code: Some(code) } => write!(f, "exited with status {code}"),
            Self::Failed { code: None } => f.write_str("terminated by signal"),
            Self::TimedOut => f.write_str("timed out"),
            Self::Lost(reason) => write!(f, "lost: {reason}"),
        }
    }
}
