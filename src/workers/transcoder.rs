use futures_util::FutureExt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tracing::{debug, error, warn};

use crate::modules::transcode::events::{EncodeProfile, JobOutcome, ProcessHandle, TranscodeJob};
use crate::modules::transcode::identity::JobKey;
use crate::modules::transcode::launcher::{LaunchError, Launched, Launcher};

/// Runs ffmpeg as a child process writing HLS into the job's output directory.
#[derive(Debug, Clone)]
pub struct FfmpegLauncher {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegLauncher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Kill jobs that run longer than `timeout`. `None` means no limit.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Launcher for FfmpegLauncher {
    fn launch(&self, job: &TranscodeJob) -> Result<Launched, LaunchError> {
        let mut child = Command::new(&self.program)
            .args(build_hls_args(job))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let Some(stderr) = child.stderr.take() else {
            let _ = child.start_kill();
            return Err(LaunchError::NoStderr);
        };

        let handle = ProcessHandle { pid: child.id() };
        tokio::spawn(drain_stderr(job.key.clone(), stderr));
        let exit = supervise(child, job.key.clone(), self.timeout).boxed();

        Ok(Launched { handle, exit })
    }
}

/// ffmpeg arguments for a 720p HLS rendition. Existing output is overwritten,
/// which is what a restart over partial output relies on.
pub fn build_hls_args(job: &TranscodeJob) -> Vec<String> {
    let input = job.input.to_string_lossy().into_owned();
    let mut args: Vec<String> = vec![
        "-hide_banner".into(),
        "-nostdin".into(),
        "-y".into(),
        "-loglevel".into(), "warning".into(),
    ];

    match job.profile {
        EncodeProfile::Software => {
            args.extend(["-i".into(), input]);
            args.extend(["-vf".into(), "scale=1280:720".into()]);
            args.extend([
                "-c:v".into(), "libx264".into(),
                "-profile:v".into(), "baseline".into(),
                "-level".into(), "3.0".into(),
                "-preset".into(), "veryfast".into(),
            ]);
        }
        EncodeProfile::Hardware => {
            args.extend(["-hwaccel".into(), "cuda".into(), "-i".into(), input]);
            args.extend(["-vf".into(), "scale=1280:720".into()]);
            args.extend([
                "-c:v".into(), "h264_nvenc".into(),
                "-preset".into(), "p1".into(),
            ]);
        }
    }

    args.extend([
        "-c:a".into(), "aac".into(),
        "-b:a".into(), "128k".into(),
        "-r".into(), "24".into(),
        "-movflags".into(), "+faststart".into(),
        "-f".into(), "hls".into(),
        "-hls_list_size".into(), "0".into(),
        "-hls_allow_cache".into(), "0".into(),
        "-hls_segment_filename".into(), job.segment_pattern.to_string_lossy().into_owned(),
        job.playlist.to_string_lossy().into_owned(),
    ]);
    args
}

async fn drain_stderr(key: JobKey, stderr: ChildStderr) {
    let mut reader = BufReader::new(stderr);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end();
                if !line.is_empty() {
                    warn!(target: "ffmpeg", %key, "{}", line);
                }
            }
            Err(e) => {
                debug!(%key, "Stopped reading ffmpeg stderr: {}", e);
                break;
            }
        }
    }
}

async fn supervise(mut child: Child, key: JobKey, timeout: Option<Duration>) -> JobOutcome {
    let waited = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(waited) => waited,
            Err(_) => {
                warn!(%key, ?limit, "Transcode exceeded its time limit, killing ffmpeg");
                if let Err(e) = child.kill().await {
                    error!(%key, "Failed to kill ffmpeg: {}", e);
                }
                return JobOutcome::TimedOut;
            }
        },
        None => child.wait().await,
    };

    match waited {
        Ok(status) if status.success() => JobOutcome::Succeeded,
        Ok(status) => JobOutcome::Failed { code: status.code() },
        Err(e) => JobOutcome::Lost(e.to_string()),
    }
}
