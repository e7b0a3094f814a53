use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Args;
use crate::config::env::{self, ConfigError, EnvKey, EnvSource, ProcessEnv};
use crate::modules::transcode::events::EncodeProfile;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PLAYLIST_WAIT_SECS: u64 = 10;
pub const MAX_PLAYLIST_WAIT_SECS: u64 = 3600;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub media_dir: PathBuf,
    pub hls_dir: PathBuf,
    pub thumbnail_dir: PathBuf,
    pub ffmpeg_bin: PathBuf,
    pub hwaccel: bool,
    /// Upper bound on a single transcode. `None` lets jobs run to completion.
    pub transcode_timeout: Option<Duration>,
    /// How long `/playlist/{id}` waits for a just-started job to write its
    /// first playlist.
    pub playlist_wait: Duration,
}

impl AppConfig {
    pub fn new(args: &Args) -> Result<Self, ConfigError> {
        Self::resolve(&ProcessEnv, args)
    }

    /// Command line wins over the environment, which wins over defaults.
    pub fn resolve(source: &impl EnvSource, args: &Args) -> Result<Self, ConfigError> {
        let server_port = match args.port {
            Some(port) => port,
            None => env::get_parsed(source, EnvKey::ServerPort)?.unwrap_or(DEFAULT_PORT),
        };
        let media_dir = args
            .media_dir
            .clone()
            .unwrap_or_else(|| env::get_or(source, EnvKey::MediaDir, "media").into());
        let hls_dir = args
            .hls_dir
            .clone()
            .unwrap_or_else(|| env::get_or(source, EnvKey::HlsDir, "hls").into());

        let playlist_wait_secs = env::get_parsed(source, EnvKey::PlaylistWaitSecs)?
            .unwrap_or(DEFAULT_PLAYLIST_WAIT_SECS);
        if playlist_wait_secs > MAX_PLAYLIST_WAIT_SECS {
            return Err(ConfigError::Invalid {
                key: EnvKey::PlaylistWaitSecs.as_str(),
                value: playlist_wait_secs.to_string(),
            });
        }

        Ok(Self {
            server_port,
            media_dir,
            hls_dir,
            thumbnail_dir: env::get_or(source, EnvKey::ThumbnailDir, "public/images").into(),
            ffmpeg_bin: env::get_or(source, EnvKey::FfmpegBin, "ffmpeg").into(),
            hwaccel: args.hwaccel || env::get_flag(source, EnvKey::HwAccel)?,
            transcode_timeout: env::get_parsed::<u64>(source, EnvKey::TranscodeTimeoutSecs)?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            playlist_wait: Duration::from_secs(playlist_wait_secs),
        })
    }

    pub fn profile(&self) -> EncodeProfile {
        EncodeProfile::from_hwaccel(self.hwaccel)
    }
}
