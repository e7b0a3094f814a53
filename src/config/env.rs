use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKey {
    ServerPort,
    MediaDir,
    HlsDir,
    ThumbnailDir,
    FfmpegBin,
    HwAccel,
    TranscodeTimeoutSecs,
    PlaylistWaitSecs,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "PORT",
            EnvKey::MediaDir => "MEDIA_DIR",
            EnvKey::HlsDir => "HLS_DIR",
            EnvKey::ThumbnailDir => "THUMBNAIL_DIR",
            EnvKey::FfmpegBin => "FFMPEG_BIN",
            EnvKey::HwAccel => "HWACCEL",
            EnvKey::TranscodeTimeoutSecs => "TRANSCODE_TIMEOUT_SECS",
            EnvKey::PlaylistWaitSecs => "PLAYLIST_WAIT_SECS",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Where settings come from. The process environment in production, a map
/// in tests.
pub trait EnvSource {
    fn var(&self, key: EnvKey) -> Option<String>;
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: EnvKey) -> Option<String> {
        env::var(key.as_str()).ok()
    }
}

impl<F> EnvSource for F
where
    F: Fn(EnvKey) -> Option<String>,
{
    fn var(&self, key: EnvKey) -> Option<String> {
        self(key)
    }
}

/// Unset and blank values both count as missing.
pub fn get(source: &impl EnvSource, key: EnvKey) -> Option<String> {
    source.var(key).filter(|v| !v.trim().is_empty())
}

pub fn get_or(source: &impl EnvSource, key: EnvKey, default: &str) -> String {
    get(source, key).unwrap_or_else(|| default.to_string())
}

pub fn get_parsed<T: FromStr>(source: &impl EnvSource, key: EnvKey) -> Result<Option<T>, ConfigError> {
    match get(source, key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key: key.as_str(), value: val }),
        None => Ok(None),
    }
}

pub fn get_flag(source: &impl EnvSource, key: EnvKey) -> Result<bool, ConfigError> {
    match get(source, key) {
        None => Ok(false),
        Some(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key: key.as_str(), value: val }),
        },
    }
}
