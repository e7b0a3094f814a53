use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use hls_vod::cli::Args;
use hls_vod::config::env::EnvKey;
use hls_vod::config::settings::{
    AppConfig, DEFAULT_PLAYLIST_WAIT_SECS, DEFAULT_PORT, MAX_PLAYLIST_WAIT_SECS,
};
use hls_vod::modules::transcode::events::EncodeProfile;

fn env_of(pairs: &[(EnvKey, &str)]) -> impl Fn(EnvKey) -> Option<String> {
    let map: HashMap<&'static str, String> = pairs
        .iter()
        .map(|(k, v)| (k.as_str(), v.to_string()))
        .collect();
    move |key: EnvKey| map.get(key.as_str()).cloned()
}

#[test]
fn test_defaults_when_nothing_set() {
    let config = AppConfig::resolve(&env_of(&[]), &Args::default()).unwrap();
    assert_eq!(config.server_port, DEFAULT_PORT);
    assert_eq!(config.media_dir, PathBuf::from("media"));
    assert_eq!(config.hls_dir, PathBuf::from("hls"));
    assert_eq!(config.thumbnail_dir, PathBuf::from("public/images"));
    assert_eq!(config.ffmpeg_bin, PathBuf::from("ffmpeg"));
    assert!(!config.hwaccel);
    assert_eq!(config.transcode_timeout, None);
    assert_eq!(config.playlist_wait, Duration::from_secs(DEFAULT_PLAYLIST_WAIT_SECS));
    assert_eq!(config.profile(), EncodeProfile::Software);
}

#[test]
fn test_env_overrides_default() {
    let env = env_of(&[
        (EnvKey::ServerPort, "8080"),
        (EnvKey::MediaDir, "/srv/media"),
        (EnvKey::HwAccel, "true"),
        (EnvKey::TranscodeTimeoutSecs, "3600"),
    ]);
    let config = AppConfig::resolve(&env, &Args::default()).unwrap();
    assert_eq!(config.server_port, 8080);
    assert_eq!(config.media_dir, PathBuf::from("/srv/media"));
    assert_eq!(config.profile(), EncodeProfile::Hardware);
    assert_eq!(config.transcode_timeout, Some(Duration::from_secs(3600)));
}

#[test]
fn test_cli_overrides_env() {
    let env = env_of(&[(EnvKey::ServerPort, "8080"), (EnvKey::HlsDir, "/env/hls")]);
    let args = Args {
        port: Some(9000),
        hls_dir: Some(PathBuf::from("/cli/hls")),
        ..Args::default()
    };
    let config = AppConfig::resolve(&env, &args).unwrap();
    assert_eq!(config.server_port, 9000);
    assert_eq!(config.hls_dir, PathBuf::from("/cli/hls"));
}

#[test]
fn test_blank_env_value_counts_as_unset() {
    let env = env_of(&[(EnvKey::ServerPort, "  ")]);
    let config = AppConfig::resolve(&env, &Args::default()).unwrap();
    assert_eq!(config.server_port, DEFAULT_PORT);
}

#[test]
fn test_zero_timeout_disables_limit() {
    let env = env_of(&[(EnvKey::TranscodeTimeoutSecs, "0")]);
    let config = AppConfig::resolve(&env, &Args::default()).unwrap();
    assert_eq!(config.transcode_timeout, None);
}

#[test]
fn test_invalid_port_is_rejected() {
    let env = env_of(&[(EnvKey::ServerPort, "not-a-port")]);
    let err = AppConfig::resolve(&env, &Args::default()).unwrap_err();
    assert!(err.to_string().contains("PORT"), "unexpected error: {err}");
}

#[test]
fn test_playlist_wait_is_bounded() {
    let env = env_of(&[(EnvKey::PlaylistWaitSecs, "3600")]);
    let config = AppConfig::resolve(&env, &Args::default()).unwrap();
    assert_eq!(config.playlist_wait, Duration::from_secs(MAX_PLAYLIST_WAIT_SECS));

    let env = env_of(&[(EnvKey::PlaylistWaitSecs, "18446744073709551615")]);
    let err = AppConfig::resolve(&env, &Args::default()).unwrap_err();
    assert!(err.to_string().contains("PLAYLIST_WAIT_SECS"), "unexpected error: {err}");
}
