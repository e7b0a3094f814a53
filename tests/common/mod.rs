#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::oneshot;

use hls_vod::app::create_app;
use hls_vod::config::settings::AppConfig;
use hls_vod::modules::transcode::events::{JobOutcome, ProcessHandle, TranscodeJob};
use hls_vod::modules::transcode::identity::{JobKey, resolve};
use hls_vod::modules::transcode::launcher::{LaunchError, Launched, Launcher};
use hls_vod::state::AppState;

/// Launcher that records jobs and keeps each one "running" until the test
/// finishes it.
#[derive(Default)]
pub struct StubLauncher {
    launches: AtomicUsize,
    jobs: Mutex<Vec<TranscodeJob>>,
    exits: Mutex<Vec<oneshot::Sender<JobOutcome>>>,
}

impl StubLauncher {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn jobs(&self) -> Vec<TranscodeJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn finish_all(&self, outcome: JobOutcome) {
        for tx in self.exits.lock().unwrap().drain(..) {
            let _ = tx.send(outcome.clone());
        }
    }
}

impl Launcher for StubLauncher {
    fn launch(&self, job: &TranscodeJob) -> Result<Launched, LaunchError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        self.jobs.lock().unwrap().push(job.clone());
        let (tx, rx) = oneshot::channel();
        self.exits.lock().unwrap().push(tx);
        Ok(Launched {
            handle: ProcessHandle { pid: Some(4242) },
            exit: Box::pin(async move {
                rx.await.unwrap_or_else(|_| JobOutcome::Lost("stub dropped".into()))
            }),
        })
    }
}

pub struct TestEnv {
    pub media: TempDir,
    pub hls: TempDir,
    pub thumbs: TempDir,
    pub launcher: Arc<StubLauncher>,
    pub state: AppState,
}

impl TestEnv {
    pub fn new(files: &[&str]) -> Self {
        let media = tempfile::tempdir().unwrap();
        let hls = tempfile::tempdir().unwrap();
        let thumbs = tempfile::tempdir().unwrap();
        for name in files {
            std::fs::write(media.path().join(name), b"fake media").unwrap();
        }

        let config = AppConfig {
            server_port: 0,
            media_dir: media.path().to_path_buf(),
            hls_dir: hls.path().to_path_buf(),
            thumbnail_dir: thumbs.path().to_path_buf(),
            ffmpeg_bin: "ffmpeg".into(),
            hwaccel: false,
            transcode_timeout: None,
            playlist_wait: Duration::from_secs(2),
        };
        let launcher = Arc::new(StubLauncher::default());
        let state = AppState::with_launcher(config, launcher.clone());

        Self { media, hls, thumbs, launcher, state }
    }

    pub fn app(&self) -> axum::Router {
        create_app(self.state.clone())
    }

    pub fn key(name: &str) -> JobKey {
        resolve(name)
    }

    pub fn write_playlist(&self, name: &str, body: &str) {
        write_playlist_at(self.hls.path(), &resolve(name), body);
    }

    pub async fn wait_released(&self, key: &JobKey) {
        let registry = self.state.coordinator.registry();
        tokio::time::timeout(Duration::from_secs(5), async {
            while registry.is_active(key) {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("job slot was never released");
    }
}

pub fn write_playlist_at(hls_root: &Path, key: &JobKey, body: &str) {
    let dir = hls_root.join(key.as_str());
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.m3u8"), body).unwrap();
}

pub const PARTIAL: &str = "#EXTM3U\n#EXT-X-VERSION:3\n#EXTINF:4.0,\nsegment000.ts\n";
pub const COMPLETE: &str = "#EXTM3U\n#EXT-X-VERSION:3\n#EXTINF:4.0,\nsegment000.ts\n#EXT-X-ENDLIST\n";
