use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::modules::media::catalog::Catalog;
use crate::modules::transcode::coordinator::JobCoordinator;
use crate::modules::transcode::inspector::OutputInspector;
use crate::modules::transcode::launcher::Launcher;
use crate::workers::transcoder::FfmpegLauncher;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub coordinator: Arc<JobCoordinator>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let launcher = FfmpegLauncher::new(&config.ffmpeg_bin).with_timeout(config.transcode_timeout);
        Self::with_launcher(config, Arc::new(launcher))
    }

    pub fn with_launcher(config: AppConfig, launcher: Arc<dyn Launcher>) -> Self {
        let coordinator = JobCoordinator::new(
            Catalog::new(&config.media_dir),
            OutputInspector::new(&config.hls_dir),
            launcher,
            config.profile(),
        );

        Self {
            config,
            coordinator: Arc::new(coordinator),
        }
    }
}
