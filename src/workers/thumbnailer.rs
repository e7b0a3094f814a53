use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{error, info};

use crate::modules::media::catalog::Catalog;
use crate::modules::transcode::identity::JobKey;
use crate::state::AppState;

pub fn thumbnail_path(dir: &Path, key: &JobKey) -> PathBuf {
    dir.join(format!("{key}.jpg"))
}

pub async fn start_thumbnail_worker(state: AppState) {
    info!("🖼️ Starting Thumbnail Worker...");

    let catalog = state.coordinator.catalog().clone();
    match generate_thumbnails(&catalog, &state.config.thumbnail_dir, &state.config.ffmpeg_bin).await {
        Ok(created) => info!("🖼️ Thumbnail Worker done, {} created", created),
        Err(e) => error!("❌ Thumbnail Worker failed: {:#}", e),
    }
}

/// Extract a frame for every catalog entry that has no thumbnail yet, one
/// file at a time. Returns how many were created.
pub async fn generate_thumbnails(catalog: &Catalog, dir: &Path, ffmpeg: &Path) -> Result<usize> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut created = 0;
    for file in catalog.list().await.context("failed to list media")? {
        let output = thumbnail_path(dir, &file.id);
        if tokio::fs::try_exists(&output).await.unwrap_or(false) {
            continue;
        }

        match extract_thumbnail(ffmpeg, &catalog.path_of(&file), &output).await {
            Ok(()) => {
                info!("Thumbnail generated for {} at {}", file.filename, output.display());
                created += 1;
            }
            Err(e) => error!("Error generating thumbnail for {}: {:#}", file.filename, e),
        }
    }

    Ok(created)
}

pub async fn extract_thumbnail(ffmpeg: &Path, input: &Path, output: &Path) -> Result<()> {
    let status = Command::new(ffmpeg)
        .args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y"])
        .args(["-ss", "00:00:01", "-i"])
        .arg(input)
        .args(["-vframes", "1", "-s", "426x240"])
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .with_context(|| format!("failed to run {}", ffmpeg.display()))?;

    if !status.success() {
        bail!("ffmpeg exited with {}", status);
    }
    Ok(())
}
