use std::borrow::Cow;
use std::io;
use std::time::Duration;
use tokio::fs::File;
use tokio::time::Instant;

use super::dto::{MediaEntry, stream_url};
use crate::modules::transcode::coordinator::StreamStatus;
use crate::modules::transcode::error::StreamError;
use crate::modules::transcode::identity::JobKey;
use crate::state::AppState;
use crate::workers::thumbnailer::thumbnail_path;

const PLAYLIST_POLL: Duration = Duration::from_millis(250);

pub struct MediaService;

impl MediaService {
    fn parse_id(id: &str) -> Result<JobKey, StreamError> {
        JobKey::parse(id).ok_or_else(|| StreamError::NotFound(id.to_string()))
    }

    pub async fn list(state: &AppState) -> Result<Vec<MediaEntry>, StreamError> {
        let coordinator = &state.coordinator;
        let files = coordinator
            .catalog()
            .list()
            .await
            .map_err(StreamError::filesystem(coordinator.catalog().dir()))?;

        let mut entries = Vec::with_capacity(files.len());
        for file in files {
            let state = coordinator.artifact_state(&file.id).await?;
            entries.push(MediaEntry {
                id: file.id.to_string(),
                active: coordinator.registry().is_active(&file.id),
                stream_url: stream_url(&file.id),
                filename: file.filename,
                state,
            });
        }
        Ok(entries)
    }

    pub async fn stream(state: &AppState, id: &str) -> Result<StreamStatus, StreamError> {
        let key = Self::parse_id(id)?;
        state.coordinator.ensure_streamable_by_key(&key).await
    }

    /// Open the current playlist for `id`. A job that was just started may
    /// not have written it yet, so while one is running this waits up to the
    /// configured grace period. `None` means there is nothing to serve.
    pub async fn open_playlist(state: &AppState, id: &str) -> Result<Option<File>, StreamError> {
        let key = Self::parse_id(id)?;
        let coordinator = &state.coordinator;
        let path = coordinator.inspector().playlist_path(&key);
        // No deadline when the wait is too large to represent.
        let deadline = Instant::now().checked_add(state.config.playlist_wait);

        loop {
            match File::open(&path).await {
                Ok(file) => return Ok(Some(file)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    let expired = deadline.is_some_and(|d| Instant::now() >= d);
                    if expired || !coordinator.registry().is_active(&key) {
                        return Ok(None);
                    }
                    tokio::time::sleep(PLAYLIST_POLL).await;
                }
                Err(e) => return Err(StreamError::filesystem(&path)(e)),
            }
        }
    }

    pub async fn index_page(state: &AppState) -> Result<String, StreamError> {
        let catalog = state.coordinator.catalog();
        let files = catalog
            .list()
            .await
            .map_err(StreamError::filesystem(catalog.dir()))?;

        let mut items = String::new();
        for file in &files {
            let thumb = thumbnail_path(&state.config.thumbnail_dir, &file.id);
            let img = if tokio::fs::try_exists(&thumb).await.unwrap_or(false) {
                format!(r#"<img src="/thumbnails/{}.jpg" alt="" width="213"> "#, file.id)
            } else {
                String::new()
            };
            items.push_str(&format!(
                r#"<li><a href="{}">{}{}</a></li>"#,
                stream_url(&file.id),
                img,
                escape_html(&file.filename)
            ));
        }

        Ok(format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Media Files</title></head>\
             <body><h1>Media Files</h1><ul>{items}</ul></body></html>"
        ))
    }
}

/// Markup-safe file name for the index page.
fn escape_html(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}
