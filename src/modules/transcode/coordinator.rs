use futures_util::future::BoxFuture;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};
use utoipa::ToSchema;

use super::error::StreamError;
use super::events::{EncodeProfile, JobOutcome, TranscodeJob};
use super::identity::JobKey;
use super::inspector::{ArtifactState, OutputInspector};
use super::launcher::Launcher;
use super::registry::JobRegistry;
use crate::modules::media::catalog::{Catalog, MediaFile};

/// What the coordinator did for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// A job for this key was already running.
    Attached,
    /// Output is finished, nothing was started.
    Complete,
    /// No output existed, a job was started.
    Started,
    /// Partial output from an interrupted run was found and the transcode
    /// restarted over it.
    Resumed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamStatus {
    pub key: JobKey,
    /// True only when the playlist carries the end marker.
    pub ready: bool,
    pub playlist: PathBuf,
    pub decision: Decision,
}

/// Slot held in the registry between `try_acquire` and the hand-off to the
/// exit watcher. Dropping it without handing off releases the slot.
struct Reservation<'a> {
    registry: &'a JobRegistry,
    key: &'a JobKey,
    armed: bool,
}

impl<'a> Reservation<'a> {
    fn acquire(registry: &'a JobRegistry, key: &'a JobKey) -> Option<Self> {
        registry.try_acquire(key).then(|| Self {
            registry,
            key,
            armed: true,
        })
    }

    fn hand_off(mut self) {
        self.armed = false;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.registry.release(self.key);
        }
    }
}

/// Decides, per request, whether to reuse a running job, serve finished
/// output, or start (or restart) a transcode.
pub struct JobCoordinator {
    catalog: Catalog,
    inspector: OutputInspector,
    registry: Arc<JobRegistry>,
    launcher: Arc<dyn Launcher>,
    profile: EncodeProfile,
}

impl JobCoordinator {
    pub fn new(
        catalog: Catalog,
        inspector: OutputInspector,
        launcher: Arc<dyn Launcher>,
        profile: EncodeProfile,
    ) -> Self {
        Self {
            catalog,
            inspector,
            registry: Arc::new(JobRegistry::new()),
            launcher,
            profile,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn inspector(&self) -> &OutputInspector {
        &self.inspector
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn profile(&self) -> EncodeProfile {
        self.profile
    }

    pub async fn ensure_streamable(&self, filename: &str) -> Result<StreamStatus, StreamError> {
        let media = self
            .catalog
            .find_by_name(filename)
            .await
            .map_err(StreamError::filesystem(self.catalog.dir()))?
            .ok_or_else(|| StreamError::NotFound(filename.to_string()))?;

        self.ensure(&media).await
    }

    pub async fn ensure_streamable_by_key(&self, key: &JobKey) -> Result<StreamStatus, StreamError> {
        let media = self
            .catalog
            .find_by_key(key)
            .await
            .map_err(StreamError::filesystem(self.catalog.dir()))?
            .ok_or_else(|| StreamError::NotFound(key.to_string()))?;

        self.ensure(&media).await
    }

    pub async fn artifact_state(&self, key: &JobKey) -> Result<ArtifactState, StreamError> {
        self.inspector
            .inspect(key)
            .await
            .map_err(StreamError::filesystem(self.inspector.playlist_path(key)))
    }

    async fn ensure(&self, media: &MediaFile) -> Result<StreamStatus, StreamError> {
        let key = &media.id;

        if self.registry.is_active(key) {
            debug!(%key, file = %media.filename, "Transcode already running");
            return Ok(self.status(key, Decision::Attached));
        }

        let found = self.artifact_state(key).await?;
        if found == ArtifactState::Complete {
            return Ok(self.status(key, Decision::Complete));
        }

        let Some(reservation) = Reservation::acquire(&self.registry, key) else {
            debug!(%key, "Lost the race for the job slot, attaching");
            return Ok(self.status(key, Decision::Attached));
        };

        // The winner of a previous race may have finished in between.
        if self.artifact_state(key).await? == ArtifactState::Complete {
            return Ok(self.status(key, Decision::Complete));
        }

        let decision = match found {
            ArtifactState::Partial => Decision::Resumed,
            _ => Decision::Started,
        };
        self.start(media, decision, reservation).await?;

        Ok(self.status(key, decision))
    }

    async fn start(
        &self,
        media: &MediaFile,
        decision: Decision,
        reservation: Reservation<'_>,
    ) -> Result<(), StreamError> {
        let key = &media.id;
        let output_dir = self.inspector.output_dir(key);
        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(StreamError::filesystem(&output_dir))?;

        let job = TranscodeJob {
            key: key.clone(),
            input: self.catalog.path_of(media),
            output_dir,
            playlist: self.inspector.playlist_path(key),
            segment_pattern: self.inspector.segment_pattern(key),
            profile: self.profile,
        };

        let launched = self.launcher.launch(&job)?;

        // Attach before the watcher exists so a process that exits at once
        // cannot leave a handle behind in a released slot.
        self.registry.attach(key, launched.handle);
        reservation.hand_off();
        tokio::spawn(watch_exit(
            Arc::clone(&self.registry),
            key.clone(),
            media.filename.clone(),
            launched.exit,
        ));

        info!(
            %key,
            file = %media.filename,
            pid = ?launched.handle.pid,
            ?decision,
            "🎥 Transcode started"
        );
        Ok(())
    }

    fn status(&self, key: &JobKey, decision: Decision) -> StreamStatus {
        StreamStatus {
            key: key.clone(),
            ready: decision == Decision::Complete,
            playlist: self.inspector.playlist_path(key),
            decision,
        }
    }
}

async fn watch_exit(
    registry: Arc<JobRegistry>,
    key: JobKey,
    filename: String,
    exit: BoxFuture<'static, JobOutcome>,
) {
    let outcome = exit.await;
    registry.release(&key);

    if outcome.is_success() {
        info!(%key, file = %filename, "✅ Transcode finished");
    } else {
        error!(%key, file = %filename, %outcome, "❌ Transcoding to HLS failed");
    }
}
