use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::modules::transcode::identity::{JobKey, resolve};

/// A file in the media directory. The id is derived from the name on every
/// scan and never stored anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub id: JobKey,
    pub filename: String,
}

impl MediaFile {
    pub fn new(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            id: resolve(&filename),
            filename,
        }
    }
}

/// The media directory. Re-read on every call so files added or removed on
/// disk show up on the next request.
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
}

impl Catalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, file: &MediaFile) -> PathBuf {
        self.dir.join(&file.filename)
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Names of the regular files in the directory, sorted. A missing
    /// directory is an empty catalog.
    pub async fn list_files(&self) -> io::Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            // Follows symlinks, like a plain stat.
            let is_file = match tokio::fs::metadata(entry.path()).await {
                Ok(meta) => meta.is_file(),
                Err(e) => {
                    warn!("Cannot stat {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            if !is_file {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!("Skipping non UTF-8 file name {:?}", raw),
            }
        }

        names.sort();
        Ok(names)
    }

    pub async fn list(&self) -> io::Result<Vec<MediaFile>> {
        Ok(self.list_files().await?.into_iter().map(MediaFile::new).collect())
    }

    pub async fn find_by_name(&self, filename: &str) -> io::Result<Option<MediaFile>> {
        let names = self.list_files().await?;
        Ok(names
            .into_iter()
            .find(|name| name == filename)
            .map(MediaFile::new))
    }

    pub async fn find_by_key(&self, key: &JobKey) -> io::Result<Option<MediaFile>> {
        Ok(self.list().await?.into_iter().find(|file| &file.id == key))
    }
}
