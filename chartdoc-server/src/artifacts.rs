//! Rendered files on disk.
//!
//! Each store owns one directory. Files are written once, linked by a public
//! URL and deleted by the reaper once they outlive the retention window.
//! There is no index: the filename is the only identifier.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::metrics;

/// Result type for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Filesystem failures while storing artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The artifact directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The artifact could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// A file written by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Server-local path.
    pub file_path: PathBuf,
    /// URL the file is served under.
    pub public_url: String,
    /// File name within the store directory.
    pub filename: String,
    /// When the file was written.
    pub created_at: DateTime<Utc>,
}

/// One artifact directory and the URL prefix it is served under.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    url_prefix: String,
    max_age: Duration,
}

impl ArtifactStore {
    /// Create the directory if needed and run one reap pass.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::CreateDir`] when the directory cannot be
    /// created. Reap failures are only logged.
    pub async fn open(
        dir: impl Into<PathBuf>,
        url_prefix: impl Into<String>,
        max_age: Duration,
    ) -> ArtifactResult<Self> {
        let store = Self {
            dir: dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
            max_age,
        };
        Self::ensure_directory(&store.dir).await?;
        let reaped = store.reap().await;
        tracing::info!(dir = %store.dir.display(), reaped, "Artifact store ready");
        Ok(store)
    }

    /// Create `path` and its parents; a no-op when it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::CreateDir`] on failure.
    pub async fn ensure_directory(path: &Path) -> ArtifactResult<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|source| ArtifactError::CreateDir {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the directory currently exists.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.dir.is_dir()
    }

    /// Public URL of `filename` in this store.
    #[must_use]
    pub fn public_url(&self, filename: &str) -> String {
        format!("{}/{filename}", self.url_prefix)
    }

    /// `{prefix}-{epoch millis}-{0..999}.{extension}`.
    ///
    /// Two names generated in the same millisecond collide with probability
    /// 1/1000.
    #[must_use]
    pub fn generate_unique_filename(prefix: &str, extension: &str) -> String {
        let millis = Utc::now().timestamp_millis();
        let suffix: u32 = rand::rng().random_range(0..1000);
        format!("{prefix}-{millis}-{suffix}.{extension}")
    }

    /// Write `bytes` as `filename`, waiting for the write to complete.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Write`] on I/O failure.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> ArtifactResult<Artifact> {
        let file_path = self.dir.join(filename);
        tokio::fs::write(&file_path, bytes)
            .await
            .map_err(|source| ArtifactError::Write {
                path: file_path.clone(),
                source,
            })?;
        tracing::debug!(path = %file_path.display(), bytes = bytes.len(), "Saved artifact");

        Ok(Artifact {
            public_url: self.public_url(filename),
            filename: filename.to_string(),
            file_path,
            created_at: Utc::now(),
        })
    }

    /// Write `bytes` under a freshly generated name.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Write`] on I/O failure.
    pub async fn save_unique(
        &self,
        prefix: &str,
        extension: &str,
        bytes: &[u8],
    ) -> ArtifactResult<Artifact> {
        self.save(&Self::generate_unique_filename(prefix, extension), bytes)
            .await
    }

    /// Delete files older than the retention window. Returns how many were
    /// removed.
    pub async fn reap(&self) -> usize {
        let removed = reap_directory(&self.dir, self.max_age).await;
        if removed > 0 {
            metrics::record_artifacts_reaped(removed);
        }
        removed
    }
}

/// Delete regular files in `dir` whose modification time is older than
/// `max_age`. Failures are logged and skipped.
pub async fn reap_directory(dir: &Path, max_age: Duration) -> usize {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to list artifact directory");
            return 0;
        }
    };

    let now = SystemTime::now();
    let mut removed = 0;
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to read directory entry");
                break;
            }
        };
        let path = entry.path();
        let modified = match entry.metadata().await.and_then(|m| {
            if m.is_file() {
                m.modified().map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(Some(modified)) => modified,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to stat artifact");
                continue;
            }
        };

        let age = now.duration_since(modified).unwrap_or_default();
        if age <= max_age {
            continue;
        }
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), age_secs = age.as_secs(), "Reaped artifact");
                removed += 1;
            }
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to reap artifact"),
        }
    }
    removed
}

/// Reap every store each `interval`, starting one interval from now.
pub fn spawn_reaper(stores: Vec<ArtifactStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; `open` already reaped.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            for store in &stores {
                store.reap().await;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    async fn store(dir: &Path, max_age: Duration) -> ArtifactStore {
        ArtifactStore::open(dir, "http://localhost:4000/assets/reports/", max_age)
            .await
            .expect("store opens")
    }

    #[test]
    fn test_unique_filename_shape() {
        let name = ArtifactStore::generate_unique_filename("chart", "png");
        let stem = name.strip_suffix(".png").expect("extension");
        let mut parts = stem.splitn(3, '-');
        assert_eq!(parts.next(), Some("chart"));
        let millis: i64 = parts.next().expect("timestamp").parse().expect("numeric");
        assert!(millis > 0);
        let suffix: u32 = parts.next().expect("suffix").parse().expect("numeric");
        assert!(suffix < 1000);
    }

    #[test]
    fn test_same_millisecond_names_vary_in_suffix() {
        let mut by_millis: HashMap<i64, Vec<u32>> = HashMap::new();
        for _ in 0..20_000 {
            let name = ArtifactStore::generate_unique_filename("report", "pdf");
            let stem = name.strip_suffix(".pdf").expect("extension");
            let mut parts = stem.splitn(3, '-');
            assert_eq!(parts.next(), Some("report"));
            let millis: i64 = parts.next().expect("timestamp").parse().expect("numeric");
            let suffix: u32 = parts.next().expect("suffix").parse().expect("numeric");
            assert!(suffix < 1000, "suffix {suffix} out of range");
            by_millis.entry(millis).or_default().push(suffix);
        }

        let crowded: Vec<&Vec<u32>> = by_millis.values().filter(|s| s.len() >= 20).collect();
        assert!(!crowded.is_empty(), "expected many names within one millisecond");
        for suffixes in crowded {
            let distinct: HashSet<u32> = suffixes.iter().copied().collect();
            // Twenty draws from 0..1000 repeat a value only occasionally.
            assert!(distinct.len() * 2 > suffixes.len().min(1000));
        }
    }

    #[tokio::test]
    async fn test_open_creates_nested_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("assets").join("reports");
        let store = store(&dir, Duration::from_secs(3600)).await;
        assert!(store.is_ready());
        // Idempotent.
        ArtifactStore::ensure_directory(&dir).await.expect("exists");
    }

    #[tokio::test]
    async fn test_save_writes_file_and_links_it() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = store(tmp.path(), Duration::from_secs(3600)).await;
        let artifact = store.save("a.png", b"data").await.expect("saved");

        assert_eq!(artifact.filename, "a.png");
        assert_eq!(
            artifact.public_url,
            "http://localhost:4000/assets/reports/a.png"
        );
        assert_eq!(std::fs::read(&artifact.file_path).expect("read"), b"data");
    }

    #[tokio::test]
    async fn test_reap_removes_only_expired_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = store(tmp.path(), Duration::from_secs(3600)).await;
        store.save("fresh.png", b"x").await.expect("saved");
        std::fs::create_dir(tmp.path().join("nested")).expect("subdir");

        assert_eq!(store.reap().await, 0);
        assert!(tmp.path().join("fresh.png").exists());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(reap_directory(tmp.path(), Duration::ZERO).await, 1);
        assert!(!tmp.path().join("fresh.png").exists());
        assert!(tmp.path().join("nested").exists());
    }

    #[tokio::test]
    async fn test_reap_missing_directory_is_harmless() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            reap_directory(&tmp.path().join("absent"), Duration::ZERO).await,
            0
        );
    }

    #[tokio::test]
    async fn test_save_unique_uses_prefix() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = store(tmp.path(), Duration::from_secs(3600)).await;
        let artifact = store
            .save_unique("report", "pdf", b"%PDF-")
            .await
            .expect("saved");
        assert!(artifact.filename.starts_with("report-"));
        assert!(artifact.filename.ends_with(".pdf"));
        assert!(artifact.file_path.exists());
    }
}
