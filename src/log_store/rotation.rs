//! Three-slot log rotation.
//!
//! ```text
//! second backup  → deleted
//! first backup   → second backup
//! active         → first backup
//! (new)          → active, header only
//! ```
//!
//! Steps run strictly one after another. A crash between the rename of the
//! active file and the rewrite can leave no active file; the next append
//! recreates it without a header.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::log_store::error::LogStoreError;
use crate::log_store::store::{header_line, LogStore};
use crate::observability::metrics;

/// What a call to [`LogStore::rotate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Files were shifted and a fresh active file was written.
    Completed,
    /// Another rotation held the guard, or one already emptied the active
    /// file; nothing was touched.
    Skipped,
}

/// Clears the rotation flag when dropped, whatever path the rotation took.
struct RotationGuard<'a>(&'a AtomicBool);

impl<'a> RotationGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RotationGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl LogStore {
    /// Shift the active file into the backup slots and start a new one.
    ///
    /// Returns [`Rotation::Skipped`] without waiting if a rotation is
    /// already running, or if the active file is below the threshold once
    /// the guard is held (a rotation finished since the caller checked).
    /// The caller is expected to append either way.
    pub async fn rotate(&self) -> Result<Rotation, LogStoreError> {
        let Some(_guard) = RotationGuard::acquire(&self.rotating) else {
            tracing::debug!("Rotation already in progress, skipping");
            metrics::record_rotation("skipped");
            return Ok(Rotation::Skipped);
        };

        if !self.needs_rotation() {
            tracing::debug!(
                line_count = self.line_count(),
                "Active log already rotated, skipping"
            );
            metrics::record_rotation("skipped");
            return Ok(Rotation::Skipped);
        }

        match self.shift_files().await {
            Ok(()) => {
                tracing::info!(
                    path = %self.paths().active.display(),
                    "Request log rotated"
                );
                metrics::record_rotation("completed");
                Ok(Rotation::Completed)
            }
            Err(e) => {
                metrics::record_rotation("failed");
                Err(e)
            }
        }
    }

    async fn shift_files(&self) -> Result<(), LogStoreError> {
        let paths = self.paths();

        let cleared = remove_if_exists(&paths.second_backup).await;

        // A failed delete only matters when nothing will replace the slot;
        // otherwise the shift below retries the delete itself.
        if exists(&paths.first_backup).await {
            if let Err(e) = cleared {
                tracing::warn!(error = %e, "Could not remove second backup");
            }
            if let Err(e) = rename(&paths.first_backup, &paths.second_backup).await {
                tracing::warn!(error = %e, "Backup shift failed, clearing target and retrying");
                if let Err(e) = remove_if_exists(&paths.second_backup).await {
                    tracing::debug!(error = %e, "Could not clear second backup before retry");
                }
                rename(&paths.first_backup, &paths.second_backup).await?;
            }
        } else {
            cleared?;
        }

        rename(&paths.active, &paths.first_backup).await?;

        tokio::fs::write(&paths.active, header_line())
            .await
            .map_err(|e| LogStoreError::write(&paths.active, e))?;
        self.reset_line_count();

        Ok(())
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn remove_if_exists(path: &Path) -> Result<(), LogStoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LogStoreError::remove(path, e)),
    }
}

async fn rename(from: &Path, to: &Path) -> Result<(), LogStoreError> {
    tokio::fs::rename(from, to)
        .await
        .map_err(|e| LogStoreError::rename(from, to, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogConfig;
    use crate::log_store::record::{LogRecord, HEADER};
    use chrono::Utc;
    use std::fs;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> LogStore {
        LogStore::open(&LogConfig {
            log_dir: dir.path().to_path_buf(),
            log_file_name: "log.csv".into(),
            max_lines: 3,
        })
        .unwrap()
    }

    fn record(resource: &str) -> LogRecord {
        LogRecord {
            agent: "a".into(),
            time: Utc::now(),
            method: "GET".into(),
            resource: resource.into(),
            version: "HTTP/1.1".into(),
            status: 200,
        }
    }

    /// Append until the store reports it is due for rotation.
    async fn fill(store: &LogStore) {
        let mut n = 0;
        while !store.needs_rotation() {
            n += 1;
            store.append(&record(&format!("/fill{n}"))).await.unwrap();
        }
    }

    #[test]
    fn guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let guard = RotationGuard::acquire(&flag).unwrap();
        assert!(RotationGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(!flag.load(Ordering::Acquire));
        assert!(RotationGuard::acquire(&flag).is_some());
    }

    #[tokio::test]
    async fn rotate_moves_active_into_first_backup() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        fill(&store).await;
        let full = fs::read_to_string(store.paths().active()).unwrap();

        assert_eq!(store.rotate().await.unwrap(), Rotation::Completed);

        assert_eq!(fs::read_to_string(&store.paths().first_backup).unwrap(), full);
        assert_eq!(fs::read_to_string(store.paths().active()).unwrap(), header_line());
        assert!(!store.paths().second_backup.exists());
        assert_eq!(store.line_count(), 1);
        assert!(!store.is_rotating());
    }

    #[tokio::test]
    async fn rotate_discards_oldest_generation() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        fill(&store).await;
        let paths = store.paths().clone();
        fs::write(&paths.second_backup, "oldest").unwrap();
        fs::write(&paths.first_backup, "older").unwrap();
        fs::write(&paths.active, "current").unwrap();

        store.rotate().await.unwrap();

        assert_eq!(fs::read_to_string(&paths.second_backup).unwrap(), "older");
        assert_eq!(fs::read_to_string(&paths.first_backup).unwrap(), "current");
    }

    #[tokio::test]
    async fn rotate_below_threshold_is_skipped() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);

        assert_eq!(store.rotate().await.unwrap(), Rotation::Skipped);
        assert!(!store.paths().first_backup.exists());
        assert!(!store.is_rotating());
    }

    #[tokio::test]
    async fn stale_rotation_after_completed_one_is_skipped() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        let paths = store.paths().clone();
        fs::write(&paths.first_backup, "previous generation").unwrap();
        fill(&store).await;

        assert_eq!(store.rotate().await.unwrap(), Rotation::Completed);
        store.append(&record("/after")).await.unwrap();
        let first = fs::read_to_string(&paths.first_backup).unwrap();
        let active = fs::read_to_string(&paths.active).unwrap();

        // A caller that decided to rotate before the first rotation finished.
        assert_eq!(store.rotate().await.unwrap(), Rotation::Skipped);

        assert_eq!(fs::read_to_string(&paths.second_backup).unwrap(), "previous generation");
        assert_eq!(fs::read_to_string(&paths.first_backup).unwrap(), first);
        assert_eq!(fs::read_to_string(&paths.active).unwrap(), active);
        assert_eq!(store.line_count(), 2);
    }

    #[tokio::test]
    async fn rotate_while_guard_held_is_skipped() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        fill(&store).await;
        let _held = RotationGuard::acquire(&store.rotating).unwrap();

        assert_eq!(store.rotate().await.unwrap(), Rotation::Skipped);
        assert!(!store.paths().first_backup.exists());
    }

    #[tokio::test]
    async fn failed_rotation_clears_guard() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        fill(&store).await;
        fs::remove_file(store.paths().active()).unwrap();

        let err = store.rotate().await.unwrap_err();
        assert!(matches!(err, LogStoreError::Rename { .. }));
        assert!(!store.is_rotating());
    }

    #[tokio::test]
    async fn persistent_backup_shift_failure_is_returned_after_retry() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        fill(&store).await;
        let paths = store.paths().clone();
        fs::create_dir(&paths.second_backup).unwrap();
        fs::write(paths.second_backup.join("occupied"), "x").unwrap();
        fs::write(&paths.first_backup, "older").unwrap();
        let active = fs::read_to_string(&paths.active).unwrap();

        let err = store.rotate().await.unwrap_err();

        match err {
            LogStoreError::Rename { from, to, .. } => {
                assert_eq!(from, paths.first_backup);
                assert_eq!(to, paths.second_backup);
            }
            other => panic!("expected rename failure, got {other}"),
        }
        assert!(!store.is_rotating());
        assert_eq!(fs::read_to_string(&paths.first_backup).unwrap(), "older");
        assert_eq!(fs::read_to_string(&paths.active).unwrap(), active);
        assert_eq!(store.line_count(), 3);
    }

    #[tokio::test]
    async fn undeletable_second_backup_without_first_is_returned() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        fill(&store).await;
        let paths = store.paths().clone();
        fs::create_dir(&paths.second_backup).unwrap();
        fs::write(paths.second_backup.join("occupied"), "x").unwrap();

        let err = store.rotate().await.unwrap_err();

        assert!(matches!(err, LogStoreError::Remove { .. }));
        assert!(!store.is_rotating());
        assert!(!paths.first_backup.exists());
        assert!(fs::read_to_string(&paths.active).unwrap().starts_with(HEADER));
    }
}
