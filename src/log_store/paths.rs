//! Locations of the active log file and its rotated backups.

use std::path::{Path, PathBuf};

/// The three rotation slots, all inside one directory.
///
/// Backups reuse the active file's stem with a generation number appended,
/// so `log.csv` rotates into `log1.csv` and then `log2.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    pub dir: PathBuf,
    pub active: PathBuf,
    pub first_backup: PathBuf,
    pub second_backup: PathBuf,
}

impl LogPaths {
    pub fn new(dir: impl Into<PathBuf>, file_name: &str) -> Self {
        let dir = dir.into();
        let active = dir.join(file_name);
        let first_backup = dir.join(backup_name(file_name, 1));
        let second_backup = dir.join(backup_name(file_name, 2));
        Self {
            dir,
            active,
            first_backup,
            second_backup,
        }
    }

    pub fn active(&self) -> &Path {
        &self.active
    }
}

fn backup_name(file_name: &str, generation: u8) -> String {
    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    match name.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}{generation}.{ext}"),
        None => format!("{stem}{generation}"),
    }
}
