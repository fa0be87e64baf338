//! The active log file: initialization, appends and reads.

use std::fs;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::io::AsyncWriteExt;

use crate::config::LogConfig;
use crate::log_store::error::LogStoreError;
use crate::log_store::paths::LogPaths;
use crate::log_store::record::{non_empty_lines, parse_entries, LogEntry, LogRecord, HEADER};
use crate::observability::metrics;

/// Owner of the request log files.
///
/// Built once at startup and shared behind an `Arc`. The line count mirrors
/// the active file (header included) for the lifetime of the process; it is
/// never re-read from disk after [`LogStore::open`].
#[derive(Debug)]
pub struct LogStore {
    paths: LogPaths,
    max_lines: usize,
    line_count: AtomicUsize,
    pub(crate) rotating: AtomicBool,
}

impl LogStore {
    /// Create the log directory and make sure the active file starts with
    /// the header.
    ///
    /// A file whose first line is not the header is rewritten with the
    /// header prepended; its existing lines are kept after it.
    pub fn open(config: &LogConfig) -> Result<Self, LogStoreError> {
        let paths = LogPaths::new(&config.log_dir, &config.log_file_name);
        let line_count = initialize(&paths)?;

        tracing::info!(
            path = %paths.active.display(),
            line_count,
            max_lines = config.max_lines,
            "Request log ready"
        );
        metrics::set_active_lines(line_count);

        Ok(Self {
            paths,
            max_lines: config.max_lines,
            line_count: AtomicUsize::new(line_count),
            rotating: AtomicBool::new(false),
        })
    }

    pub fn paths(&self) -> &LogPaths {
        &self.paths
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Cached number of lines in the active file, header included.
    pub fn line_count(&self) -> usize {
        self.line_count.load(Ordering::Acquire)
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating.load(Ordering::Acquire)
    }

    /// Whether the next record should trigger a rotation first.
    pub fn needs_rotation(&self) -> bool {
        self.line_count() >= self.max_lines
    }

    /// Append one record to the active file.
    ///
    /// The cached line count only moves on success, so a failed write
    /// leaves it untouched.
    pub async fn append(&self, record: &LogRecord) -> Result<(), LogStoreError> {
        let path = self.paths.active();
        let mut line = record.to_csv_line();
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| LogStoreError::write(path, e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| LogStoreError::write(path, e))?;
        file.flush()
            .await
            .map_err(|e| LogStoreError::write(path, e))?;

        let count = self.line_count.fetch_add(1, Ordering::AcqRel) + 1;
        metrics::set_active_lines(count);
        Ok(())
    }

    /// Parse every record in the active file, oldest first.
    pub async fn read_all(&self) -> Result<Vec<LogEntry>, LogStoreError> {
        let path = self.paths.active();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LogStoreError::read(path, e))?;
        Ok(parse_entries(&text))
    }

    pub(crate) fn reset_line_count(&self) {
        self.line_count.store(1, Ordering::Release);
        metrics::set_active_lines(1);
    }
}

pub(crate) fn header_line() -> String {
    format!("{HEADER}\n")
}

/// Returns the line count of the active file after repair.
fn initialize(paths: &LogPaths) -> Result<usize, LogStoreError> {
    fs::create_dir_all(&paths.dir).map_err(|source| LogStoreError::CreateDir {
        path: paths.dir.clone(),
        source,
    })?;

    let active = paths.active();
    if !active.exists() {
        fs::write(active, header_line()).map_err(|e| LogStoreError::write(active, e))?;
        return Ok(1);
    }

    let text = fs::read_to_string(active).map_err(|e| LogStoreError::read(active, e))?;
    let lines: Vec<&str> = non_empty_lines(&text).collect();
    if lines.first() == Some(&HEADER) {
        return Ok(lines.len());
    }

    if !lines.is_empty() {
        tracing::warn!(
            path = %active.display(),
            orphaned_lines = lines.len(),
            "Log file has no header, rewriting"
        );
    }

    let mut repaired = header_line();
    for line in &lines {
        repaired.push_str(line);
        repaired.push('\n');
    }
    fs::write(active, repaired).map_err(|e| LogStoreError::write(active, e))?;

    Ok(1 + lines.len())
}
