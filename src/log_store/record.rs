//! CSV record format.
//!
//! Each request becomes one line of six comma-joined fields. Values are
//! written verbatim: a comma inside a field (typically the user agent) shifts
//! every following column when the line is read back.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// First line of every active log file.
pub const HEADER: &str = "Agent,Time,Method,Resource,Version,Status";

/// One completed request, as written to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub agent: String,
    pub time: DateTime<Utc>,
    pub method: String,
    /// Request path including the query string.
    pub resource: String,
    /// Protocol label, e.g. `HTTP/1.1`.
    pub version: String,
    pub status: u16,
}

impl LogRecord {
    /// Millisecond-precision UTC timestamp, e.g. `2024-05-01T12:00:00.123Z`.
    pub fn timestamp(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// The record as a CSV line, without the trailing newline.
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.agent,
            self.timestamp(),
            self.method,
            self.resource,
            self.version,
            self.status
        )
    }
}

/// A line read back from the log.
///
/// Fields are positional and unvalidated. A short line leaves the trailing
/// fields absent and they are omitted from the JSON form; extra columns are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl LogEntry {
    pub fn from_csv_line(line: &str) -> Self {
        let mut fields = line.split(',').map(str::to_owned);
        Self {
            agent: fields.next(),
            time: fields.next(),
            method: fields.next(),
            resource: fields.next(),
            version: fields.next(),
            status: fields.next(),
        }
    }
}

/// Lines of `text` that contain something other than whitespace.
pub(crate) fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| !line.trim().is_empty())
}

/// Parse a whole log file, skipping its first (header) line.
pub fn parse_entries(text: &str) -> Vec<LogEntry> {
    non_empty_lines(text)
        .skip(1)
        .map(LogEntry::from_csv_line)
        .collect()
}
