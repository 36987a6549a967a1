//! Structured upload journal (JSONL).
//!
//! Every upload attempt appends one line to
//! `~/.shelfwatch/upload-log.jsonl`: when it ran, how many images went up,
//! how long the round trip took, and how it ended. `shelfwatch history` and
//! `shelfwatch health` read it back. Journaling is best-effort — a failed
//! write never fails the upload.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{self, schema::LoggingConfig};

// ---------------------------------------------------------------------------
// Journal entry
// ---------------------------------------------------------------------------

/// One upload attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadLogEntry {
    pub timestamp: String,
    pub image_count: usize,
    /// `"ok"`, `"timeout"`, `"server"`, or `"failed"`.
    pub outcome: String,
    pub duration_ms: u64,
    /// Number of products the service reported (successful uploads only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub result_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model_used: Option<String>,
}

impl UploadLogEntry {
    pub fn new(image_count: usize, outcome: &str, duration_ms: u64) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            image_count,
            outcome: outcome.to_string(),
            duration_ms,
            result_count: None,
            model_used: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Append an entry to the journal. Silently a no-op when journaling is
/// disabled or the write fails.
pub fn log_upload(logging: &LoggingConfig, entry: &UploadLogEntry) {
    if !logging.enabled {
        return;
    }
    let _ = append_entry(journal_path(logging), entry);
}

fn append_entry(path: PathBuf, entry: &UploadLogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read all journal entries, oldest first.
///
/// Silently skips malformed lines. Returns an empty vec if the file does
/// not exist or cannot be read.
pub fn read_all_entries(logging: &LoggingConfig) -> Vec<UploadLogEntry> {
    let Ok(file) = fs::File::open(journal_path(logging)) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<UploadLogEntry>(&line).ok())
        .collect()
}

/// Resolved path of the journal file.
pub fn journal_path(logging: &LoggingConfig) -> PathBuf {
    config::expand_home(&logging.path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_logging(tag: &str) -> LoggingConfig {
        let path = std::env::temp_dir().join(format!(
            "shelfwatch-journal-{}-{tag}.jsonl",
            std::process::id()
        ));
        LoggingConfig {
            enabled: true,
            path: path.to_string_lossy().into_owned(),
        }
    }

    #[test]
    fn entries_round_trip() {
        let logging = temp_logging("roundtrip");
        let _ = fs::remove_file(journal_path(&logging));

        let mut entry = UploadLogEntry::new(3, "ok", 4200);
        entry.result_count = Some(5);
        entry.model_used = Some("qwen-vl".to_string());
        log_upload(&logging, &entry);
        log_upload(&logging, &UploadLogEntry::new(1, "timeout", 300_000));

        let entries = read_all_entries(&logging);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].outcome, "ok");
        assert_eq!(entries[0].result_count, Some(5));
        assert_eq!(entries[1].outcome, "timeout");

        let _ = fs::remove_file(journal_path(&logging));
    }

    #[test]
    fn disabled_journal_writes_nothing() {
        let mut logging = temp_logging("disabled");
        logging.enabled = false;
        let _ = fs::remove_file(journal_path(&logging));

        log_upload(&logging, &UploadLogEntry::new(1, "ok", 100));
        assert!(read_all_entries(&logging).is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let logging = temp_logging("malformed");
        let path = journal_path(&logging);
        fs::write(
            &path,
            "not json\n{\"timestamp\":\"t\",\"image_count\":1,\"outcome\":\"ok\",\"duration_ms\":5}\n",
        )
        .unwrap();

        let entries = read_all_entries(&logging);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].image_count, 1);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_reads_empty() {
        let logging = temp_logging("missing");
        let _ = fs::remove_file(journal_path(&logging));
        assert!(read_all_entries(&logging).is_empty());
    }
}
