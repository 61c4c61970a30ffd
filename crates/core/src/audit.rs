//! Append-only JSONL journal of capability resolutions.

use crate::capability::CapabilityName;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditJournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: String,
    pub capability: CapabilityName,
    pub request: String,
    pub strategy: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

impl JournalEntry {
    pub fn new(
        capability: CapabilityName,
        request: impl Into<String>,
        strategy: Option<String>,
        success: bool,
        error: Option<String>,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            capability,
            request: request.into(),
            strategy,
            success,
            error,
        }
    }
}

pub struct AuditJournal {
    path: PathBuf,
    file: Mutex<File>,
}

impl AuditJournal {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, AuditJournalError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, entry: &JournalEntry) -> Result<(), AuditJournalError> {
        let json = serde_json::to_string(entry)?;
        let mut file = self.file.lock();
        writeln!(file, "{}", json)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_appended_as_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");
        let journal = AuditJournal::new(&path).unwrap();

        journal
            .record(&JournalEntry::new(
                CapabilityName::Chat,
                "hello",
                Some("primary".into()),
                true,
                None,
            ))
            .unwrap();
        journal
            .record(&JournalEntry::new(
                CapabilityName::Image,
                "a cat",
                None,
                false,
                Some("boom".into()),
            ))
            .unwrap();

        let content = std::fs::read_to_string(journal.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: JournalEntry = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.capability, CapabilityName::Image);
        assert!(!second.success);
        assert_eq!(second.error.as_deref(), Some("boom"));
    }
}
