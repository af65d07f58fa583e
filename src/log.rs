//! Per-request activity log, one JSON object per line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{Result, RevexError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Append-only log of extraction requests in `~/.revex/activity.log`.
pub struct ActivityLogger {
    log_path: PathBuf,
}

impl ActivityLogger {
    pub fn new() -> Result<Self> {
        let user_dirs = directories::UserDirs::new()
            .ok_or_else(|| RevexError::Other("could not determine home directory".into()))?;
        Self::at(user_dirs.home_dir().join(".revex").join("activity.log"))
    }

    /// Log to an explicit file, creating its parent directory.
    pub fn at(log_path: PathBuf) -> Result<Self> {
        if let Some(dir) = log_path.parent() {
            fs::create_dir_all(dir)?;
        }
        Ok(Self { log_path })
    }

    pub fn log(
        &self,
        level: LogLevel,
        host: Option<&str>,
        event: &str,
        details: Option<&str>,
    ) -> Result<()> {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            host: host.map(str::to_string),
            event: event.to_string(),
            details: details.map(str::to_string),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{}", serde_json::to_string(&entry)?)?;
        Ok(())
    }

    /// Entries matching the filters, most recent first. Lines that are not
    /// valid entries are skipped.
    pub fn read_logs(
        &self,
        host_filter: Option<&str>,
        errors_only: bool,
    ) -> Result<Vec<LogEntry>> {
        if !self.log_path.exists() {
            return Ok(vec![]);
        }

        let reader = BufReader::new(fs::File::open(&self.log_path)?);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let Ok(entry) = serde_json::from_str::<LogEntry>(&line) else {
                continue;
            };
            if errors_only && entry.level != LogLevel::Error {
                continue;
            }
            if let Some(host) = host_filter {
                if entry.host.as_deref() != Some(host) {
                    continue;
                }
            }
            entries.push(entry);
        }

        entries.reverse();
        Ok(entries)
    }

    pub fn info(&self, host: Option<&str>, event: &str, details: Option<&str>) -> Result<()> {
        self.log(LogLevel::Info, host, event, details)
    }

    pub fn error(&self, host: Option<&str>, event: &str, details: Option<&str>) -> Result<()> {
        self.log(LogLevel::Error, host, event, details)
    }
}
