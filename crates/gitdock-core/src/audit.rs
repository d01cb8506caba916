//! Per-workspace audit log.
//!
//! Each operation appends a timestamped, level-tagged line to
//! `working_dir/gitdock.log`. The log is an audit trail only -- it is never
//! machine-parsed. Audit failures are reported on the diagnostic stream via
//! `tracing` and otherwise swallowed: logging must never abort an operation.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::WorkspaceConfig;

/// Severity tag of an audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    /// File-only detail.
    Debug,
    /// Normal operation, mirrored to the diagnostic stream.
    Info,
    /// Failure, mirrored to the diagnostic stream.
    Error,
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Error => "ERROR",
        };
        f.write_str(tag)
    }
}

/// Append one `<RFC3339 timestamp> [<LEVEL>]: <message>` line to the
/// workspace log, creating the containing directory first if necessary.
///
/// Info and error lines are also emitted through `tracing` (which the binary
/// routes to stderr, keeping stdout clean for the protocol).
pub fn log_event(config: &WorkspaceConfig, level: AuditLevel, message: &str) {
    match level {
        AuditLevel::Debug => tracing::debug!("{message}"),
        AuditLevel::Info => tracing::info!("{message}"),
        AuditLevel::Error => tracing::error!("{message}"),
    }

    if let Err(e) = append_line(config, level, message) {
        tracing::warn!(
            log_file = %config.log_file().display(),
            error = %e,
            "Failed to write audit log line"
        );
    }
}

fn append_line(
    config: &WorkspaceConfig,
    level: AuditLevel,
    message: &str,
) -> std::io::Result<()> {
    if let Some(parent) = config.log_file().parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_file())?;
    writeln!(file, "{} [{}]: {}", Utc::now().to_rfc3339(), level, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_timestamped_tagged_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let config = WorkspaceConfig::new(tmp.path().to_path_buf());

        log_event(&config, AuditLevel::Info, "pull requested");
        log_event(&config, AuditLevel::Error, "pull failed");

        let contents = std::fs::read_to_string(config.log_file()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[INFO]: pull requested"));
        assert!(lines[1].contains("[ERROR]: pull failed"));
        // RFC3339 timestamps start each line
        assert!(lines[0].split(' ').next().unwrap().contains('T'));
    }

    #[test]
    fn creates_missing_log_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let config = WorkspaceConfig::new(tmp.path().join("not/yet/here"));

        log_event(&config, AuditLevel::Debug, "first line");

        assert!(config.log_file().is_file());
    }

    #[test]
    fn failures_are_swallowed() {
        // Point the log at a path whose parent is a file, so creation fails.
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let config = WorkspaceConfig::new(blocker);

        // Must not panic or propagate.
        log_event(&config, AuditLevel::Info, "dropped on the floor");
    }
}
