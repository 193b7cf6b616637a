//! Error types for scan operations.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can terminate a scan run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The coordinator failed or rejected the session-creation call.
    #[error("session creation failed: {reason}")]
    SessionCreation { reason: String },

    /// Session creation did not complete within the deadline.
    #[error("session creation timed out after {timeout:?}")]
    SessionTimeout { timeout: Duration },

    /// A local file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport failure while sending chunks or receiving findings.
    #[error("transmission failed for {path} (interest {tag}) at offset {offset}: {reason}")]
    StreamTransmission {
        path: PathBuf,
        tag: String,
        offset: u64,
        reason: String,
    },

    /// The run was aborted by the caller.
    #[error("scan cancelled")]
    Cancelled,

    /// Root path is not a directory.
    #[error("root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl ScanError {
    /// Create a file-read error with path context.
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// True when the error concerns a single file rather than the session.
    ///
    /// Only these errors are eligible for the skip-file policy; everything
    /// else always aborts the run.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. } | Self::StreamTransmission { .. }
        )
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied for a subtree or entry.
    PermissionDenied,
    /// A symbolic link cycle was detected during traversal.
    SymlinkCycle,
    /// Error reading a directory entry.
    ReadError,
    /// Error reading metadata.
    MetadataError,
}

/// Non-fatal condition encountered while matching files.
///
/// Warnings are recorded and logged; the scan continues over the remaining
/// readable entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a permission denied warning.
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Permission denied: {}", path.display()),
            path,
            kind: WarningKind::PermissionDenied,
        }
    }

    /// Create a symlink cycle warning.
    pub fn symlink_cycle(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Symlink cycle at: {}", path.display()),
            path,
            kind: WarningKind::SymlinkCycle,
        }
    }

    /// Create a read error warning.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Read error: {error}"),
            path,
            kind: WarningKind::ReadError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_read_error_keeps_path() {
        let err = ScanError::file_read(
            "/scan/root/a.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::FileRead { .. }));
        assert!(err.to_string().contains("/scan/root/a.txt"));
    }

    #[test]
    fn test_per_file_classification() {
        let read = ScanError::file_read(
            "x",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        assert!(read.is_per_file());

        let session = ScanError::SessionCreation {
            reason: "unreachable".into(),
        };
        assert!(!session.is_per_file());
        assert!(!ScanError::Cancelled.is_per_file());
    }

    #[test]
    fn test_scan_warning_creation() {
        let warning = ScanWarning::permission_denied("/test/path");
        assert_eq!(warning.kind, WarningKind::PermissionDenied);
        assert!(warning.message.contains("Permission denied"));

        let cycle = ScanWarning::symlink_cycle("/test/loop");
        assert_eq!(cycle.kind, WarningKind::SymlinkCycle);
    }
}
