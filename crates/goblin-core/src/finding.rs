//! Findings reported by coordinator-side analysis.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Severity of a finding, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "Critical"),
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
            Self::Info => write!(f, "Info"),
        }
    }
}

/// Where a finding was detected within the scanned tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the scan root.
    pub path: PathBuf,
    /// Line within the file, when the analysis module reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
}

impl Location {
    /// Location covering a whole file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            line: None,
        }
    }

    /// Location at a specific line of a file.
    pub fn line(path: impl Into<PathBuf>, line: u64) -> Self {
        Self {
            path: path.into(),
            line: Some(line),
        }
    }
}

/// An issue detected by a coordinator-side analysis module.
///
/// Findings are coordinator-authoritative: the client only accumulates and
/// relays them, never mutates or deduplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// How severe the issue is.
    pub severity: Severity,
    /// Human-readable description of the issue.
    pub description: String,
    /// Where the issue was detected.
    pub location: Location,
}

impl Finding {
    /// Create a new finding.
    pub fn new(severity: Severity, description: impl Into<String>, location: Location) -> Self {
        Self {
            severity,
            description: description.into(),
            location,
        }
    }
}
