//! Coordinator-declared file selection rules.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A file-selection rule declared by the coordinator.
///
/// Each interest ties a glob pattern over root-relative paths to the
/// analysis module that asked for those files. Interests are read-only to
/// the client; they arrive as part of session creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    /// Opaque identifier of the coordinator-side analysis module.
    pub tag: CompactString,
    /// Glob pattern over paths relative to the scan root.
    pub pattern: String,
}

impl Interest {
    /// Create a new interest.
    pub fn new(tag: impl Into<CompactString>, pattern: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            pattern: pattern.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_creation() {
        let interest = Interest::new("secrets", "*.pem");
        assert_eq!(interest.tag.as_str(), "secrets");
        assert_eq!(interest.pattern, "*.pem");
    }
}
