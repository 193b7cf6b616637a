//! Client configuration types.

use std::path::PathBuf;
use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default chunk payload size, sized to stay under a 1 MiB transport frame.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// What to do when a single file fails to read or transmit.
///
/// The default aborts the whole run: a silently incomplete scan can mislead
/// risk assessment. Skipping is available as an explicit opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileErrorPolicy {
    /// Abort the run on the first failed file.
    #[default]
    AbortScan,
    /// Log the failure, skip the file, and continue with the rest.
    SkipFile,
}

/// Configuration for one scan run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ClientConfig {
    /// Root directory to serve files from.
    pub root: PathBuf,

    /// Maximum chunk payload size in bytes.
    #[builder(default = "DEFAULT_CHUNK_SIZE")]
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Deadline for the session-creation call. File streaming itself has no
    /// built-in deadline and is bounded only by cancellation.
    #[builder(default = "Duration::from_secs(10)")]
    #[serde(default = "default_session_timeout")]
    pub session_timeout: Duration,

    /// Follow symbolic links while matching.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Policy for per-file read/transmission failures.
    #[builder(default)]
    #[serde(default)]
    pub on_file_error: FileErrorPolicy,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_session_timeout() -> Duration {
    Duration::from_secs(10)
}

impl ClientConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if let Some(size) = self.chunk_size {
            if size == 0 {
                return Err("Chunk size must be non-zero".to_string());
            }
        }
        Ok(())
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Create a simple config for scanning a root with defaults.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            session_timeout: Duration::from_secs(10),
            follow_symlinks: false,
            on_file_error: FileErrorPolicy::AbortScan,
        }
    }
}
