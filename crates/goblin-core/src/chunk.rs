//! Chunked file content protocol messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One bounded-size unit of a file's content.
///
/// Every chunk belongs to exactly one session and one file. Chunks for a
/// file carry strictly increasing offsets, and exactly one chunk (the last)
/// is marked end-of-file. Zero-byte files still produce a single empty eof
/// chunk so the coordinator always sees a definite terminal signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChunk {
    /// Session this chunk belongs to.
    pub session_id: String,
    /// File path relative to the scan root.
    pub path: PathBuf,
    /// Byte offset of the payload within the file.
    pub offset: u64,
    /// Payload bytes.
    pub payload: Vec<u8>,
    /// Whether this is the file's terminal chunk.
    pub eof: bool,
}

impl FileChunk {
    /// Offset of the first byte past this chunk's payload.
    pub fn end_offset(&self) -> u64 {
        self.offset + self.payload.len() as u64
    }
}
