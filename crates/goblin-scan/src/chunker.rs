//! Fixed-size chunked reads of matched files.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use goblin_core::{FileChunk, ScanError};

/// Lazily reads a file in fixed-size blocks, yielding one [`FileChunk`] per
/// block with the final block marked end-of-file.
///
/// The file size is captured at open: a file of N bytes produces exactly
/// ⌈N/chunk_size⌉ chunks with offsets 0, chunk_size, 2*chunk_size and so
/// on, or a single empty terminal chunk when N is zero. A file that shrinks
/// underneath the reader surfaces an error rather than silently truncating,
/// and a file that grows is read only up to the recorded size.
///
/// The handle closes when the chunker drops, on every exit path.
#[derive(Debug)]
pub struct FileChunker {
    file: File,
    path: PathBuf,
    relative: PathBuf,
    session_id: String,
    size: u64,
    offset: u64,
    chunk_size: usize,
    done: bool,
}

impl FileChunker {
    /// Open `root/relative` for chunked streaming.
    pub fn open(
        session_id: impl Into<String>,
        root: &Path,
        relative: impl Into<PathBuf>,
        chunk_size: usize,
    ) -> Result<Self, ScanError> {
        let relative = relative.into();
        let path = root.join(&relative);
        let file = File::open(&path).map_err(|e| ScanError::file_read(&path, e))?;
        let size = file
            .metadata()
            .map_err(|e| ScanError::file_read(&path, e))?
            .len();
        Ok(Self {
            file,
            path,
            relative,
            session_id: session_id.into(),
            size,
            offset: 0,
            chunk_size,
            done: false,
        })
    }

    /// File size in bytes, recorded at open.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of chunks this file will produce.
    pub fn chunk_count(&self) -> u64 {
        if self.size == 0 {
            1
        } else {
            self.size.div_ceil(self.chunk_size as u64)
        }
    }

    fn read_block(&mut self, want: usize) -> std::io::Result<Vec<u8>> {
        let mut buf = vec![0u8; want];
        let mut filled = 0;
        while filled < want {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(std::io::Error::new(
                        ErrorKind::UnexpectedEof,
                        format!("file truncated at offset {}", self.offset + filled as u64),
                    ));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(buf)
    }
}

impl Iterator for FileChunker {
    type Item = Result<FileChunk, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let remaining = self.size - self.offset;
        let want = remaining.min(self.chunk_size as u64) as usize;

        let payload = match self.read_block(want) {
            Ok(payload) => payload,
            Err(e) => {
                self.done = true;
                return Some(Err(ScanError::file_read(&self.path, e)));
            }
        };

        let eof = self.offset + want as u64 >= self.size;
        let chunk = FileChunk {
            session_id: self.session_id.clone(),
            path: self.relative.clone(),
            offset: self.offset,
            payload,
            eof,
        };

        self.offset += want as u64;
        if eof {
            self.done = true;
        }
        Some(Ok(chunk))
    }
}
