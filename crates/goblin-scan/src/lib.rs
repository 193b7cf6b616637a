//! Interest-driven file selection and chunked streaming for goblin.
//!
//! This crate provides the two stateless helpers the scan client drives per
//! interest:
//!
//! - **Matching**: [`InterestMatcher`] walks the scan root (sorted, so the
//!   sequence is deterministic for a fixed tree) and yields files whose
//!   root-relative path satisfies the interest's glob. Unreadable subtrees
//!   and symlink cycles degrade to warnings instead of aborting.
//! - **Streaming**: [`FileChunker`] reads a matched file in fixed-size
//!   blocks, yielding one chunk per block with the last marked end-of-file.
//!
//! # Example
//!
//! ```rust,no_run
//! use goblin_scan::{Interest, InterestMatcher, MatchEntry};
//!
//! let interest = Interest::new("secrets", "*.pem");
//! let matcher = InterestMatcher::compile(&interest).unwrap();
//! for entry in matcher.walk("/srv/files".as_ref(), false) {
//!     match entry {
//!         MatchEntry::File(path) => println!("matched {}", path.display()),
//!         MatchEntry::Warning(w) => eprintln!("{}", w.message),
//!     }
//! }
//! ```

mod chunker;
mod matcher;

pub use chunker::FileChunker;
pub use matcher::{InterestMatcher, MatchEntry, MatchedFiles};

// Re-export core types for convenience
pub use goblin_core::{FileChunk, Interest, ScanError, ScanWarning, WarningKind};
