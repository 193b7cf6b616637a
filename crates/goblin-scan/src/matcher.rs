//! Glob-based interest matching over a directory tree.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use jwalk::WalkDir;

use goblin_core::{Interest, ScanError, ScanWarning};

/// A compiled interest, ready to select files under a scan root.
#[derive(Debug)]
pub struct InterestMatcher {
    interest: Interest,
    glob: GlobMatcher,
}

impl InterestMatcher {
    /// Compile an interest's glob pattern.
    pub fn compile(interest: &Interest) -> Result<Self, ScanError> {
        let glob = Glob::new(&interest.pattern)
            .map_err(|e| ScanError::InvalidConfig {
                message: format!(
                    "bad pattern {:?} for interest {}: {e}",
                    interest.pattern, interest.tag
                ),
            })?
            .compile_matcher();
        Ok(Self {
            interest: interest.clone(),
            glob,
        })
    }

    /// The interest this matcher was compiled from.
    pub fn interest(&self) -> &Interest {
        &self.interest
    }

    /// Check a root-relative path against the pattern.
    pub fn matches(&self, relative: &Path) -> bool {
        self.glob.is_match(relative)
    }

    /// Walk `root`, yielding matching files and non-fatal warnings.
    ///
    /// Traversal is sorted by name within each directory, so the sequence
    /// is deterministic for a fixed tree. Each call re-walks from scratch.
    /// Matching is against the path relative to `root`; hidden entries are
    /// visited like any other.
    pub fn walk(&self, root: &Path, follow_symlinks: bool) -> MatchedFiles {
        let inner = WalkDir::new(root)
            .sort(true)
            .skip_hidden(false)
            .follow_links(follow_symlinks)
            .into_iter();
        MatchedFiles {
            root: root.to_path_buf(),
            glob: self.glob.clone(),
            inner,
        }
    }
}

/// One event produced while matching files under a root.
#[derive(Debug)]
pub enum MatchEntry {
    /// Absolute path of a file whose root-relative form matched.
    File(PathBuf),
    /// A subtree or entry that could not be visited.
    Warning(ScanWarning),
}

/// Lazy, finite, forward-only sequence of match events.
///
/// Dropping it mid-traversal abandons the walk; there is no resume.
pub struct MatchedFiles {
    root: PathBuf,
    glob: GlobMatcher,
    inner: jwalk::DirEntryIter<((), ())>,
}

impl Iterator for MatchedFiles {
    type Item = MatchEntry;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(MatchEntry::Warning(classify(err))),
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let matched = {
                let relative = path.strip_prefix(&self.root).unwrap_or(&path);
                self.glob.is_match(relative)
            };
            if matched {
                return Some(MatchEntry::File(path));
            }
        }
    }
}

fn classify(err: jwalk::Error) -> ScanWarning {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    match err.io_error() {
        Some(io) if io.kind() == std::io::ErrorKind::PermissionDenied => {
            ScanWarning::permission_denied(path)
        }
        Some(io) => ScanWarning::read_error(path, io),
        // jwalk reports loops without an underlying io error
        None => ScanWarning::symlink_cycle(path),
    }
}
