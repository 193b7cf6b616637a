//! Scan session lifecycle and streaming drive loop.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use goblin_core::{
    ClientConfig, FileChunk, FileErrorPolicy, Finding, Interest, ScanError, ScanSession,
    ScanWarning,
};
use goblin_scan::{FileChunker, InterestMatcher, MatchEntry};

use crate::aggregate::ResultAggregator;
use crate::transport::OverlordTransport;
use crate::wire::TcpTransport;

/// Connect to a coordinator and run one scan with default settings.
///
/// Convenience wrapper over [`TcpTransport`] and [`ScanClient`] for callers
/// that do not need custom configuration or cancellation. An unreachable
/// coordinator surfaces as a session-creation failure.
pub async fn run_scan(
    overlord_addr: &str,
    root: impl Into<PathBuf>,
) -> Result<ScanReport, ScanError> {
    let transport = TcpTransport::connect(overlord_addr)
        .await
        .map_err(|e| ScanError::SessionCreation {
            reason: e.to_string(),
        })?;
    let client = ScanClient::new(Arc::new(transport), ClientConfig::new(root));
    client.run().await
}

/// Per-run counters reported alongside the findings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Interests processed.
    pub interests: u64,
    /// Files that matched an interest.
    pub files_matched: u64,
    /// Files fully streamed to the coordinator.
    pub files_streamed: u64,
    /// Files abandoned under the skip-file policy.
    pub files_skipped: u64,
    /// Chunks sent.
    pub chunks_sent: u64,
    /// Payload bytes sent.
    pub bytes_sent: u64,
}

/// Outcome of a completed scan run.
#[derive(Debug)]
pub struct ScanReport {
    /// Session the run belonged to.
    pub session_id: String,
    /// Findings in canonical order: interest, then file, then arrival.
    pub findings: Vec<Finding>,
    /// Non-fatal traversal warnings.
    pub warnings: Vec<ScanWarning>,
    /// Run counters.
    pub stats: ScanStats,
    /// Wall-clock duration of the streaming phase.
    pub duration: Duration,
}

impl ScanReport {
    /// Whether the coordinator reported anything at all.
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

struct StreamedFile {
    findings: Vec<Finding>,
    chunks: u64,
    bytes: u64,
}

/// Drives one scan session against the coordinator.
///
/// A run moves Created to Streaming to Completed or Failed, one way only;
/// another scan needs a fresh session. The client is the single writer of
/// the session and the aggregate result.
pub struct ScanClient {
    transport: Arc<dyn OverlordTransport>,
    config: ClientConfig,
    cancel: CancellationToken,
}

impl ScanClient {
    /// Create a client over an established coordinator channel.
    pub fn new(transport: Arc<dyn OverlordTransport>, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that aborts the run when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The configuration this client runs with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Register a scan session with the coordinator.
    ///
    /// Bounded by the configured session deadline; the deadline ends with
    /// this call and never carries into file streaming. Failure here is
    /// fatal to the run, with no retry at this layer.
    pub async fn create_session(&self) -> Result<ScanSession, ScanError> {
        let timeout = self.config.session_timeout;
        let handshake = tokio::time::timeout(timeout, self.transport.create_scan())
            .await
            .map_err(|_| ScanError::SessionTimeout { timeout })?
            .map_err(|e| ScanError::SessionCreation {
                reason: e.to_string(),
            })?;

        info!(
            session = %handshake.session_id,
            interests = handshake.interests.len(),
            "scan session created"
        );
        Ok(ScanSession::from_handshake(handshake))
    }

    /// Stream every interest's matching files and aggregate the findings.
    ///
    /// Interests are processed in coordinator order, files in walk order,
    /// chunks in offset order, so the output ordering is canonical without
    /// any coordination from the transport.
    pub async fn run_scan(&self, session: &ScanSession) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        let root = self
            .config
            .root
            .canonicalize()
            .map_err(|e| ScanError::file_read(&self.config.root, e))?;
        if !root.is_dir() {
            return Err(ScanError::NotADirectory { path: root });
        }

        let mut aggregator = ResultAggregator::new();
        let mut warnings = Vec::new();
        let mut stats = ScanStats::default();

        for interest in &session.interests {
            stats.interests += 1;
            let matcher = InterestMatcher::compile(interest)?;
            debug!(tag = %interest.tag, pattern = %interest.pattern, "matching interest");

            for entry in matcher.walk(&root, self.config.follow_symlinks) {
                if self.cancel.is_cancelled() {
                    return Err(ScanError::Cancelled);
                }

                match entry {
                    MatchEntry::Warning(warning) => {
                        warn!(path = %warning.path.display(), "{}", warning.message);
                        warnings.push(warning);
                    }
                    MatchEntry::File(path) => {
                        stats.files_matched += 1;
                        let relative = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();

                        match self.stream_file(session, interest, &root, &relative).await {
                            Ok(streamed) => {
                                stats.files_streamed += 1;
                                stats.chunks_sent += streamed.chunks;
                                stats.bytes_sent += streamed.bytes;
                                aggregator.append(interest, &relative, streamed.findings);
                            }
                            Err(err)
                                if err.is_per_file()
                                    && self.config.on_file_error == FileErrorPolicy::SkipFile =>
                            {
                                warn!(
                                    path = %relative.display(),
                                    tag = %interest.tag,
                                    "skipping file after error: {err}"
                                );
                                stats.files_skipped += 1;
                            }
                            Err(err) => return Err(err),
                        }
                    }
                }
            }
        }

        let findings = aggregator.finalize();
        info!(
            findings = findings.len(),
            files = stats.files_streamed,
            "scan completed"
        );
        Ok(ScanReport {
            session_id: session.id.clone(),
            findings,
            warnings,
            stats,
            duration: start.elapsed(),
        })
    }

    /// Create a session and run the full scan.
    pub async fn run(&self) -> Result<ScanReport, ScanError> {
        let session = self.create_session().await?;
        self.run_scan(&session).await
    }

    /// Stream one file's chunks and collect its findings.
    ///
    /// Chunks flow through a capacity-1 channel, so at most one chunk is
    /// buffered ahead of the transport. Local read errors take precedence
    /// over whatever the aborted transport call reports.
    async fn stream_file(
        &self,
        session: &ScanSession,
        interest: &Interest,
        root: &Path,
        relative: &Path,
    ) -> Result<StreamedFile, ScanError> {
        let chunker =
            FileChunker::open(session.id.as_str(), root, relative, self.config.chunk_size)?;
        let chunks = chunker.chunk_count();
        let bytes = chunker.size();
        debug!(path = %relative.display(), bytes, chunks, "streaming file");

        let (tx, rx) = mpsc::channel::<FileChunk>(1);
        let send_fut = self
            .transport
            .stream_file(Box::pin(ReceiverStream::new(rx)));

        let sent_bytes = Arc::new(AtomicU64::new(0));
        let reader_sent = Arc::clone(&sent_bytes);
        let reader = tokio::task::spawn_blocking(move || {
            for chunk in chunker {
                let chunk = chunk?;
                let len = chunk.payload.len() as u64;
                if tx.blocking_send(chunk).is_err() {
                    // Transport dropped the stream; it reports its own error.
                    break;
                }
                reader_sent.fetch_add(len, Ordering::Relaxed);
            }
            Ok::<(), ScanError>(())
        });

        let (send_res, read_res) = tokio::select! {
            results = async { tokio::join!(send_fut, reader) } => results,
            _ = self.cancel.cancelled() => return Err(ScanError::Cancelled),
        };

        let read_res = read_res.map_err(|e| ScanError::Other {
            message: format!("chunk reader task failed: {e}"),
        })?;
        read_res?;

        let findings = send_res.map_err(|e| ScanError::StreamTransmission {
            path: relative.to_path_buf(),
            tag: interest.tag.to_string(),
            offset: sent_bytes.load(Ordering::Relaxed),
            reason: e.to_string(),
        })?;

        Ok(StreamedFile {
            findings,
            chunks,
            bytes,
        })
    }
}
