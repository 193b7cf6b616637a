use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio_stream::StreamExt;

use goblin_client::{
    BoxFuture, ChunkStream, OverlordTransport, ScanClient, TransportError,
};
use goblin_core::{
    ClientConfig, FileChunk, FileErrorPolicy, Finding, Interest, Location, ScanError,
    ScanHandshake, Severity,
};

/// In-memory coordinator: records every chunk, answers with scripted
/// findings keyed by relative path.
#[derive(Default)]
struct MockOverlord {
    interests: Vec<Interest>,
    findings: HashMap<PathBuf, Vec<Finding>>,
    chunks: Mutex<Vec<FileChunk>>,
    fail_file: Option<PathBuf>,
}

impl MockOverlord {
    fn with_interests(interests: Vec<Interest>) -> Self {
        Self {
            interests,
            ..Self::default()
        }
    }

    fn recorded_chunks(&self) -> Vec<FileChunk> {
        self.chunks.lock().unwrap().clone()
    }
}

impl OverlordTransport for MockOverlord {
    fn create_scan(&self) -> BoxFuture<'_, Result<ScanHandshake, TransportError>> {
        let handshake = ScanHandshake {
            session_id: "scan-1".into(),
            interests: self.interests.clone(),
        };
        Box::pin(async move { Ok(handshake) })
    }

    fn stream_file(
        &self,
        mut chunks: ChunkStream,
    ) -> BoxFuture<'_, Result<Vec<Finding>, TransportError>> {
        Box::pin(async move {
            let mut path = None;
            while let Some(chunk) = chunks.next().await {
                path = Some(chunk.path.clone());
                self.chunks.lock().unwrap().push(chunk);
            }
            let path = path.ok_or_else(|| TransportError::Protocol("empty stream".into()))?;
            if self.fail_file.as_deref() == Some(path.as_path()) {
                return Err(TransportError::ChannelClosed);
            }
            Ok(self.findings.get(&path).cloned().unwrap_or_default())
        })
    }
}

/// Coordinator that never answers the session-creation call.
struct HangingOverlord;

impl OverlordTransport for HangingOverlord {
    fn create_scan(&self) -> BoxFuture<'_, Result<ScanHandshake, TransportError>> {
        Box::pin(std::future::pending())
    }

    fn stream_file(
        &self,
        _chunks: ChunkStream,
    ) -> BoxFuture<'_, Result<Vec<Finding>, TransportError>> {
        Box::pin(async { Ok(Vec::new()) })
    }
}

fn finding(severity: Severity, description: &str, path: &str) -> Finding {
    Finding::new(severity, description, Location::file(path))
}

fn config_for(root: &TempDir) -> ClientConfig {
    ClientConfig::new(root.path())
}

#[tokio::test]
async fn test_chunking_across_two_files() {
    // One small file and one spanning two chunks; expect 3 chunks total,
    // in sorted file order.
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.txt"), b"hello").unwrap();
    std::fs::write(temp.path().join("b.bin"), vec![0u8; 2 * 1024 * 1024]).unwrap();

    let overlord = Arc::new(MockOverlord::with_interests(vec![Interest::new("all", "*")]));
    let client = ScanClient::new(overlord.clone(), config_for(&temp));

    let report = client.run().await.unwrap();
    assert!(report.findings.is_empty());
    assert_eq!(report.stats.files_streamed, 2);
    assert_eq!(report.stats.chunks_sent, 3);
    assert_eq!(report.stats.bytes_sent, 5 + 2 * 1024 * 1024);

    let chunks = overlord.recorded_chunks();
    assert_eq!(chunks.len(), 3);

    assert_eq!(chunks[0].path, PathBuf::from("a.txt"));
    assert_eq!(chunks[0].offset, 0);
    assert!(chunks[0].eof);

    assert_eq!(chunks[1].path, PathBuf::from("b.bin"));
    assert_eq!(chunks[1].offset, 0);
    assert!(!chunks[1].eof);
    assert_eq!(chunks[2].path, PathBuf::from("b.bin"));
    assert_eq!(chunks[2].offset, 1024 * 1024);
    assert!(chunks[2].eof);

    assert!(chunks.iter().all(|c| c.session_id == "scan-1"));
}

#[tokio::test]
async fn test_findings_follow_interest_order() {
    // Findings for the first interest's files must all precede the second
    // interest's, whatever the coordinator returned per call.
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("x.txt"), b"text").unwrap();
    std::fs::write(temp.path().join("z.bin"), b"blob").unwrap();

    let mut overlord = MockOverlord::with_interests(vec![
        Interest::new("alpha", "*.txt"),
        Interest::new("beta", "*.bin"),
    ]);
    overlord.findings.insert(
        "x.txt".into(),
        vec![finding(Severity::Medium, "from alpha", "x.txt")],
    );
    overlord.findings.insert(
        "z.bin".into(),
        vec![finding(Severity::High, "from beta", "z.bin")],
    );

    let client = ScanClient::new(Arc::new(overlord), config_for(&temp));
    let report = client.run().await.unwrap();

    let descriptions: Vec<_> = report
        .findings
        .iter()
        .map(|f| f.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["from alpha", "from beta"]);
}

#[tokio::test]
async fn test_findings_keep_arrival_order_within_interest() {
    // Three findings for x.txt, none for y.txt: exactly those three, as
    // received.
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("x.txt"), b"xx").unwrap();
    std::fs::write(temp.path().join("y.txt"), b"yy").unwrap();

    let mut overlord =
        MockOverlord::with_interests(vec![Interest::new("alpha", "*.txt")]);
    overlord.findings.insert(
        "x.txt".into(),
        vec![
            finding(Severity::Low, "first", "x.txt"),
            finding(Severity::High, "second", "x.txt"),
            finding(Severity::Info, "third", "x.txt"),
        ],
    );

    let client = ScanClient::new(Arc::new(overlord), config_for(&temp));
    let report = client.run().await.unwrap();

    let descriptions: Vec<_> = report
        .findings
        .iter()
        .map(|f| f.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_session_timeout_yields_no_findings() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.txt"), b"hello").unwrap();

    let config = ClientConfig::builder()
        .root(temp.path())
        .session_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let client = ScanClient::new(Arc::new(HangingOverlord), config);

    let err = client.run().await.unwrap_err();
    assert!(matches!(err, ScanError::SessionTimeout { .. }));
}

#[tokio::test]
async fn test_zero_findings_is_success() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.txt"), b"hello").unwrap();

    let overlord = Arc::new(MockOverlord::with_interests(vec![Interest::new("all", "*")]));
    let client = ScanClient::new(overlord, config_for(&temp));

    let report = client.run().await.unwrap();
    assert!(!report.has_findings());
    assert_eq!(report.stats.files_streamed, 1);
}

#[tokio::test]
async fn test_no_interests_streams_nothing() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.txt"), b"hello").unwrap();

    let overlord = Arc::new(MockOverlord::with_interests(Vec::new()));
    let client = ScanClient::new(overlord.clone(), config_for(&temp));

    let report = client.run().await.unwrap();
    assert!(report.findings.is_empty());
    assert_eq!(report.stats.files_matched, 0);
    assert!(overlord.recorded_chunks().is_empty());
}

#[tokio::test]
async fn test_transport_failure_aborts_by_default() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.txt"), b"aa").unwrap();
    std::fs::write(temp.path().join("b.txt"), b"bb").unwrap();

    let mut overlord =
        MockOverlord::with_interests(vec![Interest::new("alpha", "*.txt")]);
    overlord.fail_file = Some("a.txt".into());

    let client = ScanClient::new(Arc::new(overlord), config_for(&temp));
    let err = client.run().await.unwrap_err();

    match err {
        ScanError::StreamTransmission { path, tag, .. } => {
            assert_eq!(path, PathBuf::from("a.txt"));
            assert_eq!(tag, "alpha");
        }
        other => panic!("expected StreamTransmission, got {other:?}"),
    }
}

#[tokio::test]
async fn test_skip_policy_continues_past_failed_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.txt"), b"aa").unwrap();
    std::fs::write(temp.path().join("b.txt"), b"bb").unwrap();

    let mut overlord =
        MockOverlord::with_interests(vec![Interest::new("alpha", "*.txt")]);
    overlord.fail_file = Some("a.txt".into());
    overlord.findings.insert(
        "b.txt".into(),
        vec![finding(Severity::Low, "survivor", "b.txt")],
    );

    let config = ClientConfig::builder()
        .root(temp.path())
        .on_file_error(FileErrorPolicy::SkipFile)
        .build()
        .unwrap();
    let client = ScanClient::new(Arc::new(overlord), config);

    let report = client.run().await.unwrap();
    assert_eq!(report.stats.files_skipped, 1);
    assert_eq!(report.stats.files_streamed, 1);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].description, "survivor");
}

#[tokio::test]
async fn test_cancelled_run_fails_with_cancelled() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.txt"), b"hello").unwrap();

    let overlord = Arc::new(MockOverlord::with_interests(vec![Interest::new("all", "*")]));
    let client = ScanClient::new(overlord, config_for(&temp));

    client.cancellation_token().cancel();
    let session = client.create_session().await.unwrap();
    let err = client.run_scan(&session).await.unwrap_err();
    assert!(matches!(err, ScanError::Cancelled));
}

#[tokio::test]
async fn test_run_scan_end_to_end_over_tcp() {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.txt"), b"hello").unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Minimal coordinator: hand out a session with no interests.
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();

        let request = lines.next_line().await.unwrap().unwrap();
        assert!(request.contains("create_scan"));

        let handshake = ScanHandshake {
            session_id: "scan-9".into(),
            interests: Vec::new(),
        };
        let mut frame = serde_json::to_vec(&handshake).unwrap();
        frame.push(b'\n');
        write.write_all(&frame).await.unwrap();
    });

    let report = goblin_client::run_scan(&addr.to_string(), temp.path())
        .await
        .unwrap();
    assert_eq!(report.session_id, "scan-9");
    assert!(report.findings.is_empty());

    server.await.unwrap();
}

#[tokio::test]
async fn test_empty_file_still_reaches_coordinator() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("empty.txt"), b"").unwrap();

    let overlord = Arc::new(MockOverlord::with_interests(vec![Interest::new(
        "alpha", "*.txt",
    )]));
    let client = ScanClient::new(overlord.clone(), config_for(&temp));

    let report = client.run().await.unwrap();
    assert_eq!(report.stats.chunks_sent, 1);

    let chunks = overlord.recorded_chunks();
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].payload.is_empty());
    assert!(chunks[0].eof);
}
