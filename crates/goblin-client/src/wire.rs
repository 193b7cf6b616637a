//! Newline-delimited JSON transport over TCP.
//!
//! Frames, one JSON document per line:
//! - `{"op":"create_scan"}` from the client, answered by a
//!   [`ScanHandshake`] line.
//! - Per file, one line per [`FileChunk`] in offset order; after the eof
//!   chunk the coordinator answers with a single [`FileVerdict`] line.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_stream::StreamExt;

use goblin_core::{Finding, ScanHandshake};

use crate::transport::{BoxFuture, ChunkStream, OverlordTransport, TransportError};

#[derive(Serialize)]
struct CreateScanRequest {
    op: &'static str,
}

/// Findings returned for one fully-streamed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileVerdict {
    /// Zero or more findings, in the coordinator's order.
    pub findings: Vec<Finding>,
}

/// A single shared connection to the coordinator.
///
/// One scan uses the channel at a time; both halves are mutex-guarded so
/// each call owns its end of the conversation from request to response.
pub struct TcpTransport {
    reader: Mutex<BufReader<OwnedReadHalf>>,
    writer: Mutex<OwnedWriteHalf>,
}

impl TcpTransport {
    /// Dial the coordinator.
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| TransportError::ConnectionFailed(format!("{addr}: {e}")))?;
        let (read, write) = stream.into_split();
        Ok(Self {
            reader: Mutex::new(BufReader::new(read)),
            writer: Mutex::new(write),
        })
    }
}

async fn write_frame<T: Serialize>(
    writer: &mut OwnedWriteHalf,
    value: &T,
) -> Result<(), TransportError> {
    let mut line =
        serde_json::to_vec(value).map_err(|e| TransportError::Protocol(e.to_string()))?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    Ok(())
}

async fn read_frame<T: DeserializeOwned>(
    reader: &mut BufReader<OwnedReadHalf>,
) -> Result<T, TransportError> {
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Err(TransportError::ChannelClosed);
    }
    serde_json::from_str(line.trim_end()).map_err(|e| TransportError::Protocol(e.to_string()))
}

impl OverlordTransport for TcpTransport {
    fn create_scan(&self) -> BoxFuture<'_, Result<ScanHandshake, TransportError>> {
        Box::pin(async move {
            {
                let mut writer = self.writer.lock().await;
                write_frame(&mut writer, &CreateScanRequest { op: "create_scan" }).await?;
                writer.flush().await?;
            }
            let mut reader = self.reader.lock().await;
            read_frame(&mut reader).await
        })
    }

    fn stream_file(
        &self,
        mut chunks: ChunkStream,
    ) -> BoxFuture<'_, Result<Vec<Finding>, TransportError>> {
        Box::pin(async move {
            let mut saw_eof = false;
            {
                let mut writer = self.writer.lock().await;
                while let Some(chunk) = chunks.next().await {
                    saw_eof = chunk.eof;
                    write_frame(&mut writer, &chunk).await?;
                }
                writer.flush().await?;
            }

            if !saw_eof {
                // Sender aborted mid-file; no verdict is coming.
                return Err(TransportError::Protocol(
                    "chunk stream ended before eof".into(),
                ));
            }

            let mut reader = self.reader.lock().await;
            let verdict: FileVerdict = read_frame(&mut reader).await?;
            Ok(verdict.findings)
        })
    }
}
