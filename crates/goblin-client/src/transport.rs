//! The coordinator transport boundary.
//!
//! The scan client consumes its connection to the overlord only through the
//! [`OverlordTransport`] trait: one unary session-creation call, and one
//! client-streaming call per file that carries chunks up and findings back.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tokio_stream::Stream;

use goblin_core::{FileChunk, Finding, ScanHandshake};

/// Type alias for boxed futures returned by async transport methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Stream of one file's chunks, consumed by the transport in order.
pub type ChunkStream = Pin<Box<dyn Stream<Item = FileChunk> + Send>>;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("coordinator rejected the request: {0}")]
    Rejected(String),

    #[error("channel closed")]
    ChannelClosed,

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An established, authenticated channel to the overlord coordinator.
///
/// Implementations own the wire details; the client never sees them.
pub trait OverlordTransport: Send + Sync {
    /// Register a new scan session and receive the declared interests.
    fn create_scan(&self) -> BoxFuture<'_, Result<ScanHandshake, TransportError>>;

    /// Stream one file's chunks and collect the findings the coordinator
    /// returns for it.
    ///
    /// The stream ends with the chunk marked eof; a stream that ends
    /// without one means the sender aborted and no verdict should be
    /// expected.
    fn stream_file(
        &self,
        chunks: ChunkStream,
    ) -> BoxFuture<'_, Result<Vec<Finding>, TransportError>>;
}
