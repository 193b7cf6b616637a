//! Scan session client for the overlord coordinator.
//!
//! This crate drives one scan end to end: it registers a session, receives
//! the coordinator's interests, streams matching files chunk by chunk, and
//! aggregates the findings the coordinator returns.
//!
//! The coordinator connection is consumed only through the
//! [`OverlordTransport`] trait; [`TcpTransport`] is the bundled
//! newline-delimited JSON implementation. Connection setup, authentication,
//! and retry policy all belong to the transport, never to the client.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use goblin_client::{ScanClient, TcpTransport};
//! use goblin_core::ClientConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = TcpTransport::connect("127.0.0.1:10000").await?;
//! let client = ScanClient::new(Arc::new(transport), ClientConfig::new("/srv/files"));
//! let report = client.run().await?;
//! println!("{} finding(s)", report.findings.len());
//! # Ok(())
//! # }
//! ```

mod aggregate;
mod client;
mod report;
mod transport;
mod wire;

pub use aggregate::ResultAggregator;
pub use client::{run_scan, ScanClient, ScanReport, ScanStats};
pub use report::{render_findings, render_summary};
pub use transport::{BoxFuture, ChunkStream, OverlordTransport, TransportError};
pub use wire::{FileVerdict, TcpTransport};

// Re-export core types for convenience
pub use goblin_core::{
    ClientConfig, FileErrorPolicy, Finding, Interest, ScanError, ScanSession, ScanWarning,
};
