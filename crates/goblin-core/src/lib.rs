//! Core types for the goblin scan client.
//!
//! This crate provides the data model shared across the goblin ecosystem:
//! scan sessions, coordinator-declared interests, file chunks, findings,
//! and client configuration.

mod chunk;
mod config;
mod error;
mod finding;
mod interest;
mod session;

pub use chunk::FileChunk;
pub use config::{ClientConfig, ClientConfigBuilder, FileErrorPolicy, DEFAULT_CHUNK_SIZE};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use finding::{Finding, Location, Severity};
pub use interest::Interest;
pub use session::{ScanHandshake, ScanSession};
