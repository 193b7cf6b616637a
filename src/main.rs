//! goblin - scan client for the overlord coordinator.
//!
//! Registers a scan session, streams files matching the coordinator's
//! interests from a local root, and prints the findings that come back.
//!
//! Usage:
//!   goblin --overlord-addr 127.0.0.1:10000 --root-path /srv/files

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use goblin_client::{render_findings, render_summary, ScanClient, TcpTransport};
use goblin_core::{ClientConfig, FileErrorPolicy};

#[derive(Parser)]
#[command(
    name = "goblin",
    version,
    about = "Scan client that streams files to an overlord coordinator for analysis"
)]
struct Cli {
    /// Overlord address in host:port form
    #[arg(long, default_value = "127.0.0.1:10000")]
    overlord_addr: String,

    /// Root directory to serve files from
    #[arg(long, default_value = ".")]
    root_path: PathBuf,

    /// Maximum chunk payload size in bytes
    #[arg(long, default_value_t = 1024 * 1024)]
    chunk_size: usize,

    /// Deadline for session creation, in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Skip files that fail to read or transmit instead of aborting
    #[arg(long)]
    skip_failed_files: bool,

    /// Follow symbolic links while matching
    #[arg(long)]
    follow_symlinks: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::builder()
        .root(cli.root_path)
        .chunk_size(cli.chunk_size)
        .session_timeout(Duration::from_secs(cli.timeout_secs))
        .follow_symlinks(cli.follow_symlinks)
        .on_file_error(if cli.skip_failed_files {
            FileErrorPolicy::SkipFile
        } else {
            FileErrorPolicy::AbortScan
        })
        .build()
        .context("invalid configuration")?;

    eprintln!("Connecting to overlord at {}...", cli.overlord_addr);
    let transport = TcpTransport::connect(&cli.overlord_addr)
        .await
        .context("failed to reach the overlord")?;

    let client = ScanClient::new(Arc::new(transport), config);

    let cancel = client.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupt received, stopping scan...");
            cancel.cancel();
        }
    });

    let report = client.run().await.context("scan failed")?;

    println!("{}", render_summary(&report));
    if report.has_findings() {
        println!("{}", render_findings(&report.findings));
    } else {
        println!("Scan completed: no findings reported.");
    }

    Ok(())
}
