//! # portprobe - A Concurrent TCP Port Connectivity Probe
//!
//! portprobe attempts a short-timeout TCP connection to every port in an
//! inclusive range on one host and reports each port as open, closed, or
//! error.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use portprobe::scanner::ScanEngine;
//! use portprobe::types::validate;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = validate("192.168.1.1", 1, 1024)?
//!         .with_timeout(Duration::from_millis(500))?
//!         .with_concurrency(64)?;
//!
//!     let mut scan = ScanEngine::new().start(request, CancellationToken::new())?;
//!     while let Some(result) = scan.next().await {
//!         println!("{} {}", result.port, result.status);
//!     }
//!     let summary = scan.finish().await?;
//!     println!("{} open of {}", summary.open_count, summary.total_ports);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Ports, port ranges, and request validation
//! - [`scanner`] - The worker-pool engine and the TCP connect probe
//! - [`config`] - Settings file handling
//! - [`output`] - Plain, line, JSON, and CSV formatters
//! - [`cli`] - Command-line front end
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ScanError, ValidationError};
pub use scanner::{
    run_scan, Connector, PortResult, PortStatus, ScanEngine, ScanHandle, ScanReport, ScanSummary,
};
pub use types::{validate, Port, PortRange, ScanRequest};
