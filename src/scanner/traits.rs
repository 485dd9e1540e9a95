//! Scanner trait abstraction.
//!
//! Defines the per-port probe interface the engine dispatches to, so the
//! worker pool can be driven by the real TCP connector or by an instrumented
//! stand-in in tests.

use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Status of a scanned port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// A connection was established and then closed.
    Open,
    /// The connection was refused, timed out, or the host was unreachable.
    Closed,
    /// The attempt could not be made (resolution failure, malformed address,
    /// unexpected I/O fault).
    Error,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Result of scanning a single port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortResult {
    /// The port number that was scanned.
    pub port: Port,
    /// Status determined by the scan.
    pub status: PortStatus,
    /// What went wrong, for `Error` results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    /// Connect time in milliseconds, for `Open` results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl PortResult {
    /// An open port.
    pub fn open(port: Port) -> Self {
        Self {
            port,
            status: PortStatus::Open,
            error_detail: None,
            response_time_ms: None,
        }
    }

    /// A closed port.
    pub fn closed(port: Port) -> Self {
        Self {
            port,
            status: PortStatus::Closed,
            error_detail: None,
            response_time_ms: None,
        }
    }

    /// A port whose attempt failed for a reason other than the port being
    /// closed.
    pub fn error(port: Port, detail: impl Into<String>) -> Self {
        Self {
            port,
            status: PortStatus::Error,
            error_detail: Some(detail.into()),
            response_time_ms: None,
        }
    }

    /// Set the response time.
    pub fn with_response_time(mut self, time_ms: u64) -> Self {
        self.response_time_ms = Some(time_ms);
        self
    }

    /// Check if the port is open.
    pub fn is_open(&self) -> bool {
        self.status == PortStatus::Open
    }
}

/// A single-port probe.
///
/// Implementations must classify every outcome into a [`PortResult`] rather
/// than failing: a probe never aborts the scan it belongs to. Any connection
/// an implementation opens must be closed before `probe` returns.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Probe `host:port`, bounding each network wait by `timeout`.
    async fn probe(&self, host: &str, port: Port, timeout: Duration) -> PortResult;
}
