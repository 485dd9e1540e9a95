//! Scan request validation.
//!
//! [`validate`] is the only way to obtain a [`ScanRequest`], so every request
//! the engine sees already satisfies its invariants. Host names are only
//! checked for emptiness here; resolution happens per port at dial time.

use crate::error::{ValidationError, ValidationResult};
use crate::types::PortRange;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Default per-attempt connect timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default number of connection attempts in flight.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// A validated, immutable scan job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    host: String,
    range: PortRange,
    #[serde(rename = "timeout_ms", serialize_with = "serialize_millis")]
    timeout: Duration,
    concurrency: usize,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Validate a raw host and port bounds into a [`ScanRequest`].
///
/// The host is trimmed. Timeout and concurrency start at [`DEFAULT_TIMEOUT`]
/// and [`DEFAULT_CONCURRENCY`]; use [`ScanRequest::with_timeout`] and
/// [`ScanRequest::with_concurrency`] to override them.
pub fn validate(host: &str, start_port: u32, end_port: u32) -> ValidationResult<ScanRequest> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ValidationError::EmptyHost);
    }

    let range = PortRange::new(start_port, end_port)?;

    Ok(ScanRequest {
        host: host.to_string(),
        range,
        timeout: DEFAULT_TIMEOUT,
        concurrency: DEFAULT_CONCURRENCY,
    })
}

impl ScanRequest {
    /// Override the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> ValidationResult<Self> {
        if timeout.is_zero() {
            return Err(ValidationError::ZeroTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    /// Override the maximum number of in-flight attempts.
    pub fn with_concurrency(mut self, concurrency: usize) -> ValidationResult<Self> {
        if concurrency == 0 {
            return Err(ValidationError::ZeroConcurrency);
        }
        self.concurrency = concurrency;
        Ok(self)
    }

    /// Target host as given (trimmed), not yet resolved.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Inclusive port range to scan.
    pub fn range(&self) -> PortRange {
        self.range
    }

    /// Per-attempt deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Requested worker count.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Number of workers actually needed: never more than there are ports.
    pub fn worker_count(&self) -> usize {
        self.concurrency.min(self.range.len())
    }
}

impl fmt::Display for ScanRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ports {}", self.host, self.range)
    }
}
