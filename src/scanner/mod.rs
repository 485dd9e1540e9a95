//! Scanner module - the concurrent scan engine.
//!
//! A scan runs a fixed pool of tokio tasks, each pulling the next port from a
//! shared scan session and pushing its classified [`PortResult`] onto a
//! bounded channel as soon as the attempt finishes. Results therefore arrive
//! in completion order, not port order; consumers that want ascending output
//! sort after the scan completes (see [`ScanReport::sort_by_port`]).

mod session;
pub mod tcp;
pub mod traits;

use crate::error::{ScanError, ScanResult};
use crate::types::ScanRequest;
use chrono::{DateTime, Utc};
use serde::Serialize;
use session::ScanSession;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use tcp::TcpConnector;
pub use traits::{Connector, PortResult, PortStatus};

/// Terminal summary of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Host as requested.
    pub host: String,
    /// Ports in the requested range.
    pub total_ports: usize,
    /// Ports that produced a result.
    pub scanned_ports: usize,
    pub open_count: usize,
    pub closed_count: usize,
    pub error_count: usize,
    /// Highest number of attempts observed in flight at once.
    pub peak_in_flight: usize,
    /// True when the scan stopped early because it was cancelled.
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// A finished scan: the request, every result received, and the summary.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub request: ScanRequest,
    pub summary: ScanSummary,
    /// Results in the order they completed unless sorted.
    pub results: Vec<PortResult>,
}

impl ScanReport {
    /// Sort results by ascending port number.
    pub fn sort_by_port(&mut self) {
        self.results.sort_by_key(|r| r.port);
    }

    /// Results with the given status.
    pub fn with_status(&self, status: PortStatus) -> impl Iterator<Item = &PortResult> {
        self.results.iter().filter(move |r| r.status == status)
    }
}

/// The concurrent scan engine.
///
/// Generic over the [`Connector`] so the pool can be exercised without a
/// network; [`ScanEngine::new`] uses the real [`TcpConnector`].
pub struct ScanEngine<C: Connector = TcpConnector> {
    connector: Arc<C>,
}

impl ScanEngine<TcpConnector> {
    /// Create an engine that probes with TCP connect.
    pub fn new() -> Self {
        Self::with_connector(TcpConnector::new())
    }
}

impl Default for ScanEngine<TcpConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> ScanEngine<C> {
    /// Create an engine that probes with a custom connector.
    pub fn with_connector(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
        }
    }

    /// Start scanning `request` and return a handle streaming its results.
    ///
    /// Cancelling `cancel` stops dispatch of new ports; attempts already in
    /// flight run to completion and are still delivered.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Runtime`] when called outside a tokio runtime,
    /// before any port is attempted.
    pub fn start(&self, request: ScanRequest, cancel: CancellationToken) -> ScanResult<ScanHandle> {
        let runtime = Handle::try_current().map_err(|e| ScanError::Runtime(e.to_string()))?;

        let workers = request.worker_count();
        let total_ports = request.range().len();
        let session = Arc::new(ScanSession::new(request.range()));
        let request = Arc::new(request);
        let (tx, rx) = mpsc::channel(workers);
        // Scoped to this scan so dropping the handle stops it without
        // touching the caller's token.
        let cancel = cancel.child_token();

        info!(
            host = request.host(),
            ports = %request.range(),
            workers,
            timeout_ms = u64::try_from(request.timeout().as_millis()).unwrap_or(u64::MAX),
            "starting scan"
        );

        let started_at = Utc::now();
        let clock = Instant::now();

        let mut pool = JoinSet::new();
        for id in 0..workers {
            pool.spawn_on(
                run_worker(
                    id,
                    Arc::clone(&self.connector),
                    Arc::clone(&request),
                    Arc::clone(&session),
                    tx.clone(),
                    cancel.clone(),
                ),
                &runtime,
            );
        }
        // Workers hold the only senders; the stream ends when the last exits.
        drop(tx);

        let handle_request = Arc::clone(&request);
        let driver_cancel = cancel.clone();
        let completion = runtime.spawn(async move {
            let mut failure = None;
            while let Some(joined) = pool.join_next().await {
                if let Err(e) = joined {
                    warn!(error = %e, "scan worker failed");
                    failure.get_or_insert_with(|| e.to_string());
                }
            }
            if let Some(reason) = failure {
                return Err(ScanError::WorkerFailed(reason));
            }

            let tally = session.tally();
            let scanned = tally.scanned();
            let cancelled = driver_cancel.is_cancelled() && scanned < total_ports;
            if cancelled {
                warn!(scanned, total_ports, "scan cancelled before completion");
            }

            let summary = ScanSummary {
                host: request.host().to_string(),
                total_ports,
                scanned_ports: scanned,
                open_count: tally.open,
                closed_count: tally.closed,
                error_count: tally.errors,
                peak_in_flight: tally.peak_in_flight,
                cancelled,
                started_at,
                finished_at: Utc::now(),
                duration_ms: u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX),
            };
            info!(
                open = summary.open_count,
                closed = summary.closed_count,
                errors = summary.error_count,
                duration_ms = summary.duration_ms,
                "scan finished"
            );
            Ok(summary)
        });

        Ok(ScanHandle {
            request: handle_request,
            results: rx,
            completion: Some(completion),
            cancel,
        })
    }
}

/// One worker of the pool: claim a port, probe it, publish, repeat.
async fn run_worker<C: Connector>(
    id: usize,
    connector: Arc<C>,
    request: Arc<ScanRequest>,
    session: Arc<ScanSession>,
    results: mpsc::Sender<PortResult>,
    cancel: CancellationToken,
) {
    loop {
        if cancel.is_cancelled() {
            debug!(worker = id, "cancelled, not taking more ports");
            break;
        }
        let Some(port) = session.next_port() else {
            break;
        };

        session.begin_attempt();
        let result = connector
            .probe(request.host(), port, request.timeout())
            .await;
        session.finish_attempt(&result);

        debug!(
            worker = id,
            port = port.as_u16(),
            status = %result.status,
            in_flight = session.in_flight(),
            detail = result.error_detail.as_deref().unwrap_or(""),
            "port classified"
        );

        // A dropped receiver only means nobody is listening for individual
        // results any more; the summary still needs every port counted.
        let _ = results.send(result).await;
    }
}

/// Handle to a running scan.
///
/// Dropping the handle before [`finish`](Self::finish) or
/// [`collect`](Self::collect) cancels the scan.
pub struct ScanHandle {
    request: Arc<ScanRequest>,
    results: mpsc::Receiver<PortResult>,
    completion: Option<JoinHandle<ScanResult<ScanSummary>>>,
    cancel: CancellationToken,
}

impl ScanHandle {
    /// Receive the next result in completion order, or `None` once every
    /// worker has exited.
    pub async fn next(&mut self) -> Option<PortResult> {
        self.results.recv().await
    }

    /// Stop dispatching new ports.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The request being scanned.
    pub fn request(&self) -> &ScanRequest {
        &self.request
    }

    /// Wait for the scan to end, discarding results not yet received. The
    /// summary still counts them.
    pub async fn finish(mut self) -> ScanResult<ScanSummary> {
        self.results.close();
        self.join().await
    }

    /// Drain every remaining result and wait for the summary.
    pub async fn collect(mut self) -> ScanResult<ScanReport> {
        let mut results = Vec::with_capacity(self.request.range().len());
        while let Some(result) = self.results.recv().await {
            results.push(result);
        }
        let summary = self.join().await?;
        Ok(ScanReport {
            request: (*self.request).clone(),
            summary,
            results,
        })
    }

    async fn join(&mut self) -> ScanResult<ScanSummary> {
        let completion = self
            .completion
            .take()
            .ok_or_else(|| ScanError::WorkerFailed("scan already joined".to_string()))?;
        completion
            .await
            .map_err(|e| ScanError::WorkerFailed(e.to_string()))?
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        if self.completion.is_some() {
            debug!(host = self.request.host(), "scan handle dropped, cancelling");
            self.cancel.cancel();
        }
    }
}

/// Scan `request` with TCP connect and collect everything.
pub async fn run_scan(request: ScanRequest) -> ScanResult<ScanReport> {
    ScanEngine::new()
        .start(request, CancellationToken::new())?
        .collect()
        .await
}
