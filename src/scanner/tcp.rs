//! TCP Connect probe.
//!
//! Performs standard TCP connect attempts using the operating system's
//! socket API. Each attempt resolves the host itself, so an unresolvable
//! host surfaces as an `Error` on every port rather than one aggregate
//! failure. Resolution, connect and shutdown share one deadline.

use crate::scanner::traits::{Connector, PortResult};
use crate::types::Port;
use async_trait::async_trait;
use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::{timeout_at, Instant};
use tracing::debug;

/// TCP connect prober. Does not require elevated privileges.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl TcpConnector {
    /// Create a new TCP connector.
    pub fn new() -> Self {
        Self
    }

    /// Resolve `host` for `port`. The caller bounds the lookup.
    async fn resolve(host: &str, port: u16) -> Result<Vec<SocketAddr>, String> {
        // IP literals (including bare IPv6) skip the resolver entirely
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![SocketAddr::new(ip, port)]);
        }

        match lookup_host((host, port)).await {
            Ok(addrs) => {
                let addrs: Vec<SocketAddr> = addrs.collect();
                if addrs.is_empty() {
                    Err(format!("no addresses found for host '{}'", host))
                } else {
                    Ok(addrs)
                }
            }
            Err(e) => Err(format!("failed to resolve host '{}': {}", host, e)),
        }
    }

    /// Try each resolved address in turn until one accepts.
    async fn connect_any(addrs: &[SocketAddr]) -> io::Result<TcpStream> {
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no address to dial")))
    }
}

/// Whether a connect error means "nothing reachable is listening" rather
/// than a fault in the attempt itself.
fn is_closed_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::TimedOut
            | io::ErrorKind::HostUnreachable
            | io::ErrorKind::NetworkUnreachable
    )
}

/// Resolve, connect and close one port, all within a single `deadline`.
///
/// Time spent resolving is taken out of the connect budget, and the shutdown
/// of an open connection is cut off at the same instant.
async fn dial_within<R>(host: &str, resolve: R, port: Port, deadline: Duration) -> PortResult
where
    R: Future<Output = Result<Vec<SocketAddr>, String>>,
{
    let start = Instant::now();
    let expires = start + deadline;

    let addrs = match timeout_at(expires, resolve).await {
        Ok(Ok(addrs)) => addrs,
        Ok(Err(detail)) => return PortResult::error(port, detail),
        Err(_) => {
            return PortResult::error(
                port,
                format!(
                    "resolving host '{}' timed out after {}ms",
                    host,
                    deadline.as_millis()
                ),
            )
        }
    };

    match timeout_at(expires, TcpConnector::connect_any(&addrs)).await {
        Ok(Ok(mut stream)) => {
            let response_time = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            match timeout_at(expires, stream.shutdown()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    debug!(port = port.as_u16(), error = %e, "shutdown after connect failed")
                }
                Err(_) => debug!(port = port.as_u16(), "shutdown after connect cut off"),
            }
            drop(stream);
            PortResult::open(port).with_response_time(response_time)
        }
        Ok(Err(e)) if is_closed_error(&e) => PortResult::closed(port),
        Ok(Err(e)) => PortResult::error(port, e.to_string()),
        Err(_) => PortResult::closed(port),
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn probe(&self, host: &str, port: Port, deadline: Duration) -> PortResult {
        dial_within(host, Self::resolve(host, port.as_u16()), port, deadline).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::traits::PortStatus;
    use tokio::net::TcpListener;

    #[test]
    fn test_closed_error_classification() {
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert!(is_closed_error(&refused));

        let timed_out = io::Error::from(io::ErrorKind::TimedOut);
        assert!(is_closed_error(&timed_out));

        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(!is_closed_error(&denied));

        // Kind decides, not message text
        let worded = io::Error::new(io::ErrorKind::Other, "Host unreachable");
        assert!(!is_closed_error(&worded));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_unreachable_os_errors_are_closed() {
        // EHOSTUNREACH: "No route to host (os error 113)"
        let no_route = io::Error::from_raw_os_error(113);
        assert_eq!(no_route.kind(), io::ErrorKind::HostUnreachable);
        assert!(is_closed_error(&no_route));

        // ENETUNREACH
        let no_network = io::Error::from_raw_os_error(101);
        assert!(is_closed_error(&no_network));
    }

    #[tokio::test]
    async fn test_connect_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(u32::from(listener.local_addr().unwrap().port())).unwrap();

        let result = TcpConnector::new()
            .probe("127.0.0.1", port, Duration::from_secs(1))
            .await;

        assert_eq!(result.status, PortStatus::Open);
        assert!(result.response_time_ms.is_some());
    }

    #[tokio::test]
    async fn test_connect_closed_port() {
        // Bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(u32::from(listener.local_addr().unwrap().port())).unwrap();
        drop(listener);

        let result = TcpConnector::new()
            .probe("127.0.0.1", port, Duration::from_millis(200))
            .await;

        assert_eq!(result.status, PortStatus::Closed);
        assert!(result.error_detail.is_none());
    }

    #[tokio::test]
    async fn test_connect_unresolvable_host() {
        let port = Port::new(80).unwrap();
        let result = TcpConnector::new()
            .probe("!!!invalid_host!!!", port, Duration::from_millis(500))
            .await;

        assert_eq!(result.status, PortStatus::Error);
        assert!(!result.error_detail.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_slow_resolution_is_bounded_by_deadline() {
        let port = Port::new(80).unwrap();
        let deadline = Duration::from_millis(200);
        let resolve = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, String>(vec![SocketAddr::from(([127, 0, 0, 1], 80))])
        };

        let start = Instant::now();
        let result = dial_within("slow.test", resolve, port, deadline).await;

        assert!(start.elapsed() < Duration::from_millis(600));
        assert_eq!(result.status, PortStatus::Error);
        assert!(result.error_detail.unwrap_or_default().contains("timed out"));
    }

    #[tokio::test]
    async fn test_resolution_time_counts_against_connect() {
        // Resolution eats most of the budget; the connect to a non-routable
        // address only gets what is left.
        let port = Port::new(80).unwrap();
        let deadline = Duration::from_millis(400);
        let resolve = async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok::<_, String>(vec![SocketAddr::from(([10, 255, 255, 1], 80))])
        };

        let start = Instant::now();
        let result = dial_within("slow.test", resolve, port, deadline).await;

        let elapsed = start.elapsed();
        assert!(
            elapsed < Duration::from_millis(600),
            "attempt took {:?} with a {:?} deadline",
            elapsed,
            deadline
        );
        assert_ne!(result.status, PortStatus::Open);
    }
}
