//! End-to-end scans against loopback listeners.

use portprobe::{run_scan, validate, PortStatus, ScanEngine, ValidationError};
use std::collections::HashSet;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Bind 9000 when it is free, otherwise any ephemeral port.
async fn listener() -> (TcpListener, u16) {
    let listener = match TcpListener::bind("127.0.0.1:9000").await {
        Ok(l) => l,
        Err(_) => TcpListener::bind("127.0.0.1:0").await.unwrap(),
    };
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

#[tokio::test]
async fn nothing_listening_on_port_one_is_closed() {
    let request = validate("127.0.0.1", 1, 1)
        .and_then(|r| r.with_timeout(Duration::from_millis(100)))
        .unwrap();

    let report = run_scan(request).await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].port.as_u16(), 1);
    assert_eq!(report.results[0].status, PortStatus::Closed);
    assert_eq!(report.summary.closed_count, 1);
}

#[tokio::test]
async fn listening_port_is_open() {
    let (_listener, port) = listener().await;
    let request = validate("127.0.0.1", u32::from(port), u32::from(port)).unwrap();

    let report = run_scan(request).await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].port.as_u16(), port);
    assert_eq!(report.results[0].status, PortStatus::Open);
}

#[tokio::test]
async fn unresolvable_host_reports_error_per_port() {
    let request = validate("!!!invalid_host!!!", 1, 3)
        .and_then(|r| r.with_timeout(Duration::from_millis(500)))
        .unwrap();

    let report = tokio::time::timeout(Duration::from_secs(10), run_scan(request))
        .await
        .expect("scan of an unresolvable host should complete")
        .unwrap();

    assert_eq!(report.results.len(), 3);
    for result in &report.results {
        assert_eq!(result.status, PortStatus::Error);
        assert!(!result.error_detail.as_deref().unwrap_or("").is_empty());
    }
    assert_eq!(report.summary.error_count, 3);
    assert!(!report.summary.cancelled);
}

#[test]
fn reversed_range_is_rejected_before_scanning() {
    assert_eq!(
        validate("127.0.0.1", 9000, 8999),
        Err(ValidationError::InvalidRange {
            start: 9000,
            end: 8999
        })
    );
}

#[tokio::test]
async fn range_scan_is_complete_and_classification_is_stable() {
    let (_listener, open) = listener().await;
    let start = u32::from(open.saturating_sub(5)).max(1);
    let end = (u32::from(open) + 5).min(65535);

    let scan = || async {
        let request = validate("127.0.0.1", start, end)
            .and_then(|r| r.with_timeout(Duration::from_millis(300)))
            .and_then(|r| r.with_concurrency(4))
            .unwrap();
        let mut report = run_scan(request).await.unwrap();
        // Completion order varies between runs; sort before comparing.
        report.sort_by_port();
        report
    };

    let first = scan().await;
    let second = scan().await;

    let expected = (end - start + 1) as usize;
    assert_eq!(first.results.len(), expected);
    let unique: HashSet<_> = first.results.iter().map(|r| r.port).collect();
    assert_eq!(unique.len(), expected);

    let statuses = |r: &portprobe::ScanReport| -> Vec<(u16, PortStatus)> {
        r.results
            .iter()
            .filter(|p| p.status != PortStatus::Error)
            .map(|p| (p.port.as_u16(), p.status))
            .collect()
    };
    assert!(statuses(&first).contains(&(open, PortStatus::Open)));
    assert_eq!(statuses(&first), statuses(&second));
}

#[tokio::test]
async fn streaming_consumer_sees_each_port_once() {
    let request = validate("127.0.0.1", 1, 50)
        .and_then(|r| r.with_timeout(Duration::from_millis(100)))
        .and_then(|r| r.with_concurrency(10))
        .unwrap();

    let mut handle = ScanEngine::new()
        .start(request, CancellationToken::new())
        .unwrap();

    let mut seen = HashSet::new();
    while let Some(result) = handle.next().await {
        assert!(seen.insert(result.port), "duplicate {}", result.port);
    }
    let summary = handle.finish().await.unwrap();

    assert_eq!(seen.len(), 50);
    assert_eq!(summary.scanned_ports, 50);
    assert!(summary.peak_in_flight <= 10);
}
