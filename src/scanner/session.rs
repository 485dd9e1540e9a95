//! Run-scoped scan state.
//!
//! A `ScanSession` is the only state the workers of one scan share: an
//! index-based dispatch cursor over the port range and the tallies the
//! summary is built from. It lives exactly as long as the scan.

use crate::scanner::traits::{PortResult, PortStatus};
use crate::types::{Port, PortRange};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub(crate) struct ScanSession {
    range: PortRange,
    next: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    open: AtomicUsize,
    closed: AtomicUsize,
    errors: AtomicUsize,
}

/// Final tallies of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tally {
    pub open: usize,
    pub closed: usize,
    pub errors: usize,
    pub peak_in_flight: usize,
}

impl Tally {
    pub fn scanned(&self) -> usize {
        self.open + self.closed + self.errors
    }
}

impl ScanSession {
    pub fn new(range: PortRange) -> Self {
        Self {
            range,
            next: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            open: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
        }
    }

    /// Hand out the next undispatched port. Each index is claimed by exactly
    /// one caller, so no port is ever dispatched twice.
    pub fn next_port(&self) -> Option<Port> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        self.range.nth(index)
    }

    /// Mark an attempt as started.
    pub fn begin_attempt(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::AcqRel);
    }

    /// Mark an attempt as finished and count its outcome.
    pub fn finish_attempt(&self, result: &PortResult) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
        let counter = match result.status {
            PortStatus::Open => &self.open,
            PortStatus::Closed => &self.closed,
            PortStatus::Error => &self.errors,
        };
        counter.fetch_add(1, Ordering::AcqRel);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn tally(&self) -> Tally {
        Tally {
            open: self.open.load(Ordering::Acquire),
            closed: self.closed.load(Ordering::Acquire),
            errors: self.errors.load(Ordering::Acquire),
            peak_in_flight: self.peak_in_flight.load(Ordering::Acquire),
        }
    }
}
