//! Port types with validation.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortRange` is the inclusive range a single scan covers.

use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port, returning None for port 0 or anything above 65535.
    #[inline]
    pub fn new(port: u32) -> Option<Self> {
        if port >= u32::from(Self::MIN) && port <= u32::from(Self::MAX) {
            u16::try_from(port).ok().map(Self)
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// An inclusive range of ports. Never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Validate raw bounds into a range.
    ///
    /// Fails with [`ValidationError::InvalidRange`] when either bound is
    /// outside 1-65535 or `start > end`.
    pub fn new(start: u32, end: u32) -> ValidationResult<Self> {
        let invalid = || ValidationError::InvalidRange { start, end };
        let start_port = Port::new(start).ok_or_else(invalid)?;
        let end_port = Port::new(end).ok_or_else(invalid)?;
        if start_port > end_port {
            return Err(invalid());
        }
        Ok(Self {
            start: start_port,
            end: end_port,
        })
    }

    /// First port in the range.
    pub const fn start(&self) -> Port {
        self.start
    }

    /// Last port in the range.
    pub const fn end(&self) -> Port {
        self.end
    }

    /// Number of ports in this range.
    pub const fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize + 1
    }

    /// Always false; kept for the `len`/`is_empty` pairing.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The port at `index` positions past the start, if still in range.
    pub fn nth(&self, index: usize) -> Option<Port> {
        if index >= self.len() {
            return None;
        }
        // index < len <= 65535, so the sum stays within u16
        Some(Port(self.start.0 + index as u16))
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(65535).is_some());
        assert!(Port::new(65536).is_none());
    }

    #[test]
    fn test_port_range_len() {
        let range = PortRange::new(1, 100).unwrap();
        assert_eq!(range.len(), 100);

        let full = PortRange::new(1, 65535).unwrap();
        assert_eq!(full.len(), 65535);
        assert_eq!(full.nth(65534).map(Port::as_u16), Some(65535));
        assert!(full.nth(65535).is_none());
    }

    #[test]
    fn test_port_range_rejects_bad_bounds() {
        assert_eq!(
            PortRange::new(10, 5),
            Err(ValidationError::InvalidRange { start: 10, end: 5 })
        );
        assert!(PortRange::new(0, 5).is_err());
        assert!(PortRange::new(1, 70000).is_err());
    }

    #[test]
    fn test_single_port_range() {
        let range = PortRange::new(443, 443).unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range.to_string(), "443");
        assert_eq!(range.nth(0), Port::new(443));
        assert!(range.nth(1).is_none());
    }

    #[test]
    fn test_nth_walks_range() {
        let range = PortRange::new(8000, 8010).unwrap();
        assert_eq!(range.nth(0), Port::new(8000));
        assert_eq!(range.nth(10), Port::new(8010));
        assert!(range.nth(11).is_none());
        assert_eq!(range.nth(5), Port::new(8005));
        assert_eq!(range.to_string(), "8000-8010");
    }
}
