//! Core type definitions using newtype patterns for type safety.
//!
//! These types make invalid ports and ranges unrepresentable once a request
//! has been validated.

mod port;
mod request;

pub use port::{Port, PortRange};
pub use request::{validate, ScanRequest, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT};
