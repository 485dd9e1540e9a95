//! Configuration management for portprobe.
//!
//! Provides XDG-compliant settings storage. Command-line flags override
//! settings, and settings override built-in defaults.

mod settings;

pub use settings::{AppSettings, Paths};
