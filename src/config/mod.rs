//! Configuration management for portsweep.
//!
//! Provides XDG-compliant storage of application settings.

mod settings;

pub use settings::{AppSettings, Paths};
