//! # portsweep - a concurrent TCP connect port scanner
//!
//! Resolves a target once to an IPv4 address, probes a range of TCP ports
//! with a bounded number of concurrent connection attempts, reports open
//! ports as they are found and returns a [`ScanReport`] with the open ports
//! in ascending order and the elapsed time.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use portsweep::scanner::{run_scan, CancelToken, NoopObserver, ScanJobConfig};
//! use portsweep::types::PortSpec;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portsweep::ScanError> {
//!     let job = ScanJobConfig::new(&PortSpec::default(), Duration::from_millis(500))
//!         .with_concurrency(64);
//!
//!     let report = run_scan("127.0.0.1", &job, &NoopObserver, &CancelToken::new()).await?;
//!     println!("open: {:?} in {:?}", report.open_port_numbers(), report.duration());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - validated ports, port ranges and scan targets
//! - [`scanner`] - the `Scanner` trait, TCP connect scanner and scan executor
//! - [`config`] - settings file management
//! - [`error`] - error types
//! - [`output`] - report rendering and live progress
//! - [`cli`] - command-line front end

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ScanError};
pub use scanner::{run_scan, CancelToken, PortResult, PortStatus, ScanReport, Scanner};
pub use types::{Port, PortRange, PortSpec, ScanTarget};
