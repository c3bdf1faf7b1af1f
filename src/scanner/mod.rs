//! Scanner module - resolves a target and probes its ports.
//!
//! Probes run on the tokio runtime with bounded concurrency. Results are
//! handed to a [`ScanObserver`] as they complete and gathered into a
//! [`ScanReport`] sorted by port.

pub mod cancel;
pub mod observer;
pub mod rate_limiter;
pub mod tcp;
pub mod traits;

use crate::error::{ScanError, ScanResult};
use crate::types::{Port, PortSpec, ScanTarget, TargetError};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub use cancel::CancelToken;
pub use observer::{NoopObserver, ScanObserver};
pub use rate_limiter::RateLimiter;
pub use tcp::TcpConnectScanner;
pub use traits::{PortResult, PortStatus, Scanner, SharedScanner};

/// Default number of probes in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Parameters of one scan job.
#[derive(Debug, Clone)]
pub struct ScanJobConfig {
    /// Ports to probe, ascending and unique.
    ports: Vec<Port>,
    /// Maximum number of probes in flight. 1 probes strictly in order.
    pub concurrency: usize,
    /// Upper bound on each connection attempt.
    pub timeout: Duration,
    /// Probes per second, 0 for unlimited.
    pub rate_limit: u32,
}

impl ScanJobConfig {
    /// Create a job for `ports` with an explicit per-probe timeout.
    pub fn new(ports: &PortSpec, timeout: Duration) -> Self {
        Self {
            ports: ports.to_ports(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout,
            rate_limit: 0,
        }
    }

    /// Set the concurrency level.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the rate limit.
    pub fn with_rate_limit(mut self, rate: u32) -> Self {
        self.rate_limit = rate;
        self
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    fn validate(&self) -> ScanResult<()> {
        if self.concurrency == 0 {
            return Err(ScanError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.ports.is_empty() {
            return Err(ScanError::InvalidConfig("no ports to scan".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(ScanError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Final outcome of a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Target as given by the caller.
    pub target: String,
    /// Address the target resolved to.
    pub ip_address: Ipv4Addr,
    /// When probing started.
    pub started_at: DateTime<Utc>,
    /// Number of ports the job asked for.
    pub ports_requested: usize,
    /// Number of probes that completed.
    pub ports_scanned: usize,
    /// Ports that accepted a connection, ascending.
    pub open_ports: Vec<Port>,
    pub closed_count: usize,
    pub filtered_count: usize,
    /// Wall-clock time from the first probe to the last.
    pub duration_ms: u64,
    /// True when the scan was interrupted before every port was probed.
    pub cancelled: bool,
    /// Every completed probe, sorted by port.
    pub results: Vec<PortResult>,
}

impl ScanReport {
    fn finalize(
        target: &ScanTarget,
        started_at: DateTime<Utc>,
        ports_requested: usize,
        mut results: Vec<PortResult>,
        elapsed: Duration,
        cancelled: bool,
    ) -> Self {
        results.sort_by_key(|r| r.port);

        let count = |status: PortStatus| results.iter().filter(|r| r.status == status).count();
        let closed_count = count(PortStatus::Closed);
        let filtered_count = count(PortStatus::Filtered);
        let open_ports = results
            .iter()
            .filter(|r| r.is_open())
            .map(|r| r.port)
            .collect();

        Self {
            target: target.original.clone(),
            ip_address: target.ip,
            started_at,
            ports_requested,
            ports_scanned: results.len(),
            open_ports,
            closed_count,
            filtered_count,
            duration_ms: elapsed.as_millis() as u64,
            cancelled,
            results,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Open ports as plain numbers.
    pub fn open_port_numbers(&self) -> Vec<u16> {
        self.open_ports.iter().map(|p| p.as_u16()).collect()
    }

    /// Get a one-line summary of the scan.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) - {} open, {} closed, {} filtered [{:.2}s]",
            self.target,
            self.ip_address,
            self.open_ports.len(),
            self.closed_count,
            self.filtered_count,
            self.duration_ms as f64 / 1000.0
        )
    }
}

/// Resolve `target` and scan it with a TCP connect scanner.
///
/// Resolution happens once, before any probe. A resolution failure returns
/// [`ScanError::Resolution`] without touching the network further; a
/// cancellation returns [`ScanError::Cancelled`] with the partial report, or
/// [`ScanError::CancelledBeforeStart`] if the lookup had not finished.
pub async fn run_scan(
    target: &str,
    job: &ScanJobConfig,
    observer: &dyn ScanObserver,
    cancel: &CancelToken,
) -> ScanResult<ScanReport> {
    job.validate()?;

    let target = resolve_or_cancel(ScanTarget::resolve(target), cancel).await?;
    let scanner: SharedScanner = Arc::new(TcpConnectScanner::new(target.ip, job.timeout));

    execute_scan(scanner, &target, job, observer, cancel).await
}

/// Await a target lookup unless `cancel` fires first.
///
/// A lookup that is already complete wins over a pending cancellation, so
/// IP literals always reach the scan loop.
async fn resolve_or_cancel<F>(lookup: F, cancel: &CancelToken) -> ScanResult<ScanTarget>
where
    F: Future<Output = Result<ScanTarget, TargetError>>,
{
    tokio::select! {
        biased;

        resolved = lookup => Ok(resolved?),
        _ = cancel.cancelled() => {
            debug!("cancelled during target resolution");
            Err(ScanError::CancelledBeforeStart)
        }
    }
}

/// Probe every port of `job` with `scanner`.
///
/// At most `job.concurrency` probes are in flight. Cancellation is checked
/// before each result is collected; once seen, no further probe is started
/// and in-flight probes are dropped, closing their sockets.
pub async fn execute_scan(
    scanner: SharedScanner,
    target: &ScanTarget,
    job: &ScanJobConfig,
    observer: &dyn ScanObserver,
    cancel: &CancelToken,
) -> ScanResult<ScanReport> {
    job.validate()?;

    let total = job.ports.len();
    info!(
        host = %target,
        ports = total,
        concurrency = job.concurrency,
        timeout_ms = job.timeout.as_millis() as u64,
        "starting scan"
    );
    observer.on_start(target, total);

    let limiter = RateLimiter::new(job.rate_limit);
    let started_at = Utc::now();
    let start = Instant::now();

    let mut probes = stream::iter(job.ports.iter().copied())
        .map(|port| {
            let scanner = Arc::clone(&scanner);
            let limiter = limiter.clone();
            async move {
                if let Some(limiter) = &limiter {
                    limiter.wait().await;
                }
                scanner.scan_port(port).await
            }
        })
        .buffer_unordered(job.concurrency);

    let mut results = Vec::with_capacity(total);
    let mut cancelled = false;

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                cancelled = true;
                break;
            }
            next = probes.next() => match next {
                Some(result) => {
                    if result.is_open() {
                        debug!(port = %result.port, "open port found");
                    }
                    observer.on_result(&result);
                    results.push(result);
                }
                None => break,
            },
        }
    }

    // Abandon whatever is still in flight.
    drop(probes);

    let report = ScanReport::finalize(
        target,
        started_at,
        total,
        results,
        start.elapsed(),
        cancelled,
    );
    observer.on_finish(&report);

    if cancelled {
        warn!(
            scanned = report.ports_scanned,
            requested = report.ports_requested,
            open = report.open_ports.len(),
            "scan cancelled"
        );
        Err(ScanError::Cancelled(Box::new(report)))
    } else {
        info!(summary = %report.summary(), "scan complete");
        Ok(report)
    }
}
