//! Live scan progress notifications.
//!
//! The executor calls an observer as each probe completes, so open ports can
//! be shown the moment they are found instead of only in the final report.

use crate::scanner::traits::PortResult;
use crate::scanner::ScanReport;
use crate::types::ScanTarget;

/// Receives scan events in the order the executor sees them.
///
/// With more than one probe in flight, `on_result` calls are in completion
/// order, not port order.
pub trait ScanObserver: Send + Sync {
    /// Called once after resolution, before the first probe.
    fn on_start(&self, _target: &ScanTarget, _total_ports: usize) {}

    /// Called for every completed probe.
    fn on_result(&self, _result: &PortResult) {}

    /// Called once with the finalized report, also when cancelled.
    fn on_finish(&self, _report: &ScanReport) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}
