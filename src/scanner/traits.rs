//! Scanner trait abstraction.
//!
//! Defines the per-port probe interface so the scan executor can run against
//! a real TCP connect scanner or a test double.

use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Status of a probed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// The connection was accepted.
    Open,
    /// The connection was actively refused.
    Closed,
    /// No answer within the timeout, or the host/network was unreachable.
    Filtered,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
        }
    }
}

/// Result of probing a single port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortResult {
    /// The port that was probed.
    pub port: Port,
    /// Status determined by the probe.
    pub status: PortStatus,
    /// Time until the connection was accepted, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl PortResult {
    pub fn new(port: Port, status: PortStatus) -> Self {
        Self {
            port,
            status,
            response_time_ms: None,
        }
    }

    /// Set the response time.
    pub fn with_response_time(mut self, time_ms: u64) -> Self {
        self.response_time_ms = Some(time_ms);
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == PortStatus::Open
    }
}

/// Trait for port scanner implementations.
///
/// A scanner is bound to one resolved target. `scan_port` never fails: any
/// connection error is folded into the returned status.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Probe a single port.
    async fn scan_port(&self, port: Port) -> PortResult;
}

/// A scanner shared between concurrent probes.
pub type SharedScanner = Arc<dyn Scanner>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_status_display() {
        assert_eq!(PortStatus::Open.to_string(), "open");
        assert_eq!(PortStatus::Closed.to_string(), "closed");
        assert_eq!(PortStatus::Filtered.to_string(), "filtered");
    }

    #[test]
    fn test_port_result() {
        let port = Port::new(80).unwrap();
        let result = PortResult::new(port, PortStatus::Open).with_response_time(15);
        assert!(result.is_open());
        assert_eq!(result.response_time_ms, Some(15));

        let filtered = PortResult::new(port, PortStatus::Filtered);
        assert!(!filtered.is_open());
    }

    #[test]
    fn test_port_result_serialization() {
        let result = PortResult::new(Port::new(22).unwrap(), PortStatus::Closed);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"port":22,"status":"closed"}"#);
    }
}
