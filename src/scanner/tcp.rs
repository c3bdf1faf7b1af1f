//! TCP Connect Scanner implementation.
//!
//! Performs standard TCP connect scans using the operating system's
//! socket API. No elevated privileges are needed.

use crate::scanner::traits::{PortResult, PortStatus, Scanner};
use crate::types::Port;
use async_trait::async_trait;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP Connect Scanner.
///
/// Every probe opens a fresh socket and drops it before returning, so a
/// probe never outlives its port, whether it connected or not.
pub struct TcpConnectScanner {
    target: Ipv4Addr,
    timeout: Duration,
}

impl TcpConnectScanner {
    /// Create a new TCP connect scanner.
    ///
    /// # Arguments
    /// * `target` - Target address to scan
    /// * `timeout` - Upper bound on each connection attempt
    pub fn new(target: Ipv4Addr, timeout: Duration) -> Self {
        Self { target, timeout }
    }

    /// Attempt to connect to the target address.
    ///
    /// The returned stream is the only handle to the socket; dropping it
    /// closes the connection.
    async fn attempt_connect(&self, addr: SocketAddr) -> Result<TcpStream, PortStatus> {
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => {
                trace!(%addr, error = %e, "connect failed");
                Err(classify_connect_error(&e))
            }
            Err(_) => Err(PortStatus::Filtered),
        }
    }
}

/// Map a connect error to a port status.
///
/// Only an explicit refusal proves a host answered for that port.
fn classify_connect_error(err: &io::Error) -> PortStatus {
    match err.kind() {
        io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => PortStatus::Closed,
        _ => PortStatus::Filtered,
    }
}

#[async_trait]
impl Scanner for TcpConnectScanner {
    async fn scan_port(&self, port: Port) -> PortResult {
        let addr = SocketAddr::V4(SocketAddrV4::new(self.target, port.as_u16()));
        let start = Instant::now();

        match self.attempt_connect(addr).await {
            Ok(stream) => {
                let response_time = start.elapsed().as_millis() as u64;
                drop(stream);
                PortResult::new(port, PortStatus::Open).with_response_time(response_time)
            }
            Err(status) => PortResult::new(port, status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_classify_connect_error() {
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(classify_connect_error(&refused), PortStatus::Closed);

        let other = io::Error::new(io::ErrorKind::Other, "network is unreachable");
        assert_eq!(classify_connect_error(&other), PortStatus::Filtered);
    }

    #[tokio::test]
    async fn test_scan_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();

        let scanner = TcpConnectScanner::new(Ipv4Addr::LOCALHOST, Duration::from_secs(1));
        let result = scanner.scan_port(port).await;

        assert_eq!(result.port, port);
        assert_eq!(result.status, PortStatus::Open);
        assert!(result.response_time_ms.is_some());
    }

    #[tokio::test]
    async fn test_scan_closed_port() {
        // Bind then release to get a port nobody is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
        drop(listener);

        let scanner = TcpConnectScanner::new(Ipv4Addr::LOCALHOST, Duration::from_millis(200));
        let result = scanner.scan_port(port).await;

        assert!(!result.is_open());
        assert!(result.response_time_ms.is_none());
    }

    #[tokio::test]
    async fn test_unanswered_probe_is_bounded_by_timeout() {
        // TEST-NET-1 is never routed, so the connect either hangs or fails fast.
        let blackhole = Ipv4Addr::new(192, 0, 2, 1);
        let scanner = TcpConnectScanner::new(blackhole, Duration::from_millis(50));

        let start = Instant::now();
        let result = scanner.scan_port(Port::new(9).unwrap()).await;

        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(result.status, PortStatus::Filtered);
        assert!(!result.is_open());
        assert!(result.response_time_ms.is_none());
    }
}
