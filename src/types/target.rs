//! Scan target parsing and resolution.
//!
//! A target is an IPv4 literal or a hostname. It is resolved exactly once,
//! at the start of a scan, to a single IPv4 address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use tracing::{debug, warn};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// A scan target that has been resolved to an IPv4 address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved address.
    pub ip: Ipv4Addr,
}

impl ScanTarget {
    pub fn new(original: impl Into<String>, ip: Ipv4Addr) -> Self {
        Self {
            original: original.into(),
            ip,
        }
    }

    /// Parse and resolve `input` in one step.
    pub async fn resolve(input: &str) -> Result<Self, TargetError> {
        TargetSpec::parse(input)?.resolve().await
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original == self.ip.to_string() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.original, self.ip)
        }
    }
}

/// Error type for target parsing and resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("empty target")]
    Empty,
    #[error("invalid target format: {0}")]
    InvalidFormat(String),
    #[error("IPv6 targets are not supported: {0}")]
    Ipv6Unsupported(String),
    #[error("hostname '{0}' could not be resolved: {1}")]
    DnsResolutionFailed(String, String),
    #[error("no IPv4 address found for hostname '{0}'")]
    NoIpv4Address(String),
}

/// A parsed, not yet resolved, target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// An IPv4 literal; resolving it never touches DNS.
    Address(Ipv4Addr),
    /// A hostname to be looked up.
    Hostname(String),
}

impl TargetSpec {
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TargetError::Empty);
        }

        match s.parse::<IpAddr>() {
            Ok(IpAddr::V4(ip)) => return Ok(Self::Address(ip)),
            Ok(IpAddr::V6(_)) => return Err(TargetError::Ipv6Unsupported(s.to_string())),
            Err(_) => {}
        }

        if is_valid_hostname(s) {
            Ok(Self::Hostname(s.to_string()))
        } else {
            Err(TargetError::InvalidFormat(s.to_string()))
        }
    }

    /// Resolve to a single IPv4 address.
    ///
    /// When a hostname has several A records the first one wins.
    pub async fn resolve(&self) -> Result<ScanTarget, TargetError> {
        match self {
            Self::Address(ip) => Ok(ScanTarget::new(ip.to_string(), *ip)),

            Self::Hostname(hostname) => {
                let resolver = system_resolver();
                let response = resolver.lookup_ip(hostname.as_str()).await.map_err(|e| {
                    TargetError::DnsResolutionFailed(hostname.clone(), e.to_string())
                })?;

                let ip = response
                    .iter()
                    .find_map(|ip| match ip {
                        IpAddr::V4(v4) => Some(v4),
                        IpAddr::V6(_) => None,
                    })
                    .ok_or_else(|| TargetError::NoIpv4Address(hostname.clone()))?;

                debug!(%hostname, %ip, "resolved target");
                Ok(ScanTarget::new(hostname.clone(), ip))
            }
        }
    }
}

impl FromStr for TargetSpec {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(ip) => write!(f, "{}", ip),
            Self::Hostname(hostname) => write!(f, "{}", hostname),
        }
    }
}

/// Resolver following the host's own configuration (`/etc/resolv.conf`,
/// search domains, hosts file).
///
/// Falls back to the built-in public nameservers only when that
/// configuration cannot be read.
fn system_resolver() -> TokioAsyncResolver {
    TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
        warn!(error = %e, "system resolver configuration unavailable, using defaults");
        TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
    })
}

/// Check if a string is a syntactically valid hostname.
///
/// One trailing dot (a fully qualified name) is allowed, and so are
/// underscores, which the system resolver accepts in practice.
fn is_valid_hostname(s: &str) -> bool {
    let s = s.strip_suffix('.').unwrap_or(s);
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}
