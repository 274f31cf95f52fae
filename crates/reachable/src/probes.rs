//! Reachability probe implementations.
//!
//! A probe answers one question with a plain `bool`. Every failure (interface
//! enumeration error, DNS failure, refused or timed out connection) is reported
//! as "not reachable" and never surfaced as an error.

use crate::types::Target;
use async_trait::async_trait;
use nix::ifaddrs::getifaddrs;
use nix::net::if_::InterfaceFlags;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

/// Reachability probe trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Probe: Send + Sync {
    /// Run one probe; `true` means reachable
    async fn check(&self) -> bool;
}

/// A local network interface as seen by [`InterfaceProbe`].
///
/// Built by [`InterfaceSource`] implementations; `name` is not used by the
/// probe itself but identifies the interface in custom sources and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub up: bool,
    pub loopback: bool,
}

/// Source of the local interface list.
pub trait InterfaceSource: Send + Sync {
    fn interfaces(&self) -> io::Result<Vec<Interface>>;
}

/// Interfaces reported by the operating system (`getifaddrs`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn interfaces(&self) -> io::Result<Vec<Interface>> {
        // getifaddrs yields one entry per address, so names may repeat.
        let addrs = getifaddrs()?;
        Ok(addrs
            .map(|ifa| Interface {
                up: ifa.flags.contains(InterfaceFlags::IFF_UP),
                loopback: ifa.flags.contains(InterfaceFlags::IFF_LOOPBACK),
                name: ifa.interface_name,
            })
            .collect())
    }
}

/// Local link pre-check: is any non-loopback interface up?
pub struct InterfaceProbe {
    source: Arc<dyn InterfaceSource>,
}

impl InterfaceProbe {
    /// Probe the system interface list
    pub fn new() -> Self {
        Self::with_source(Arc::new(SystemInterfaces))
    }

    /// Probe a custom interface list
    pub fn with_source(source: Arc<dyn InterfaceSource>) -> Self {
        Self { source }
    }

    /// Synchronous form of [`Probe::check`].
    pub fn has_interface_up(&self) -> bool {
        match self.source.interfaces() {
            Ok(interfaces) => interfaces.iter().any(|i| i.up && !i.loopback),
            Err(e) => {
                warn!(error = %e, "Interface enumeration failed, treating network as down");
                false
            }
        }
    }
}

impl Default for InterfaceProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Probe for InterfaceProbe {
    async fn check(&self) -> bool {
        // One short getifaddrs syscall, cheap enough to run on the worker.
        self.has_interface_up()
    }
}

/// TCP connect probe
///
/// Success means the handshake completed; the connection is closed right away
/// without exchanging any data.
pub struct TcpProbe {
    target: Target,
    timeout_duration: Duration,
}

impl TcpProbe {
    /// Create a new TCP probe
    pub fn new(target: Target, timeout_duration: Duration) -> Self {
        Self {
            target,
            timeout_duration,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn check(&self) -> bool {
        let start = Instant::now();
        let connect = TcpStream::connect((self.target.host(), self.target.port()));

        match timeout(self.timeout_duration, connect).await {
            Ok(Ok(_stream)) => {
                debug!(target = %self.target, duration_ms = start.elapsed().as_millis(), "TCP connect succeeded");
                true
            }
            Ok(Err(e)) => {
                debug!(target = %self.target, error = %e, "TCP connect failed");
                false
            }
            Err(_) => {
                debug!(target = %self.target, timeout_ms = self.timeout_duration.as_millis(), "TCP connect timed out");
                false
            }
        }
    }
}

/// Two-stage probe: local check first, remote check only if the local one passes.
pub struct ReachabilityProbe {
    local: Arc<dyn Probe>,
    remote: Arc<dyn Probe>,
}

impl ReachabilityProbe {
    pub fn new(local: Arc<dyn Probe>, remote: Arc<dyn Probe>) -> Self {
        Self { local, remote }
    }

    /// System interface check followed by a TCP dial to `target`.
    pub fn system(target: Target, timeout_duration: Duration) -> Self {
        Self::new(
            Arc::new(InterfaceProbe::new()),
            Arc::new(TcpProbe::new(target, timeout_duration)),
        )
    }
}

#[async_trait]
impl Probe for ReachabilityProbe {
    async fn check(&self) -> bool {
        if !self.local.check().await {
            trace!("No local interface up, skipping remote probe");
            return false;
        }
        self.remote.check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticInterfaces(io::Result<Vec<Interface>>);

    impl InterfaceSource for StaticInterfaces {
        fn interfaces(&self) -> io::Result<Vec<Interface>> {
            match &self.0 {
                Ok(list) => Ok(list.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    fn iface(name: &str, up: bool, loopback: bool) -> Interface {
        Interface {
            name: name.to_string(),
            up,
            loopback,
        }
    }

    fn probe_with(result: io::Result<Vec<Interface>>) -> InterfaceProbe {
        InterfaceProbe::with_source(Arc::new(StaticInterfaces(result)))
    }

    #[tokio::test]
    async fn test_interface_probe_requires_non_loopback_up() {
        assert!(!probe_with(Ok(vec![])).check().await);
        assert!(!probe_with(Ok(vec![iface("lo", true, true)])).check().await);
        assert!(!probe_with(Ok(vec![iface("lo", true, true), iface("eth0", false, false)])).check().await);
        assert!(probe_with(Ok(vec![iface("lo", true, true), iface("wlan0", true, false)])).check().await);
    }

    #[tokio::test]
    async fn test_interface_probe_fails_closed() {
        let probe = probe_with(Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));
        assert!(!probe.check().await);
    }

    #[test]
    fn test_system_interfaces_does_not_panic() {
        // Contents depend on the host; only the call itself is checked.
        let _ = SystemInterfaces.interfaces();
    }

    #[tokio::test]
    async fn test_remote_skipped_when_local_down() {
        let mut local = MockProbe::new();
        local.expect_check().times(1).returning(|| false);
        let mut remote = MockProbe::new();
        remote.expect_check().times(0);

        let probe = ReachabilityProbe::new(Arc::new(local), Arc::new(remote));
        assert!(!probe.check().await);
    }

    #[tokio::test]
    async fn test_remote_skipped_when_enumeration_fails() {
        let local = probe_with(Err(io::Error::other("netlink unavailable")));
        let mut remote = MockProbe::new();
        remote.expect_check().times(0);

        let probe = ReachabilityProbe::new(Arc::new(local), Arc::new(remote));
        assert!(!probe.check().await);
    }

    #[tokio::test]
    async fn test_remote_decides_when_local_up() {
        for expected in [true, false] {
            let mut local = MockProbe::new();
            local.expect_check().times(1).returning(|| true);
            let mut remote = MockProbe::new();
            remote.expect_check().times(1).returning(move || expected);

            let probe = ReachabilityProbe::new(Arc::new(local), Arc::new(remote));
            assert_eq!(probe.check().await, expected);
        }
    }

    #[tokio::test]
    async fn test_tcp_probe_refused() {
        // Grab a free port, then close the listener so nothing is listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = TcpProbe::new(Target::new("127.0.0.1", port), Duration::from_millis(500));
        assert!(!probe.check().await);
    }

    #[tokio::test]
    async fn test_tcp_probe_connects() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let probe = TcpProbe::new(Target::new("127.0.0.1", port), Duration::from_secs(1));
        assert!(probe.check().await);
    }
}
