//! Network endpoint selection.
//!
//! When no endpoint is given, the local host address is resolved and the OS
//! is asked for a free TCP port. The port is an observation, not a
//! reservation: the listening socket is closed before returning, so another
//! process (or a concurrent lookup) may bind it before the server does.

use serde::{Deserialize, Serialize};
use std::io;
use std::net::{IpAddr, TcpListener, ToSocketAddrs};
use tracing::info;

use super::types::LaunchError;

/// Host and port the server listens on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetEndpoint {
    host: String,
    port: u16,
}

impl NetEndpoint {
    /// Uses the given host and port as-is.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Resolves whichever parts are missing.
    ///
    /// A missing host becomes the local host address; a missing port is
    /// requested from the OS on that host.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::NetworkUnavailable`] if the local address
    /// cannot be resolved or no port can be bound.
    pub fn create(host: Option<&str>, port: Option<u16>) -> Result<Self, LaunchError> {
        let host = match host.filter(|h| !h.is_empty()) {
            Some(host) => host.to_string(),
            None => local_host_address()?.to_string(),
        };

        let port = match port {
            Some(port) => port,
            None => {
                let port = free_server_port(&host)?;
                info!("Selected free port {} on {}", port, host);
                port
            }
        };

        Ok(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Renders `-h <host> -p <port>`.
    pub fn command_line(&self) -> Vec<String> {
        vec![
            "-h".to_string(),
            self.host.clone(),
            "-p".to_string(),
            self.port.to_string(),
        ]
    }
}

/// Resolves the address of the local host, preferring IPv4.
pub fn local_host_address() -> Result<IpAddr, LaunchError> {
    let addrs: Vec<IpAddr> = ("localhost", 0)
        .to_socket_addrs()
        .map_err(|e| LaunchError::network("resolving localhost", e))?
        .map(|addr| addr.ip())
        .collect();

    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            LaunchError::network(
                "resolving localhost",
                io::Error::new(io::ErrorKind::AddrNotAvailable, "no address found"),
            )
        })
}

/// Asks the OS for a currently free TCP port on `host`.
pub fn free_server_port(host: &str) -> Result<u16, LaunchError> {
    let context = || format!("finding a free port on {}", host);

    let listener = match host.parse::<IpAddr>() {
        Ok(ip) => TcpListener::bind((ip, 0)),
        Err(_) => TcpListener::bind((host, 0)),
    }
    .map_err(|e| LaunchError::network(context(), e))?;

    let port = listener
        .local_addr()
        .map_err(|e| LaunchError::network(context(), e))?
        .port();

    Ok(port)
}
