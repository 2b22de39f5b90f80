//! # Raw TCP Transport
//!
//! Network printers accept raw ESC/POS on TCP port 9100 ("JetDirect" /
//! raw printing). There is no framing and no response: bytes written to
//! the socket are printed.

use std::io::Write;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::{Backoff, Connection};
use crate::error::{Result, TermicaError};

/// Default raw printing port
pub const DEFAULT_PORT: u16 = 9100;

/// Default connect and write timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// An open TCP connection to a network printer.
///
/// ## Example
///
/// ```no_run
/// use termica::transport::{Connection, TcpConnection};
/// use termica::protocol::commands;
///
/// let mut conn = TcpConnection::connect("192.168.1.50", TcpConnection::default_timeout())?;
/// conn.write_all(&commands::init())?;
/// # Ok::<(), termica::TermicaError>(())
/// ```
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
    addr: SocketAddr,
}

impl TcpConnection {
    pub fn default_timeout() -> Duration {
        DEFAULT_TIMEOUT
    }

    /// Connect to `addr` (`host` or `host:port`; port defaults to 9100).
    #[instrument]
    pub fn connect(addr: &str, timeout: Duration) -> Result<Self> {
        let target = resolve(addr)?;
        let stream = TcpStream::connect_timeout(&target, timeout)
            .map_err(|e| TermicaError::Connection(format!("connect to {} failed: {}", target, e)))?;
        stream
            .set_write_timeout(Some(timeout))
            .map_err(|e| TermicaError::Connection(format!("set timeout failed: {}", e)))?;
        if let Err(e) = stream.set_nodelay(true) {
            warn!(%target, error = %e, "could not disable Nagle's algorithm");
        }

        info!(%target, "connected to printer");
        Ok(Self {
            stream,
            addr: target,
        })
    }

    /// [`Self::connect`], retried per `backoff` on connection failures.
    pub fn connect_with_backoff(addr: &str, timeout: Duration, backoff: &Backoff) -> Result<Self> {
        backoff.run(|attempt| {
            debug!(attempt, addr, "connecting");
            Self::connect(addr, timeout)
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Connection for TcpConnection {
    #[instrument(skip(self, bytes), fields(addr = %self.addr, data_len = bytes.len()))]
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream
            .write_all(bytes)
            .and_then(|_| self.stream.flush())
            .map_err(|e| TermicaError::Connection(format!("write to {} failed: {}", self.addr, e)))
    }
}

/// Resolve `host[:port]` to the first socket address.
fn resolve(addr: &str) -> Result<SocketAddr> {
    let with_port = if addr.parse::<SocketAddr>().is_ok() || has_port(addr) {
        addr.to_string()
    } else {
        format!("{}:{}", addr, DEFAULT_PORT)
    };

    with_port
        .to_socket_addrs()
        .map_err(|e| TermicaError::Connection(format!("cannot resolve {}: {}", addr, e)))?
        .next()
        .ok_or_else(|| TermicaError::Connection(format!("no address found for {}", addr)))
}

/// `host:port` with a numeric port, excluding bare IPv6 literals.
fn has_port(addr: &str) -> bool {
    match addr.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !host.contains(':') && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}
