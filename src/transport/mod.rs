//! # Printer Transport Layer
//!
//! This module provides communication backends for sending data to printers.
//! Every backend implements [`Connection`], a single blocking "write all
//! bytes" operation. Elements and jobs only ever see the trait.
//!
//! ## Available Transports
//!
//! - [`MemoryConnection`]: records writes in memory (previews, tests)
//! - [`tcp`]: raw TCP to a network printer (port 9100)
//! - [`bluetooth`]: Bluetooth RFCOMM for wireless printing (Linux)
//!
//! Connection establishment can be retried with [`retry::Backoff`]. Writes
//! are never retried.

pub mod bluetooth;
pub mod retry;
pub mod tcp;

pub use bluetooth::BluetoothTransport;
pub use retry::Backoff;
pub use tcp::TcpConnection;

use crate::error::{Result, TermicaError};

/// A byte sink attached to a printer.
///
/// `write_all` blocks until every byte is handed to the device or the
/// transfer fails. Failures surface as [`TermicaError::Connection`].
pub trait Connection {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }
}

/// In-memory connection that keeps every write.
///
/// ## Example
///
/// ```
/// use termica::transport::{Connection, MemoryConnection};
///
/// let mut conn = MemoryConnection::new();
/// conn.write_all(&[0x1B, 0x40])?;
/// conn.write_all(b"hi")?;
///
/// assert_eq!(conn.writes().len(), 2);
/// assert_eq!(conn.bytes(), vec![0x1B, 0x40, b'h', b'i']);
/// # Ok::<(), termica::TermicaError>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryConnection {
    writes: Vec<Vec<u8>>,
    fail_after: Option<usize>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A connection that accepts `writes` writes and fails every one after.
    pub fn failing_after(writes: usize) -> Self {
        Self {
            writes: Vec::new(),
            fail_after: Some(writes),
        }
    }

    /// Each `write_all` call, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// Everything written so far, concatenated.
    pub fn bytes(&self) -> Vec<u8> {
        self.writes.concat()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.writes.concat()
    }
}

impl Connection for MemoryConnection {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        if self.fail_after.is_some_and(|limit| self.writes.len() >= limit) {
            return Err(TermicaError::Connection(format!(
                "connection closed after {} writes",
                self.writes.len()
            )));
        }
        self.writes.push(bytes.to_vec());
        Ok(())
    }
}
