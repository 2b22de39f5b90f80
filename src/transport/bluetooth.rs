//! # Bluetooth RFCOMM Transport
//!
//! Sends ESC/POS data to portable printers over Bluetooth Serial Port
//! Profile (SPP) via an RFCOMM tty device.
//!
//! ## Bluetooth Setup (Linux)
//!
//! Before using this transport, the printer must be paired and bound to an
//! RFCOMM device:
//!
//! ```bash
//! $ bluetoothctl
//! [bluetooth]# scan on
//! [bluetooth]# pair 00:11:62:XX:XX:XX
//!
//! $ sudo rfcomm bind 0 00:11:62:XX:XX:XX
//! # This creates /dev/rfcomm0
//! ```
//!
//! ## TTY Configuration
//!
//! The RFCOMM device is opened in raw mode so binary data is transmitted
//! without modification:
//!
//! - **No input processing**: IGNBRK, BRKINT, PARMRK, ISTRIP, etc. cleared
//! - **No output processing**: OPOST cleared (no CR/LF translation)
//! - **8-bit characters**: CS8, no parity
//! - **Non-canonical mode**: ICANON, ECHO cleared
//!
//! ## Pacing
//!
//! Cheap Bluetooth printers have small receive buffers. Writes are split
//! into chunks, and after each `write_all` the transport waits
//! `len / 16` ms so the printer can drain what it was sent.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{info, instrument};

use super::Connection;
use crate::error::{Result, TermicaError};

/// Default RFCOMM device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// Bytes the printer drains per millisecond of settle delay
const SETTLE_BYTES_PER_MS: usize = 16;

/// # Bluetooth Printer Transport
///
/// ## Example
///
/// ```no_run
/// use termica::transport::{BluetoothTransport, Connection};
/// use termica::protocol::commands;
///
/// let mut transport = BluetoothTransport::open("/dev/rfcomm0")?;
/// transport.write_all(&commands::init())?;
/// # Ok::<(), termica::TermicaError>(())
/// ```
#[derive(Debug)]
pub struct BluetoothTransport {
    file: File,
    path: PathBuf,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl BluetoothTransport {
    /// Open and configure an RFCOMM device.
    ///
    /// ## Errors
    ///
    /// [`TermicaError::Connection`] if the device doesn't exist, access is
    /// denied (may need the dialout group), or TTY configuration fails.
    #[instrument(skip(device), fields(device = %device.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self> {
        let path = device.as_ref();

        let file = OpenOptions::new().write(true).open(path).map_err(|e| {
            TermicaError::Connection(format!("Failed to open {}: {}", path.display(), e))
        })?;

        configure_tty_raw(file.as_raw_fd())?;
        info!("bluetooth device opened");

        Ok(Self {
            file,
            path: path.to_path_buf(),
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_chunked(&mut self, data: &[u8]) -> Result<()> {
        let chunks = data.len().div_ceil(self.chunk_size);
        for (i, chunk) in data.chunks(self.chunk_size).enumerate() {
            self.file
                .write_all(chunk)
                .map_err(|e| TermicaError::Connection(format!("Write failed: {}", e)))?;

            if i + 1 < chunks && !self.chunk_delay.is_zero() {
                thread::sleep(self.chunk_delay);
            }
        }
        Ok(())
    }
}

impl Connection for BluetoothTransport {
    #[instrument(skip(self, bytes), fields(device = %self.path.display(), data_len = bytes.len()))]
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }

        self.write_chunked(bytes)?;
        self.file
            .flush()
            .map_err(|e| TermicaError::Connection(format!("Flush failed: {}", e)))?;

        let settle = settle_delay(bytes.len());
        if !settle.is_zero() {
            thread::sleep(settle);
        }
        Ok(())
    }
}

/// Time to wait after sending `len` bytes.
fn settle_delay(len: usize) -> Duration {
    Duration::from_millis((len / SETTLE_BYTES_PER_MS) as u64)
}

/// Configure a file descriptor for raw TTY mode.
///
/// IXON/IXOFF/IXANY must be cleared: 0x11 (XON) and 0x13 (XOFF) appear in
/// raster data and barcode setup bytes.
fn configure_tty_raw(fd: i32) -> Result<()> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(TermicaError::Connection(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(TermicaError::Connection(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

/// Validate a Bluetooth MAC address format (XX:XX:XX:XX:XX:XX).
pub fn is_valid_mac(mac: &str) -> bool {
    let parts: Vec<&str> = mac.split(':').collect();
    parts.len() == 6
        && parts
            .iter()
            .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_hexdigit()))
}
