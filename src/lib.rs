//! # Termica - ESC/POS Thermal Printer Library
//!
//! Termica drives ESC/POS-compatible receipt printers over Bluetooth or the
//! network. It provides:
//!
//! - **Retail barcodes**: EAN-13, EAN-8 and UPC-A with check digit
//!   validation, checked against what the printer can actually print
//! - **Print elements**: text runs, barcodes and raster images behind one
//!   [`PrintElement`] contract
//! - **Print jobs**: ordered composition with alignment, feed and cut
//! - **Transport**: Bluetooth RFCOMM and raw TCP (port 9100)
//!
//! ## Quick Start
//!
//! ```no_run
//! use termica::{
//!     barcode::{Barcode, Symbology, TextPosition},
//!     elements::{BarcodeElement, TextRun},
//!     printer::PrinterCapabilities,
//!     transport::TcpConnection,
//!     PrintJob,
//! };
//!
//! let caps = PrinterCapabilities::pos80();
//!
//! // Check digit is computed when only 12 digits are given
//! let code = Barcode::new(&caps, Symbology::Ean13, "400638133393", 40.0, 15.0, TextPosition::Below)?;
//!
//! let mut job = PrintJob::new(&caps).feed(3).cut(true);
//! job.push(TextRun::new("ORGANIC OATS").bold().center())?;
//! job.push(BarcodeElement::new(code, &caps)?.center())?;
//!
//! let mut conn = TcpConnection::connect("192.168.1.50", TcpConnection::default_timeout())?;
//! job.render_to(&mut conn)?;
//! # Ok::<(), termica::TermicaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`barcode`] | Symbologies, validation, command building |
//! | [`elements`] | Printable elements |
//! | [`job`] | Print job composition |
//! | [`protocol`] | ESC/POS command builders |
//! | [`transport`] | Communication backends |
//! | [`printer`] | Printer capability profiles |
//! | [`encoding`] | Text charsets and code pages |
//! | [`error`] | Error types |

pub mod barcode;
pub mod elements;
pub mod encoding;
pub mod error;
pub mod job;
pub mod printer;
pub mod protocol;
pub mod transport;

// Re-exports for convenience
pub use barcode::{Barcode, Symbology, TextPosition};
pub use elements::{Element, PrintElement};
pub use error::{Result, TermicaError};
pub use job::{Cut, PrintJob};
pub use printer::PrinterCapabilities;
pub use transport::Connection;
