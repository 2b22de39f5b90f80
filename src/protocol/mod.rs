//! # ESC/POS Protocol Implementation
//!
//! Low-level command builders for ESC/POS thermal printers. Every builder
//! returns owned bytes; nothing here performs I/O.
//!
//! ## Module Structure
//!
//! - [`commands`]: Control bytes, init, feed and cut
//! - [`text`]: Alignment, emphasis, character size, code page
//! - [`barcode`]: `GS H` / `GS w` / `GS h` / `GS k` barcode printing
//! - [`graphics`]: `GS v 0` raster images
//!
//! ## Usage Example
//!
//! ```
//! use termica::protocol::{commands, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::align(text::Alignment::Center));
//! data.extend(text::bold(true));
//! data.extend(b"RECEIPT\n");
//! data.extend(text::bold(false));
//! data.extend(commands::feed_lines(3));
//! data.extend(commands::cut_full());
//! ```

pub mod barcode;
pub mod commands;
pub mod graphics;
pub mod text;
