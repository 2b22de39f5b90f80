//! # Printer Configuration
//!
//! Capability profiles for ESC/POS printers.

pub mod config;

pub use config::{MAX_MODULE_WIDTH, MIN_MODULE_WIDTH, PrinterCapabilities};
