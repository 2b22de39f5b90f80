//! # Error Types
//!
//! This module defines error types used throughout the termica library.
//!
//! Validation errors (`Format`, `Length`, `Checksum`, `Capability`) are
//! raised while building barcodes and elements, before anything reaches a
//! print job. Rendering errors (`Encoding`, `Connection`) are raised while a
//! job is being transmitted and abort the rest of the job.

use thiserror::Error;

use crate::barcode::Symbology;

/// Main error type for termica operations
#[derive(Debug, Error)]
pub enum TermicaError {
    /// Non-digit characters or otherwise malformed input
    #[error("Format error: {0}")]
    Format(String),

    /// Wrong number of digits for the symbology
    #[error("Length error: {symbology} takes {expected} digits (check digit optional), got {actual}")]
    Length {
        symbology: Symbology,
        expected: usize,
        actual: usize,
    },

    /// Supplied check digit does not match the computed one
    #[error("Checksum error: expected check digit {expected}, found {found}")]
    Checksum { expected: u8, found: u8 },

    /// Request exceeds what the printer can do
    #[error("Capability error: {0}")]
    Capability(String),

    /// Content cannot be represented in the active character encoding
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Transport-level errors (connection, write failure)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid printer profile or policy settings
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`TermicaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Length,
    Checksum,
    Capability,
    Encoding,
    Connection,
    Config,
}

impl TermicaError {
    /// Which kind of failure this is. I/O errors count as connection failures.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format(_) => ErrorKind::Format,
            Self::Length { .. } => ErrorKind::Length,
            Self::Checksum { .. } => ErrorKind::Checksum,
            Self::Capability(_) => ErrorKind::Capability,
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::Connection(_) | Self::Io(_) => ErrorKind::Connection,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether a retry policy may try the operation again.
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }
}

/// Result type for termica operations
pub type Result<T> = std::result::Result<T, TermicaError>;
