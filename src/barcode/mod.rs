//! # Retail Barcodes
//!
//! Validation and check-digit completion for the numeric EAN/UPC family.
//!
//! ## Supported Symbologies
//!
//! | Symbology | Digits | Modules | `GS k` id |
//! |-----------|--------|---------|-----------|
//! | EAN-13 / JAN-13 | 13 | 95 | 67 |
//! | EAN-8 / JAN-8 | 8 | 67 | 68 |
//! | UPC-A | 12 | 95 | 65 |
//!
//! ## Accepted Input
//!
//! A code may be given with or without its trailing check digit:
//!
//! - `required_length − 1` digits: the check digit is computed and appended
//! - `required_length` digits: the check digit is verified
//!
//! ```
//! use termica::barcode::{Barcode, Symbology, TextPosition};
//! use termica::printer::PrinterCapabilities;
//!
//! let caps = PrinterCapabilities::pos80();
//! let barcode = Barcode::new(&caps, Symbology::Ean13, "400638133393", 40.0, 10.0, TextPosition::Below)?;
//! assert_eq!(barcode.code(), "4006381333931");
//! # Ok::<(), termica::TermicaError>(())
//! ```
//!
//! ## Check Digit
//!
//! Weighted modulo 10. Starting from the rightmost payload digit, weights
//! alternate 3, 1, 3, 1, ...
//!
//! ```text
//! payload  4 0 0 6 3 8 1 3 3 3 9 3
//! weight   1 3 1 3 1 3 1 3 1 3 1 3
//! sum      89
//! check    (10 - 89 % 10) % 10 = 1
//! ```

pub mod builder;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TermicaError};
use crate::printer::PrinterCapabilities;

pub use builder::{BarcodeCommand, BarcodeCommandBuilder};

/// Numeric retail symbology.
///
/// Each variant is a row of the lookup table above; nothing about a
/// symbology varies at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbology {
    /// EAN-13 / JAN-13
    Ean13,
    /// EAN-8 / JAN-8
    Ean8,
    /// UPC-A
    UpcA,
}

impl Symbology {
    pub const ALL: [Symbology; 3] = [Symbology::Ean13, Symbology::Ean8, Symbology::UpcA];

    /// Digit count including the check digit.
    pub const fn required_length(self) -> usize {
        match self {
            Self::Ean13 => 13,
            Self::Ean8 => 8,
            Self::UpcA => 12,
        }
    }

    /// Check-digit weights as (rightmost payload digit, next digit).
    pub const fn weights(self) -> (u32, u32) {
        match self {
            Self::Ean13 | Self::Ean8 | Self::UpcA => (3, 1),
        }
    }

    /// Total bar/space modules including guards.
    pub const fn module_count(self) -> u32 {
        match self {
            Self::Ean13 | Self::UpcA => 95,
            Self::Ean8 => 67,
        }
    }

    /// `GS k` function B type id.
    pub const fn type_id(self) -> u8 {
        match self {
            Self::UpcA => 65,
            Self::Ean13 => 67,
            Self::Ean8 => 68,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ean13 => "EAN-13",
            Self::Ean8 => "EAN-8",
            Self::UpcA => "UPC-A",
        }
    }

    /// Compute the check digit for a payload that excludes it.
    ///
    /// ## Errors
    ///
    /// [`TermicaError::Format`] if the payload is not all ASCII digits.
    pub fn check_digit(self, payload: &str) -> Result<u8> {
        let (odd, even) = self.weights();
        let mut sum = 0u32;
        for (i, c) in payload.chars().rev().enumerate() {
            let digit = c.to_digit(10).ok_or_else(|| self.not_a_digit(c))?;
            sum += if i % 2 == 0 { digit * odd } else { digit * even };
        }
        Ok(((10 - sum % 10) % 10) as u8)
    }

    fn not_a_digit(self, c: char) -> TermicaError {
        TermicaError::Format(format!(
            "{} codes are digits only, found {:?}",
            self.name(),
            c
        ))
    }

    /// Validate a code and return its checksum-complete form.
    pub fn normalize(self, code: &str) -> Result<String> {
        if let Some(bad) = code.chars().find(|c| !c.is_ascii_digit()) {
            return Err(self.not_a_digit(bad));
        }

        let required = self.required_length();
        match code.len() {
            n if n == required - 1 => {
                let check = self.check_digit(code)?;
                debug!(symbology = %self, check, "appended check digit");
                Ok(format!("{}{}", code, check))
            }
            n if n == required => {
                let (payload, last) = code.split_at(required - 1);
                let expected = self.check_digit(payload)?;
                let found = last.as_bytes()[0] - b'0';
                if expected != found {
                    return Err(TermicaError::Checksum { expected, found });
                }
                Ok(code.to_string())
            }
            actual => Err(TermicaError::Length {
                symbology: self,
                expected: required,
                actual,
            }),
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Symbology {
    type Err = TermicaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "ean13" | "jan13" => Ok(Self::Ean13),
            "ean8" | "jan8" => Ok(Self::Ean8),
            "upca" | "upc" => Ok(Self::UpcA),
            _ => Err(TermicaError::Format(format!("Unknown symbology '{}'", s))),
        }
    }
}

/// HRI (Human Readable Interpretation) position
///
/// Where the digits are printed relative to the bars. Discriminants are the
/// `GS H n` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TextPosition {
    /// No HRI text printed
    None = 0,
    /// HRI above barcode
    Above = 1,
    /// HRI below barcode (default)
    #[default]
    Below = 2,
    /// HRI both above and below
    Both = 3,
}

impl TextPosition {
    pub const ALL: [TextPosition; 4] = [
        TextPosition::None,
        TextPosition::Above,
        TextPosition::Below,
        TextPosition::Both,
    ];

    /// `GS H n` parameter.
    pub const fn flag(self) -> u8 {
        self as u8
    }

    /// Parse a numeric selector (0-3, or ASCII '0'-'3').
    pub fn from_code(n: u8) -> Result<Self> {
        match n {
            0 | b'0' => Ok(Self::None),
            1 | b'1' => Ok(Self::Above),
            2 | b'2' => Ok(Self::Below),
            3 | b'3' => Ok(Self::Both),
            other => Err(TermicaError::Format(format!(
                "Unknown text position selector {}",
                other
            ))),
        }
    }
}

impl FromStr for TextPosition {
    type Err = TermicaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "above" | "top" => Ok(Self::Above),
            "below" | "bottom" => Ok(Self::Below),
            "both" => Ok(Self::Both),
            code if code.len() == 1 => Self::from_code(code.as_bytes()[0]),
            _ => Err(TermicaError::Format(format!("Unknown text position '{}'", s))),
        }
    }
}

/// A validated numeric barcode.
///
/// Constructed once per barcode to print and immutable afterwards. The code
/// always holds exactly `symbology.required_length()` ASCII digits with a
/// correct check digit.
#[derive(Debug, Clone, PartialEq)]
pub struct Barcode {
    symbology: Symbology,
    code: String,
    width_mm: f32,
    height_mm: f32,
    text_position: TextPosition,
}

impl Barcode {
    /// Validate and normalize a barcode.
    ///
    /// ## Errors
    ///
    /// - `Format`: non-positive size, or a non-digit in the code
    /// - `Length`: digit count is neither `n` nor `n - 1`
    /// - `Checksum`: a full-length code has the wrong check digit
    /// - `Capability`: wider than the printable area
    pub fn new(
        caps: &PrinterCapabilities,
        symbology: Symbology,
        code: &str,
        width_mm: f32,
        height_mm: f32,
        text_position: TextPosition,
    ) -> Result<Self> {
        for (label, value) in [("width", width_mm), ("height", height_mm)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TermicaError::Format(format!(
                    "Barcode {} must be positive, got {}mm",
                    label, value
                )));
            }
        }

        let code = symbology.normalize(code)?;

        if width_mm > caps.width_mm {
            return Err(TermicaError::Capability(format!(
                "{} barcode is {}mm wide but {} prints at most {}mm",
                symbology, width_mm, caps.name, caps.width_mm
            )));
        }

        Ok(Self {
            symbology,
            code,
            width_mm,
            height_mm,
            text_position,
        })
    }

    pub fn symbology(&self) -> Symbology {
        self.symbology
    }

    /// The checksum-complete digit string.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The trailing check digit.
    pub fn check_digit(&self) -> u8 {
        self.code.as_bytes()[self.code.len() - 1] - b'0'
    }

    pub fn width_mm(&self) -> f32 {
        self.width_mm
    }

    pub fn height_mm(&self) -> f32 {
        self.height_mm
    }

    pub fn text_position(&self) -> TextPosition {
        self.text_position
    }

    /// Digit count; always `symbology().required_length()`.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
