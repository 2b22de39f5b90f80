//! # Printer Capabilities
//!
//! This module describes what a thermal printer can physically do. Barcode
//! and element construction read these limits to reject requests the
//! device would silently truncate.
//!
//! ## Built-in Profiles
//!
//! | Profile | Resolution | Print width | Chars/line |
//! |---------|------------|-------------|------------|
//! | `pos58` | 203 DPI | 48mm (384 dots) | 32 |
//! | `pos80` | 203 DPI | 72mm (575 dots) | 48 |
//! | `mobile180` | 180 DPI | 72mm (510 dots) | 32 |
//!
//! ## Usage
//!
//! ```
//! use termica::printer::PrinterCapabilities;
//!
//! let caps = PrinterCapabilities::pos80();
//! println!("Print width: {} dots ({} chars)",
//!          caps.width_dots(),
//!          caps.chars_per_line);
//! ```
//!
//! ## JSON Profiles
//!
//! Any other printer can be described in JSON. Limits left out of the file
//! fall back to the ESC/POS defaults.
//!
//! ```json
//! {
//!   "name": "Kitchen",
//!   "dpi": 203,
//!   "width_mm": 72.0,
//!   "chars_per_line": 42,
//!   "encoding": { "charset": "EUC-KR", "codepage": 13 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::barcode::{Symbology, TextPosition};
use crate::encoding::TextEncoding;
use crate::error::{Result, TermicaError};

/// Smallest `GS w` module width accepted by ESC/POS printers.
pub const MIN_MODULE_WIDTH: u8 = 2;

/// Largest `GS w` module width accepted by ESC/POS printers.
pub const MAX_MODULE_WIDTH: u8 = 6;

/// # Printer Capabilities
///
/// Read-only context shared by reference across barcode and element
/// construction.
///
/// ## Calculations
///
/// ```text
/// dots_per_mm = dpi / 25.4
/// width_dots  = round(width_mm * dots_per_mm)
///
/// For pos80:
///   dots_per_mm = 203 / 25.4 ≈ 8
///   width_dots  = round(72 * 7.99) = 575
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterCapabilities {
    /// Human-readable profile name
    pub name: String,

    /// Resolution in dots per inch
    pub dpi: u16,

    /// Printable width in millimeters
    pub width_mm: f32,

    /// Characters per line in the default font
    pub chars_per_line: usize,

    /// Barcode symbologies the firmware implements
    #[serde(default = "all_symbologies")]
    pub symbologies: Vec<Symbology>,

    /// HRI text positions the firmware implements
    #[serde(default = "all_text_positions")]
    pub text_positions: Vec<TextPosition>,

    /// Narrowest barcode module in dots
    #[serde(default = "default_min_module_width")]
    pub min_module_width: u8,

    /// Widest barcode module in dots
    #[serde(default = "default_max_module_width")]
    pub max_module_width: u8,

    /// Tallest barcode in dots
    #[serde(default = "default_max_barcode_height")]
    pub max_barcode_height: u8,

    /// Charset used for text runs
    #[serde(default)]
    pub encoding: TextEncoding,
}

fn all_symbologies() -> Vec<Symbology> {
    Symbology::ALL.to_vec()
}

fn all_text_positions() -> Vec<TextPosition> {
    TextPosition::ALL.to_vec()
}

fn default_min_module_width() -> u8 {
    MIN_MODULE_WIDTH
}

fn default_max_module_width() -> u8 {
    MAX_MODULE_WIDTH
}

fn default_max_barcode_height() -> u8 {
    u8::MAX
}

impl PrinterCapabilities {
    /// Build a profile with the default ESC/POS limits.
    pub fn new(name: impl Into<String>, dpi: u16, width_mm: f32, chars_per_line: usize) -> Self {
        Self {
            name: name.into(),
            dpi,
            width_mm,
            chars_per_line,
            symbologies: all_symbologies(),
            text_positions: all_text_positions(),
            min_module_width: MIN_MODULE_WIDTH,
            max_module_width: MAX_MODULE_WIDTH,
            max_barcode_height: u8::MAX,
            encoding: TextEncoding::default(),
        }
    }

    /// # 58mm Receipt Printer
    ///
    /// ```text
    /// ├─ 5mm ─┼──── 48mm printable ────┼─ 5mm ─┤
    /// │       │       384 dots         │       │
    /// ```
    pub fn pos58() -> Self {
        Self::new("POS-58", 203, 48.0, 32)
    }

    /// # 80mm Receipt Printer
    ///
    /// ```text
    /// ├─ 4mm ─┼──── 72mm printable ────┼─ 4mm ─┤
    /// │       │       575 dots         │       │
    /// ```
    pub fn pos80() -> Self {
        Self::new("POS-80", 203, 72.0, 48)
    }

    /// # 180 DPI Mobile Printer
    ///
    /// Portable Bluetooth printers with a coarser head and a large default
    /// font.
    pub fn mobile180() -> Self {
        Self::new("Mobile-180", 180, 72.0, 32)
    }

    /// Replace the text charset.
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Restrict the supported symbologies.
    pub fn with_symbologies(mut self, symbologies: &[Symbology]) -> Self {
        self.symbologies = symbologies.to_vec();
        self
    }

    /// Restrict the supported HRI positions.
    pub fn with_text_positions(mut self, positions: &[TextPosition]) -> Self {
        self.text_positions = positions.to_vec();
        self
    }

    /// Calculate dots per millimeter
    ///
    /// ## Example
    ///
    /// ```
    /// use termica::printer::PrinterCapabilities;
    ///
    /// let caps = PrinterCapabilities::pos80();
    /// assert!((caps.dots_per_mm() - 8.0).abs() < 0.1);
    /// ```
    #[inline]
    pub fn dots_per_mm(&self) -> f32 {
        self.dpi as f32 / 25.4
    }

    /// Convert millimeters to dots
    #[inline]
    pub fn mm_to_dots(&self, mm: f32) -> u32 {
        (mm * self.dots_per_mm()).round().max(0.0) as u32
    }

    /// Printable width in dots
    #[inline]
    pub fn width_dots(&self) -> u32 {
        self.mm_to_dots(self.width_mm)
    }

    pub fn supports_symbology(&self, symbology: Symbology) -> bool {
        self.symbologies.contains(&symbology)
    }

    pub fn supports_text_position(&self, position: TextPosition) -> bool {
        self.text_positions.contains(&position)
    }

    /// Check that the profile describes a printable device.
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(TermicaError::Config(format!("{}: dpi must be positive", self.name)));
        }
        if !(self.width_mm.is_finite() && self.width_mm > 0.0) {
            return Err(TermicaError::Config(format!(
                "{}: width_mm must be positive, got {}",
                self.name, self.width_mm
            )));
        }
        if self.chars_per_line == 0 {
            return Err(TermicaError::Config(format!(
                "{}: chars_per_line must be positive",
                self.name
            )));
        }
        if self.min_module_width == 0 || self.min_module_width > self.max_module_width {
            return Err(TermicaError::Config(format!(
                "{}: module width range {}..={} is empty",
                self.name, self.min_module_width, self.max_module_width
            )));
        }
        if self.max_barcode_height == 0 {
            return Err(TermicaError::Config(format!(
                "{}: max_barcode_height must be positive",
                self.name
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON profile.
    pub fn from_json(json: &str) -> Result<Self> {
        let caps: Self = serde_json::from_str(json)
            .map_err(|e| TermicaError::Config(format!("Invalid printer profile: {}", e)))?;
        caps.validate()?;
        Ok(caps)
    }

    /// Load a JSON profile from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            TermicaError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "loading printer profile");
        Self::from_json(&json)
    }

    /// Resolve a profile argument.
    ///
    /// Formats:
    /// - `"pos58"`, `"pos80"`, `"mobile180"` → built-in profile
    /// - Any built-in profile's display name (e.g. `"POS-80"`)
    /// - A path ending in `.json` → profile file
    pub fn parse(s: &str) -> Result<Self> {
        if let Some(profile) = Self::built_in().into_iter().find(|p| p.name == s) {
            return Ok(profile);
        }

        match s.to_lowercase().as_str() {
            "pos58" => Ok(Self::pos58()),
            "pos80" => Ok(Self::pos80()),
            "mobile180" => Ok(Self::mobile180()),
            other if other.ends_with(".json") => Self::load(s),
            _ => Err(TermicaError::Config(format!(
                "Unknown profile '{}'. Use 'pos58', 'pos80', 'mobile180' or a .json file",
                s
            ))),
        }
    }

    /// List all built-in profiles.
    pub fn built_in() -> Vec<Self> {
        vec![Self::pos58(), Self::pos80(), Self::mobile180()]
    }
}

impl Default for PrinterCapabilities {
    fn default() -> Self {
        Self::pos80()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_pos80_dimensions() {
        let caps = PrinterCapabilities::pos80();
        assert_eq!(caps.width_dots(), 575);
        assert_eq!(caps.chars_per_line, 48);
    }

    #[test]
    fn test_pos58_dimensions() {
        let caps = PrinterCapabilities::pos58();
        // 48mm at 203 DPI
        assert_eq!(caps.width_dots(), 384);
    }

    #[test]
    fn test_mobile180_dimensions() {
        let caps = PrinterCapabilities::mobile180();
        // 72mm * 180 / 25.4 = 510.2
        assert_eq!(caps.width_dots(), 510);
    }

    #[test]
    fn test_mm_to_dots() {
        let caps = PrinterCapabilities::pos80();
        // 10mm ≈ 80 dots
        assert_eq!(caps.mm_to_dots(10.0), 80);
        assert_eq!(caps.mm_to_dots(0.0), 0);
    }

    #[test]
    fn test_defaults_support_everything() {
        let caps = PrinterCapabilities::default();
        assert!(Symbology::ALL.iter().all(|s| caps.supports_symbology(*s)));
        assert!(TextPosition::ALL.iter().all(|p| caps.supports_text_position(*p)));
        assert!(caps.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let caps = PrinterCapabilities::from_json(
            r#"{ "name": "Kitchen", "dpi": 203, "width_mm": 72.0, "chars_per_line": 42,
                 "encoding": { "charset": "EUC-KR", "codepage": 13 } }"#,
        )
        .unwrap();
        assert_eq!(caps.name, "Kitchen");
        assert_eq!(caps.max_module_width, MAX_MODULE_WIDTH);
        assert_eq!(caps.symbologies, Symbology::ALL.to_vec());
        assert_eq!(caps.encoding, TextEncoding::euc_kr());
    }

    #[test]
    fn test_from_json_restricted_symbologies() {
        let caps = PrinterCapabilities::from_json(
            r#"{ "name": "Old", "dpi": 180, "width_mm": 48.0, "chars_per_line": 32,
                 "symbologies": ["upca"], "text_positions": ["none", "below"] }"#,
        )
        .unwrap();
        assert!(caps.supports_symbology(Symbology::UpcA));
        assert!(!caps.supports_symbology(Symbology::Ean13));
        assert!(!caps.supports_text_position(TextPosition::Both));
    }

    #[test]
    fn test_from_json_rejects_invalid_profile() {
        let err = PrinterCapabilities::from_json(
            r#"{ "name": "Broken", "dpi": 0, "width_mm": 72.0, "chars_per_line": 48 }"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = PrinterCapabilities::from_json("{ not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_validate_module_range() {
        let mut caps = PrinterCapabilities::pos80();
        caps.min_module_width = 5;
        caps.max_module_width = 3;
        assert_eq!(caps.validate().unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_parse_profiles() {
        assert_eq!(PrinterCapabilities::parse("pos58").unwrap().name, "POS-58");
        assert_eq!(PrinterCapabilities::parse("POS80").unwrap().name, "POS-80");
        assert_eq!(PrinterCapabilities::parse("Mobile-180").unwrap().dpi, 180);
        assert!(PrinterCapabilities::parse("laserjet").is_err());
    }

    #[test]
    fn test_parse_missing_json_file() {
        let err = PrinterCapabilities::parse("/nonexistent/profile.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
