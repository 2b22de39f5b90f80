//! # Barcode Command Builder
//!
//! Translates a validated [`Barcode`] into the printer-native parameters of
//! an ESC/POS barcode print. The builder never clamps: a request the
//! printer cannot honor is rejected with a `Capability` error, because a
//! silently shrunk barcode may no longer scan.
//!
//! ## Module Width
//!
//! ```text
//! wanted_dots  = mm_to_dots(width_mm)
//! module_width = round(wanted_dots / module_count)
//! if module_width * module_count > printable dots: module_width -= 1
//! ```
//!
//! The result must fall inside the printer's `GS w` range.

use tracing::debug;

use super::{Barcode, Symbology};
use crate::error::{Result, TermicaError};
use crate::printer::PrinterCapabilities;

/// Transmission-ready barcode parameters.
///
/// Produced by [`BarcodeCommandBuilder`]; serialized to wire bytes by
/// [`crate::protocol::barcode::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeCommand {
    /// `GS k` function B type id
    pub type_id: u8,
    /// `GS w` module width in dots
    pub module_width: u8,
    /// `GS h` height in dots
    pub height: u8,
    /// `GS H` HRI position flag
    pub position_flag: u8,
    /// Digit bytes, unchanged from the barcode
    pub payload: Vec<u8>,
}

impl BarcodeCommand {
    /// `GS k` length byte.
    pub fn payload_len(&self) -> u8 {
        // At most 13 digits; always fits.
        self.payload.len() as u8
    }
}

/// Builds [`BarcodeCommand`]s against one printer's limits.
#[derive(Debug, Clone, Copy)]
pub struct BarcodeCommandBuilder<'a> {
    caps: &'a PrinterCapabilities,
}

impl<'a> BarcodeCommandBuilder<'a> {
    pub fn new(caps: &'a PrinterCapabilities) -> Self {
        Self { caps }
    }

    /// Map a barcode to printer units.
    ///
    /// ## Errors
    ///
    /// `Capability` when the symbology or HRI position is unsupported, or
    /// the requested size cannot be expressed within the printer's module
    /// width and height limits.
    pub fn build(&self, barcode: &Barcode) -> Result<BarcodeCommand> {
        let symbology = barcode.symbology();
        if !self.caps.supports_symbology(symbology) {
            return Err(TermicaError::Capability(format!(
                "{} does not support {} barcodes",
                self.caps.name, symbology
            )));
        }

        let position = barcode.text_position();
        if !self.caps.supports_text_position(position) {
            return Err(TermicaError::Capability(format!(
                "{} cannot print barcode text {:?}",
                self.caps.name, position
            )));
        }

        let module_width = self.module_width(symbology, barcode.width_mm())?;
        let height = self.height(barcode.height_mm())?;

        debug!(
            symbology = %symbology,
            code = barcode.code(),
            module_width,
            height,
            "built barcode command"
        );

        Ok(BarcodeCommand {
            type_id: symbology.type_id(),
            module_width,
            height,
            position_flag: position.flag(),
            payload: barcode.code().as_bytes().to_vec(),
        })
    }

    fn module_width(&self, symbology: Symbology, width_mm: f32) -> Result<u8> {
        let modules = symbology.module_count();
        let wanted = self.caps.mm_to_dots(width_mm);
        let mut width = (wanted as f32 / modules as f32).round() as u32;
        let paper = self.caps.width_dots();
        if width * modules > paper {
            width = width.saturating_sub(1);
        }
        // A barcode sized for wider paper can still overflow after one step.
        if width * modules > paper {
            return Err(TermicaError::Capability(format!(
                "{} at {}mm is {} dots wide, {} prints at most {}",
                symbology,
                width_mm,
                width * modules,
                self.caps.name,
                paper
            )));
        }

        let min = self.caps.min_module_width as u32;
        let max = self.caps.max_module_width as u32;
        if width < min {
            return Err(TermicaError::Capability(format!(
                "{} at {}mm needs {}-dot modules, narrower than the {}-dot minimum",
                symbology, width_mm, width, min
            )));
        }
        if width > max {
            return Err(TermicaError::Capability(format!(
                "{} at {}mm needs {}-dot modules, wider than the {}-dot maximum",
                symbology, width_mm, width, max
            )));
        }
        Ok(width as u8)
    }

    fn height(&self, height_mm: f32) -> Result<u8> {
        let dots = self.caps.mm_to_dots(height_mm);
        let max = self.caps.max_barcode_height as u32;
        if dots == 0 || dots > max {
            return Err(TermicaError::Capability(format!(
                "Barcode height {}mm is {} dots, outside 1..={}",
                height_mm, dots, max
            )));
        }
        Ok(dots as u8)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::TextPosition;
    use crate::error::ErrorKind;

    fn barcode(caps: &PrinterCapabilities, width_mm: f32, height_mm: f32) -> Barcode {
        Barcode::new(caps, Symbology::Ean13, "400638133393", width_mm, height_mm, TextPosition::Below)
            .unwrap()
    }

    #[test]
    fn test_build_ean13() {
        let caps = PrinterCapabilities::pos80();
        // 36mm ≈ 288 dots / 95 modules ≈ 3 dots
        let cmd = BarcodeCommandBuilder::new(&caps)
            .build(&barcode(&caps, 36.0, 10.0))
            .unwrap();
        assert_eq!(cmd.type_id, 67);
        assert_eq!(cmd.module_width, 3);
        assert_eq!(cmd.height, 80);
        assert_eq!(cmd.position_flag, 2);
        assert_eq!(cmd.payload, b"4006381333931");
        assert_eq!(cmd.payload_len(), 13);
    }

    #[test]
    fn test_build_upca_and_ean8_type_ids() {
        let caps = PrinterCapabilities::pos80();
        let builder = BarcodeCommandBuilder::new(&caps);

        let upca = Barcode::new(&caps, Symbology::UpcA, "03600029145", 36.0, 10.0, TextPosition::None)
            .unwrap();
        let cmd = builder.build(&upca).unwrap();
        assert_eq!(cmd.type_id, 65);
        assert_eq!(cmd.position_flag, 0);
        assert_eq!(cmd.payload, b"036000291452");

        let ean8 = Barcode::new(&caps, Symbology::Ean8, "9638507", 25.0, 10.0, TextPosition::Both)
            .unwrap();
        let cmd = builder.build(&ean8).unwrap();
        assert_eq!(cmd.type_id, 68);
        assert_eq!(cmd.position_flag, 3);
        // 25mm ≈ 200 dots / 67 modules ≈ 3 dots
        assert_eq!(cmd.module_width, 3);
    }

    #[test]
    fn test_full_paper_width_fits() {
        let caps = PrinterCapabilities::pos58();
        // 48mm = 384 dots / 95 = 4.04 → 4, 4 * 95 = 380 fits
        let cmd = BarcodeCommandBuilder::new(&caps)
            .build(&barcode(&caps, 48.0, 10.0))
            .unwrap();
        assert_eq!(cmd.module_width, 4);
        assert!(cmd.module_width as u32 * 95 <= caps.width_dots());
    }

    #[test]
    fn test_rounding_up_past_paper_steps_down() {
        let mut caps = PrinterCapabilities::pos58();
        caps.width_mm = 46.0; // 368 dots
        // 46mm / 95 = 3.87 → 4, but 4 * 95 = 380 > 368
        let cmd = BarcodeCommandBuilder::new(&caps)
            .build(&barcode(&caps, 46.0, 10.0))
            .unwrap();
        assert_eq!(cmd.module_width, 3);
    }

    #[test]
    fn test_barcode_sized_for_wider_paper_is_rejected() {
        let pos80 = PrinterCapabilities::pos80();
        let pos58 = PrinterCapabilities::pos58();
        // 72mm ≈ 575 dots → 6, stepped down to 5, but 5 * 95 = 475 > 384
        let err = BarcodeCommandBuilder::new(&pos58)
            .build(&barcode(&pos80, 72.0, 10.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capability);
        assert!(err.to_string().contains("384"));
    }

    #[test]
    fn test_too_narrow_is_rejected() {
        let caps = PrinterCapabilities::pos80();
        // 10mm ≈ 80 dots / 95 modules rounds to 1
        let err = BarcodeCommandBuilder::new(&caps)
            .build(&barcode(&caps, 10.0, 10.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capability);
    }

    #[test]
    fn test_too_wide_modules_are_rejected() {
        let mut caps = PrinterCapabilities::pos80();
        caps.max_module_width = 3;
        // 72mm ≈ 575 dots / 95 ≈ 6
        let err = BarcodeCommandBuilder::new(&caps)
            .build(&barcode(&caps, 72.0, 10.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capability);
    }

    #[test]
    fn test_height_limits() {
        let caps = PrinterCapabilities::pos80();
        let builder = BarcodeCommandBuilder::new(&caps);
        // 40mm ≈ 320 dots > 255
        let err = builder.build(&barcode(&caps, 36.0, 40.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capability);
        // 0.05mm rounds to 0 dots
        let err = builder.build(&barcode(&caps, 36.0, 0.05)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capability);
    }

    #[test]
    fn test_unsupported_symbology() {
        let caps = PrinterCapabilities::pos80().with_symbologies(&[Symbology::UpcA]);
        let err = BarcodeCommandBuilder::new(&caps)
            .build(&barcode(&caps, 36.0, 10.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capability);
        assert!(err.to_string().contains("EAN-13"));
    }

    #[test]
    fn test_unsupported_text_position() {
        let caps = PrinterCapabilities::pos80()
            .with_text_positions(&[TextPosition::None, TextPosition::Below]);
        let both = Barcode::new(&caps, Symbology::Ean13, "400638133393", 36.0, 10.0, TextPosition::Both)
            .unwrap();
        let err = BarcodeCommandBuilder::new(&caps).build(&both).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capability);
    }
}
