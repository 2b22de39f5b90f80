//! # ESC/POS Barcode Commands
//!
//! A 1D barcode print is four commands: three that set up the symbol and
//! one that carries the data.
//!
//! | Command | Bytes | Meaning |
//! |---------|-------|---------|
//! | GS H n | 1D 48 n | HRI position (0 none, 1 above, 2 below, 3 both) |
//! | GS w n | 1D 77 n | Module width in dots (2-6) |
//! | GS h n | 1D 68 n | Bar height in dots (1-255) |
//! | GS k m n d1..dn | 1D 6B m n d.. | Print barcode, function B |
//!
//! Function B (`m >= 65`) carries an explicit length byte instead of a NUL
//! terminator.
//!
//! | m | Symbology |
//! |---|-----------|
//! | 65 | UPC-A |
//! | 67 | EAN-13 |
//! | 68 | EAN-8 |
//!
//! ## Example
//!
//! ```
//! use termica::barcode::{Barcode, BarcodeCommandBuilder, Symbology, TextPosition};
//! use termica::printer::PrinterCapabilities;
//! use termica::protocol::barcode;
//!
//! let caps = PrinterCapabilities::pos80();
//! let code = Barcode::new(&caps, Symbology::UpcA, "03600029145", 36.0, 10.0, TextPosition::Below)?;
//! let cmd = BarcodeCommandBuilder::new(&caps).build(&code)?;
//!
//! let bytes = barcode::encode(&cmd);
//! assert!(bytes.ends_with(b"036000291452"));
//! # Ok::<(), termica::TermicaError>(())
//! ```

use super::commands::GS;
use crate::barcode::BarcodeCommand;

/// # Select HRI Print Position (GS H n)
#[inline]
pub fn hri_position(flag: u8) -> Vec<u8> {
    vec![GS, b'H', flag]
}

/// # Set Barcode Module Width (GS w n)
#[inline]
pub fn module_width(dots: u8) -> Vec<u8> {
    vec![GS, b'w', dots]
}

/// # Set Barcode Height (GS h n)
#[inline]
pub fn height(dots: u8) -> Vec<u8> {
    vec![GS, b'h', dots]
}

/// # Print Barcode, Function B (GS k m n d1...dn)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS k m n d1...dn |
/// | Hex     | 1D 6B m n d1...dn |
pub fn print(type_id: u8, data: &[u8]) -> Vec<u8> {
    debug_assert!(data.len() <= u8::MAX as usize, "barcode data too long");

    let mut cmd = Vec::with_capacity(4 + data.len());
    cmd.push(GS);
    cmd.push(b'k');
    cmd.push(type_id);
    cmd.push(data.len() as u8);
    cmd.extend_from_slice(data);
    cmd
}

/// Serialize a full barcode command: setup followed by the print.
pub fn encode(cmd: &BarcodeCommand) -> Vec<u8> {
    let mut out = Vec::with_capacity(13 + cmd.payload.len());
    out.extend(hri_position(cmd.position_flag));
    out.extend(module_width(cmd.module_width));
    out.extend(height(cmd.height));
    out.extend(print(cmd.type_id, &cmd.payload));
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_setup_commands() {
        assert_eq!(hri_position(2), vec![0x1D, 0x48, 0x02]);
        assert_eq!(module_width(3), vec![0x1D, 0x77, 0x03]);
        assert_eq!(height(80), vec![0x1D, 0x68, 80]);
    }

    #[test]
    fn test_print_function_b() {
        let cmd = print(67, b"4006381333931");
        assert_eq!(&cmd[0..4], &[0x1D, 0x6B, 67, 13]);
        assert_eq!(&cmd[4..], b"4006381333931");
    }

    #[test]
    fn test_encode_layout() {
        let cmd = BarcodeCommand {
            type_id: 68,
            module_width: 3,
            height: 80,
            position_flag: 0,
            payload: b"96385074".to_vec(),
        };
        let mut expected = vec![
            0x1D, 0x48, 0x00, // GS H 0
            0x1D, 0x77, 0x03, // GS w 3
            0x1D, 0x68, 80, // GS h 80
            0x1D, 0x6B, 68, 8, // GS k 68 8
        ];
        expected.extend_from_slice(b"96385074");
        assert_eq!(encode(&cmd), expected);
    }
}
