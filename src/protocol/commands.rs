//! # ESC/POS Basic Commands
//!
//! Control bytes and the paper-handling commands every print job uses.
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `ESC d n`, `GS V m n`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`
//!
//! ## Reference
//!
//! Based on the Epson "ESC/POS Application Programming Guide" command
//! reference (TM series).

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for graphics, barcodes and character size.
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state: clears the print
/// buffer, text styles, alignment and code page.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// ## Example
///
/// ```
/// use termica::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// PAPER FEED
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC d n  |
/// | Hex     | 1B 64 n  |
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

// ============================================================================
// CUTTER CONTROL
// ============================================================================

/// # Full Cut (GS V 0)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 0   |
/// | Hex     | 1D 56 00 |
#[inline]
pub fn cut_full() -> Vec<u8> {
    vec![GS, b'V', 0]
}

/// # Partial Cut (GS V 1)
///
/// Leaves a small "hinge" connecting the receipt to the roll.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 1   |
/// | Hex     | 1D 56 01 |
#[inline]
pub fn cut_partial() -> Vec<u8> {
    vec![GS, b'V', 1]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ## Example
///
/// ```
/// use termica::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(576), [0x40, 0x02]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_feed_lines() {
        assert_eq!(feed_lines(4), vec![0x1B, 0x64, 4]);
    }

    #[test]
    fn test_cuts() {
        assert_eq!(cut_full(), vec![0x1D, 0x56, 0x00]);
        assert_eq!(cut_partial(), vec![0x1D, 0x56, 0x01]);
    }

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0), [0, 0]);
        assert_eq!(u16_le(255), [255, 0]);
        assert_eq!(u16_le(256), [0, 1]);
        assert_eq!(u16_le(0xFFFF), [255, 255]);
    }
}
