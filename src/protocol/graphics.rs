//! # ESC/POS Raster Graphics
//!
//! ## Bit Packing
//!
//! Graphics data is packed as bytes where each bit represents one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! Byte value 0xAA = 10101010 = █░█░█░█░
//! ```

use super::commands::{GS, u16_le};

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `m`: Scale (0 = normal density)
/// - `xL, xH`: Width in bytes, little-endian
/// - `yL, yH`: Height in dots, little-endian
/// - `d1...dk`: Image data, k = width_bytes × height bytes, row by row
///
/// ## Example
///
/// ```
/// use termica::protocol::graphics;
///
/// let data = vec![0xFF; 2 * 3];
/// let cmd = graphics::raster(2, 3, &data);
/// assert_eq!(&cmd[0..8], &[0x1D, 0x76, 0x30, 0x00, 2, 0, 3, 0]);
/// ```
pub fn raster(width_bytes: u16, height: u16, data: &[u8]) -> Vec<u8> {
    debug_assert!(
        data.len() == width_bytes as usize * height as usize,
        "Raster data must be exactly width_bytes * height bytes. Expected {}, got {}",
        width_bytes as usize * height as usize,
        data.len()
    );

    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.extend_from_slice(&[GS, b'v', b'0', 0]);
    cmd.extend_from_slice(&u16_le(width_bytes));
    cmd.extend_from_slice(&u16_le(height));
    cmd.extend_from_slice(data);
    cmd
}
