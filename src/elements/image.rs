//! # Raster Images
//!
//! 1-bit images sent with `GS v 0`. Rows are packed MSB-first, one bit per
//! dot, padded to a whole byte:
//!
//! ```text
//! width 12 dots → 2 bytes per row
//! ████████ ████░░░░
//!    0xFF     0xF0
//! ```

use image::GrayImage;

use super::PrintElement;
use crate::error::{Result, TermicaError};
use crate::protocol::{graphics, text::Alignment};
use crate::transport::Connection;

/// A packed monochrome bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u16,
    height: u16,
    data: Vec<u8>,
    alignment: Alignment,
}

impl RasterImage {
    /// Wrap already-packed rows.
    ///
    /// ## Errors
    ///
    /// [`TermicaError::Format`] if either dimension is zero or `data` is not
    /// exactly `ceil(width / 8) × height` bytes.
    pub fn new(width: u16, height: u16, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TermicaError::Format(format!(
                "image must not be empty, got {}x{}",
                width, height
            )));
        }
        let expected = width.div_ceil(8) as usize * height as usize;
        if data.len() != expected {
            return Err(TermicaError::Format(format!(
                "{}x{} image needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            alignment: Alignment::Left,
        })
    }

    /// Threshold a grayscale image: pixels darker than `threshold` print.
    pub fn from_luma(img: &GrayImage, threshold: u8) -> Result<Self> {
        let (w, h) = img.dimensions();
        let (width, height) = match (u16::try_from(w), u16::try_from(h)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(TermicaError::Format(format!(
                    "image {}x{} is too large",
                    w, h
                )));
            }
        };

        let mut data = Vec::with_capacity(width.div_ceil(8) as usize * height as usize);
        for row in img.rows() {
            let dots: Vec<bool> = row.map(|p| p.0[0] < threshold).collect();
            data.extend(pack_row(&dots));
        }
        Self::new(width, height, data)
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn center(self) -> Self {
        self.align(Alignment::Center)
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Width in dots
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in dots
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn width_bytes(&self) -> u16 {
        self.width.div_ceil(8)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl PrintElement for RasterImage {
    fn length(&self) -> Result<usize> {
        Ok(self.width as usize)
    }

    fn render_to(&self, conn: &mut dyn Connection) -> Result<()> {
        conn.write_all(&graphics::raster(
            self.width_bytes(),
            self.height,
            &self.data,
        ))
    }
}

/// Pack a row of dots into bytes, MSB = leftmost.
fn pack_row(dots: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; dots.len().div_ceil(8)];
    for (i, _) in dots.iter().enumerate().filter(|(_, on)| **on) {
        bytes[i / 8] |= 1 << (7 - (i % 8));
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transport::MemoryConnection;
    use image::Luma;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pack_row() {
        assert_eq!(pack_row(&[true, true, true, true, false, false, false, false]), vec![0xF0]);
        assert_eq!(pack_row(&[true; 12]), vec![0xFF, 0xF0]);
        assert_eq!(pack_row(&[]), Vec::<u8>::new());
    }

    #[test]
    fn test_new_checks_buffer() {
        assert!(RasterImage::new(12, 2, vec![0; 4]).is_ok());
        assert_eq!(
            RasterImage::new(12, 2, vec![0; 3]).unwrap_err().kind(),
            ErrorKind::Format
        );
        assert_eq!(
            RasterImage::new(0, 2, vec![]).unwrap_err().kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn test_from_luma_threshold() {
        // Left half black, right half white.
        let img = GrayImage::from_fn(10, 2, |x, _| if x < 5 { Luma([0]) } else { Luma([255]) });
        let raster = RasterImage::from_luma(&img, 128).unwrap();

        assert_eq!(raster.width(), 10);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.data(), &[0xF8, 0x00, 0xF8, 0x00]);
    }

    #[test]
    fn test_render() {
        let raster = RasterImage::new(8, 1, vec![0xAA]).unwrap();
        let mut conn = MemoryConnection::new();
        raster.render_to(&mut conn).unwrap();
        assert_eq!(
            conn.bytes(),
            vec![0x1D, 0x76, 0x30, 0x00, 1, 0, 1, 0, 0xAA]
        );
        assert_eq!(raster.length().unwrap(), 8);
    }
}
