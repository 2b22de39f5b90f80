//! # Print Elements
//!
//! A print job is an ordered list of elements. Every element can report
//! its rendered length and write itself to a [`Connection`]:
//!
//! | Element | `length()` | Bytes |
//! |---------|------------|-------|
//! | [`BarcodeElement`] | digit count | `GS H`, `GS w`, `GS h`, `GS k` |
//! | [`TextRun`] | encoded bytes × width multiplier | `ESC t`, style, text, `LF` |
//! | [`RasterImage`] | width in dots | `GS v 0` |
//!
//! `length()` never performs I/O. Only `render_to()` writes.
//!
//! ## Example
//!
//! ```
//! use termica::elements::{Element, PrintElement, TextRun};
//! use termica::transport::MemoryConnection;
//!
//! let run: Element = TextRun::new("TOTAL").into();
//! assert_eq!(run.length()?, 5);
//!
//! let mut conn = MemoryConnection::new();
//! run.render_to(&mut conn)?;
//! assert!(conn.bytes().ends_with(b"TOTAL\n"));
//! # Ok::<(), termica::TermicaError>(())
//! ```

mod barcode;
mod image;
mod text;

pub use barcode::BarcodeElement;
pub use image::RasterImage;
pub use text::TextRun;

use crate::error::Result;
use crate::protocol::text::Alignment;
use crate::transport::Connection;

/// Something that can be placed in a print job.
pub trait PrintElement {
    /// Rendered length: characters for text, digits for barcodes, dots
    /// for images.
    fn length(&self) -> Result<usize>;

    /// Write this element's bytes to the connection.
    fn render_to(&self, conn: &mut dyn Connection) -> Result<()>;
}

/// The closed set of element kinds a job can hold.
#[derive(Debug, Clone)]
pub enum Element {
    Barcode(BarcodeElement),
    Text(TextRun),
    Image(RasterImage),
}

impl Element {
    pub fn alignment(&self) -> Alignment {
        match self {
            Element::Barcode(b) => b.alignment(),
            Element::Text(t) => t.alignment(),
            Element::Image(i) => i.alignment(),
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Barcode(_) => "barcode",
            Element::Text(_) => "text",
            Element::Image(_) => "image",
        }
    }
}

impl PrintElement for Element {
    fn length(&self) -> Result<usize> {
        match self {
            Element::Barcode(b) => b.length(),
            Element::Text(t) => t.length(),
            Element::Image(i) => i.length(),
        }
    }

    fn render_to(&self, conn: &mut dyn Connection) -> Result<()> {
        match self {
            Element::Barcode(b) => b.render_to(conn),
            Element::Text(t) => t.render_to(conn),
            Element::Image(i) => i.render_to(conn),
        }
    }
}

impl From<BarcodeElement> for Element {
    fn from(b: BarcodeElement) -> Self {
        Element::Barcode(b)
    }
}

impl From<TextRun> for Element {
    fn from(t: TextRun) -> Self {
        Element::Text(t)
    }
}

impl From<RasterImage> for Element {
    fn from(i: RasterImage) -> Self {
        Element::Image(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::{Barcode, Symbology, TextPosition};
    use crate::printer::PrinterCapabilities;

    #[test]
    fn test_enum_dispatch_matches_inner() {
        let caps = PrinterCapabilities::pos80();
        let code =
            Barcode::new(&caps, Symbology::Ean8, "9638507", 30.0, 10.0, TextPosition::Below)
                .unwrap();
        let elements: Vec<Element> = vec![
            BarcodeElement::new(code, &caps).unwrap().into(),
            TextRun::new("abc").into(),
            RasterImage::new(16, 1, vec![0xFF, 0x00]).unwrap().into(),
        ];

        let lengths: Vec<usize> = elements.iter().map(|e| e.length().unwrap()).collect();
        assert_eq!(lengths, vec![8, 3, 16]);

        let kinds: Vec<&str> = elements.iter().map(Element::kind).collect();
        assert_eq!(kinds, vec!["barcode", "text", "image"]);
    }

    #[test]
    fn test_alignment_defaults_left() {
        let e: Element = TextRun::new("x").into();
        assert_eq!(e.alignment(), Alignment::Left);
    }
}
