//! # Print Jobs
//!
//! A [`PrintJob`] is an ordered list of [`Element`]s bound to one printer's
//! capabilities. Rendering walks the list in order and stops at the first
//! error; nothing is retried.
//!
//! ## Alignment
//!
//! Text runs are aligned with leading spaces computed from their
//! `length()` against the printer's characters per line. Barcodes and
//! images are aligned with `ESC a`, reset to left afterwards.
//!
//! ```text
//! chars_per_line = 12
//!
//! |TOTAL       |   Left:   no padding
//! |   TOTAL    |   Center: (12 - 5) / 2 = 3 spaces
//! |       TOTAL|   Right:  12 - 5 = 7 spaces
//! ```
//!
//! ## Example
//!
//! ```
//! use termica::barcode::{Barcode, Symbology, TextPosition};
//! use termica::elements::{BarcodeElement, TextRun};
//! use termica::printer::PrinterCapabilities;
//! use termica::PrintJob;
//!
//! let caps = PrinterCapabilities::pos58();
//! let code = Barcode::new(&caps, Symbology::Ean13, "400638133393", 40.0, 12.0, TextPosition::Below)?;
//!
//! let mut job = PrintJob::new(&caps).cut(true);
//! job.push(TextRun::new("Thank you!").center())?;
//! job.push(BarcodeElement::new(code, &caps)?.center())?;
//!
//! let bytes = job.to_bytes()?;
//! assert!(bytes.starts_with(&[0x1B, 0x40]));
//! # Ok::<(), termica::TermicaError>(())
//! ```

use tracing::{debug, info, instrument};

use crate::elements::{Element, PrintElement};
use crate::error::{Result, TermicaError};
use crate::printer::PrinterCapabilities;
use crate::protocol::commands;
use crate::protocol::text::{self, Alignment};
use crate::transport::{Connection, MemoryConnection};

/// How the paper is cut after the last element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cut {
    /// `GS V 0`
    Full,
    /// `GS V 1`, leaves a hinge
    Partial,
}

/// An ordered, validated sequence of elements for one printer.
#[derive(Debug, Clone)]
pub struct PrintJob<'a> {
    caps: &'a PrinterCapabilities,
    elements: Vec<Element>,
    init: bool,
    feed: u8,
    cut: Option<Cut>,
}

impl<'a> PrintJob<'a> {
    /// Empty job. Sends `ESC @` first; no feed, no cut.
    pub fn new(caps: &'a PrinterCapabilities) -> Self {
        Self {
            caps,
            elements: Vec::new(),
            init: true,
            feed: 0,
            cut: None,
        }
    }

    /// Whether to reset the printer (`ESC @`) before the first element.
    pub fn init(mut self, enabled: bool) -> Self {
        self.init = enabled;
        self
    }

    /// Lines to feed after the last element.
    pub fn feed(mut self, lines: u8) -> Self {
        self.feed = lines;
        self
    }

    /// Partial cut after the last element.
    pub fn cut(self, enabled: bool) -> Self {
        self.cut_with(enabled.then_some(Cut::Partial))
    }

    /// Full cut after the last element.
    pub fn full_cut(self, enabled: bool) -> Self {
        self.cut_with(enabled.then_some(Cut::Full))
    }

    /// Replace the finishing cut; `None` leaves the paper uncut.
    pub fn cut_with(mut self, cut: Option<Cut>) -> Self {
        self.cut = cut;
        self
    }

    /// Append an element, rejecting anything this printer cannot print.
    ///
    /// Barcodes are rebuilt for this printer, since they may have been
    /// sized against another profile. Text runs without an explicit
    /// encoding take the printer's.
    ///
    /// ## Errors
    ///
    /// [`TermicaError::Capability`] for barcodes this printer cannot
    /// produce or images wider than the printable area.
    pub fn push(&mut self, element: impl Into<Element>) -> Result<()> {
        let element = self.fit(element.into())?;
        debug!(kind = element.kind(), index = self.elements.len(), "element added");
        self.elements.push(element);
        Ok(())
    }

    fn fit(&self, element: Element) -> Result<Element> {
        match element {
            Element::Barcode(b) => Ok(Element::Barcode(b.rebuild(self.caps)?)),
            Element::Text(run) => Ok(Element::Text(run.or_encoding(self.caps.encoding))),
            Element::Image(img) if img.width() as u32 > self.caps.width_dots() => {
                Err(TermicaError::Capability(format!(
                    "image is {} dots wide, {} prints at most {}",
                    img.width(),
                    self.caps.name,
                    self.caps.width_dots()
                )))
            }
            image @ Element::Image(_) => Ok(image),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn capabilities(&self) -> &PrinterCapabilities {
        self.caps
    }

    /// Send the job. The first failing element aborts the rest.
    #[instrument(skip_all, fields(printer = %self.caps.name, elements = self.elements.len()))]
    pub fn render_to<C: Connection>(&self, conn: &mut C) -> Result<()> {
        let conn: &mut dyn Connection = conn;

        if self.init {
            conn.write_all(&commands::init())?;
        }

        for (index, element) in self.elements.iter().enumerate() {
            debug!(index, kind = element.kind(), "rendering element");
            match element {
                Element::Text(_) => {
                    let pad = self.padding(element)?;
                    if pad > 0 {
                        conn.write_all(&vec![b' '; pad])?;
                    }
                    element.render_to(conn)?;
                }
                Element::Barcode(_) | Element::Image(_) => {
                    let alignment = element.alignment();
                    if alignment != Alignment::Left {
                        conn.write_all(&text::align(alignment))?;
                    }
                    element.render_to(conn)?;
                    if alignment != Alignment::Left {
                        conn.write_all(&text::align(Alignment::Left))?;
                    }
                }
            }
        }

        let mut tail = Vec::new();
        if self.feed > 0 {
            tail.extend(commands::feed_lines(self.feed));
        }
        match self.cut {
            Some(Cut::Full) => tail.extend(commands::cut_full()),
            Some(Cut::Partial) => tail.extend(commands::cut_partial()),
            None => {}
        }
        if !tail.is_empty() {
            conn.write_all(&tail)?;
        }

        info!("print job sent");
        Ok(())
    }

    /// Render into memory, e.g. for `--out` dumps or previews.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut conn = MemoryConnection::new();
        self.render_to(&mut conn)?;
        Ok(conn.into_bytes())
    }

    /// Leading spaces that place a text element per its alignment.
    fn padding(&self, element: &Element) -> Result<usize> {
        let line = self.caps.chars_per_line;
        let len = element.length()?;
        if len >= line {
            return Ok(0);
        }
        Ok(match element.alignment() {
            Alignment::Left => 0,
            Alignment::Center => (line - len) / 2,
            Alignment::Right => line - len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::{Barcode, Symbology, TextPosition};
    use crate::elements::{BarcodeElement, RasterImage, TextRun};
    use crate::encoding::TextEncoding;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn caps() -> PrinterCapabilities {
        // 12 characters per line keeps padding easy to read.
        PrinterCapabilities::new("Test", 203, 48.0, 12)
    }

    fn ean8(caps: &PrinterCapabilities) -> BarcodeElement {
        let code =
            Barcode::new(caps, Symbology::Ean8, "9638507", 30.0, 10.0, TextPosition::Below)
                .unwrap();
        BarcodeElement::new(code, caps).unwrap()
    }

    #[test]
    fn test_empty_job() {
        let caps = caps();
        let job = PrintJob::new(&caps);
        assert!(job.is_empty());
        assert_eq!(job.to_bytes().unwrap(), vec![0x1B, 0x40]);
        assert_eq!(PrintJob::new(&caps).init(false).to_bytes().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_padding() {
        let caps = caps();
        let job = PrintJob::new(&caps);
        let pad = |run: TextRun| job.padding(&run.into()).unwrap();

        assert_eq!(pad(TextRun::new("TOTAL")), 0);
        assert_eq!(pad(TextRun::new("TOTAL").center()), 3);
        assert_eq!(pad(TextRun::new("TOTAL").right()), 7);
        assert_eq!(pad(TextRun::new("TOTAL").size(2, 1).unwrap().center()), 1);
        assert_eq!(pad(TextRun::new("much too long for it").right()), 0);
    }

    #[test]
    fn test_right_aligned_text_bytes() {
        let caps = caps();
        let mut job = PrintJob::new(&caps).init(false);
        job.push(TextRun::new("HELLO").right()).unwrap();

        let mut expected = b"       ".to_vec();
        expected.extend([0x1B, 0x74, 16]);
        expected.extend(b"HELLO\n");
        assert_eq!(job.to_bytes().unwrap(), expected);
    }

    #[test]
    fn test_centered_barcode_uses_esc_a() {
        let caps = caps();
        let mut job = PrintJob::new(&caps).init(false);
        job.push(ean8(&caps).center()).unwrap();

        let bytes = job.to_bytes().unwrap();
        assert_eq!(&bytes[0..3], &[0x1B, 0x61, 1]);
        assert_eq!(&bytes[bytes.len() - 3..], &[0x1B, 0x61, 0]);
    }

    #[test]
    fn test_finishing() {
        let caps = caps();
        let job = PrintJob::new(&caps).init(false).feed(3).cut(true);
        assert_eq!(
            job.to_bytes().unwrap(),
            vec![0x1B, 0x64, 3, 0x1D, 0x56, 0x01]
        );
    }

    #[test]
    fn test_full_cut() {
        let caps = caps();
        let job = PrintJob::new(&caps).init(false).feed(2).full_cut(true);
        assert_eq!(
            job.to_bytes().unwrap(),
            vec![0x1B, 0x64, 2, 0x1D, 0x56, 0x00]
        );

        let job = PrintJob::new(&caps).init(false).cut_with(None);
        assert_eq!(job.to_bytes().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_push_rejects_wide_image() {
        let caps = caps();
        let mut job = PrintJob::new(&caps);
        // 48mm at 203dpi is 384 dots.
        let fits = RasterImage::new(384, 1, vec![0; 48]).unwrap();
        let too_wide = RasterImage::new(392, 1, vec![0; 49]).unwrap();

        assert!(job.push(fits).is_ok());
        assert_eq!(job.push(too_wide).unwrap_err().kind(), ErrorKind::Capability);
        assert_eq!(job.len(), 1);
    }

    #[test]
    fn test_push_rejects_barcode_from_other_profile() {
        let full = caps();
        let element = ean8(&full);
        let ean13_only = caps().with_symbologies(&[Symbology::Ean13]);

        let mut job = PrintJob::new(&ean13_only);
        assert_eq!(job.push(element).unwrap_err().kind(), ErrorKind::Capability);
        assert!(job.is_empty());
    }

    #[test]
    fn test_push_rejects_barcode_wider_than_paper() {
        let pos80 = PrinterCapabilities::pos80();
        let code =
            Barcode::new(&pos80, Symbology::Ean13, "400638133393", 72.0, 10.0, TextPosition::Below)
                .unwrap();
        let element = BarcodeElement::new(code, &pos80).unwrap();

        let pos58 = PrinterCapabilities::pos58();
        let mut job = PrintJob::new(&pos58);
        assert_eq!(job.push(element).unwrap_err().kind(), ErrorKind::Capability);
        assert!(job.is_empty());
    }

    #[test]
    fn test_push_rebuilds_barcode_for_job_printer() {
        let pos80 = PrinterCapabilities::pos80();
        let code =
            Barcode::new(&pos80, Symbology::Ean13, "400638133393", 40.0, 30.0, TextPosition::Below)
                .unwrap();
        let element = BarcodeElement::new(code, &pos80).unwrap();
        assert_eq!(element.command().height, 240);

        let mobile = PrinterCapabilities::mobile180();
        let mut job = PrintJob::new(&mobile).init(false);
        job.push(element).unwrap();

        // 40mm at 180dpi = 283 dots / 95 → 3; 30mm → 213 dots
        let bytes = job.to_bytes().unwrap();
        assert_eq!(&bytes[..9], &[0x1D, 0x48, 2, 0x1D, 0x77, 3, 0x1D, 0x68, 213]);
    }

    #[test]
    fn test_text_takes_printer_encoding() {
        let korean = PrinterCapabilities::new("Korean", 203, 48.0, 12)
            .with_encoding(TextEncoding::euc_kr());
        let mut job = PrintJob::new(&korean).init(false);
        job.push(TextRun::inline("한글")).unwrap();
        // An explicit encoding is kept.
        job.push(TextRun::inline("A").encoding(TextEncoding::cp1252())).unwrap();

        assert_eq!(
            job.to_bytes().unwrap(),
            vec![0x1B, 0x74, 13, 0xC7, 0xD1, 0xB1, 0xDB, 0x1B, 0x74, 16, b'A']
        );
    }

    #[test]
    fn test_first_error_aborts() {
        let caps = caps();
        let mut job = PrintJob::new(&caps).init(false).cut(true);
        job.push(TextRun::new("ok")).unwrap();
        job.push(TextRun::new("✓ nope")).unwrap();
        job.push(TextRun::new("never")).unwrap();

        let mut conn = MemoryConnection::new();
        let err = job.render_to(&mut conn).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert_eq!(conn.writes().len(), 1);
    }
}
