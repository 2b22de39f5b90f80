//! Barcode element: a validated barcode plus its prebuilt command.

use super::PrintElement;
use crate::barcode::{Barcode, BarcodeCommand, BarcodeCommandBuilder};
use crate::error::Result;
use crate::printer::PrinterCapabilities;
use crate::protocol::{self, text::Alignment};
use crate::transport::Connection;

/// A barcode ready to print.
///
/// The command is built (and capability-checked) when the element is
/// created, so rendering can only fail on the connection.
///
/// ## Example
///
/// ```
/// use termica::barcode::{Barcode, Symbology, TextPosition};
/// use termica::elements::{BarcodeElement, PrintElement};
/// use termica::printer::PrinterCapabilities;
///
/// let caps = PrinterCapabilities::pos58();
/// let code = Barcode::new(&caps, Symbology::Ean13, "400638133393", 40.0, 12.0, TextPosition::Below)?;
/// let element = BarcodeElement::new(code, &caps)?.center();
///
/// assert_eq!(element.length()?, 13);
/// # Ok::<(), termica::TermicaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BarcodeElement {
    barcode: Barcode,
    command: BarcodeCommand,
    alignment: Alignment,
}

impl BarcodeElement {
    pub fn new(barcode: Barcode, caps: &PrinterCapabilities) -> Result<Self> {
        let command = BarcodeCommandBuilder::new(caps).build(&barcode)?;
        Ok(Self {
            barcode,
            command,
            alignment: Alignment::Left,
        })
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn center(self) -> Self {
        self.align(Alignment::Center)
    }

    pub fn right(self) -> Self {
        self.align(Alignment::Right)
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn barcode(&self) -> &Barcode {
        &self.barcode
    }

    pub fn command(&self) -> &BarcodeCommand {
        &self.command
    }

    /// Rebuild the command for another printer.
    pub(crate) fn rebuild(mut self, caps: &PrinterCapabilities) -> Result<Self> {
        self.command = BarcodeCommandBuilder::new(caps).build(&self.barcode)?;
        Ok(self)
    }
}

impl PrintElement for BarcodeElement {
    fn length(&self) -> Result<usize> {
        Ok(self.barcode.len())
    }

    fn render_to(&self, conn: &mut dyn Connection) -> Result<()> {
        conn.write_all(&protocol::barcode::encode(&self.command))
    }
}
