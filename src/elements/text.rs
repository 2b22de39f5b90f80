//! # Text Runs
//!
//! A run of text in one style. Rendered as:
//!
//! ```text
//! ESC t n       code page of the run's encoding
//! style on      ESC E / ESC - / GS ! as needed
//! bytes         text encoded with the run's charset
//! style off
//! LF            unless the run is inline
//! ```

use super::PrintElement;
use crate::encoding::TextEncoding;
use crate::error::{Result, TermicaError};
use crate::protocol::commands::LF;
use crate::protocol::text::{self, Alignment, TextStyle};
use crate::transport::Connection;

/// Styled text.
///
/// ## Example
///
/// ```
/// use termica::elements::{PrintElement, TextRun};
///
/// let title = TextRun::new("SALE").bold().size(2, 1)?.center();
/// assert_eq!(title.length()?, 8); // 4 characters at double width
/// # Ok::<(), termica::TermicaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TextRun {
    content: String,
    /// `None` until set, or until a job applies its printer's charset.
    encoding: Option<TextEncoding>,
    style: TextStyle,
    alignment: Alignment,
    newline: bool,
}

impl TextRun {
    /// A left-aligned line in the printer's encoding.
    ///
    /// Outside a job the run falls back to cp1252.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            encoding: None,
            style: TextStyle::default(),
            alignment: Alignment::Left,
            newline: true,
        }
    }

    /// Text with no trailing line feed.
    pub fn inline(content: impl Into<String>) -> Self {
        Self {
            newline: false,
            ..Self::new(content)
        }
    }

    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Set the encoding unless one was chosen explicitly.
    pub(crate) fn or_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding.get_or_insert(encoding);
        self
    }

    pub fn bold(mut self) -> Self {
        self.style = self.style.bold(true);
        self
    }

    pub fn underline(mut self) -> Self {
        self.style = self.style.underline(true);
        self
    }

    /// Character size multipliers, 1-8 each.
    pub fn size(mut self, width: u8, height: u8) -> Result<Self> {
        for (name, mult) in [("width", width), ("height", height)] {
            if !(1..=8).contains(&mult) {
                return Err(TermicaError::Format(format!(
                    "text {} multiplier must be 1-8, got {}",
                    name, mult
                )));
            }
        }
        self.style = self.style.size(width, height);
        Ok(self)
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

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// The charset this run renders with.
    pub fn text_encoding(&self) -> TextEncoding {
        self.encoding.unwrap_or_default()
    }
}

impl PrintElement for TextRun {
    fn length(&self) -> Result<usize> {
        let width = self.text_encoding().width(&self.content)?;
        Ok(width * self.style.width_mult as usize)
    }

    fn render_to(&self, conn: &mut dyn Connection) -> Result<()> {
        let encoding = self.text_encoding();
        let encoded = encoding.encode(&self.content)?;

        let mut out = text::codepage(encoding.codepage());
        out.extend(self.style.to_commands());
        out.extend(encoded);
        out.extend(self.style.reset_commands());
        if self.newline {
            out.push(LF);
        }
        conn.write_all(&out)
    }
}
