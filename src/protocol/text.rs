//! # ESC/POS Text Styling Commands
//!
//! ## Text Styling Overview
//!
//! | Style | Command | Effect |
//! |-------|---------|--------|
//! | Bold | ESC E n | **Emphasized** text |
//! | Underline | ESC - n | Underlined text (1 or 2 dots) |
//! | Size | GS ! n | 1-8x width and height |
//! | Code page | ESC t n | Character table for bytes 0x80-0xFF |
//!
//! ## Text Alignment
//!
//! ```text
//! Left aligned (default)    |LEFT TEXT
//! Center aligned            |  CENTER TEXT
//! Right aligned             |      RIGHT TEXT
//! ```

use super::commands::{ESC, GS};

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// # Select Justification (ESC a n)
///
/// Applies to the start of the next line and to barcodes and images.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC a n |
/// | Hex     | 1B 61 n |
///
/// ## Example
///
/// ```
/// use termica::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// EMPHASIS
// ============================================================================

/// # Bold (ESC E n)
#[inline]
pub fn bold(on: bool) -> Vec<u8> {
    vec![ESC, b'E', on as u8]
}

/// # Underline (ESC - n)
///
/// `n = 0` off, `1` one dot thick, `2` two dots thick.
#[inline]
pub fn underline(on: bool) -> Vec<u8> {
    vec![ESC, b'-', on as u8]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// # Select Character Size (GS ! n)
///
/// Width multiplier in the high nibble, height multiplier in the low
/// nibble, both stored as `mult - 1`.
///
/// ```text
/// n = (width - 1) << 4 | (height - 1)
///
/// size(2, 2) → 0x11   double width and height
/// size(1, 3) → 0x02   triple height only
/// ```
///
/// Multipliers are clamped to 1-8.
pub fn size(width_mult: u8, height_mult: u8) -> Vec<u8> {
    let w = width_mult.clamp(1, 8) - 1;
    let h = height_mult.clamp(1, 8) - 1;
    vec![GS, b'!', (w << 4) | h]
}

/// Normal 1x1 character size
#[inline]
pub fn size_normal() -> Vec<u8> {
    size(1, 1)
}

// ============================================================================
// CODE PAGE
// ============================================================================

/// # Select Character Code Table (ESC t n)
///
/// Chooses how bytes 0x80-0xFF are drawn. The number is printer-specific;
/// see [`crate::encoding::TextEncoding`] for the charset pairing.
#[inline]
pub fn codepage(n: u8) -> Vec<u8> {
    vec![ESC, b't', n]
}

// ============================================================================
// TEXT STYLE BUILDER
// ============================================================================

/// Combined character styling for one text run.
///
/// ## Example
///
/// ```
/// use termica::protocol::text::TextStyle;
///
/// let style = TextStyle::new().bold(true).size(2, 2);
/// assert_eq!(style.to_commands(), vec![0x1B, 0x45, 0x01, 0x1D, 0x21, 0x11]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub bold: bool,
    pub underline: bool,
    pub width_mult: u8,
    pub height_mult: u8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            bold: false,
            underline: false,
            width_mult: 1,
            height_mult: 1,
        }
    }
}

impl TextStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold(mut self, enabled: bool) -> Self {
        self.bold = enabled;
        self
    }

    pub fn underline(mut self, enabled: bool) -> Self {
        self.underline = enabled;
        self
    }

    pub fn size(mut self, width: u8, height: u8) -> Self {
        self.width_mult = width;
        self.height_mult = height;
        self
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Commands that switch this style on. Plain styles emit nothing.
    pub fn to_commands(&self) -> Vec<u8> {
        let mut cmds = Vec::new();
        if self.bold {
            cmds.extend(bold(true));
        }
        if self.underline {
            cmds.extend(underline(true));
        }
        if self.width_mult != 1 || self.height_mult != 1 {
            cmds.extend(size(self.width_mult, self.height_mult));
        }
        cmds
    }

    /// Commands that undo [`Self::to_commands`].
    pub fn reset_commands(&self) -> Vec<u8> {
        let mut cmds = Vec::new();
        if self.bold {
            cmds.extend(bold(false));
        }
        if self.underline {
            cmds.extend(underline(false));
        }
        if self.width_mult != 1 || self.height_mult != 1 {
            cmds.extend(size_normal());
        }
        cmds
    }
}

// ============================================================================
// TESTS
// ============================================================================
