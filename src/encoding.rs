//! # Text Encoding
//!
//! Thermal printers do not speak UTF-8. Each printer has a set of code pages
//! selected with `ESC t n`, and text must be converted to the matching
//! single- or double-byte charset before it is sent.
//!
//! [`TextEncoding`] pairs an `encoding_rs` charset with the code page number
//! the printer uses for it.
//!
//! | Preset | Charset | `ESC t` page |
//! |--------|---------|--------------|
//! | [`TextEncoding::cp1252`] | windows-1252 | 16 |
//! | [`TextEncoding::euc_kr`] | EUC-KR | 13 |
//!
//! Characters the charset cannot represent are an error, never a silent
//! replacement: a receipt with `?` in place of a customer's name is worse
//! than a failed print.

use std::fmt;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TermicaError};

/// A charset plus the printer code page that renders it.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncodingSpec", into = "EncodingSpec")]
pub struct TextEncoding {
    encoding: &'static Encoding,
    codepage: u8,
}

/// Serialized form: `{ "charset": "EUC-KR", "codepage": 13 }`
#[derive(Serialize, Deserialize)]
struct EncodingSpec {
    charset: String,
    codepage: u8,
}

impl TextEncoding {
    /// Look up a charset by its WHATWG label (e.g. `"cp1252"`, `"euc-kr"`).
    pub fn new(charset: &str, codepage: u8) -> Result<Self> {
        let encoding = Encoding::for_label(charset.trim().as_bytes()).ok_or_else(|| {
            TermicaError::Config(format!("Unknown charset '{}'", charset))
        })?;
        Ok(Self { encoding, codepage })
    }

    /// Western European (windows-1252), code page 16.
    pub fn cp1252() -> Self {
        Self {
            encoding: encoding_rs::WINDOWS_1252,
            codepage: 16,
        }
    }

    /// Korean (EUC-KR), code page 13.
    pub fn euc_kr() -> Self {
        Self {
            encoding: encoding_rs::EUC_KR,
            codepage: 13,
        }
    }

    /// The `ESC t` code page number.
    pub fn codepage(&self) -> u8 {
        self.codepage
    }

    /// Canonical charset name.
    pub fn charset(&self) -> &'static str {
        self.encoding.name()
    }

    /// Encode text, failing on the first character the charset lacks.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            let culprit = text
                .chars()
                .find(|c| self.encoding.encode(c.encode_utf8(&mut [0; 4])).2)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(TermicaError::Encoding(format!(
                "'{}' (U+{:04X}) is not representable in {}",
                culprit,
                culprit as u32,
                self.charset()
            )));
        }
        Ok(bytes.into_owned())
    }

    /// Encoded byte width of a string.
    pub fn width(&self, text: &str) -> Result<usize> {
        self.encode(text).map(|bytes| bytes.len())
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::cp1252()
    }
}

impl fmt::Debug for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextEncoding")
            .field("charset", &self.charset())
            .field("codepage", &self.codepage)
            .finish()
    }
}

impl TryFrom<EncodingSpec> for TextEncoding {
    type Error = TermicaError;

    fn try_from(spec: EncodingSpec) -> Result<Self> {
        Self::new(&spec.charset, spec.codepage)
    }
}

impl From<TextEncoding> for EncodingSpec {
    fn from(enc: TextEncoding) -> Self {
        Self {
            charset: enc.charset().to_string(),
            codepage: enc.codepage,
        }
    }
}
