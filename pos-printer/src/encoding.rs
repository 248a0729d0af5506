//! Text encoding utilities for thermal printers
//!
//! Most ESC/POS firmware ships with a single-byte Latin code page active,
//! so receipt text is sent as ISO-8859-1 compatible bytes unless the
//! firmware is known to accept UTF-8. One charset applies to a whole payload.
//!
//! Column widths are counted in characters: every character of the
//! single-byte code page takes exactly one column on the paper.

use std::fmt;
use std::str::FromStr;

use crate::error::PrintError;

/// Byte encoding applied to receipt text before it reaches the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// ISO-8859-1 compatible single-byte encoding
    #[default]
    Latin1,
    /// UTF-8, for firmware with a UTF-8 code page
    Utf8,
}

impl Charset {
    /// Encode text for the device
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Charset::Latin1 => encode_latin1(text),
            Charset::Utf8 => text.as_bytes().to_vec(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Charset::Latin1 => "latin1",
            Charset::Utf8 => "utf8",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Charset {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(Charset::Latin1),
            "utf8" | "utf-8" => Ok(Charset::Utf8),
            other => Err(PrintError::InvalidConfig(format!(
                "Unknown charset: {}",
                other
            ))),
        }
    }
}

/// Encode text as ISO-8859-1 compatible bytes
///
/// Uses the windows-1252 table, which agrees with ISO-8859-1 on every
/// printable character and additionally maps `€`. Characters with no
/// single-byte form become `?` instead of the HTML escapes `encoding_rs`
/// would otherwise produce.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(text);
    if !had_errors {
        return bytes.into_owned();
    }

    let mut result = Vec::with_capacity(text.len());
    let mut scratch = [0u8; 4];
    for c in text.chars() {
        let (encoded, _, unmappable) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut scratch));
        if unmappable {
            result.push(b'?');
        } else {
            result.extend_from_slice(&encoded);
        }
    }
    result
}

/// Number of printed columns a string occupies
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Pad a string with spaces to a column width
///
/// Never truncates: a string already at or beyond `width` is returned as is.
pub fn pad_to_width(s: &str, width: usize, align_right: bool) -> String {
    let current = text_width(s);
    if current >= width {
        return s.to_string();
    }
    let spaces = " ".repeat(width - current);
    if align_right {
        format!("{}{}", spaces, s)
    } else {
        format!("{}{}", s, spaces)
    }
}
