//! ESC/POS paper-cut command builder
//!
//! Firmware from different vendors recognizes different subsets of the
//! ESC/POS cut family, so the extended sequence stacks every common cut
//! opcode after the standard one. A printer acts on the first it knows and
//! ignores the rest.
//!
//! The sequence is opaque binary and is appended after the encoded receipt,
//! never interleaved with it.

use std::fmt;
use std::str::FromStr;

use crate::error::PrintError;

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;

/// Which cut sequence to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutMode {
    /// `ESC @` then `GS V 0`
    Minimal,
    /// Minimal sequence followed by the alternative cut opcodes
    #[default]
    Extended,
}

impl CutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CutMode::Minimal => "minimal",
            CutMode::Extended => "extended",
        }
    }
}

impl fmt::Display for CutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CutMode {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(CutMode::Minimal),
            "extended" => Ok(CutMode::Extended),
            other => Err(PrintError::InvalidConfig(format!(
                "Unknown cut mode: {}",
                other
            ))),
        }
    }
}

/// ESC/POS cut command builder
///
/// Builds the control-code suffix sent after a receipt.
#[derive(Debug, Default)]
pub struct CutCommandBuilder {
    buf: Vec<u8>,
}

impl CutCommandBuilder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(32),
        }
    }

    /// Complete cut sequence for a mode
    pub fn sequence(mode: CutMode) -> Vec<u8> {
        let mut b = Self::new();
        b.init().full_cut();
        if mode == CutMode::Extended {
            b.legacy_partial_cut()
                .legacy_full_cut()
                .partial_cut()
                .full_cut_feed(0)
                .partial_cut_feed(0);
        }
        b.build()
    }

    /// Initialize printer (ESC @)
    pub fn init(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, b'@']);
        self
    }

    /// Full cut (GS V 0)
    pub fn full_cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[GS, b'V', 0x00]);
        self
    }

    /// Partial cut (GS V 1)
    pub fn partial_cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[GS, b'V', 0x01]);
        self
    }

    /// Older single-opcode partial cut (ESC i)
    pub fn legacy_partial_cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, b'i']);
        self
    }

    /// Older single-opcode full cut (ESC m)
    pub fn legacy_full_cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, b'm']);
        self
    }

    /// Feed n lines then full cut (GS V A n)
    pub fn full_cut_feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[GS, b'V', b'A', lines]);
        self
    }

    /// Feed n lines then partial cut (GS V B n)
    pub fn partial_cut_feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[GS, b'V', b'B', lines]);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}
