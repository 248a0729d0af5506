//! # pos-printer
//!
//! Thermal receipt printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS paper-cut command sequences
//! - Single-byte (ISO-8859-1 compatible) or UTF-8 payload encoding
//! - Raw jobs through the OS print spooler (Win32 spooler / CUPS)
//! - Plain-text jobs through the host print command (`lp`, `Out-Printer`)
//!
//! Business logic (WHAT to print) stays in the application:
//! - Order extraction and receipt layout → print-bridge
//!
//! ## Example
//!
//! ```ignore
//! use pos_printer::{Charset, CutCommandBuilder, CutMode, SpoolPrinter, system_spooler};
//!
//! let mut data = Charset::Latin1.encode("MESA: 4\n");
//! data.extend_from_slice(&CutCommandBuilder::sequence(CutMode::Minimal));
//!
//! let printer = SpoolPrinter::discover(system_spooler(), "POS-80C").await?;
//! printer.print(&data, "Ticket").await?;
//! ```

mod command;
mod encoding;
mod error;
mod escpos;
mod spooler;

// Re-exports
pub use command::{PrintCommand, PrintCommandStatus};
pub use encoding::{Charset, encode_latin1, pad_to_width, text_width};
pub use error::{PrintError, PrintResult};
pub use escpos::{CutCommandBuilder, CutMode};
pub use spooler::{SpoolPrinter, Spooler, find_device, system_spooler};

#[cfg(unix)]
pub use spooler::CupsSpooler;

#[cfg(windows)]
pub use spooler::WindowsSpooler;
