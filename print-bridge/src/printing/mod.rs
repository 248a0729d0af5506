//! Receipt printing
//!
//! - [`ReceiptRenderer`] - fixed-width receipt layout
//! - [`PrintBackend`] - native spool, OS print command and file backends
//! - [`PrintDispatcher`] - ordered fallback across backends
//! - [`PrintService`] - extract, render, dispatch

pub mod backend;
pub mod dispatcher;
pub mod renderer;
pub mod service;
pub mod types;

pub use backend::{
    CutDelivery, DeviceLease, FileFallbackBackend, NativeSpoolBackend, OsCommandBackend, PrintBackend,
};
pub use dispatcher::PrintDispatcher;
pub use renderer::{RECEIPT_WIDTH, Receipt, ReceiptRenderer};
pub use service::PrintService;
pub use types::{PrintMethod, PrintOutcome};
