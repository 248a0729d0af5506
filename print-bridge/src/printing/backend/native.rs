//! Raw spool backend
//!
//! Sends the encoded receipt and the ESC/POS cut sequence straight to the
//! device through the host spooler.

use std::sync::Arc;

use async_trait::async_trait;
use pos_printer::{Charset, CutCommandBuilder, CutMode, PrintError, SpoolPrinter, Spooler};
use tracing::{info, instrument, warn};

use super::{DeviceLease, PrintBackend};
use crate::printing::renderer::Receipt;
use crate::printing::types::{PrintMethod, PrintOutcome};

const TICKET_DOC: &str = "Ticket";
const CUT_DOC: &str = "Cut";

/// How the cut sequence reaches the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutDelivery {
    /// Appended to the receipt job
    #[default]
    SameJob,
    /// Submitted as a short second job; its failure is only a warning
    SeparateJob,
}

pub struct NativeSpoolBackend {
    spooler: Arc<dyn Spooler>,
    printer_name: String,
    charset: Charset,
    cut: Vec<u8>,
    delivery: CutDelivery,
}

impl NativeSpoolBackend {
    pub fn new(
        spooler: Arc<dyn Spooler>,
        printer_name: impl Into<String>,
        charset: Charset,
        cut_mode: CutMode,
        delivery: CutDelivery,
    ) -> Self {
        Self {
            spooler,
            printer_name: printer_name.into(),
            charset,
            cut: CutCommandBuilder::sequence(cut_mode),
            delivery,
        }
    }

    /// Submit a job, holding `lease` (if any) until the spooler returns
    async fn submit(
        printer: &SpoolPrinter,
        data: &[u8],
        doc_name: &str,
        lease: Option<&DeviceLease>,
    ) -> Result<(), PrintError> {
        match lease {
            Some(lease) => printer.print_holding(data, doc_name, lease.clone()).await,
            None => printer.print(data, doc_name).await,
        }
    }

    async fn spool(&self, receipt: &Receipt, lease: Option<DeviceLease>) -> PrintOutcome {
        let printer = match SpoolPrinter::discover(self.spooler.clone(), &self.printer_name).await
        {
            Ok(p) => p,
            Err(PrintError::DeviceNotFound(name)) => {
                warn!("Printer not installed");
                return PrintOutcome::failure(
                    PrintMethod::NotFound,
                    format!("Printer '{}' not found", name),
                );
            }
            Err(e) => return PrintOutcome::failure(self.method(), e.to_string()),
        };

        let mut payload = self.charset.encode(&receipt.to_text());
        if self.delivery == CutDelivery::SameJob {
            payload.extend_from_slice(&self.cut);
        }

        if let Err(e) = Self::submit(&printer, &payload, TICKET_DOC, lease.as_ref()).await {
            return PrintOutcome::failure(self.method(), e.to_string());
        }

        info!(device = %printer.name(), bytes = payload.len(), charset = %self.charset, "Receipt spooled");
        let outcome = PrintOutcome::success(
            self.method(),
            format!("Printed on '{}'", printer.name()),
        );

        if self.delivery == CutDelivery::SeparateJob {
            if let Err(e) = Self::submit(&printer, &self.cut, CUT_DOC, lease.as_ref()).await {
                warn!(error = %e, "Cut job failed");
                return outcome.with_warning(format!("cut job failed: {}", e));
            }
        }
        outcome
    }
}

#[async_trait]
impl PrintBackend for NativeSpoolBackend {
    fn method(&self) -> PrintMethod {
        PrintMethod::NativePrint
    }

    fn name(&self) -> &'static str {
        "native-spool"
    }

    #[instrument(skip(self, receipt), fields(printer = %self.printer_name))]
    async fn print(&self, receipt: &Receipt) -> PrintOutcome {
        self.spool(receipt, None).await
    }

    #[instrument(skip(self, receipt, lease), fields(printer = %self.printer_name))]
    async fn print_on_device(&self, receipt: &Receipt, lease: DeviceLease) -> PrintOutcome {
        self.spool(receipt, Some(lease)).await
    }
}
