//! Host print command backend
//!
//! Writes the receipt to a temporary file and hands it to the OS print
//! command. No cut codes are sent; cutting is left to the spooler.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pos_printer::{Charset, PrintCommand, PrintError};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use super::PrintBackend;
use crate::printing::renderer::Receipt;
use crate::printing::types::{PrintMethod, PrintOutcome};

pub struct OsCommandBackend {
    command: PrintCommand,
    printer_name: String,
    charset: Charset,
    temp_dir: Option<PathBuf>,
}

impl OsCommandBackend {
    pub fn new(
        command: PrintCommand,
        printer_name: impl Into<String>,
        charset: Charset,
        temp_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            command,
            printer_name: printer_name.into(),
            charset,
            temp_dir,
        }
    }

    /// Write the encoded receipt to a fresh temp file on the blocking pool
    async fn write_temp_file(&self, receipt: &Receipt) -> Result<NamedTempFile, PrintError> {
        let data = self.charset.encode(&receipt.to_text());
        let temp_dir = self.temp_dir.clone();

        tokio::task::spawn_blocking(move || create_temp_file(temp_dir.as_deref(), &data))
            .await
            .map_err(|e| PrintError::Filesystem(format!("Task join failed: {}", e)))?
    }
}

fn create_temp_file(dir: Option<&Path>, data: &[u8]) -> Result<NamedTempFile, PrintError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("ticket_").suffix(".txt");
    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| PrintError::Filesystem(format!("Create temp file: {}", e)))?;

    file.write_all(data)
        .and_then(|_| file.flush())
        .map_err(|e| PrintError::Filesystem(format!("Write temp file: {}", e)))?;
    Ok(file)
}

#[async_trait]
impl PrintBackend for OsCommandBackend {
    fn method(&self) -> PrintMethod {
        PrintMethod::OsPrint
    }

    fn name(&self) -> &'static str {
        "os-command"
    }

    #[instrument(skip(self, receipt), fields(program = %self.command.program()))]
    async fn print(&self, receipt: &Receipt) -> PrintOutcome {
        // Deleted when dropped, on every return path
        let file = match self.write_temp_file(receipt).await {
            Ok(f) => f,
            Err(e) => return PrintOutcome::failure(self.method(), e.to_string()),
        };
        debug!(path = %file.path().display(), "Temp file written");

        match self.command.run(file.path(), &self.printer_name).await {
            Ok(status) if status.success() => {
                info!("Print command succeeded");
                PrintOutcome::success(
                    self.method(),
                    format!("Sent to '{}' via {}", self.printer_name, self.command.program()),
                )
            }
            Ok(status) => {
                warn!(code = ?status.code, stderr = %status.stderr, "Print command failed");
                let err = PrintError::Process(format!(
                    "{} exited with {:?}: {}",
                    self.command.program(),
                    status.code,
                    status.stderr
                ));
                PrintOutcome::failure(self.method(), err.to_string())
            }
            Err(e) => PrintOutcome::failure(self.method(), e.to_string()),
        }
    }
}
