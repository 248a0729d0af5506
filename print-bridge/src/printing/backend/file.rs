//! Last-resort file backend

use std::path::PathBuf;

use async_trait::async_trait;
use pos_printer::PrintError;
use tracing::{info, instrument};

use super::PrintBackend;
use crate::printing::renderer::Receipt;
use crate::printing::types::{PrintMethod, PrintOutcome};

/// Writes the receipt as UTF-8 text to a fixed path, replacing any previous one
pub struct FileFallbackBackend {
    path: PathBuf,
}

impl FileFallbackBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PrintBackend for FileFallbackBackend {
    fn method(&self) -> PrintMethod {
        PrintMethod::FileOutput
    }

    fn name(&self) -> &'static str {
        "file-fallback"
    }

    fn uses_device(&self) -> bool {
        false
    }

    #[instrument(skip(self, receipt), fields(path = %self.path.display()))]
    async fn print(&self, receipt: &Receipt) -> PrintOutcome {
        match tokio::fs::write(&self.path, receipt.to_text()).await {
            Ok(()) => {
                info!("Receipt saved to file");
                PrintOutcome::success(
                    self.method(),
                    format!("Saved to {}", self.path.display()),
                )
            }
            Err(e) => {
                let err = PrintError::Filesystem(format!("{}: {}", self.path.display(), e));
                PrintOutcome::failure(self.method(), err.to_string())
            }
        }
    }
}
