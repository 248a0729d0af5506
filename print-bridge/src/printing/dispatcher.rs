//! Backend fallback chain
//!
//! Tries each backend in order until one succeeds. Device attempts from
//! concurrent requests are serialized so their bytes never interleave on the
//! printer, and each attempt is bounded by a timeout.

use std::sync::Arc;
use std::time::Duration;

use pos_printer::{PrintError, PrintCommand, system_spooler};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::backend::{
    CutDelivery, FileFallbackBackend, NativeSpoolBackend, OsCommandBackend, PrintBackend,
};
use super::renderer::Receipt;
use super::types::{PrintMethod, PrintOutcome};
use crate::core::Config;

pub struct PrintDispatcher {
    backends: Vec<Arc<dyn PrintBackend>>,
    device_lock: Arc<Mutex<()>>,
    attempt_timeout: Duration,
}

impl PrintDispatcher {
    pub fn new(backends: Vec<Arc<dyn PrintBackend>>, attempt_timeout: Duration) -> Self {
        Self {
            backends,
            device_lock: Arc::new(Mutex::new(())),
            attempt_timeout,
        }
    }

    /// Standard chain: native spool, OS print command, file
    pub fn from_config(config: &Config) -> Self {
        let delivery = if config.separate_cut_job {
            CutDelivery::SeparateJob
        } else {
            CutDelivery::SameJob
        };
        let command = config
            .print_command
            .clone()
            .unwrap_or_else(PrintCommand::platform_default);

        let backends: Vec<Arc<dyn PrintBackend>> = vec![
            Arc::new(NativeSpoolBackend::new(
                system_spooler(),
                config.printer_name.clone(),
                config.charset,
                config.cut_mode,
                delivery,
            )),
            Arc::new(OsCommandBackend::new(
                command,
                config.printer_name.clone(),
                config.charset,
                config.temp_dir.clone(),
            )),
            Arc::new(FileFallbackBackend::new(config.fallback_file.clone())),
        ];

        Self::new(backends, config.print_timeout)
    }

    /// Print through the first backend that succeeds
    ///
    /// Returns the last failure when every backend fails.
    #[instrument(skip(self, receipt), fields(backends = self.backends.len()))]
    pub async fn dispatch(&self, receipt: &Receipt) -> PrintOutcome {
        let mut last_failure = None;

        for backend in &self.backends {
            let outcome = self.attempt(backend.as_ref(), receipt).await;
            if outcome.success {
                info!(method = %outcome.method, "Print succeeded");
                return outcome;
            }
            warn!(
                backend = backend.name(),
                error = %outcome.message,
                "Backend failed, trying next"
            );
            last_failure = Some(outcome);
        }

        last_failure.unwrap_or_else(|| {
            PrintOutcome::failure(PrintMethod::Error, "No print backend configured")
        })
    }

    async fn attempt(&self, backend: &dyn PrintBackend, receipt: &Receipt) -> PrintOutcome {
        // A timed-out spool job keeps its lease until the spooler returns
        let lease = if backend.uses_device() {
            Some(Arc::new(self.device_lock.clone().lock_owned().await))
        } else {
            None
        };

        let work = async move {
            match lease {
                Some(lease) => backend.print_on_device(receipt, lease).await,
                None => backend.print(receipt).await,
            }
        };

        match tokio::time::timeout(self.attempt_timeout, work).await {
            Ok(outcome) => outcome,
            Err(_) => {
                let err = PrintError::Timeout(format!(
                    "{} did not finish within {} ms",
                    backend.name(),
                    self.attempt_timeout.as_millis()
                ));
                PrintOutcome::failure(backend.method(), err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Order;
    use crate::printing::renderer::ReceiptRenderer;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubBackend {
        method: PrintMethod,
        succeed: bool,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl StubBackend {
        fn new(method: PrintMethod, succeed: bool) -> Arc<Self> {
            Arc::new(Self {
                method,
                succeed,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(method: PrintMethod, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                method,
                succeed: true,
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PrintBackend for StubBackend {
        fn method(&self) -> PrintMethod {
            self.method
        }

        fn name(&self) -> &'static str {
            "stub"
        }

        async fn print(&self, _receipt: &Receipt) -> PrintOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.succeed {
                PrintOutcome::success(self.method, "ok")
            } else {
                PrintOutcome::failure(self.method, format!("{} failed", self.method))
            }
        }
    }

    fn receipt() -> Receipt {
        ReceiptRenderer::default().render_now(&Order::new(vec![]))
    }

    fn dispatcher(backends: Vec<Arc<dyn PrintBackend>>) -> PrintDispatcher {
        PrintDispatcher::new(backends, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_first_success_stops_chain() {
        let native = StubBackend::new(PrintMethod::NativePrint, true);
        let os = StubBackend::new(PrintMethod::OsPrint, true);

        let outcome = dispatcher(vec![native.clone(), os.clone()])
            .dispatch(&receipt())
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.method, PrintMethod::NativePrint);
        assert_eq!(os.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_through_to_next() {
        let native = StubBackend::new(PrintMethod::NotFound, false);
        let os = StubBackend::new(PrintMethod::OsPrint, false);
        let file = StubBackend::new(PrintMethod::FileOutput, true);

        let outcome = dispatcher(vec![native.clone(), os.clone(), file])
            .dispatch(&receipt())
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.method, PrintMethod::FileOutput);
        assert_eq!(native.calls.load(Ordering::SeqCst), 1);
        assert_eq!(os.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_fail_returns_last_failure() {
        let outcome = dispatcher(vec![
            StubBackend::new(PrintMethod::NativePrint, false),
            StubBackend::new(PrintMethod::OsPrint, false),
            StubBackend::new(PrintMethod::FileOutput, false),
        ])
        .dispatch(&receipt())
        .await;

        assert!(!outcome.success);
        assert_eq!(outcome.method, PrintMethod::FileOutput);
        assert_eq!(outcome.message, "file-output failed");
    }

    #[tokio::test]
    async fn test_empty_chain_is_error() {
        let outcome = dispatcher(vec![]).dispatch(&receipt()).await;

        assert!(!outcome.success);
        assert_eq!(outcome.method, PrintMethod::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_moves_to_next_backend() {
        let hung = StubBackend::slow(PrintMethod::NativePrint, Duration::from_secs(60));
        let file = StubBackend::new(PrintMethod::FileOutput, true);
        let dispatcher = PrintDispatcher::new(vec![hung, file], Duration::from_millis(100));

        let outcome = dispatcher.dispatch(&receipt()).await;

        assert!(outcome.success);
        assert_eq!(outcome.method, PrintMethod::FileOutput);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_reported_as_failure() {
        let hung = StubBackend::slow(PrintMethod::OsPrint, Duration::from_secs(60));
        let dispatcher = PrintDispatcher::new(vec![hung], Duration::from_millis(100));

        let outcome = dispatcher.dispatch(&receipt()).await;

        assert!(!outcome.success);
        assert_eq!(outcome.method, PrintMethod::OsPrint);
        assert!(outcome.message.starts_with("Timeout"));
    }
}
