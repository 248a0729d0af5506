//! Print service
//!
//! Request entry point: extract the order, render the receipt, dispatch it.

use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use super::dispatcher::PrintDispatcher;
use super::renderer::{Receipt, ReceiptRenderer};
use super::types::{PrintMethod, PrintOutcome};
use crate::core::Config;
use crate::order::{Order, OrderItem, extract_order};

pub struct PrintService {
    renderer: ReceiptRenderer,
    dispatcher: PrintDispatcher,
    verbose: bool,
}

impl PrintService {
    pub fn new(renderer: ReceiptRenderer, dispatcher: PrintDispatcher, verbose: bool) -> Self {
        Self {
            renderer,
            dispatcher,
            verbose,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ReceiptRenderer::default(),
            PrintDispatcher::from_config(config),
            config.verbose,
        )
    }

    /// Handle one order body
    ///
    /// A body whose numbers cannot be read is rejected before any backend runs.
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    pub async fn handle_order(&self, body: &[u8]) -> PrintOutcome {
        let order = match extract_order(body) {
            Ok(order) => order,
            Err(e) => {
                warn!(error = %e, "Rejected order");
                return PrintOutcome::failure(
                    PrintMethod::Error,
                    format!("Invalid order data: {}", e),
                );
            }
        };

        info!(
            table = %order.table_number(),
            items = order.items().len(),
            total = %order.total(),
            "Order received"
        );
        self.print_order(&order).await
    }

    /// Print a fixed test ticket through the whole backend chain
    pub async fn print_self_test(&self) -> PrintOutcome {
        let price = Decimal::new(1000, 2);
        let order = Order::new(vec![OrderItem::new(1, "Producto de Prueba", price, price)])
            .with_table_number("MESA-TEST")
            .with_customer_name("PRUEBA");
        self.print_order(&order).await
    }

    async fn print_order(&self, order: &Order) -> PrintOutcome {
        let receipt = self.renderer.render_now(order);
        if self.verbose {
            self.log_preview(&receipt);
        }
        self.dispatcher.dispatch(&receipt).await
    }

    fn log_preview(&self, receipt: &Receipt) {
        let rule = "-".repeat(self.renderer.width());
        debug!(
            "Receipt preview:\n{rule}\n{}\n{rule}",
            receipt.to_text().trim_end_matches('\n')
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printing::backend::PrintBackend;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct CapturingBackend {
        receipts: Mutex<Vec<Receipt>>,
    }

    #[async_trait]
    impl PrintBackend for CapturingBackend {
        fn method(&self) -> PrintMethod {
            PrintMethod::FileOutput
        }

        fn name(&self) -> &'static str {
            "capture"
        }

        async fn print(&self, receipt: &Receipt) -> PrintOutcome {
            self.receipts.lock().unwrap().push(receipt.clone());
            PrintOutcome::success(self.method(), "captured")
        }
    }

    fn service(backend: Arc<CapturingBackend>) -> PrintService {
        let dispatcher = PrintDispatcher::new(vec![backend], Duration::from_secs(5));
        PrintService::new(ReceiptRenderer::default(), dispatcher, true)
    }

    #[tokio::test]
    async fn test_handle_order_renders_and_dispatches() {
        let backend = Arc::new(CapturingBackend::default());
        let body =
            br#"{"tableNumber":"7","items":[{"quantity":2,"productName":"Cola","unitPrice":2.5,"totalPrice":5.0}]}"#;

        let outcome = service(backend.clone()).handle_order(body).await;

        assert!(outcome.success);
        assert_eq!(outcome.method, PrintMethod::FileOutput);
        let receipts = backend.receipts.lock().unwrap();
        assert_eq!(receipts.len(), 1);
        assert!(receipts[0].lines().contains(&"MESA: 7".to_string()));
        assert!(receipts[0].lines().iter().any(|l| l.trim() == "TOTAL: 5.00 EUR"));
    }

    #[tokio::test]
    async fn test_invalid_number_skips_backends() {
        let backend = Arc::new(CapturingBackend::default());
        let body = br#"{"items":[{"quantity":"x"}]}"#;

        let outcome = service(backend.clone()).handle_order(body).await;

        assert!(!outcome.success);
        assert_eq!(outcome.method, PrintMethod::Error);
        assert!(outcome.message.starts_with("Invalid order data"));
        assert!(backend.receipts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_self_test_ticket() {
        let backend = Arc::new(CapturingBackend::default());

        let outcome = service(backend.clone()).print_self_test().await;

        assert!(outcome.success);
        let receipts = backend.receipts.lock().unwrap();
        let lines = receipts[0].lines();
        assert!(lines.contains(&"MESA: MESA-TEST".to_string()));
        assert!(lines.contains(&"CLIENTE: PRUEBA".to_string()));
        assert!(lines.contains(&"1x Producto de Prueba".to_string()));
        assert!(lines.iter().any(|l| l.trim() == "TOTAL: 10.00 EUR"));
    }
}
