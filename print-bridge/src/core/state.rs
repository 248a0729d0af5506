use std::sync::Arc;

use crate::core::Config;
use crate::printing::PrintService;

/// Shared request state
///
/// Cloned per request; everything inside is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub print_service: Arc<PrintService>,
}

impl AppState {
    /// Build the state with the standard backend chain
    pub fn new(config: Config) -> Self {
        let print_service = PrintService::from_config(&config);
        Self::with_service(config, print_service)
    }

    /// Build the state around a custom print service
    pub fn with_service(config: Config, print_service: PrintService) -> Self {
        Self {
            config: Arc::new(config),
            print_service: Arc::new(print_service),
        }
    }
}
