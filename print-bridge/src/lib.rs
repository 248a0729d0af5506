//! Print Bridge - local HTTP bridge to a thermal receipt printer
//!
//! # Overview
//!
//! Point-of-sale front-ends that cannot reach the printer themselves POST an
//! order to this service on the loopback interface. The order is extracted
//! leniently, laid out as a 48-column receipt and pushed through a chain of
//! backends until one succeeds:
//!
//! 1. raw job through the OS spooler, with ESC/POS cut codes
//! 2. the OS print command on a temporary file
//! 3. a plain file on disk
//!
//! # Module layout
//!
//! ```text
//! print-bridge/src/
//! ├── core/          # config, state, listener, errors
//! ├── order/         # order model and lenient extraction
//! ├── printing/      # renderer, backends, dispatcher, service
//! ├── api/           # HTTP handler
//! └── utils/         # logging
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod order;
pub mod printing;
pub mod utils;

pub use crate::core::{AppState, Config, Server, ServerError};
pub use order::{Order, OrderItem, extract_order};
pub use printing::{PrintDispatcher, PrintMethod, PrintOutcome, PrintService, RECEIPT_WIDTH};
pub use utils::init_logger;

pub fn print_banner(config: &Config) {
    let mode = if config.is_production() {
        "production"
    } else {
        "verbose"
    };
    println!(
        r#"
  ____       _       _     ____       _     _
 |  _ \ _ __(_)_ __ | |_  | __ ) _ __(_) __| | __ _  ___
 | |_) | '__| | '_ \| __| |  _ \| '__| |/ _` |/ _` |/ _ \
 |  __/| |  | | | | | |_  | |_) | |  | | (_| | (_| |  __/
 |_|   |_|  |_|_| |_|\__| |____/|_|  |_|\__,_|\__, |\___|
                                              |___/
"#
    );
    println!("  printer : {}", config.printer_name);
    println!("  width   : {} columns", RECEIPT_WIDTH);
    println!("  cut     : {} ({})", config.cut_mode, config.charset);
    println!("  mode    : {}", mode);
    println!("  listen  : http://{}", config.socket_addr());
    println!();
}
