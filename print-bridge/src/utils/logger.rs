//! Logging Infrastructure
//!
//! Console logging with an optional daily rolling file. `RUST_LOG` overrides
//! the mode-derived filter.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::core::Config;

const VERBOSE_FILTER: &str = "print_bridge=debug,pos_printer=debug,tower_http=debug";
const PRODUCTION_FILTER: &str = "print_bridge=info,pos_printer=warn";

/// Default filter directive for the configured mode
pub fn default_filter(config: &Config) -> &'static str {
    if config.is_production() {
        PRODUCTION_FILTER
    } else {
        VERBOSE_FILTER
    }
}

/// Initialize the global subscriber
///
/// File output is enabled only when `log_dir` names an existing directory.
pub fn init_logger(config: &Config) {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(config)))
    };

    let console_layer = fmt::layer()
        .with_target(!config.is_production())
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(filter());

    if let Some(dir) = &config.log_dir
        && dir.is_dir()
    {
        let file_appender = tracing_appender::rolling::daily(dir, "print-bridge");
        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(file_appender)
            .with_filter(filter());

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .init();
        return;
    }

    tracing_subscriber::registry().with(console_layer).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_follows_mode() {
        let mut config = Config::default();
        assert_eq!(default_filter(&config), VERBOSE_FILTER);

        config.verbose = false;
        assert_eq!(default_filter(&config), PRODUCTION_FILTER);
    }

    #[test]
    fn test_filters_parse() {
        assert!(EnvFilter::try_new(VERBOSE_FILTER).is_ok());
        assert!(EnvFilter::try_new(PRODUCTION_FILTER).is_ok());
    }
}
