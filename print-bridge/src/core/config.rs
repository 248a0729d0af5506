use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use pos_printer::{Charset, CutMode, PrintCommand};

use crate::cli::Cli;

/// Bridge configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | PRINTER_NAME | POS-80C | target printer name |
/// | HTTP_PORT | 3002 | listen port |
/// | BIND_ADDR | 127.0.0.1 | listen address |
/// | VERBOSE | true | diagnostic output |
/// | PRODUCTION | false | quiet mode, overrides VERBOSE |
/// | RECEIPT_CHARSET | latin1 | latin1 or utf8 |
/// | CUT_MODE | extended | minimal or extended |
/// | SEPARATE_CUT_JOB | false | cut sent as its own job |
/// | PRINT_TIMEOUT_MS | 15000 | per-backend attempt timeout |
/// | PRINT_COMMAND | platform default | `{file}` / `{printer}` template |
/// | PRINT_TEMP_DIR | OS temp dir | temp files of the print command |
/// | FALLBACK_FILE | ticket_debug.txt | last-resort output |
/// | PRINT_SELF_TEST | false | test ticket at start-up |
/// | LOG_DIR | unset | daily rolling log files |
///
/// Flags accept `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`
/// (case-insensitive). Unparsable values fall back to the default.
#[derive(Debug, Clone)]
pub struct Config {
    pub printer_name: String,
    pub http_port: u16,
    pub bind_addr: IpAddr,
    pub verbose: bool,
    pub charset: Charset,
    pub cut_mode: CutMode,
    pub separate_cut_job: bool,
    pub print_timeout: Duration,
    /// `None` uses the platform's print command
    pub print_command: Option<PrintCommand>,
    /// `None` uses the OS temp directory
    pub temp_dir: Option<PathBuf>,
    pub fallback_file: PathBuf,
    pub self_test: bool,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            printer_name: "POS-80C".into(),
            http_port: 3002,
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            verbose: true,
            charset: Charset::Latin1,
            cut_mode: CutMode::Extended,
            separate_cut_job: false,
            print_timeout: Duration::from_millis(15_000),
            print_command: None,
            temp_dir: None,
            fallback_file: PathBuf::from("ticket_debug.txt"),
            self_test: false,
            log_dir: None,
        }
    }
}

impl Config {
    /// Load from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup, unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parse<T: FromStr>(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<T> {
            lookup(key).and_then(|v| v.trim().parse().ok())
        }

        fn flag(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
            match lookup(key)?.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            }
        }

        let d = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let production = flag(&lookup, "PRODUCTION").unwrap_or(false);
        let verbose = flag(&lookup, "VERBOSE").unwrap_or(d.verbose) && !production;

        Self {
            printer_name: non_empty("PRINTER_NAME").unwrap_or(d.printer_name),
            http_port: parse(&lookup, "HTTP_PORT").unwrap_or(d.http_port),
            bind_addr: parse(&lookup, "BIND_ADDR").unwrap_or(d.bind_addr),
            verbose,
            charset: parse(&lookup, "RECEIPT_CHARSET").unwrap_or(d.charset),
            cut_mode: parse(&lookup, "CUT_MODE").unwrap_or(d.cut_mode),
            separate_cut_job: flag(&lookup, "SEPARATE_CUT_JOB").unwrap_or(d.separate_cut_job),
            print_timeout: parse(&lookup, "PRINT_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(d.print_timeout),
            print_command: parse(&lookup, "PRINT_COMMAND"),
            temp_dir: non_empty("PRINT_TEMP_DIR").map(PathBuf::from),
            fallback_file: non_empty("FALLBACK_FILE")
                .map(PathBuf::from)
                .unwrap_or(d.fallback_file),
            self_test: flag(&lookup, "PRINT_SELF_TEST").unwrap_or(d.self_test),
            log_dir: non_empty("LOG_DIR").map(PathBuf::from),
        }
    }

    /// Apply command-line overrides
    pub fn merge_cli(mut self, cli: Cli) -> Self {
        if let Some(name) = cli.printer_name {
            self.printer_name = name;
        }
        if let Some(port) = cli.port {
            self.http_port = port;
        }
        if let Some(bind) = cli.bind {
            self.bind_addr = bind;
        }
        if cli.verbose {
            self.verbose = true;
        }
        if cli.production {
            self.verbose = false;
        }
        if let Some(charset) = cli.charset {
            self.charset = charset;
        }
        if let Some(mode) = cli.cut_mode {
            self.cut_mode = mode;
        }
        if cli.separate_cut_job {
            self.separate_cut_job = true;
        }
        if let Some(ms) = cli.print_timeout_ms {
            self.print_timeout = Duration::from_millis(ms);
        }
        if cli.print_command.is_some() {
            self.print_command = cli.print_command;
        }
        if cli.temp_dir.is_some() {
            self.temp_dir = cli.temp_dir;
        }
        if let Some(path) = cli.fallback_file {
            self.fallback_file = path;
        }
        if cli.self_test {
            self.self_test = true;
        }
        if cli.log_dir.is_some() {
            self.log_dir = cli.log_dir;
        }
        self
    }

    pub fn is_production(&self) -> bool {
        !self.verbose
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));

        assert_eq!(config.printer_name, "POS-80C");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3002");
        assert!(config.verbose);
        assert_eq!(config.charset, Charset::Latin1);
        assert_eq!(config.cut_mode, CutMode::Extended);
        assert_eq!(config.print_timeout, Duration::from_secs(15));
        assert_eq!(config.fallback_file, PathBuf::from("ticket_debug.txt"));
        assert!(config.print_command.is_none());
    }

    #[test]
    fn test_env_values() {
        let config = Config::from_lookup(lookup(&[
            ("PRINTER_NAME", "EPSON TM-T20"),
            ("HTTP_PORT", "4100"),
            ("RECEIPT_CHARSET", "utf8"),
            ("CUT_MODE", "minimal"),
            ("SEPARATE_CUT_JOB", "true"),
            ("PRINT_TIMEOUT_MS", "500"),
            ("PRINT_COMMAND", "lpr -P {printer} {file}"),
        ]));

        assert_eq!(config.printer_name, "EPSON TM-T20");
        assert_eq!(config.http_port, 4100);
        assert_eq!(config.charset, Charset::Utf8);
        assert_eq!(config.cut_mode, CutMode::Minimal);
        assert!(config.separate_cut_job);
        assert_eq!(config.print_timeout, Duration::from_millis(500));
        assert_eq!(config.print_command.unwrap().program(), "lpr");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("HTTP_PORT", "not-a-port"),
            ("CUT_MODE", "sideways"),
            ("PRINTER_NAME", "  "),
        ]));

        assert_eq!(config.http_port, 3002);
        assert_eq!(config.cut_mode, CutMode::Extended);
        assert_eq!(config.printer_name, "POS-80C");
    }

    #[test]
    fn test_production_wins_over_verbose() {
        let config = Config::from_lookup(lookup(&[("VERBOSE", "true"), ("PRODUCTION", "true")]));
        assert!(config.is_production());
    }

    #[test]
    fn test_flag_spellings() {
        let config = Config::from_lookup(lookup(&[
            ("PRODUCTION", "1"),
            ("SEPARATE_CUT_JOB", "yes"),
            ("PRINT_SELF_TEST", "ON"),
        ]));
        assert!(config.is_production());
        assert!(config.separate_cut_job);
        assert!(config.self_test);

        let config = Config::from_lookup(lookup(&[("VERBOSE", "0"), ("PRODUCTION", "no")]));
        assert!(!config.verbose);

        let config = Config::from_lookup(lookup(&[("VERBOSE", "Off")]));
        assert!(!config.verbose);

        let config = Config::from_lookup(lookup(&[("PRODUCTION", "maybe")]));
        assert!(!config.is_production());
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = Config::from_lookup(lookup(&[("HTTP_PORT", "4100"), ("PRINTER_NAME", "A")]));
        let cli = Cli::try_parse_from([
            "print-bridge",
            "--port",
            "5000",
            "--production",
            "--cut-mode",
            "minimal",
            "--print-command",
            "lp -d {printer} {file}",
        ])
        .unwrap();

        let config = env.merge_cli(cli);

        assert_eq!(config.http_port, 5000);
        assert_eq!(config.printer_name, "A");
        assert!(config.is_production());
        assert_eq!(config.cut_mode, CutMode::Minimal);
        assert_eq!(config.print_command.unwrap().program(), "lp");
    }

    #[test]
    fn test_cli_rejects_bad_charset() {
        assert!(Cli::try_parse_from(["print-bridge", "--charset", "ebcdic"]).is_err());
    }
}
