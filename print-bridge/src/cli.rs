use clap::Parser;
use pos_printer::{Charset, CutMode, PrintCommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// Command-line overrides; anything left unset keeps its environment value
#[derive(Parser, Debug, Default)]
#[command(name = "print-bridge")]
#[command(about = "Local HTTP bridge to a thermal receipt printer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Printer name, matched exactly or as a substring (case-insensitive)
    #[arg(long)]
    pub printer_name: Option<String>,

    /// HTTP listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// HTTP listen address
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Force diagnostic output on
    #[arg(long, conflicts_with = "production")]
    pub verbose: bool,

    /// Production mode: quiet console, no receipt dumps
    #[arg(long)]
    pub production: bool,

    /// Receipt byte encoding: latin1 or utf8
    #[arg(long)]
    pub charset: Option<Charset>,

    /// Cut sequence: minimal or extended
    #[arg(long)]
    pub cut_mode: Option<CutMode>,

    /// Send the cut sequence as a separate spool job
    #[arg(long)]
    pub separate_cut_job: bool,

    /// Timeout for each backend attempt, in milliseconds
    #[arg(long)]
    pub print_timeout_ms: Option<u64>,

    /// OS print command template, e.g. "lp -d {printer} {file}"
    #[arg(long)]
    pub print_command: Option<PrintCommand>,

    /// Directory for temporary print files
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,

    /// Last-resort output file
    #[arg(long)]
    pub fallback_file: Option<PathBuf>,

    /// Print a test ticket at start-up
    #[arg(long)]
    pub self_test: bool,

    /// Directory for daily rolling log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}
