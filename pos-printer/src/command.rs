//! Host print command
//!
//! Runs the operating system's print command against a file, leaving
//! layout and cutting to the spooler defaults. The command is a template:
//! `{file}` and `{printer}` are substituted in every argument.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::str::FromStr;

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::{PrintError, PrintResult};

/// Exit status of a finished print command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintCommandStatus {
    pub code: Option<i32>,
    pub stderr: String,
}

impl PrintCommandStatus {
    fn from_output(status: ExitStatus, stderr: &[u8]) -> Self {
        Self {
            code: status.code(),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// OS print command template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintCommand {
    program: String,
    args: Vec<String>,
}

impl PrintCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse a whitespace-separated template such as `lp -d {printer} {file}`
    ///
    /// No shell quoting is understood; every whitespace run splits arguments.
    pub fn parse(template: &str) -> PrintResult<Self> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| PrintError::InvalidConfig("Empty print command".to_string()))?;
        Ok(Self::new(program, parts.collect()))
    }

    /// Default print command for the current platform
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::new(
                "powershell",
                vec![
                    "-NoProfile".to_string(),
                    "-Command".to_string(),
                    "Get-Content -Path '{file}' | Out-Printer -Name '{printer}'".to_string(),
                ],
            )
        } else {
            Self::new(
                "lp",
                vec!["-d".to_string(), "{printer}".to_string(), "{file}".to_string()],
            )
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with placeholders substituted
    pub fn render_args(&self, file: &Path, printer: &str) -> Vec<String> {
        let file = file.to_string_lossy();
        self.args
            .iter()
            .map(|a| a.replace("{file}", &file).replace("{printer}", printer))
            .collect()
    }

    /// Run the command and wait for it to exit
    ///
    /// The child is killed if the returned future is dropped before it
    /// completes, so an outer timeout never leaves an orphaned process.
    #[instrument(skip(self), fields(program = %self.program))]
    pub async fn run(&self, file: &Path, printer: &str) -> PrintResult<PrintCommandStatus> {
        let args = self.render_args(file, printer);
        debug!(?args, "Running print command");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| PrintError::Process(format!("{}: {}", self.program, e)))?;

        Ok(PrintCommandStatus::from_output(output.status, &output.stderr))
    }
}

impl FromStr for PrintCommand {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Default for PrintCommand {
    fn default() -> Self {
        Self::platform_default()
    }
}
