//! Print outcome types returned to clients

use serde::Serialize;
use std::fmt;

/// How a receipt was (or was not) delivered
///
/// Serialized in kebab-case, e.g. `native-print`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrintMethod {
    /// Raw job through the host print spooler
    NativePrint,
    /// Host print command run against a temporary file
    OsPrint,
    /// Receipt written to the fallback file
    FileOutput,
    /// Request-level failure before any backend ran
    Error,
    /// Configured printer is not installed
    NotFound,
}

impl PrintMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NativePrint => "native-print",
            Self::OsPrint => "os-print",
            Self::FileOutput => "file-output",
            Self::Error => "error",
            Self::NotFound => "not-found",
        }
    }
}

impl fmt::Display for PrintMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one print attempt or of a whole request
///
/// Field order is the wire order: `success`, `message`, `method`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintOutcome {
    pub success: bool,
    pub message: String,
    pub method: PrintMethod,
}

impl PrintOutcome {
    pub fn success(method: PrintMethod, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            method,
        }
    }

    pub fn failure(method: PrintMethod, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            method,
        }
    }

    /// Append a non-fatal warning to the message
    pub fn with_warning(mut self, warning: impl fmt::Display) -> Self {
        self.message = format!("{} (warning: {})", self.message, warning);
        self
    }
}
