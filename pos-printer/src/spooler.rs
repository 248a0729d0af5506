//! OS print spooler adapters for sending raw ESC/POS data
//!
//! Supports:
//! - Windows driver printers (Win32 spooler, RAW datatype)
//! - CUPS destinations on Unix (`lpstat` / `lp -o raw`)

use crate::error::{PrintError, PrintResult};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Blocking access to the host print spooler
///
/// Implementations block the calling thread; async callers go through
/// [`SpoolPrinter`], which moves the work onto the blocking pool.
pub trait Spooler: Send + Sync {
    /// Names of the installed, physical print devices
    fn list(&self) -> PrintResult<Vec<String>>;

    /// Submit one RAW job to a device
    fn submit(&self, device: &str, data: &[u8], doc_name: &str) -> PrintResult<()>;
}

/// Pick the installed device matching a configured name
///
/// An exact case-insensitive match wins; otherwise the first device whose
/// name contains the wanted name (case-insensitive) is used.
pub fn find_device(devices: &[String], wanted: &str) -> Option<String> {
    let wanted = wanted.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    devices
        .iter()
        .find(|d| d.to_lowercase() == wanted)
        .or_else(|| devices.iter().find(|d| d.to_lowercase().contains(&wanted)))
        .cloned()
}

/// Spooler for the current platform
pub fn system_spooler() -> Arc<dyn Spooler> {
    #[cfg(windows)]
    return Arc::new(WindowsSpooler);

    #[cfg(unix)]
    return Arc::new(CupsSpooler::default());

    #[cfg(not(any(windows, unix)))]
    return Arc::new(UnsupportedSpooler);
}

/// A named device behind a spooler
#[derive(Clone)]
pub struct SpoolPrinter {
    spooler: Arc<dyn Spooler>,
    name: String,
}

impl SpoolPrinter {
    pub fn new(spooler: Arc<dyn Spooler>, name: &str) -> Self {
        Self {
            spooler,
            name: name.to_string(),
        }
    }

    /// Resolve a configured name against the installed devices
    ///
    /// Returns [`PrintError::DeviceNotFound`] when nothing matches.
    #[instrument(skip(spooler))]
    pub async fn discover(spooler: Arc<dyn Spooler>, wanted: &str) -> PrintResult<Self> {
        let lister = spooler.clone();
        let devices = tokio::task::spawn_blocking(move || lister.list())
            .await
            .map_err(|e| PrintError::Spool(format!("Task join failed: {}", e)))??;

        let device = find_device(&devices, wanted)
            .ok_or_else(|| PrintError::DeviceNotFound(wanted.to_string()))?;
        debug!(device = %device, "Print device resolved");
        Ok(Self::new(spooler, &device))
    }

    /// Get the printer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send raw data as a single job
    pub async fn print(&self, data: &[u8], doc_name: &str) -> PrintResult<()> {
        self.print_holding(data, doc_name, ()).await
    }

    /// Send raw data as a single job, keeping `held` alive until the spooler
    /// call returns
    ///
    /// Spooler calls cannot be cancelled. If the returned future is dropped
    /// mid-job, `held` (typically a device lock guard) is released only when
    /// the blocking submission finishes.
    #[instrument(skip(self, data, held), fields(printer = %self.name, data_len = data.len()))]
    pub async fn print_holding<H>(&self, data: &[u8], doc_name: &str, held: H) -> PrintResult<()>
    where
        H: Send + 'static,
    {
        // Spooler calls are synchronous, run in blocking task
        let spooler = self.spooler.clone();
        let name = self.name.clone();
        let data = data.to_vec();
        let doc_name = doc_name.to_string();

        tokio::task::spawn_blocking(move || {
            let result = spooler.submit(&name, &data, &doc_name);
            drop(held);
            result
        })
        .await
            .map_err(|e| PrintError::Spool(format!("Task join failed: {}", e)))??;

        info!("Print job sent successfully");
        Ok(())
    }
}

// ============================================================================
// CUPS (Linux / macOS)
// ============================================================================

/// CUPS command-line spooler
#[cfg(unix)]
#[derive(Debug, Clone)]
pub struct CupsSpooler {
    lpstat: String,
    lp: String,
}

#[cfg(unix)]
impl Default for CupsSpooler {
    fn default() -> Self {
        Self {
            lpstat: "lpstat".to_string(),
            lp: "lp".to_string(),
        }
    }
}

#[cfg(unix)]
impl CupsSpooler {
    /// Use non-default `lpstat` / `lp` binaries
    pub fn with_binaries(lpstat: &str, lp: &str) -> Self {
        Self {
            lpstat: lpstat.to_string(),
            lp: lp.to_string(),
        }
    }
}

#[cfg(unix)]
impl Spooler for CupsSpooler {
    fn list(&self) -> PrintResult<Vec<String>> {
        use std::process::Command;

        let output = Command::new(&self.lpstat)
            .arg("-e")
            .output()
            .map_err(|e| PrintError::Spool(format!("{}: {}", self.lpstat, e)))?;

        if !output.status.success() {
            return Err(PrintError::Spool(format!(
                "{} exited with {}",
                self.lpstat, output.status
            )));
        }

        let devices: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        debug!(count = devices.len(), "CUPS destinations listed");
        Ok(devices)
    }

    fn submit(&self, device: &str, data: &[u8], doc_name: &str) -> PrintResult<()> {
        use std::io::Write;
        use std::process::{Command, Stdio};

        let mut child = Command::new(&self.lp)
            .args(["-d", device, "-o", "raw", "-t", doc_name])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PrintError::Spool(format!("{}: {}", self.lp, e)))?;

        // stdin drops after the write so `lp` sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(data),
            None => Ok(()),
        };

        // Always reap the child, even when the write failed
        let output = child
            .wait_with_output()
            .map_err(|e| PrintError::Spool(format!("{}: {}", self.lp, e)))?;

        if let Err(e) = written {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrintError::Spool(format!(
                "Write to {} failed ({}): {}",
                self.lp,
                output.status,
                if stderr.trim().is_empty() {
                    e.to_string()
                } else {
                    format!("{}; {}", e, stderr.trim())
                }
            )));
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrintError::Spool(format!(
                "{} exited with {}: {}",
                self.lp,
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Win32 spooler
// ============================================================================

/// Windows driver printer spooler
///
/// Uses the Win32 API to send RAW jobs through installed printer drivers.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsSpooler;

#[cfg(windows)]
mod win32 {
    use crate::error::{PrintError, PrintResult};
    use windows::Win32::Graphics::Printing::{ClosePrinter, OpenPrinterW, PRINTER_HANDLE};
    use windows::core::PCWSTR;

    pub(super) fn to_wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    /// Check if a port belongs to a virtual printer (PDF, XPS, OneNote, ...)
    pub(super) fn is_virtual_port(port: &str) -> bool {
        let p = port.to_lowercase();
        p == "file:"
            || p == "portprompt:"
            || p == "xpsport:"
            || p == "nul:"
            || p.starts_with("onenote")
            || p.starts_with("wfsport:")
    }

    /// Open printer handle, closed on drop
    pub(super) struct Handle(pub(super) PRINTER_HANDLE);

    impl Handle {
        pub(super) fn open(name: &str) -> PrintResult<Self> {
            let name_w = to_wide(name);
            let mut handle = PRINTER_HANDLE::default();
            unsafe {
                OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None)
                    .map_err(|_| PrintError::Spool(format!("OpenPrinterW failed: {}", name)))?;
            }
            Ok(Self(handle))
        }
    }

    impl Drop for Handle {
        fn drop(&mut self) {
            unsafe {
                let _ = ClosePrinter(self.0);
            }
        }
    }
}

#[cfg(windows)]
impl Spooler for WindowsSpooler {
    fn list(&self) -> PrintResult<Vec<String>> {
        use windows::Win32::Graphics::Printing::{
            EnumPrintersW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_INFO_5W,
        };
        use windows::core::PWSTR;

        unsafe {
            let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
            let mut needed: u32 = 0;
            let mut returned: u32 = 0;

            let _ = EnumPrintersW(flags, None, 5, None, &mut needed, &mut returned);
            if needed == 0 {
                return Ok(Vec::new());
            }

            let mut buf: Vec<u8> = vec![0; needed as usize];
            EnumPrintersW(
                flags,
                None,
                5,
                Some(buf.as_mut_slice()),
                &mut needed,
                &mut returned,
            )
            .map_err(|_| PrintError::Spool("EnumPrintersW failed".to_string()))?;

            let infos =
                std::slice::from_raw_parts(buf.as_ptr() as *const PRINTER_INFO_5W, returned as usize);

            let devices = infos
                .iter()
                .filter(|info| !info.pPrinterName.is_null())
                .filter_map(|info| {
                    let name = PWSTR(info.pPrinterName.0).to_string().ok()?;
                    let port = if info.pPortName.is_null() {
                        String::new()
                    } else {
                        PWSTR(info.pPortName.0).to_string().unwrap_or_default()
                    };
                    (!win32::is_virtual_port(&port)).then_some(name)
                })
                .collect::<Vec<_>>();

            debug!(count = devices.len(), "Windows printers listed");
            Ok(devices)
        }
    }

    fn submit(&self, device: &str, data: &[u8], doc_name: &str) -> PrintResult<()> {
        use core::ffi::c_void;
        use windows::Win32::Graphics::Printing::{
            DOC_INFO_1W, EndDocPrinter, EndPagePrinter, StartDocPrinterW, StartPagePrinter,
            WritePrinter,
        };
        use windows::core::PWSTR;

        let handle = win32::Handle::open(device)?;
        let doc_name_w = win32::to_wide(doc_name);
        let datatype_w = win32::to_wide("RAW");
        let doc_info = DOC_INFO_1W {
            pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
            pOutputFile: PWSTR::null(),
            pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
        };

        unsafe {
            if StartDocPrinterW(handle.0, 1, &doc_info as *const DOC_INFO_1W) == 0 {
                return Err(PrintError::Spool("StartDocPrinter failed".to_string()));
            }

            if !StartPagePrinter(handle.0).as_bool() {
                let _ = EndDocPrinter(handle.0);
                return Err(PrintError::Spool("StartPagePrinter failed".to_string()));
            }

            let mut written: u32 = 0;
            let ok = WritePrinter(
                handle.0,
                data.as_ptr() as *const c_void,
                data.len() as u32,
                &mut written,
            );

            let _ = EndPagePrinter(handle.0);
            let _ = EndDocPrinter(handle.0);

            if !ok.as_bool() {
                return Err(PrintError::Spool("WritePrinter failed".to_string()));
            }
            if written != data.len() as u32 {
                return Err(PrintError::Spool(format!(
                    "Incomplete write: {} of {} bytes",
                    written,
                    data.len()
                )));
            }
        }

        Ok(())
    }
}

/// Placeholder for platforms without a supported spooler
#[cfg(not(any(windows, unix)))]
struct UnsupportedSpooler;

#[cfg(not(any(windows, unix)))]
impl Spooler for UnsupportedSpooler {
    fn list(&self) -> PrintResult<Vec<String>> {
        Err(PrintError::Spool(
            "Spool printing not supported on this platform".to_string(),
        ))
    }

    fn submit(&self, _device: &str, _data: &[u8], _doc_name: &str) -> PrintResult<()> {
        Err(PrintError::Spool(
            "Spool printing not supported on this platform".to_string(),
        ))
    }
}
