//! Print backends
//!
//! Each backend is one way of getting a receipt out of the process, from
//! raw spool jobs down to a plain file. Backends never return errors: every
//! device, process or filesystem failure becomes a failed [`PrintOutcome`].

mod file;
mod native;
mod os_command;

pub use file::FileFallbackBackend;
pub use native::{CutDelivery, NativeSpoolBackend};
pub use os_command::OsCommandBackend;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::renderer::Receipt;
use super::types::{PrintMethod, PrintOutcome};

/// Exclusive hold on the shared print device, released when the last clone
/// drops
pub type DeviceLease = Arc<OwnedMutexGuard<()>>;

#[async_trait]
pub trait PrintBackend: Send + Sync {
    /// Method tag reported on the wire
    fn method(&self) -> PrintMethod;

    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Whether the attempt talks to the shared print device
    ///
    /// Device attempts are serialized across requests.
    fn uses_device(&self) -> bool {
        true
    }

    async fn print(&self, receipt: &Receipt) -> PrintOutcome;

    /// Print while holding the device
    ///
    /// Work that can outlive a cancelled attempt (blocking spooler calls)
    /// must keep a clone of `lease` until it finishes.
    async fn print_on_device(&self, receipt: &Receipt, lease: DeviceLease) -> PrintOutcome {
        let outcome = self.print(receipt).await;
        drop(lease);
        outcome
    }
}
