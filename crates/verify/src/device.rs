//! The external collaborator surface.
//!
//! Everything that touches the device goes through [`DeviceLink`]: buffer
//! fetches, lifecycle event execution, capability queries, and the
//! production-lock completion action. Each operation blocks until the
//! collaborator signals completion — the verifier never has more than one
//! operation in flight. Implementations own their completion/poll
//! contracts (delays, activation sequences, commit-action selection).

use crate::events::LifecycleEvent;
use smartlog_core::{Result, VersionToken};

/// Capability flags queried once per run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Capabilities {
    /// Controller supports NVM subsystem reset
    pub subsystem_reset: bool,
    /// Link-level resets are enabled for this session
    pub sync_mode: bool,
}

/// Progress sentinel meaning no sanitize operation is running.
pub const SANITIZE_DONE: u16 = 0xFFFF;

/// Status code of a successfully completed sanitize operation.
pub const SANITIZE_SUCCESS: u8 = 1;

/// Sanitize progress as reported by the sanitize status page.
#[derive(Debug, Clone, Copy)]
pub struct SanitizeStatus {
    /// Progress word; [`SANITIZE_DONE`] when idle
    pub progress: u16,
    /// Status of the most recent sanitize operation
    pub last_status: u8,
}

impl SanitizeStatus {
    /// Whether no sanitize operation is in flight.
    pub fn is_done(&self) -> bool {
        self.progress == SANITIZE_DONE
    }

    /// Completed fraction in percent while an operation runs.
    pub fn percent(&self) -> u32 {
        u32::from(self.progress) * 100 / u32::from(SANITIZE_DONE)
    }
}

/// Synchronous device collaborator.
pub trait DeviceLink {
    /// Fetch the raw buffer of one log page.
    ///
    /// `retain_async_event` maps to the RAE flag: whether a pending async
    /// event notification survives the read.
    fn fetch_log_page(&mut self, page_id: u16, retain_async_event: bool) -> Result<Vec<u8>>;

    /// Execute one lifecycle event and wait for its completion.
    fn trigger(&mut self, event: LifecycleEvent) -> Result<()>;

    /// Read the sanitize progress/status page.
    fn sanitize_status(&mut self) -> Result<SanitizeStatus>;

    /// Base-spec version the device reports (dotted scheme).
    fn spec_version(&self) -> VersionToken;

    /// Vendor name the device reports.
    fn vendor_name(&self) -> String;

    /// Vendor-tracked spec revision (lettered scheme), when the vendor has one.
    fn vendor_spec_version(&self) -> Option<VersionToken>;

    /// Capability flags for event-list construction.
    fn capabilities(&self) -> Capabilities;

    /// Active firmware revision string (build-flavor marker).
    fn firmware_revision(&self) -> String;

    /// The two externally tracked wear threshold counters (SLC, TLC).
    fn read_wear_thresholds(&mut self) -> Result<(u32, u32)>;

    /// Production-lock completion action, taken once the media goes read-only.
    fn complete_production(&mut self) -> Result<()>;

    /// Write the async event configuration mask.
    fn set_async_event_config(&mut self, mask: u32) -> Result<()>;

    /// Read back the async event configuration mask.
    fn async_event_config(&mut self) -> Result<u32>;
}
