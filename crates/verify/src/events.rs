//! Lifecycle event tokens and run ordering.
//!
//! The event set is assembled once per run from capability and context
//! flags, then randomly permuted so a persistence defect cannot hide
//! behind (or be manufactured by) a fixed event order.

use crate::device::Capabilities;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// Opaque lifecycle operations the collaborator knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Graceful shutdown
    Gsd,
    /// Ungraceful shutdown
    Ugsd,
    /// Controller reset + reactivate
    CtrlReset,
    /// NVM subsystem reset
    SsReset,
    /// PCIe function-level reset
    FlrReset,
    /// PCIe link reset
    LinkReset,
    /// PCIe hot reset
    HotReset,
    /// PERST# assertion
    Perst,
    /// Get-log-page stress loop (driven by the verifier, not the collaborator)
    GetLogPage,
    /// Firmware update (download + commit + activate)
    Ffu,
    /// NVM format
    Format,
    /// Sanitize; the verifier polls progress to completion
    Sanitize,
}

impl LifecycleEvent {
    /// The wire token for this event.
    pub fn token(&self) -> &'static str {
        match self {
            LifecycleEvent::Gsd => "GSD",
            LifecycleEvent::Ugsd => "UGSD",
            LifecycleEvent::CtrlReset => "CTRLRESET",
            LifecycleEvent::SsReset => "SSRESET",
            LifecycleEvent::FlrReset => "FLRRESET",
            LifecycleEvent::LinkReset => "LINKRESET",
            LifecycleEvent::HotReset => "HOTRESET",
            LifecycleEvent::Perst => "PERST",
            LifecycleEvent::GetLogPage => "GetLogPage",
            LifecycleEvent::Ffu => "FFU",
            LifecycleEvent::Format => "Format",
            LifecycleEvent::Sanitize => "Sanitize",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A firmware revision ending in `E` marks an error-injection build;
/// firmware updates are excluded on those.
pub fn is_error_injection_build(firmware_revision: &str) -> bool {
    firmware_revision.ends_with('E')
}

/// Assemble the event set for one run.
///
/// - SSRESET joins only when the controller supports subsystem reset.
/// - LINKRESET runs only in sync mode.
/// - FFU is excluded on error-injection builds.
/// - Format and Sanitize are excluded when the media is already read-only.
pub fn build_event_list(
    caps: Capabilities,
    firmware_revision: &str,
    media_read_only: bool,
) -> Vec<LifecycleEvent> {
    use LifecycleEvent::*;

    let mut events = vec![
        Gsd, Ugsd, CtrlReset, FlrReset, LinkReset, HotReset, Perst, GetLogPage, Ffu, Format,
        Sanitize,
    ];
    if caps.subsystem_reset {
        events.push(SsReset);
    }
    if !caps.sync_mode {
        events.retain(|e| *e != LinkReset);
    }
    if is_error_injection_build(firmware_revision) {
        events.retain(|e| *e != Ffu);
    }
    if media_read_only {
        events.retain(|e| !matches!(e, Format | Sanitize));
    }
    events
}

/// Permute the event list in place.
pub fn shuffle_events(events: &mut [LifecycleEvent], rng: &mut impl Rng) {
    events.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn caps(subsystem_reset: bool, sync_mode: bool) -> Capabilities {
        Capabilities {
            subsystem_reset,
            sync_mode,
        }
    }

    #[test]
    fn subsystem_reset_joins_only_when_supported() {
        let with = build_event_list(caps(true, true), "FW100", false);
        assert!(with.contains(&LifecycleEvent::SsReset));
        let without = build_event_list(caps(false, true), "FW100", false);
        assert!(!without.contains(&LifecycleEvent::SsReset));
    }

    #[test]
    fn link_reset_requires_sync_mode() {
        let sync = build_event_list(caps(false, true), "FW100", false);
        assert!(sync.contains(&LifecycleEvent::LinkReset));
        let no_sync = build_event_list(caps(false, false), "FW100", false);
        assert!(!no_sync.contains(&LifecycleEvent::LinkReset));
    }

    #[test]
    fn error_injection_builds_drop_ffu() {
        let events = build_event_list(caps(false, false), "FW10E", false);
        assert!(!events.contains(&LifecycleEvent::Ffu));
        assert!(is_error_injection_build("FW10E"));
        assert!(!is_error_injection_build("FW100"));
    }

    #[test]
    fn read_only_media_drops_format_and_sanitize() {
        let events = build_event_list(caps(false, false), "FW100", true);
        assert!(!events.contains(&LifecycleEvent::Format));
        assert!(!events.contains(&LifecycleEvent::Sanitize));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let baseline = build_event_list(caps(true, true), "FW100", false);
        let mut shuffled = baseline.clone();
        let mut rng = StdRng::seed_from_u64(7);
        shuffle_events(&mut shuffled, &mut rng);

        let mut a = baseline.clone();
        let mut b = shuffled.clone();
        a.sort_by_key(|e| e.token());
        b.sort_by_key(|e| e.token());
        assert_eq!(a, b);
    }
}
