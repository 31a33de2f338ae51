//! Async event report (AER) session state.
//!
//! The completion callback is the single writer: it records each
//! notification's DWORD0 and bumps the counter. Readers only inspect the
//! state after the triggering command's completion has been awaited, so no
//! locking is involved — the session is a plain struct passed by reference
//! to whichever component issues the command and whichever later verifies
//! the notification. A zero counter means no notification arrived; the
//! verification helper fails explicitly rather than blocking.

use smartlog_core::{Error, Result};

/// SMART/health event type code carried in DWORD0 bits 0..2.
const EVENT_TYPE_SMART: u32 = 0x1;

/// Log page associated with SMART health notifications.
const SMART_LOG_PAGE_ID: u32 = 0x2;

/// SMART events a notification can announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartEventKind {
    /// Available spare fell below its threshold
    AvailableSpare,
    /// Composite temperature crossed a threshold
    TemperatureThreshold,
    /// NVM subsystem reliability degraded
    Reliability,
    /// Percentage-used crossed a threshold
    PercentageUsed,
}

impl SmartEventKind {
    /// Expected "asynchronous event information" code for this kind.
    pub fn info_code(&self) -> u32 {
        match self {
            SmartEventKind::AvailableSpare => 0x0,
            SmartEventKind::TemperatureThreshold => 0x1,
            SmartEventKind::Reliability => 0x2,
            SmartEventKind::PercentageUsed => 0x5,
        }
    }

    /// Event name for failure messages.
    pub fn name(&self) -> &'static str {
        match self {
            SmartEventKind::AvailableSpare => "AvailableSpare",
            SmartEventKind::TemperatureThreshold => "TemperatureThreshold",
            SmartEventKind::Reliability => "Reliability",
            SmartEventKind::PercentageUsed => "PercentageUsed",
        }
    }
}

/// Per-session async event state. Constructed once per verification
/// session; single writer ([`AerSession::record`]).
#[derive(Debug, Default)]
pub struct AerSession {
    counter: u32,
    last_status: Option<u32>,
}

impl AerSession {
    /// Fresh session with no notifications.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one notification payload (the callback path).
    pub fn record(&mut self, dword0: u32) {
        self.last_status = Some(dword0);
        self.counter += 1;
    }

    /// Notifications recorded so far.
    pub fn count(&self) -> u32 {
        self.counter
    }

    /// Most recent notification payload.
    pub fn last_status(&self) -> Option<u32> {
        self.last_status
    }

    /// Verify the most recent notification announces `kind`.
    ///
    /// Fails [`Error::AsyncEventMissing`] when no notification arrived at
    /// all, and [`Error::AsyncEventMismatch`] when any DWORD0 field
    /// (event type, event information, associated log page) differs from
    /// the expected SMART event.
    pub fn verify(&self, kind: SmartEventKind) -> Result<()> {
        if self.counter == 0 {
            return Err(Error::AsyncEventMissing {
                event: kind.name().to_string(),
            });
        }
        let dword0 = self.last_status.unwrap_or(0);

        let checks = [
            ("event type", dword0 & 0x7, EVENT_TYPE_SMART),
            ("event information", (dword0 >> 8) & 0xFF, kind.info_code()),
            ("log page", (dword0 >> 16) & 0xFF, SMART_LOG_PAGE_ID),
        ];
        for (field, actual, expected) in checks {
            if actual != expected {
                return Err(Error::AsyncEventMismatch {
                    event: kind.name().to_string(),
                    field,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dword0(kind: SmartEventKind) -> u32 {
        EVENT_TYPE_SMART | (kind.info_code() << 8) | (SMART_LOG_PAGE_ID << 16)
    }

    #[test]
    fn zero_counter_fails_explicitly() {
        let session = AerSession::new();
        let err = session.verify(SmartEventKind::AvailableSpare).unwrap_err();
        assert!(matches!(err, Error::AsyncEventMissing { .. }));
    }

    #[test]
    fn matching_notification_verifies() {
        let mut session = AerSession::new();
        session.record(dword0(SmartEventKind::TemperatureThreshold));
        assert_eq!(session.count(), 1);
        session.verify(SmartEventKind::TemperatureThreshold).unwrap();
    }

    #[test]
    fn wrong_event_information_is_reported_with_both_values() {
        let mut session = AerSession::new();
        session.record(dword0(SmartEventKind::Reliability));
        let err = session.verify(SmartEventKind::AvailableSpare).unwrap_err();
        assert!(matches!(
            err,
            Error::AsyncEventMismatch {
                field: "event information",
                expected: 0x0,
                actual: 0x2,
                ..
            }
        ));
    }

    #[test]
    fn wrong_log_page_is_rejected() {
        let mut session = AerSession::new();
        session.record(EVENT_TYPE_SMART | (0x7 << 16));
        let err = session.verify(SmartEventKind::AvailableSpare).unwrap_err();
        assert!(matches!(
            err,
            Error::AsyncEventMismatch {
                field: "log page",
                ..
            }
        ));
    }

    #[test]
    fn latest_notification_wins() {
        let mut session = AerSession::new();
        session.record(dword0(SmartEventKind::AvailableSpare));
        session.record(dword0(SmartEventKind::PercentageUsed));
        assert_eq!(session.count(), 2);
        session.verify(SmartEventKind::PercentageUsed).unwrap();
        assert!(session.verify(SmartEventKind::AvailableSpare).is_err());
    }
}
