//! Per-attribute comparison rules.
//!
//! Rules key on attribute names, not on a generic tolerance model:
//!
//! - `PowerOnHours` may step up by at most one unit; decreases fail.
//! - `ControllerBusyTime` carries a cross-attribute invariant: uptime in
//!   minutes must not exceed the busy-time counter.
//! - `AvailableSpare` may collapse from the near-end-of-life sentinel to
//!   zero; any other change fails.
//! - The four PEC extremum counters may step up by exactly one.
//! - Attributes on the exception allow-list change silently.
//! - Everything else must be bit-for-bit equal.

use smartlog_core::AttributeValues;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Monotonic uptime counter (hours).
pub const UPTIME_ATTR: &str = "PowerOnHours";

/// Busy-time counter (minutes) bounded below by uptime.
pub const BUSY_TIME_ATTR: &str = "ControllerBusyTime";

/// Spare-capacity indicator.
pub const SPARE_ATTR: &str = "AvailableSpare";

/// Near-end-of-life sentinel the spare indicator may collapse from.
pub const SPARE_EOL_SENTINEL: u128 = 4;

/// Endurance extremum counters allowed to step up by exactly one.
pub const PEC_EXTREMES: [&str; 4] = ["MaxPECSLC", "MaxPECTLC", "MinPECSLC", "MinPECTLC"];

/// One attribute whose before/after pair violated its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFault {
    /// Offending attribute
    pub attribute: String,
    /// Value before the event
    pub before: u128,
    /// Value after the event
    pub after: u128,
}

/// Name-keyed comparison rules plus a mutable exception allow-list.
#[derive(Debug, Clone, Default)]
pub struct ComparisonPolicy {
    exceptions: BTreeSet<String>,
}

impl ComparisonPolicy {
    /// Policy with an empty exception list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow an attribute to change silently.
    pub fn allow(&mut self, attribute: impl Into<String>) {
        self.exceptions.insert(attribute.into());
    }

    /// Whether an attribute is on the exception list.
    pub fn is_exempt(&self, attribute: &str) -> bool {
        self.exceptions.contains(attribute)
    }

    /// Compare two snapshots of the same tracked attribute set.
    ///
    /// Returns every attribute whose change violates its rule, in snapshot
    /// order. Attributes present in `before` but absent from `after` (or
    /// vice versa) never occur here: both snapshots are captured from the
    /// same tracked list.
    pub fn compare(&self, before: &AttributeValues, after: &AttributeValues) -> Vec<AttributeFault> {
        let mut faults = Vec::new();

        for (name, before_value) in before.iter() {
            let Some(after_value) = after.get(name) else {
                continue;
            };
            if self.judge(name, before_value, after_value, after) {
                continue;
            }
            faults.push(AttributeFault {
                attribute: name.to_string(),
                before: before_value,
                after: after_value,
            });
        }
        faults
    }

    /// Whether one attribute's change is acceptable.
    fn judge(&self, name: &str, before: u128, after: u128, snapshot: &AttributeValues) -> bool {
        if name == UPTIME_ATTR {
            return after == before || after == before + 1;
        }
        if name == BUSY_TIME_ATTR {
            // Invariant on the after-snapshot: uptime minutes never exceed
            // the busy-time counter.
            let Some(uptime_hours) = snapshot.get(UPTIME_ATTR) else {
                return before == after;
            };
            if uptime_hours == 0 {
                return true;
            }
            let ok = uptime_hours * 60 <= after;
            if !ok {
                warn!(
                    "uptime {} h exceeds busy time {} min",
                    uptime_hours, after
                );
            }
            return ok;
        }
        if name == SPARE_ATTR {
            return after == before || (before == SPARE_EOL_SENTINEL && after == 0);
        }
        if self.is_exempt(name) {
            if before != after {
                info!("{} changed {} -> {} (allow-listed)", name, before, after);
            }
            return true;
        }
        if PEC_EXTREMES.contains(&name) {
            return after == before || after == before + 1;
        }
        before == after
    }
}
