//! The persistence verification engine.
//!
//! A run is a state machine over a tracked attribute set and a randomized
//! event list:
//!
//! 1. Firmware-update cross-check — re-apply a firmware update and require
//!    the two wear threshold counters and every tracked attribute
//!    unchanged. Runs once before the event loop and once after (skipped
//!    entirely on error-injection builds).
//! 2. Control sync (GSD), then baseline capture of the generic page.
//! 3. Per-event cycle — snapshot, execute the event, snapshot again,
//!    compare under the per-attribute policy. Sanitize is polled to its
//!    done sentinel; GetLogPage is a fetch-and-decode stress loop.
//! 4. Termination — when the read-only critical-warning bit has become
//!    set, trigger the production-lock completion action.
//!
//! Every failure is fatal to the run and carries the offending attribute,
//! event, and literal before/after values.

use crate::aer::AerSession;
use crate::device::{DeviceLink, SANITIZE_SUCCESS};
use crate::events::{build_event_list, is_error_injection_build, shuffle_events, LifecycleEvent};
use crate::policy::{AttributeFault, ComparisonPolicy};
use rand::rngs::StdRng;
use rand::SeedableRng;
use smartlog_core::{AttributeValues, Error, Result, Vendor};
use smartlog_decode::{fixed, LogPageDecoder, LogPageInstance};
use smartlog_schema::{ResolveContext, SchemaResolver};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Generic SMART/health page identifier.
pub const GENERIC_SMART_PAGE_ID: u16 = 0x02;

/// Critical-warning bit meaning the media has gone read-only.
pub const READ_ONLY_MEDIA_BIT: u128 = 0x8;

/// Generic SMART attributes tracked by default.
pub const SMART_ATTRIBUTES: [&str; 12] = [
    "AvailableSpare",
    "AvailableSpareThrsld",
    "PercentageUsed",
    "DataUnitsRead",
    "DataUnitsWritten",
    "HostReadCommands",
    "HostWriteCommands",
    "PowerOnHours",
    "MediaDataIntegrity",
    "NumberOfErrorsLogged",
    "CriticalWarning",
    "ControllerBusyTime",
];

/// Facebook page attributes allowed to drift across events (raw media
/// counters and background gauges).
pub const FB_EXCEPTIONS: [&str; 5] = [
    "PhysicalMediaUnitsWrittenTLC",
    "PhysicalMediaUnitsWrittenSLC",
    "PhysicalMediaUnitsRead",
    "%FreeBlocks_User",
    "BackgroundBack-PressureGauge",
];

/// Options for one verification run.
#[derive(Debug, Clone)]
pub struct VerifierOptions {
    /// Descriptor root directory
    pub descriptor_root: PathBuf,
    /// Tracked generic attributes
    pub tracked: Vec<String>,
    /// Seed for the event permutation
    pub seed: u64,
    /// Fetch-loop length of the GetLogPage stress event
    pub get_log_page_iterations: usize,
    /// Drive capacity hint, selects the FB endurance-estimate constant
    pub capacity_gb: Option<u32>,
    /// Assert every fetched buffer matches the schema's declared length
    pub strict_buffer_length: bool,
}

impl VerifierOptions {
    /// Defaults over a descriptor root: the generic SMART attribute set,
    /// a 1000-iteration stress loop, no strict length checking.
    pub fn new(descriptor_root: impl Into<PathBuf>) -> Self {
        Self {
            descriptor_root: descriptor_root.into(),
            tracked: SMART_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
            seed: 0,
            get_log_page_iterations: 1000,
            capacity_gb: None,
            strict_buffer_length: false,
        }
    }
}

/// Outcome verdict of one event cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every tracked attribute satisfied its rule
    Pass,
    /// At least one attribute violated its rule
    Mismatch(Vec<AttributeFault>),
}

/// One event with its before/after snapshots and verdict.
#[derive(Debug, Clone)]
pub struct EventOutcome {
    /// The event that ran
    pub event: LifecycleEvent,
    /// Tracked attributes before the event
    pub before: AttributeValues,
    /// Tracked attributes after the event
    pub after: AttributeValues,
    /// Comparison verdict
    pub verdict: Verdict,
}

/// Result of a completed (or aborted) run.
#[derive(Debug, Clone)]
pub struct VerifyReport {
    /// The shuffled order the events ran in
    pub event_order: Vec<LifecycleEvent>,
    /// Per-event outcomes, in run order
    pub outcomes: Vec<EventOutcome>,
    /// Whether the production-lock completion action was taken
    pub production_done: bool,
}

impl VerifyReport {
    /// One-line human summary.
    pub fn summary(&self) -> String {
        let passed = self
            .outcomes
            .iter()
            .filter(|o| o.verdict == Verdict::Pass)
            .count();
        format!(
            "{} events run, {} passed, production {}",
            self.outcomes.len(),
            passed,
            if self.production_done { "locked" } else { "open" }
        )
    }
}

/// Drives decode cycles interleaved with lifecycle events and diffs the
/// resulting snapshots.
pub struct PersistenceVerifier<'a, D: DeviceLink> {
    device: &'a mut D,
    resolver: SchemaResolver,
    options: VerifierOptions,
    policy: ComparisonPolicy,
    tracked: Vec<String>,
    facebook: bool,
    aer: AerSession,
}

impl<'a, D: DeviceLink> PersistenceVerifier<'a, D> {
    /// Build a verifier session over a device and options.
    ///
    /// On Facebook devices the 0xFB fixed-layout attributes join the
    /// tracked set and its exception list is installed in the policy.
    pub fn new(device: &'a mut D, options: VerifierOptions) -> Self {
        let resolver = SchemaResolver::new(&options.descriptor_root);
        let facebook = matches!(
            Vendor::from_name(&device.vendor_name()),
            Vendor::Facebook
        );
        let mut tracked = options.tracked.clone();
        let mut policy = ComparisonPolicy::new();
        if facebook {
            for field in fixed::fb::FIELDS {
                if !FB_EXCEPTIONS.contains(&field.name)
                    && !tracked.iter().any(|t| t == field.name)
                {
                    tracked.push(field.name.to_string());
                }
            }
            for name in FB_EXCEPTIONS {
                policy.allow(name);
            }
        }
        Self {
            device,
            resolver,
            options,
            policy,
            tracked,
            facebook,
            aer: AerSession::new(),
        }
    }

    /// The session's async event state (single writer: the completion
    /// callback path records into it, helpers verify it).
    pub fn aer(&mut self) -> &mut AerSession {
        &mut self.aer
    }

    /// Run the full verification sequence.
    pub fn run(&mut self) -> Result<VerifyReport> {
        let firmware = self.device.firmware_revision();
        let ei_build = is_error_injection_build(&firmware);

        if !ei_build {
            self.firmware_update_cross_check()?;
        }

        // Control sync before the event loop
        self.device.trigger(LifecycleEvent::Gsd)?;

        let baseline = self.generic_instance(true)?;
        let media_read_only =
            baseline.value("CriticalWarning")? & READ_ONLY_MEDIA_BIT != 0;

        let mut events = build_event_list(self.device.capabilities(), &firmware, media_read_only);
        let mut rng = StdRng::seed_from_u64(self.options.seed);
        shuffle_events(&mut events, &mut rng);
        info!(
            "shuffled event list: {:?}",
            events.iter().map(|e| e.token()).collect::<Vec<_>>()
        );

        let mut report = VerifyReport {
            event_order: events.clone(),
            outcomes: Vec::new(),
            production_done: false,
        };

        for event in events {
            info!("running event {}", event);
            let before = self.snapshot()?;
            self.execute_event(event)?;
            let after = self.snapshot()?;
            self.log_before_after(event.token(), &before, &after);

            // Format and Sanitize legitimately disturb the wear estimate;
            // once either has run, PercentageUsed is allow-listed for the
            // rest of the sequence.
            if matches!(event, LifecycleEvent::Format | LifecycleEvent::Sanitize) {
                self.policy.allow("PercentageUsed");
            }

            let faults = self.policy.compare(&before, &after);
            if let Some(first) = faults.first() {
                let fault = first.clone();
                report.outcomes.push(EventOutcome {
                    event,
                    before,
                    after,
                    verdict: Verdict::Mismatch(faults),
                });
                return Err(Error::AttributeMismatch {
                    attribute: fault.attribute,
                    before: fault.before,
                    after: fault.after,
                    event: event.token().to_string(),
                });
            }
            report.outcomes.push(EventOutcome {
                event,
                before,
                after,
                verdict: Verdict::Pass,
            });
        }

        if !ei_build {
            self.firmware_update_cross_check()?;
        }

        let closing = self.generic_instance(true)?;
        if closing.value("CriticalWarning")? & READ_ONLY_MEDIA_BIT != 0 {
            info!("read-only media bit set; completing production lock");
            self.device.complete_production()?;
            report.production_done = true;
        }

        info!("{}", report.summary());
        Ok(report)
    }

    /// Fetch the generic page and require its critical-warning byte to
    /// equal exactly `expected_bits`.
    pub fn check_critical_warning(&mut self, expected_bits: u128) -> Result<()> {
        let instance = self.generic_instance(true)?;
        let actual = instance.value("CriticalWarning")? & 0xFF;
        if actual != expected_bits {
            return Err(Error::InvalidConstantField {
                page: "SMART",
                field: "CriticalWarning",
                expected: expected_bits,
                actual,
            });
        }
        info!("critical warning byte matches {:#x}", expected_bits);
        Ok(())
    }

    /// Write the async event configuration and require the mask to round-
    /// trip with no outstanding critical-warning bits.
    pub fn verify_event_not_masked(&mut self, mask: u32) -> Result<()> {
        self.device.set_async_event_config(mask)?;
        let flags = self.device.async_event_config()?;
        debug!("warning flags = {:#x}", flags);
        // RAE off: clear any pending notification while reading
        let warning = self.generic_instance(false)?.value("CriticalWarning")?;
        if flags != mask || warning != 0 {
            return Err(Error::Device(format!(
                "async event configuration did not hold: config {:#x} (expected {:#x}), CriticalWarning {}",
                flags, mask, warning
            )));
        }
        info!("async event configuration set, no outstanding SMART events");
        Ok(())
    }

    /// Re-apply a firmware update and require the wear thresholds and all
    /// tracked attributes unchanged across it.
    fn firmware_update_cross_check(&mut self) -> Result<()> {
        let (slc_before, tlc_before) = self.device.read_wear_thresholds()?;
        info!(
            "wear thresholds before firmware update: SLC {}, TLC {}",
            slc_before, tlc_before
        );
        let before = self.snapshot()?;

        self.device.trigger(LifecycleEvent::Ffu)?;

        let (slc_after, tlc_after) = self.device.read_wear_thresholds()?;
        if slc_before != slc_after || tlc_before != tlc_after {
            return Err(Error::Device(format!(
                "wear thresholds changed across firmware update: SLC {} -> {}, TLC {} -> {}",
                slc_before, slc_after, tlc_before, tlc_after
            )));
        }

        let after = self.snapshot()?;
        self.log_before_after("FFU", &before, &after);
        for (name, before_value) in before.iter() {
            let after_value = after.get(name).unwrap_or(0);
            if after_value != before_value {
                return Err(Error::AttributeMismatch {
                    attribute: name.to_string(),
                    before: before_value,
                    after: after_value,
                    event: LifecycleEvent::Ffu.token().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Execute one event, honoring its completion contract.
    fn execute_event(&mut self, event: LifecycleEvent) -> Result<()> {
        match event {
            LifecycleEvent::GetLogPage => {
                for _ in 0..self.options.get_log_page_iterations {
                    self.generic_instance(true)?;
                }
                Ok(())
            }
            LifecycleEvent::Sanitize => {
                self.device.trigger(LifecycleEvent::Sanitize)?;
                loop {
                    let status = self.device.sanitize_status()?;
                    if status.is_done() {
                        if status.last_status != SANITIZE_SUCCESS {
                            return Err(Error::Device(format!(
                                "sanitize finished with status {}, expected {}",
                                status.last_status, SANITIZE_SUCCESS
                            )));
                        }
                        return Ok(());
                    }
                    debug!("sanitize in progress: {}%", status.percent());
                }
            }
            other => self.device.trigger(other),
        }
    }

    fn resolve_context(&self) -> ResolveContext {
        ResolveContext {
            spec_version: self.device.spec_version(),
            device_vendor: self.device.vendor_name(),
            vendor_spec_version: self.device.vendor_spec_version(),
        }
    }

    /// Fetch and decode the generic page.
    fn generic_instance(&mut self, retain_async_event: bool) -> Result<LogPageInstance> {
        let buffer = self
            .device
            .fetch_log_page(GENERIC_SMART_PAGE_ID, retain_async_event)?;
        let ctx = self.resolve_context();
        let schema = Arc::new(self.resolver.resolve(GENERIC_SMART_PAGE_ID, &ctx, Some(&buffer))?);
        if self.options.strict_buffer_length {
            LogPageDecoder::decode_strict(schema, &buffer)
        } else {
            LogPageDecoder::decode(schema, &buffer)
        }
    }

    /// Capture every tracked attribute's current value.
    fn snapshot(&mut self) -> Result<AttributeValues> {
        let generic = self.generic_instance(true)?;
        let fb_values = if self.facebook {
            let buffer = self.device.fetch_log_page(fixed::fb::PAGE_ID, true)?;
            Some(fixed::fb::decode(&buffer, self.options.capacity_gb)?)
        } else {
            None
        };

        let mut snapshot = AttributeValues::with_capacity(self.tracked.len());
        for name in &self.tracked {
            let value = if generic.schema().contains(name) {
                generic.value(name)?
            } else if let Some(fb) = &fb_values {
                fb.require(name)?
            } else {
                return Err(Error::InvalidAttributeRequest {
                    attribute: name.clone(),
                });
            };
            snapshot.set(name, value);
        }
        Ok(snapshot)
    }

    fn log_before_after(&self, event: &str, before: &AttributeValues, after: &AttributeValues) {
        for (name, before_value) in before.iter() {
            let after_value = after.get(name).unwrap_or(0);
            info!(
                "| Log Page Attribute {: ^25} | Before {} = {: ^10} | After {} = {: ^10} |",
                name, event, before_value, event, after_value
            );
        }
    }
}
