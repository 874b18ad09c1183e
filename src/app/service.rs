//! Pipeline service, the hexagonal core.
//!
//! [`Pipeline`] owns the FSM, fault monitor, and shared context.
//! It exposes a clean, hardware-agnostic API.  All I/O flows through
//! port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  PeripheralPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                     │         Pipeline         │
//!     OutputSink  ◀── │  FSM · Ring · FaultMon   │
//!                     └──────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{Error, FatalError, TransientError};
use crate::fault::FaultMonitor;
use crate::fsm::context::PipelineContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::pipeline::{ProcessingResult, Sample};

use super::events::{PipelineEvent, PipelineStats};
use super::ports::{Direction, EventSink, OutputSink, PeripheralPort};

/// What the caller should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep ticking (and feed the watchdog).
    Continue,
    /// Processing has stopped for good.
    Halted(FatalError),
}

// ───────────────────────────────────────────────────────────────
// Pipeline
// ───────────────────────────────────────────────────────────────

/// The pipeline service orchestrates sampling, processing and output.
pub struct Pipeline {
    fsm: Fsm,
    ctx: PipelineContext,
    monitor: FaultMonitor,
    tick_count: u64,
    output_failures: u32,
    last_result: Option<ProcessingResult>,
}

impl Pipeline {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: PipelineConfig) -> Self {
        let monitor = FaultMonitor::new(&config);
        let ctx = PipelineContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Init);

        Self {
            fsm,
            ctx,
            monitor,
            tick_count: 0,
            output_failures: 0,
            last_result: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run `Init`: configure the output pin, then move to `Sampling`.
    ///
    /// A configuration failure latches `Fault` immediately.
    pub fn start(&mut self, hw: &mut impl PeripheralPort, events: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        events.emit(&PipelineEvent::Started(self.fsm.current_state()));

        if let Err(e) = hw.configure(self.ctx.config.output_pin, Direction::Output) {
            self.enter_fault(init_failure(e), events);
            return;
        }

        self.step_and_report(events);
        info!("Pipeline started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full tick: read sample → fault check → FSM → sinks.
    ///
    /// The `hw` parameter satisfies **both** [`PeripheralPort`] and
    /// [`OutputSink`] (the pin sink). This avoids a double mutable borrow
    /// while keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl PeripheralPort + OutputSink),
        console: &mut impl OutputSink,
        events: &mut impl EventSink,
    ) -> TickOutcome {
        if let Some(fault) = self.ctx.fault {
            return TickOutcome::Halted(fault);
        }

        self.tick_count += 1;
        self.ctx.ticks_since_pass = self.ctx.ticks_since_pass.saturating_add(1);

        // 1. Capture this tick's sample
        match hw.read_sample(self.ctx.config.sample_channel) {
            Ok(value) => {
                self.monitor.record_success();
                if self.ctx.ring.push(Sample::new(value, self.tick_count)) {
                    log::debug!("Ring full, oldest sample overwritten");
                }
            }
            Err(e) => {
                if let Error::Transient(t) = e {
                    events.emit(&PipelineEvent::SampleSkipped(t));
                }
                if let Some(fatal) = self.monitor.record_failure(e) {
                    self.enter_fault(fatal, events);
                    return TickOutcome::Halted(fatal);
                }
            }
        }

        // 2. Run the FSM until it settles back in Sampling (or Fault)
        for _ in 0..StateId::COUNT {
            match self.step_and_report(events) {
                StateId::Output => self.emit_result(hw, console, events),
                StateId::Sampling | StateId::Fault => break,
                StateId::Init | StateId::Processing => {}
            }
        }

        // 3. Periodic telemetry
        let interval = self.ctx.config.telemetry_interval_ticks;
        if interval > 0 && self.tick_count % u64::from(interval) == 0 {
            events.emit(&PipelineEvent::Telemetry(self.stats()));
        }

        match self.ctx.fault {
            Some(fault) => TickOutcome::Halted(fault),
            None => TickOutcome::Continue,
        }
    }

    /// Latch a fatal error and move to `Fault`.  The first error wins.
    pub fn enter_fault(&mut self, fault: FatalError, events: &mut impl EventSink) {
        if self.ctx.fault.is_some() {
            return;
        }
        self.ctx.fault = Some(fault);
        let prev = self.fsm.current_state();
        self.fsm.force_transition(StateId::Fault, &mut self.ctx);
        events.emit(&PipelineEvent::StateChanged {
            from: prev,
            to: StateId::Fault,
        });
        events.emit(&PipelineEvent::FaultEntered(fault));
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current counters.
    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            state: self.fsm.current_state(),
            ticks: self.tick_count,
            passes: self.ctx.passes,
            samples_overwritten: self.ctx.ring.overwritten(),
            read_failures: self.monitor.total_failures(),
            output_failures: self.output_failures,
            last_result: self.last_result,
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Most recent result delivered to the sinks.
    pub fn last_result(&self) -> Option<ProcessingResult> {
        self.last_result
    }

    /// The latched fatal error, if any.
    pub fn fault(&self) -> Option<FatalError> {
        self.ctx.fault
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Step the FSM once and report a state change.  Returns the new state.
    fn step_and_report(&mut self, events: &mut impl EventSink) -> StateId {
        let prev = self.fsm.current_state();
        self.fsm.step(&mut self.ctx);
        let now = self.fsm.current_state();
        if now != prev {
            events.emit(&PipelineEvent::StateChanged { from: prev, to: now });
        }
        now
    }

    /// Deliver the pending result to every sink.  Failures are reported,
    /// never escalated.
    fn emit_result(
        &mut self,
        pin: &mut impl OutputSink,
        console: &mut impl OutputSink,
        events: &mut impl EventSink,
    ) {
        let Some(result) = self.ctx.result else {
            return;
        };
        self.last_result = Some(result);

        let outcomes = [pin.emit(&result), console.emit(&result)];
        for err in outcomes.into_iter().filter_map(Result::err) {
            warn!("Output sink failed: {}", err);
            self.output_failures = self.output_failures.saturating_add(1);
            events.emit(&PipelineEvent::OutputFailed(err));
        }
    }
}

/// Every error while configuring peripherals is fatal.
fn init_failure(err: Error) -> FatalError {
    match err {
        Error::Fatal(f) => f,
        Error::Transient(TransientError::GpioWriteFailed(rc)) => FatalError::PeripheralInitFailed(rc),
        Error::Transient(_) => FatalError::PeripheralInitFailed(-1),
    }
}
