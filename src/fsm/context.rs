//! Shared mutable context threaded through every FSM handler.
//!
//! `PipelineContext` is the single struct that state handlers read from and
//! write to: the sample ring, the processing stage, the pending result and
//! the latched fault.  It is owned by the pipeline service and lent to the
//! FSM by exclusive reference; there is no global state.

use crate::config::{PipelineConfig, SAMPLE_RING_CAPACITY};
use crate::error::FatalError;
use crate::pipeline::{ProcessingResult, SampleRing, Stage};

/// The shared context passed to every state handler function.
pub struct PipelineContext {
    // -- Timing --
    /// Ticks since the last processing pass.
    pub ticks_since_pass: u32,
    /// Completed processing passes.
    pub passes: u64,

    // -- Data --
    /// Samples captured since the last pass.
    pub ring: SampleRing<SAMPLE_RING_CAPACITY>,
    /// Processing stage and its private state (e.g. the toggle level).
    pub stage: Stage,
    /// Result produced by `Processing`, taken by the service in `Output`.
    pub result: Option<ProcessingResult>,

    // -- Configuration --
    pub config: PipelineConfig,

    // -- Faults --
    /// Latched fatal error.  Once set, never cleared.
    pub fault: Option<FatalError>,
}

impl PipelineContext {
    /// Create a new context with the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            ticks_since_pass: 0,
            passes: 0,
            ring: SampleRing::new(),
            stage: Stage::from_config(&config.stage),
            result: None,
            config,
            fault: None,
        }
    }

    /// True when enough ticks elapsed for the next processing pass.
    pub fn pass_due(&self) -> bool {
        self.ticks_since_pass >= self.config.process_every_ticks
    }

    /// Returns `true` if a fatal error has been latched.
    pub fn has_fault(&self) -> bool {
        self.fault.is_some()
    }
}
