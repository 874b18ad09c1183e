//! Outbound pipeline events.
//!
//! The [`Pipeline`](super::service::Pipeline) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder).

use crate::error::{FatalError, TransientError};
use crate::fsm::StateId;
use crate::pipeline::ProcessingResult;

/// Structured events emitted by the pipeline core.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// The pipeline has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states within a tick.
    StateChanged { from: StateId, to: StateId },

    /// This tick's sample was not captured.
    SampleSkipped(TransientError),

    /// A sink refused a result.
    OutputFailed(TransientError),

    /// A fatal error was latched; processing has stopped.
    FaultEntered(FatalError),

    /// Periodic telemetry snapshot.
    Telemetry(PipelineStats),
}

/// A point-in-time counters snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineStats {
    pub state: StateId,
    pub ticks: u64,
    pub passes: u64,
    pub samples_overwritten: u64,
    pub read_failures: u32,
    pub output_failures: u32,
    pub last_result: Option<ProcessingResult>,
}
