//! Port traits: the hexagonal boundary between the pipeline and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Pipeline (domain)
//! ```
//!
//! Driven adapters (GPIO/ADC, console, clock, event sinks) implement these
//! traits.  The [`Pipeline`](super::service::Pipeline) consumes them via
//! generics, so the domain core never touches hardware directly and tests
//! substitute recording mocks.
//!
//! All port errors are typed: callers must handle every variant explicitly.

use embedded_hal::digital::PinState;

use crate::error::{Error, TransientError};
use crate::pipeline::ProcessingResult;

// ───────────────────────────────────────────────────────────────
// Peripheral port (driven adapter: domain ↔ GPIO / ADC)
// ───────────────────────────────────────────────────────────────

/// Direction a GPIO is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Raw peripheral access used by the pipeline.
pub trait PeripheralPort {
    /// Reset `pin` and set its direction.  Called once from `Init`.
    fn configure(&mut self, pin: i32, direction: Direction) -> Result<(), Error>;

    /// Drive a configured output pin.
    fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), TransientError>;

    /// Read one raw sample from an ADC channel.
    fn read_sample(&mut self, channel: u32) -> Result<u16, Error>;
}

// ───────────────────────────────────────────────────────────────
// Output sink (driven adapter: domain → pin / console)
// ───────────────────────────────────────────────────────────────

/// Destination for a processed result.
///
/// Delivery is best effort: a failed emit is reported and logged by the
/// pipeline but never halts sampling.
pub trait OutputSink {
    fn emit(&mut self, result: &ProcessingResult) -> Result<(), TransientError>;
}

// ───────────────────────────────────────────────────────────────
// Console port (driven adapter: domain → serial)
// ───────────────────────────────────────────────────────────────

/// Line-oriented text output (UART0 on the DevKit).
pub trait ConsolePort {
    fn write_line(&mut self, line: &str) -> Result<(), TransientError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.
pub trait ClockPort {
    /// Microseconds since boot.
    fn uptime_us(&self) -> u64;

    /// Milliseconds since boot.
    fn uptime_ms(&self) -> u64 {
        self.uptime_us() / 1_000
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The pipeline emits structured [`PipelineEvent`](super::events::PipelineEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::PipelineEvent);
}
