//! Unified error types for the SynapSys firmware.
//!
//! Every fallible operation reports one of two severities:
//!
//! - [`TransientError`]: peripheral not ready, a glitched sample read, a
//!   dropped console line.  Logged and skipped; the loop keeps sampling.
//! - [`FatalError`]: scheduler or hardware state that cannot be recovered
//!   in-process.  The pipeline latches `Fault` and waits for the watchdog.
//!
//! All variants are `Copy` so they can be passed through the pipeline
//! context and event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible peripheral operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Recoverable: log, skip, continue.
    Transient(TransientError),
    /// Unrecoverable: enter `Fault`.
    Fatal(FatalError),
}

impl Error {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient(e) => write!(f, "transient: {e}"),
            Self::Fatal(e) => write!(f, "fatal: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transient errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientError {
    /// The peripheral has not finished initialising or is busy.
    PeripheralNotReady,
    /// A sample read timed out or returned garbage.
    SampleReadGlitch,
    /// Driving an output pin failed (ESP-IDF error code).
    GpioWriteFailed(i32),
    /// A console line did not fit the fixed line buffer.
    ConsoleOverflow,
    /// The console stream rejected a write.
    ConsoleWriteFailed,
}

impl fmt::Display for TransientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeripheralNotReady => write!(f, "peripheral not ready"),
            Self::SampleReadGlitch => write!(f, "sample read glitch"),
            Self::GpioWriteFailed(rc) => write!(f, "GPIO write failed (rc={rc})"),
            Self::ConsoleOverflow => write!(f, "console line overflow"),
            Self::ConsoleWriteFailed => write!(f, "console write failed"),
        }
    }
}

impl From<TransientError> for Error {
    fn from(e: TransientError) -> Self {
        Self::Transient(e)
    }
}

// ---------------------------------------------------------------------------
// Fatal errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalError {
    /// The task woke before its delay elapsed: the scheduler did not yield.
    SchedulerYieldFailed,
    /// A peripheral could not be configured at startup (ESP-IDF error code).
    PeripheralInitFailed(i32),
    /// A peripheral reported an unrecoverable state (ESP-IDF error code).
    HardwareFault(i32),
    /// Sample reads kept failing past the escalation threshold.
    SensorUnresponsive,
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchedulerYieldFailed => write!(f, "scheduler did not yield"),
            Self::PeripheralInitFailed(rc) => write!(f, "peripheral init failed (rc={rc})"),
            Self::HardwareFault(rc) => write!(f, "hardware fault (rc={rc})"),
            Self::SensorUnresponsive => write!(f, "sensor unresponsive"),
        }
    }
}

impl From<FatalError> for Error {
    fn from(e: FatalError) -> Self {
        Self::Fatal(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating [`PipelineConfig`](crate::config::PipelineConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The config text could not be parsed.
    Parse,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "config parse error"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
