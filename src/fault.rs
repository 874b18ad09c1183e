//! Fault monitor.
//!
//! Runs **every tick before the FSM** and decides whether a transient
//! sampling error has become a fatal one.
//!
//! ## Escalation
//!
//! 1. A sample read fails with a transient error: the tick is skipped and
//!    the consecutive-failure counter increments.
//! 2. A successful read resets the counter.
//! 3. When the counter reaches `max_consecutive_read_failures`, the
//!    monitor reports [`FatalError::SensorUnresponsive`] and latches it.
//!
//! A fatal read error (the driver itself reporting an unrecoverable state)
//! escalates immediately.  Once latched, the monitor never clears.

use crate::config::PipelineConfig;
use crate::error::{Error, FatalError};
use log::{error, info, warn};

/// Consecutive-failure tracker for the sample input.
pub struct FaultMonitor {
    max_consecutive: u32,
    consecutive: u32,
    total: u32,
    latched: Option<FatalError>,
}

impl FaultMonitor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            max_consecutive: config.max_consecutive_read_failures.max(1),
            consecutive: 0,
            total: 0,
            latched: None,
        }
    }

    /// Record a successful read.
    pub fn record_success(&mut self) {
        if self.consecutive > 0 {
            info!("Sample input recovered after {} failed read(s)", self.consecutive);
        }
        self.consecutive = 0;
    }

    /// Record a failed read.  Returns the fatal error to latch, if the
    /// failure escalated.
    pub fn record_failure(&mut self, err: Error) -> Option<FatalError> {
        self.total = self.total.saturating_add(1);
        if let Some(latched) = self.latched {
            return Some(latched);
        }
        let fatal = match err {
            Error::Fatal(f) => Some(f),
            Error::Transient(t) => {
                self.consecutive = self.consecutive.saturating_add(1);
                if self.consecutive >= self.max_consecutive {
                    Some(FatalError::SensorUnresponsive)
                } else {
                    warn!(
                        "Sample read failed: {} ({}/{})",
                        t, self.consecutive, self.max_consecutive
                    );
                    None
                }
            }
        };
        if let Some(f) = fatal {
            error!("FAULT ESCALATED: {f}");
            self.latched = Some(f);
        }
        fatal
    }

    /// Consecutive failures since the last good read.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive
    }

    /// Failed reads since boot.
    pub fn total_failures(&self) -> u32 {
        self.total
    }

    /// The escalated fatal error, if any.
    pub fn latched(&self) -> Option<FatalError> {
        self.latched
    }
}
