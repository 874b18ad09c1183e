//! Fixed-rate scheduler tick.
//!
//! Blocks the calling task for one tick period through a
//! [`DelayNs`] implementation (on ESP-IDF a FreeRTOS `vTaskDelay`, so the
//! CPU is yielded to other tasks and the idle hook rather than spun).
//!
//! ```text
//!   ┌────────── wait() ───────────┐
//!   │ t0 = clock                  │
//!   │ delay.delay_ms(period)      │──▶ task suspended
//!   │ t1 = clock                  │
//!   │ t1 - t0 < period ? FATAL    │
//!   └─────────────────────────────┘
//! ```
//!
//! The loop is fixed-delay: processing time adds to the wake-to-wake
//! interval, so the measured interval is never shorter than the period.
//! A wake earlier than the period means the delay returned without
//! yielding, which the pipeline treats as unrecoverable.

use embedded_hal::delay::DelayNs;
use log::error;

use crate::app::ports::ClockPort;
use crate::error::FatalError;

// ═══════════════════════════════════════════════════════════════
//  Statistics
// ═══════════════════════════════════════════════════════════════

/// Wake-to-wake interval statistics (microseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickStats {
    /// Completed waits.
    pub ticks: u64,
    /// Shortest interval between consecutive wakes (0 until two wakes).
    pub min_interval_us: u64,
    pub max_interval_us: u64,
    pub last_interval_us: u64,
}

impl TickStats {
    fn record_interval(&mut self, interval_us: u64) {
        if self.min_interval_us == 0 || interval_us < self.min_interval_us {
            self.min_interval_us = interval_us;
        }
        self.max_interval_us = self.max_interval_us.max(interval_us);
        self.last_interval_us = interval_us;
    }
}

/// Timing of a single [`TickScheduler::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTiming {
    /// Time actually spent suspended.
    pub slept_us: u64,
    /// Interval since the previous wake (`None` on the first tick).
    pub interval_us: Option<u64>,
}

/// `true` if a suspension of `slept_us` honoured a `period_ms` delay.
pub fn yielded_for(slept_us: u64, period_ms: u32) -> bool {
    slept_us >= u64::from(period_ms) * 1_000
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

/// Periodic tick source built on a delay provider.
pub struct TickScheduler<D: DelayNs> {
    period_ms: u32,
    delay: D,
    last_wake_us: Option<u64>,
    stats: TickStats,
}

impl<D: DelayNs> TickScheduler<D> {
    pub fn new(period_ms: u32, delay: D) -> Self {
        Self {
            period_ms,
            delay,
            last_wake_us: None,
            stats: TickStats::default(),
        }
    }

    /// Suspend the task for one period.
    pub fn wait(&mut self, clock: &impl ClockPort) -> Result<TickTiming, FatalError> {
        let before = clock.uptime_us();
        self.delay.delay_ms(self.period_ms);
        let now = clock.uptime_us();

        let slept_us = now.saturating_sub(before);
        if !yielded_for(slept_us, self.period_ms) {
            error!(
                "Scheduler: woke after {}us, period is {}ms",
                slept_us, self.period_ms
            );
            return Err(FatalError::SchedulerYieldFailed);
        }

        let interval_us = self.last_wake_us.map(|prev| now.saturating_sub(prev));
        if let Some(interval) = interval_us {
            self.stats.record_interval(interval);
        }
        self.last_wake_us = Some(now);
        self.stats.ticks += 1;

        Ok(TickTiming {
            slept_us,
            interval_us,
        })
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }
}
