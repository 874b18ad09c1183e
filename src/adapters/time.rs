//! ESP32 time adapters.
//!
//! - [`Esp32TimeAdapter`] implements [`ClockPort`].
//! - [`TaskDelay`] implements [`DelayNs`] for the tick scheduler.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic) and
//!   FreeRTOS `vTaskDelay`.
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` and
//!   `std::thread::sleep` for host-side testing and simulation.

use embedded_hal::delay::DelayNs;

use crate::app::ports::ClockPort;

/// Time adapter for the ESP32 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl ClockPort for Esp32TimeAdapter {
    /// Microseconds since boot (monotonic, wraps at `u64::MAX`).
    #[cfg(target_os = "espidf")]
    fn uptime_us(&self) -> u64 {
        // SAFETY: esp_timer is started by the IDF before app_main.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic, wraps at `u64::MAX`).
    #[cfg(not(target_os = "espidf"))]
    fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

// ── Task delay ────────────────────────────────────────────────

/// FreeRTOS ticks to wait so that at least `ms` milliseconds elapse.
///
/// `vTaskDelay(n)` returns anywhere in the last tick period of `n`, so the
/// count is rounded up and padded by one tick.
pub fn ticks_for_ms(ms: u32, tick_rate_hz: u32) -> u32 {
    let ticks = (u64::from(ms) * u64::from(tick_rate_hz)).div_ceil(1_000);
    (ticks as u32).saturating_add(1)
}

/// Cooperative delay: suspends the calling task instead of spinning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskDelay;

impl TaskDelay {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl DelayNs for TaskDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns.div_ceil(1_000_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_ms(us.div_ceil(1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        if ms == 0 {
            return;
        }
        let ticks = ticks_for_ms(ms, esp_idf_hal::delay::TICK_RATE_HZ);
        // SAFETY: called from a FreeRTOS task context, never from an ISR.
        unsafe { esp_idf_svc::sys::vTaskDelay(ticks) };
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for TaskDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
