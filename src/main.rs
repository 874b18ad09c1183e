//! SynapSys Firmware: Main Entry Point
//!
//! Periodic sampling and processing loop on a single FreeRTOS task.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter      ConsoleSink     LogEventSink  Esp32Time  │
//! │  (Peripheral + pin)   (OutputSink)    (EventSink)   (Clock)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Pipeline (pure logic)                     │    │
//! │  │  FSM · SampleRing · ProcessingStage · FaultMonitor     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  TickScheduler (vTaskDelay) · Watchdog (TWDT)                  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use embedded_hal::delay::DelayNs;
use log::{error, info};

use synapsys::adapters::console::{ConsoleSink, UartConsole};
use synapsys::adapters::hardware::HardwareAdapter;
use synapsys::adapters::log_sink::LogEventSink;
use synapsys::adapters::time::{Esp32TimeAdapter, TaskDelay};
use synapsys::app::events::PipelineEvent;
use synapsys::app::ports::{ClockPort, EventSink};
use synapsys::app::service::{Pipeline, TickOutcome};
use synapsys::config;
use synapsys::drivers::watchdog::Watchdog;
use synapsys::error::FatalError;
use synapsys::scheduler::TickScheduler;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SynapSys v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config (defaults or build-time override) ───────────
    let config = config::load();
    let mut watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 3. Adapters ───────────────────────────────────────────
    let clock = Esp32TimeAdapter::new();
    let mut events = LogEventSink::new();
    let mut console = ConsoleSink::new(UartConsole::new(), config.console_enabled);
    let mut scheduler = TickScheduler::new(config.tick_period_ms, TaskDelay::new());
    let telemetry_every = u64::from(config.telemetry_interval_ticks);

    let mut hw = match HardwareAdapter::new(&config) {
        Ok(hw) => hw,
        Err(e) => {
            events.emit(&PipelineEvent::FaultEntered(e));
            halt(e);
        }
    };

    // ── 4. Pipeline ───────────────────────────────────────────
    let mut pipeline = Pipeline::new(config);
    pipeline.start(&mut hw, &mut events);
    watchdog.feed();

    info!("Entering sampling loop");

    // ── 5. Loop ───────────────────────────────────────────────
    loop {
        if let Err(e) = scheduler.wait(&clock) {
            pipeline.enter_fault(e, &mut events);
        }

        match pipeline.tick(&mut hw, &mut console, &mut events) {
            TickOutcome::Continue => watchdog.feed(),
            TickOutcome::Halted(e) => halt(e),
        }

        if telemetry_every > 0 && pipeline.tick_count() % telemetry_every == 0 {
            let t = scheduler.stats();
            info!(
                "TICK | n={} | interval min={}us max={}us last={}us | uptime={}ms",
                t.ticks, t.min_interval_us, t.max_interval_us, t.last_interval_us,
                clock.uptime_ms(),
            );
        }
    }
}

/// Park the task without feeding the watchdog; the TWDT resets the chip.
fn halt(reason: FatalError) -> ! {
    error!("Halted: {} (watchdog reset pending)", reason);
    let mut delay = TaskDelay::new();
    loop {
        delay.delay_ms(1_000);
    }
}
