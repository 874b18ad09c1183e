//! Pipeline configuration parameters
//!
//! All tunable parameters for the sampling loop.  Values come from the
//! defaults below, optionally overridden at build time with a JSON
//! document in `SYNAPSYS_PIPELINE_CONFIG`.  Nothing is persisted on the
//! device.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::drivers::adc::ADC1_CHANNEL_COUNT;
use crate::drivers::gpio::GPIO_COUNT;
use crate::error::ConfigError;
use crate::pins;
use crate::pipeline::Metric;

/// Capacity of the sample ring (compile-time constant, no heap).
pub const SAMPLE_RING_CAPACITY: usize = 16;

/// Which processing stage the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageConfig {
    /// Flip the output every pass.
    Toggle { initial_high: bool },
    /// Classify the batch level into quiet / normal / loud.
    Threshold {
        /// Samples below this are clamped up.
        floor: u16,
        /// Samples above this are clamped down.
        ceiling: u16,
        /// Levels strictly below are `Quiet`.
        quiet_below: u16,
        /// Levels strictly above are `Loud`.
        loud_above: u16,
        #[serde(default)]
        metric: Metric,
    },
}

/// Core pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    // --- Timing ---
    /// Scheduler tick period (milliseconds)
    pub tick_period_ms: u32,
    /// Ticks between processing passes (1 = every tick)
    pub process_every_ticks: u32,

    // --- Peripherals ---
    /// GPIO driven by the pin sink
    pub output_pin: i32,
    /// ADC1 channel sampled every tick
    pub sample_channel: u32,

    // --- Processing ---
    pub stage: StageConfig,

    // --- Faults ---
    /// Consecutive failed sample reads before the sensor is declared dead
    pub max_consecutive_read_failures: u32,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,

    // --- Output ---
    /// Whether results are echoed to the serial console
    pub console_enabled: bool,
    /// Telemetry report interval (ticks, 0 = off)
    pub telemetry_interval_ticks: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_period_ms: 200, // 5 Hz blink
            process_every_ticks: 1,

            // Peripherals
            output_pin: pins::LED_GPIO,
            sample_channel: pins::SAMPLE_ADC_CHANNEL,

            // Processing
            stage: StageConfig::Toggle {
                initial_high: false,
            },

            // Faults
            max_consecutive_read_failures: 25, // 5 s at 200 ms
            watchdog_timeout_ms: 5_000,

            // Output
            console_enabled: true,
            telemetry_interval_ticks: 300, // 1/min at 200 ms
        }
    }
}

impl PipelineConfig {
    /// Parse a (possibly partial) JSON document; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|_| ConfigError::Parse)
    }

    /// Reject invalid values.  Never clamps; a bad config is an error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_period_ms must be > 0"));
        }
        if self.process_every_ticks == 0
            || self.process_every_ticks as usize > SAMPLE_RING_CAPACITY
        {
            return Err(ConfigError::ValidationFailed(
                "process_every_ticks must be within 1..=ring capacity",
            ));
        }
        if !(0..GPIO_COUNT).contains(&self.output_pin) {
            return Err(ConfigError::ValidationFailed("output_pin must be a valid GPIO"));
        }
        if self.sample_channel >= ADC1_CHANNEL_COUNT {
            return Err(ConfigError::ValidationFailed(
                "sample_channel must be an ADC1 channel",
            ));
        }
        if self.max_consecutive_read_failures == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_consecutive_read_failures must be > 0",
            ));
        }
        // The watchdog is fed once per tick, so it must outlast two periods.
        if self.watchdog_timeout_ms < self.tick_period_ms.saturating_mul(2) {
            return Err(ConfigError::ValidationFailed(
                "watchdog_timeout_ms must be at least twice tick_period_ms",
            ));
        }
        if let StageConfig::Threshold {
            floor,
            ceiling,
            quiet_below,
            loud_above,
            ..
        } = self.stage
        {
            if floor > ceiling {
                return Err(ConfigError::ValidationFailed("threshold floor above ceiling"));
            }
            if quiet_below > loud_above {
                return Err(ConfigError::ValidationFailed("quiet_below above loud_above"));
            }
        }
        Ok(())
    }
}

/// Resolve the configuration for this boot.
///
/// Uses the build-time `SYNAPSYS_PIPELINE_CONFIG` override when present and
/// valid; otherwise falls back to [`PipelineConfig::default`].
pub fn load() -> PipelineConfig {
    load_from(option_env!("SYNAPSYS_PIPELINE_CONFIG"))
}

/// [`load`] with an explicit override source.
pub fn load_from(override_json: Option<&str>) -> PipelineConfig {
    let Some(json) = override_json else {
        info!("Config: using defaults");
        return PipelineConfig::default();
    };
    match PipelineConfig::from_json(json).and_then(|c| c.validate().map(|()| c)) {
        Ok(config) => {
            info!("Config: loaded build-time override");
            config
        }
        Err(e) => {
            warn!("Config override rejected ({}), using defaults", e);
            PipelineConfig::default()
        }
    }
}
