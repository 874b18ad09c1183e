//! GPIO / peripheral assignments for the SynapSys board (ESP32 DevKit).
//!
//! Single source of truth: the default configuration references this
//! module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// On-board blue LED of the ESP32 DevKitC.
pub const LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Sample input (ADC1)
// ---------------------------------------------------------------------------

/// Analog front-end output (microphone preamp / sensor divider).
/// ADC1 channel 0 (GPIO 36, SENSOR_VP).
pub const SAMPLE_ADC_CHANNEL: u32 = 0;

/// Full-scale raw value of the 12-bit ADC.
pub const ADC_FULL_SCALE: u16 = 4095;
