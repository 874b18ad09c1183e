//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the GPIO and ADC drivers, exposing them through
//! [`PeripheralPort`] and, as the pin sink, [`OutputSink`].  This is the
//! only module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation models.

use embedded_hal::digital::PinState;

use crate::app::ports::{Direction, OutputSink, PeripheralPort};
use crate::config::PipelineConfig;
use crate::drivers::adc::AdcDriver;
use crate::drivers::gpio::GpioDriver;
use crate::error::{Error, FatalError, TransientError};
use crate::pipeline::ProcessingResult;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    gpio: GpioDriver,
    adc: AdcDriver,
    /// Pin driven by the [`OutputSink`] implementation.
    output_pin: i32,
}

impl HardwareAdapter {
    /// Claim ADC1 and configure the sample channel.
    ///
    /// The output pin is configured later by the pipeline's `Init` state.
    pub fn new(config: &PipelineConfig) -> Result<Self, FatalError> {
        let mut adc = AdcDriver::new()?;
        adc.configure_channel(config.sample_channel)?;
        Ok(Self {
            gpio: GpioDriver::new(),
            adc,
            output_pin: config.output_pin,
        })
    }

    /// Simulated GPIO bank (host only).
    #[cfg(not(target_os = "espidf"))]
    pub fn gpio(&mut self) -> &mut GpioDriver {
        &mut self.gpio
    }

    /// Simulated ADC (host only).
    #[cfg(not(target_os = "espidf"))]
    pub fn adc(&mut self) -> &mut AdcDriver {
        &mut self.adc
    }
}

// ── PeripheralPort implementation ─────────────────────────────

impl PeripheralPort for HardwareAdapter {
    fn configure(&mut self, pin: i32, direction: Direction) -> Result<(), Error> {
        self.gpio.configure(pin, direction).map_err(Error::from)
    }

    fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), TransientError> {
        self.gpio.set_level(pin, level)
    }

    fn read_sample(&mut self, channel: u32) -> Result<u16, Error> {
        self.adc.read(channel)
    }
}

// ── OutputSink implementation (pin sink) ──────────────────────

impl OutputSink for HardwareAdapter {
    fn emit(&mut self, result: &ProcessingResult) -> Result<(), TransientError> {
        self.gpio.set_level(self.output_pin, result.pin_state())
    }
}
