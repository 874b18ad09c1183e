//! ADC1 oneshot driver.
//!
//! Owns the ADC1 unit handle; channels are configured once at startup
//! (12 dB attenuation, 12-bit width).  On host an in-memory model returns
//! a settable value and can inject read failures.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::error::{Error, FatalError, TransientError};
use crate::pins::ADC_FULL_SCALE;

/// ADC1 channels on the ESP32 (0..=7).
pub const ADC1_CHANNEL_COUNT: u32 = 8;

// ── Error mapping ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn classify_read_error(rc: i32) -> Error {
    match rc {
        rc if rc == ESP_ERR_TIMEOUT as i32 => TransientError::SampleReadGlitch.into(),
        rc if rc == ESP_ERR_INVALID_STATE as i32 => TransientError::PeripheralNotReady.into(),
        rc => FatalError::HardwareFault(rc).into(),
    }
}

pub struct AdcDriver {
    /// Bit per configured channel.
    configured: u8,
    #[cfg(target_os = "espidf")]
    handle: adc_oneshot_unit_handle_t,
    #[cfg(not(target_os = "espidf"))]
    sim: SimAdc,
}

#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
struct SimAdc {
    value: u16,
    fail_reads: u32,
    fail_with: Option<Error>,
}

impl AdcDriver {
    /// Claim ADC1 in oneshot mode.
    #[cfg(target_os = "espidf")]
    pub fn new() -> Result<Self, FatalError> {
        let init_cfg = adc_oneshot_unit_init_cfg_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..Default::default()
        };
        let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
        // SAFETY: `handle` is a valid out-pointer; the unit is claimed once.
        let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(FatalError::PeripheralInitFailed(ret));
        }
        info!("adc: ADC1 oneshot unit claimed");
        Ok(Self {
            configured: 0,
            handle,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Result<Self, FatalError> {
        info!("adc(sim): ADC1 model ready");
        Ok(Self {
            configured: 0,
            sim: SimAdc::default(),
        })
    }

    /// Configure a channel for 0–3.3 V input.
    pub fn configure_channel(&mut self, channel: u32) -> Result<(), FatalError> {
        if channel >= ADC1_CHANNEL_COUNT {
            return Err(FatalError::PeripheralInitFailed(0x102));
        }
        #[cfg(target_os = "espidf")]
        {
            let chan_cfg = adc_oneshot_chan_cfg_t {
                atten: adc_atten_t_ADC_ATTEN_DB_12,
                bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
            };
            // SAFETY: handle was returned by adc_oneshot_new_unit.
            let ret = unsafe { adc_oneshot_config_channel(self.handle, channel, &chan_cfg) };
            if ret != ESP_OK as i32 {
                return Err(FatalError::PeripheralInitFailed(ret));
            }
        }
        self.configured |= 1 << channel;
        info!("adc: ADC1 CH{} configured", channel);
        Ok(())
    }

    fn is_configured(&self, channel: u32) -> bool {
        channel < ADC1_CHANNEL_COUNT && self.configured & (1 << channel) != 0
    }

    /// One raw conversion, clamped to the 12-bit range.
    #[cfg(target_os = "espidf")]
    pub fn read(&mut self, channel: u32) -> Result<u16, Error> {
        if !self.is_configured(channel) {
            return Err(TransientError::PeripheralNotReady.into());
        }
        let mut raw: i32 = 0;
        // SAFETY: handle is live for the lifetime of `self`; single task.
        let ret = unsafe { adc_oneshot_read(self.handle, channel, &mut raw) };
        if ret != ESP_OK as i32 {
            return Err(classify_read_error(ret));
        }
        Ok(raw.clamp(0, i32::from(ADC_FULL_SCALE)) as u16)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read(&mut self, channel: u32) -> Result<u16, Error> {
        if !self.is_configured(channel) {
            return Err(TransientError::PeripheralNotReady.into());
        }
        if self.sim.fail_reads > 0 {
            self.sim.fail_reads -= 1;
            return Err(self
                .sim
                .fail_with
                .unwrap_or(Error::Transient(TransientError::SampleReadGlitch)));
        }
        Ok(self.sim.value.min(ADC_FULL_SCALE))
    }

    /// Set the simulated input level (host only).
    #[cfg(not(target_os = "espidf"))]
    pub fn set_value(&mut self, value: u16) {
        self.sim.value = value;
    }

    /// Make the next `n` reads fail with `err` (host only).
    #[cfg(not(target_os = "espidf"))]
    pub fn fail_next_reads(&mut self, n: u32, err: Error) {
        self.sim.fail_reads = n;
        self.sim.fail_with = Some(err);
    }
}

#[cfg(target_os = "espidf")]
impl Drop for AdcDriver {
    fn drop(&mut self) {
        // SAFETY: releases the unit claimed in `new`.
        unsafe {
            adc_oneshot_del_unit(self.handle);
        }
    }
}
