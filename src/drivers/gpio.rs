//! Digital GPIO driver.
//!
//! Raw ESP-IDF sys calls on device; an in-memory pin bank on host so the
//! hardware adapter can be exercised without a board.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use embedded_hal::digital::PinState;
use log::info;

use crate::app::ports::Direction;
use crate::error::{FatalError, TransientError};

/// GPIO pads on the ESP32 (0..=39).
pub const GPIO_COUNT: i32 = 40;

/// `ESP_ERR_INVALID_ARG`, reported for pins outside the pad range.
const ERR_INVALID_ARG: i32 = 0x102;

pub struct GpioDriver {
    #[cfg(not(target_os = "espidf"))]
    sim: SimPins,
}

#[cfg(not(target_os = "espidf"))]
struct SimPins {
    directions: [Option<Direction>; GPIO_COUNT as usize],
    levels: [PinState; GPIO_COUNT as usize],
    fail_writes: u32,
}

#[cfg(not(target_os = "espidf"))]
impl Default for SimPins {
    fn default() -> Self {
        Self {
            directions: [None; GPIO_COUNT as usize],
            levels: [PinState::Low; GPIO_COUNT as usize],
            fail_writes: 0,
        }
    }
}

impl Default for GpioDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn check_pin(pin: i32) -> Result<(), FatalError> {
    if (0..GPIO_COUNT).contains(&pin) {
        Ok(())
    } else {
        Err(FatalError::PeripheralInitFailed(ERR_INVALID_ARG))
    }
}

impl GpioDriver {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            sim: SimPins::default(),
        }
    }

    /// Reset `pin` to its default state, then set its direction.
    #[cfg(target_os = "espidf")]
    pub fn configure(&mut self, pin: i32, direction: Direction) -> Result<(), FatalError> {
        check_pin(pin)?;
        let mode = match direction {
            Direction::Input => gpio_mode_t_GPIO_MODE_INPUT,
            Direction::Output => gpio_mode_t_GPIO_MODE_OUTPUT,
        };
        // SAFETY: plain register configuration on a validated pad number.
        let ret = unsafe { gpio_reset_pin(pin) };
        if ret != ESP_OK as i32 {
            return Err(FatalError::PeripheralInitFailed(ret));
        }
        // SAFETY: same validated pad; reset above left it in a known state.
        let ret = unsafe { gpio_set_direction(pin, mode) };
        if ret != ESP_OK as i32 {
            return Err(FatalError::PeripheralInitFailed(ret));
        }
        info!("gpio: GPIO{} configured as {:?}", pin, direction);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn configure(&mut self, pin: i32, direction: Direction) -> Result<(), FatalError> {
        check_pin(pin)?;
        self.sim.directions[pin as usize] = Some(direction);
        self.sim.levels[pin as usize] = PinState::Low;
        info!("gpio(sim): GPIO{} configured as {:?}", pin, direction);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    pub fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), TransientError> {
        let raw = u32::from(level == PinState::High);
        // SAFETY: writes the output latch only; the pad was configured in Init.
        let ret = unsafe { gpio_set_level(pin, raw) };
        if ret != ESP_OK as i32 {
            return Err(TransientError::GpioWriteFailed(ret));
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), TransientError> {
        if check_pin(pin).is_err() {
            return Err(TransientError::GpioWriteFailed(ERR_INVALID_ARG));
        }
        if self.sim.directions[pin as usize] != Some(Direction::Output) {
            return Err(TransientError::PeripheralNotReady);
        }
        if self.sim.fail_writes > 0 {
            self.sim.fail_writes -= 1;
            return Err(TransientError::GpioWriteFailed(-1));
        }
        self.sim.levels[pin as usize] = level;
        Ok(())
    }

    /// Simulated output latch of `pin` (host only).
    #[cfg(not(target_os = "espidf"))]
    pub fn level(&self, pin: i32) -> Option<PinState> {
        check_pin(pin).ok()?;
        self.sim.directions[pin as usize].map(|_| self.sim.levels[pin as usize])
    }

    /// Make the next `n` writes fail (host only).
    #[cfg(not(target_os = "espidf"))]
    pub fn fail_next_writes(&mut self, n: u32) {
        self.sim.fail_writes = n;
    }
}
