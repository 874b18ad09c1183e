//! Peripheral drivers and the task watchdog.

pub mod adc;
pub mod gpio;
pub mod watchdog;
