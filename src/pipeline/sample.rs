//! Sample type captured once per tick.

/// A single raw reading from the sample channel.
///
/// The timestamp is the loop iteration that captured it; there is no wall
/// clock on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sample {
    /// Raw ADC value (0 – 4095 on the 12-bit ADC, but any `u16` is accepted).
    pub value: u16,
    /// Loop tick at capture time.
    pub tick: u64,
}

impl Sample {
    pub const fn new(value: u16, tick: u64) -> Self {
        Self { value, tick }
    }
}
