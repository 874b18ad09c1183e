//! Mock adapters for integration tests.
//!
//! Record every peripheral call, console line and pipeline event so tests
//! can assert on the full history without touching real GPIO/ADC
//! registers.

use std::collections::VecDeque;

use embedded_hal::digital::PinState;
use synapsys::app::events::PipelineEvent;
use synapsys::app::ports::{ConsolePort, Direction, EventSink, OutputSink, PeripheralPort};
use synapsys::error::{Error, TransientError};
use synapsys::pipeline::ProcessingResult;

// ── Peripheral call record ────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Configure { pin: i32, direction: Direction },
    SetLevel { pin: i32, level: PinState },
    Read { channel: u32 },
}

// ── MockHardware ──────────────────────────────────────────────

/// Scripted peripheral: reads pop from `script`, falling back to
/// `default_sample` once the script runs out.
pub struct MockHardware {
    pub calls: Vec<HwCall>,
    pub output_pin: i32,
    pub script: VecDeque<Result<u16, Error>>,
    pub default_sample: u16,
    pub configure_error: Option<Error>,
    pub write_error: Option<TransientError>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(output_pin: i32) -> Self {
        Self {
            calls: Vec::new(),
            output_pin,
            script: VecDeque::new(),
            default_sample: 0,
            configure_error: None,
            write_error: None,
        }
    }

    pub fn with_samples(output_pin: i32, samples: &[u16]) -> Self {
        let mut hw = Self::new(output_pin);
        hw.script = samples.iter().map(|&s| Ok(s)).collect();
        hw
    }

    /// Levels written to the output pin, as 0/1.
    pub fn pin_writes(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::SetLevel { level, .. } => Some(u8::from(*level == PinState::High)),
                _ => None,
            })
            .collect()
    }

    pub fn reads(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HwCall::Read { .. }))
            .count()
    }
}

impl PeripheralPort for MockHardware {
    fn configure(&mut self, pin: i32, direction: Direction) -> Result<(), Error> {
        self.calls.push(HwCall::Configure { pin, direction });
        match self.configure_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn set_level(&mut self, pin: i32, level: PinState) -> Result<(), TransientError> {
        if let Some(e) = self.write_error {
            return Err(e);
        }
        self.calls.push(HwCall::SetLevel { pin, level });
        Ok(())
    }

    fn read_sample(&mut self, channel: u32) -> Result<u16, Error> {
        self.calls.push(HwCall::Read { channel });
        self.script.pop_front().unwrap_or(Ok(self.default_sample))
    }
}

impl OutputSink for MockHardware {
    fn emit(&mut self, result: &ProcessingResult) -> Result<(), TransientError> {
        self.set_level(self.output_pin, result.pin_state())
    }
}

// ── Console recorder ──────────────────────────────────────────

#[derive(Default)]
pub struct MockConsole {
    pub lines: Vec<String>,
}

impl ConsolePort for MockConsole {
    fn write_line(&mut self, line: &str) -> Result<(), TransientError> {
        self.lines.push(line.to_owned());
        Ok(())
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<PipelineEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&PipelineEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &PipelineEvent) {
        self.events.push(event.clone());
    }
}
