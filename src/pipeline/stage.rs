//! Processing stages.
//!
//! A stage consumes the batch of samples drained from the ring on each
//! processing pass and produces a [`ProcessingResult`] for the sinks.
//! Every stage is **total**: it never fails, and out-of-range samples are
//! clamped rather than rejected.
//!
//! | Stage            | Input used | Result                     |
//! |------------------|------------|----------------------------|
//! | `ToggleStage`    | none       | `Level` flipped every pass |
//! | `ThresholdStage` | mean/peak  | `Class` (quiet/normal/loud)|
//!
//! [`Stage`] wraps the variants in an enum so the pipeline context can own
//! one without `dyn` or heap.

use core::fmt;

use embedded_hal::digital::PinState;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::StageConfig;

use super::sample::Sample;

// ───────────────────────────────────────────────────────────────
// Results
// ───────────────────────────────────────────────────────────────

/// Classified signal level produced by [`ThresholdStage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalClass {
    Quiet,
    Normal,
    Loud,
}

impl fmt::Display for SignalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Loud => write!(f, "loud"),
        }
    }
}

/// Output of one processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingResult {
    /// Binary level (toggle stage).
    Level(PinState),
    /// Classified level (threshold stage).
    Class(SignalClass),
}

impl ProcessingResult {
    /// Pin level a GPIO sink should drive for this result.
    ///
    /// Classes light the pin only when `Loud`.
    pub fn pin_state(&self) -> PinState {
        match self {
            Self::Level(state) => *state,
            Self::Class(SignalClass::Loud) => PinState::High,
            Self::Class(_) => PinState::Low,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Capability
// ───────────────────────────────────────────────────────────────

/// A pluggable processing stage.
pub trait ProcessingStage {
    /// Consume one drained batch (oldest first).  Must not fail.
    fn consume(&mut self, samples: &[Sample]) -> ProcessingResult;
}

// ───────────────────────────────────────────────────────────────
// Toggle
// ───────────────────────────────────────────────────────────────

/// Flips a binary level on every pass: the blink behaviour.
#[derive(Debug, Clone)]
pub struct ToggleStage {
    level: PinState,
}

impl ToggleStage {
    pub fn new(initial_high: bool) -> Self {
        Self {
            level: PinState::from(initial_high),
        }
    }

    pub fn level(&self) -> PinState {
        self.level
    }
}

impl ProcessingStage for ToggleStage {
    fn consume(&mut self, _samples: &[Sample]) -> ProcessingResult {
        self.level = match self.level {
            PinState::Low => PinState::High,
            PinState::High => PinState::Low,
        };
        ProcessingResult::Level(self.level)
    }
}

// ───────────────────────────────────────────────────────────────
// Threshold classifier
// ───────────────────────────────────────────────────────────────

/// How a batch is reduced to a single level before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Arithmetic mean of the clamped batch.
    #[default]
    Mean,
    /// Largest clamped sample in the batch.
    Peak,
}

/// Classifies the batch level into quiet / normal / loud bands.
#[derive(Debug, Clone)]
pub struct ThresholdStage {
    floor: u16,
    ceiling: u16,
    quiet_below: u16,
    loud_above: u16,
    metric: Metric,
    /// Repeated when a pass has no samples (every read glitched).
    last: SignalClass,
}

impl ThresholdStage {
    /// Build a classifier.  Bounds are normalised so that
    /// `floor <= ceiling`; the config layer validates the ordering first.
    pub fn new(floor: u16, ceiling: u16, quiet_below: u16, loud_above: u16, metric: Metric) -> Self {
        let (floor, ceiling) = if floor <= ceiling {
            (floor, ceiling)
        } else {
            (ceiling, floor)
        };
        Self {
            floor,
            ceiling,
            quiet_below,
            loud_above,
            metric,
            last: SignalClass::Quiet,
        }
    }

    /// Reduce a non-empty batch to one clamped level.
    fn level_of(&self, samples: &[Sample]) -> u16 {
        let clamped = samples.iter().map(|s| s.value.clamp(self.floor, self.ceiling));
        match self.metric {
            Metric::Mean => {
                let sum: u64 = clamped.map(u64::from).sum();
                (sum / samples.len() as u64) as u16
            }
            Metric::Peak => clamped.max().unwrap_or(self.floor),
        }
    }

    fn classify(&self, level: u16) -> SignalClass {
        if level < self.quiet_below {
            SignalClass::Quiet
        } else if level > self.loud_above {
            SignalClass::Loud
        } else {
            SignalClass::Normal
        }
    }
}

impl ProcessingStage for ThresholdStage {
    fn consume(&mut self, samples: &[Sample]) -> ProcessingResult {
        if samples.is_empty() {
            debug!("threshold: empty batch, holding {}", self.last);
            return ProcessingResult::Class(self.last);
        }
        let level = self.level_of(samples);
        self.last = self.classify(level);
        debug!("threshold: level={} class={}", level, self.last);
        ProcessingResult::Class(self.last)
    }
}

// ───────────────────────────────────────────────────────────────
// Static dispatch
// ───────────────────────────────────────────────────────────────

/// The stage selected by configuration.
#[derive(Debug, Clone)]
pub enum Stage {
    Toggle(ToggleStage),
    Threshold(ThresholdStage),
}

impl Stage {
    pub fn from_config(config: &StageConfig) -> Self {
        match *config {
            StageConfig::Toggle { initial_high } => Self::Toggle(ToggleStage::new(initial_high)),
            StageConfig::Threshold {
                floor,
                ceiling,
                quiet_below,
                loud_above,
                metric,
            } => Self::Threshold(ThresholdStage::new(
                floor,
                ceiling,
                quiet_below,
                loud_above,
                metric,
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Toggle(_) => "toggle",
            Self::Threshold(_) => "threshold",
        }
    }
}

impl ProcessingStage for Stage {
    fn consume(&mut self, samples: &[Sample]) -> ProcessingResult {
        match self {
            Self::Toggle(s) => s.consume(samples),
            Self::Threshold(s) => s.consume(samples),
        }
    }
}
