//! Sampling pipeline building blocks: pure logic, zero I/O.
//!
//! ```text
//!  read_sample ──▶ SampleRing ──drain──▶ ProcessingStage ──▶ ProcessingResult
//! ```

pub mod ring;
pub mod sample;
pub mod stage;

pub use ring::SampleRing;
pub use sample::Sample;
pub use stage::{Metric, ProcessingResult, ProcessingStage, SignalClass, Stage};
