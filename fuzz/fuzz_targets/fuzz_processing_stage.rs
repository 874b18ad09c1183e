//! Fuzz target: ring + processing stages
//!
//! Interprets the input as a stream of little-endian `u16` samples, pushes
//! them through a small ring and runs every stage on each drained batch.
//! Stages must never panic and the ring must never exceed its capacity.
//!
//! cargo fuzz run fuzz_processing_stage

#![no_main]

use libfuzzer_sys::fuzz_target;
use synapsys::pipeline::stage::{ThresholdStage, ToggleStage};
use synapsys::pipeline::{Metric, ProcessingResult, ProcessingStage, Sample, SampleRing};

fuzz_target!(|data: &[u8]| {
    let Some((&cfg, rest)) = data.split_first() else {
        return;
    };
    // First byte picks the batch size (1..=8) and the metric.
    let batch = usize::from(cfg & 0x07) + 1;
    let metric = if cfg & 0x08 != 0 { Metric::Peak } else { Metric::Mean };

    let mut ring = SampleRing::<8>::new();
    let mut toggle = ToggleStage::new(cfg & 0x10 != 0);
    let mut threshold = ThresholdStage::new(0, 4095, 1000, 3000, metric);

    for (tick, chunk) in rest.chunks_exact(2).enumerate() {
        let value = u16::from_le_bytes([chunk[0], chunk[1]]);
        ring.push(Sample::new(value, tick as u64));
        assert!(ring.len() <= ring.capacity());

        if (tick + 1) % batch == 0 {
            let samples = ring.drain();
            assert!(ring.is_empty());
            assert!(matches!(toggle.consume(&samples), ProcessingResult::Level(_)));
            assert!(matches!(threshold.consume(&samples), ProcessingResult::Class(_)));
        }
    }
});
