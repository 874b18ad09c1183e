//! Integration tests for the Pipeline → FSM → sinks path.
//!
//! These run on the host (x86_64) and verify that samples flow from the
//! peripheral port through the ring and stage out to the pin and console
//! sinks without any real hardware.

use embedded_hal::digital::PinState;
use synapsys::adapters::console::ConsoleSink;
use synapsys::app::events::PipelineEvent;
use synapsys::app::ports::Direction;
use synapsys::app::service::{Pipeline, TickOutcome};
use synapsys::config::{PipelineConfig, StageConfig};
use synapsys::fsm::StateId;
use synapsys::pipeline::{Metric, ProcessingResult, SignalClass};

use crate::mock_hw::{HwCall, MockConsole, MockHardware, RecordingSink};

fn start(config: PipelineConfig, hw: &mut MockHardware) -> (Pipeline, RecordingSink) {
    let mut pipeline = Pipeline::new(config);
    let mut sink = RecordingSink::new();
    pipeline.start(hw, &mut sink);
    (pipeline, sink)
}

fn threshold_config(process_every_ticks: u32, metric: Metric) -> PipelineConfig {
    PipelineConfig {
        process_every_ticks,
        stage: StageConfig::Threshold {
            floor: 0,
            ceiling: 4095,
            quiet_below: 500,
            loud_above: 3000,
            metric,
        },
        ..PipelineConfig::default()
    }
}

// ── Blink behaviour ───────────────────────────────────────────

#[test]
fn five_toggle_ticks_blink_the_led() {
    let mut hw = MockHardware::new(2);
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let (mut pipeline, mut sink) = start(PipelineConfig::default(), &mut hw);

    for _ in 0..5 {
        assert_eq!(pipeline.tick(&mut hw, &mut console, &mut sink), TickOutcome::Continue);
    }

    assert_eq!(hw.pin_writes(), vec![1, 0, 1, 0, 1]);
    assert_eq!(
        console.console().lines,
        vec!["Led Level 1", "Led Level 0", "Led Level 1", "Led Level 0", "Led Level 1"]
    );
    assert_eq!(pipeline.state(), StateId::Sampling);
    assert_eq!(pipeline.last_result(), Some(ProcessingResult::Level(PinState::High)));
}

#[test]
fn start_configures_output_pin_once() {
    let mut hw = MockHardware::new(2);
    let (pipeline, sink) = start(PipelineConfig::default(), &mut hw);

    assert_eq!(
        hw.calls,
        vec![HwCall::Configure {
            pin: 2,
            direction: Direction::Output
        }]
    );
    assert_eq!(pipeline.state(), StateId::Sampling);
    assert_eq!(sink.events[0], PipelineEvent::Started(StateId::Init));
    assert!(sink.events.contains(&PipelineEvent::StateChanged {
        from: StateId::Init,
        to: StateId::Sampling
    }));
}

#[test]
fn every_tick_reads_the_configured_channel() {
    let config = PipelineConfig {
        sample_channel: 5,
        ..PipelineConfig::default()
    };
    let mut hw = MockHardware::new(2);
    let mut console = ConsoleSink::new(MockConsole::default(), false);
    let (mut pipeline, mut sink) = start(config, &mut hw);

    for _ in 0..3 {
        pipeline.tick(&mut hw, &mut console, &mut sink);
    }

    assert_eq!(hw.reads(), 3);
    assert!(hw.calls.contains(&HwCall::Read { channel: 5 }));
}

#[test]
fn disabled_console_stays_silent() {
    let mut hw = MockHardware::new(2);
    let mut console = ConsoleSink::new(MockConsole::default(), false);
    let (mut pipeline, mut sink) = start(PipelineConfig::default(), &mut hw);

    pipeline.tick(&mut hw, &mut console, &mut sink);

    assert!(console.console().lines.is_empty());
    assert_eq!(hw.pin_writes(), vec![1]);
}

// ── Batch cadence ─────────────────────────────────────────────

#[test]
fn passes_run_every_n_ticks() {
    let mut hw = MockHardware::new(2);
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let config = PipelineConfig {
        process_every_ticks: 4,
        ..PipelineConfig::default()
    };
    let (mut pipeline, mut sink) = start(config, &mut hw);

    for _ in 0..8 {
        pipeline.tick(&mut hw, &mut console, &mut sink);
    }

    assert_eq!(hw.pin_writes(), vec![1, 0]);
    assert_eq!(pipeline.stats().passes, 2);
    assert_eq!(pipeline.stats().ticks, 8);
}

#[test]
fn threshold_classifies_each_batch() {
    let samples = [100, 120, 110, 90, 3500, 3900, 4000, 3800];
    let mut hw = MockHardware::with_samples(2, &samples);
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let (mut pipeline, mut sink) = start(threshold_config(4, Metric::Mean), &mut hw);

    for _ in 0..samples.len() {
        pipeline.tick(&mut hw, &mut console, &mut sink);
    }

    assert_eq!(
        console.console().lines,
        vec!["Signal Level quiet", "Signal Level loud"]
    );
    // Only `Loud` lights the pin.
    assert_eq!(hw.pin_writes(), vec![0, 1]);
    assert_eq!(
        pipeline.last_result(),
        Some(ProcessingResult::Class(SignalClass::Loud))
    );
}

#[test]
fn peak_metric_reacts_to_a_single_spike() {
    let samples = [100, 100, 4000, 100];
    let mut hw = MockHardware::with_samples(2, &samples);
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let (mut pipeline, mut sink) = start(threshold_config(4, Metric::Peak), &mut hw);

    for _ in 0..samples.len() {
        pipeline.tick(&mut hw, &mut console, &mut sink);
    }

    assert_eq!(console.console().lines, vec!["Signal Level loud"]);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_reports_counters() {
    let mut hw = MockHardware::new(2);
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let config = PipelineConfig {
        telemetry_interval_ticks: 5,
        ..PipelineConfig::default()
    };
    let (mut pipeline, mut sink) = start(config, &mut hw);

    for _ in 0..5 {
        pipeline.tick(&mut hw, &mut console, &mut sink);
    }

    let telemetry: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Telemetry(t) => Some(*t),
            _ => None,
        })
        .collect();
    assert_eq!(telemetry.len(), 1);
    assert_eq!(telemetry[0].ticks, 5);
    assert_eq!(telemetry[0].passes, 5);
    assert_eq!(telemetry[0].read_failures, 0);
    assert_eq!(telemetry[0].state, StateId::Sampling);
}
