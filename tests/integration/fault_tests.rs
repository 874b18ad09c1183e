//! Integration tests for error handling: transient errors are skipped,
//! fatal errors latch `Fault` and stop all processing.

use synapsys::adapters::console::ConsoleSink;
use synapsys::app::events::PipelineEvent;
use synapsys::app::service::{Pipeline, TickOutcome};
use synapsys::config::PipelineConfig;
use synapsys::error::{Error, FatalError, TransientError};
use synapsys::fsm::StateId;

use crate::mock_hw::{MockConsole, MockHardware, RecordingSink};

const GLITCH: Error = Error::Transient(TransientError::SampleReadGlitch);

fn started(config: PipelineConfig, hw: &mut MockHardware) -> (Pipeline, RecordingSink) {
    let mut pipeline = Pipeline::new(config);
    let mut sink = RecordingSink::new();
    pipeline.start(hw, &mut sink);
    (pipeline, sink)
}

#[test]
fn glitched_read_skips_the_sample_but_not_the_loop() {
    let mut hw = MockHardware::new(2);
    hw.script = [Ok(1), Err(GLITCH), Ok(2)].into_iter().collect();
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let (mut pipeline, mut sink) = started(PipelineConfig::default(), &mut hw);

    for _ in 0..3 {
        assert_eq!(pipeline.tick(&mut hw, &mut console, &mut sink), TickOutcome::Continue);
    }

    assert_eq!(
        sink.count(|e| matches!(e, PipelineEvent::SampleSkipped(_))),
        1
    );
    // The toggle still runs on the tick with no sample.
    assert_eq!(hw.pin_writes(), vec![1, 0, 1]);
    assert_eq!(pipeline.stats().read_failures, 1);
}

#[test]
fn consecutive_failures_escalate_to_fault() {
    let config = PipelineConfig {
        max_consecutive_read_failures: 3,
        ..PipelineConfig::default()
    };
    let mut hw = MockHardware::new(2);
    hw.script = std::iter::repeat(Err(GLITCH)).take(10).collect();
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let (mut pipeline, mut sink) = started(config, &mut hw);

    assert_eq!(pipeline.tick(&mut hw, &mut console, &mut sink), TickOutcome::Continue);
    assert_eq!(pipeline.tick(&mut hw, &mut console, &mut sink), TickOutcome::Continue);
    assert_eq!(
        pipeline.tick(&mut hw, &mut console, &mut sink),
        TickOutcome::Halted(FatalError::SensorUnresponsive)
    );

    assert_eq!(pipeline.state(), StateId::Fault);
    assert!(sink
        .events
        .contains(&PipelineEvent::FaultEntered(FatalError::SensorUnresponsive)));
}

#[test]
fn fault_stops_all_hardware_access() {
    let config = PipelineConfig {
        max_consecutive_read_failures: 1,
        ..PipelineConfig::default()
    };
    let mut hw = MockHardware::new(2);
    hw.script = [Err(GLITCH)].into_iter().collect();
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let (mut pipeline, mut sink) = started(config, &mut hw);

    pipeline.tick(&mut hw, &mut console, &mut sink);
    let calls_at_fault = hw.calls.len();

    for _ in 0..5 {
        assert_eq!(
            pipeline.tick(&mut hw, &mut console, &mut sink),
            TickOutcome::Halted(FatalError::SensorUnresponsive)
        );
    }
    assert_eq!(hw.calls.len(), calls_at_fault);
    assert!(console.console().lines.is_empty());
}

#[test]
fn recovered_reads_reset_escalation() {
    let config = PipelineConfig {
        max_consecutive_read_failures: 2,
        ..PipelineConfig::default()
    };
    let mut hw = MockHardware::new(2);
    hw.script = [Err(GLITCH), Ok(7), Err(GLITCH), Ok(7), Err(GLITCH)]
        .into_iter()
        .collect();
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let (mut pipeline, mut sink) = started(config, &mut hw);

    for _ in 0..5 {
        assert_eq!(pipeline.tick(&mut hw, &mut console, &mut sink), TickOutcome::Continue);
    }
    assert_eq!(pipeline.stats().read_failures, 3);
}

#[test]
fn fatal_read_error_halts_immediately() {
    let mut hw = MockHardware::new(2);
    hw.script = [Err(Error::Fatal(FatalError::HardwareFault(-1)))]
        .into_iter()
        .collect();
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let (mut pipeline, mut sink) = started(PipelineConfig::default(), &mut hw);

    assert_eq!(
        pipeline.tick(&mut hw, &mut console, &mut sink),
        TickOutcome::Halted(FatalError::HardwareFault(-1))
    );
    assert!(hw.pin_writes().is_empty());
}

#[test]
fn output_failure_never_halts_sampling() {
    let mut hw = MockHardware::new(2);
    hw.write_error = Some(TransientError::GpioWriteFailed(-1));
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let (mut pipeline, mut sink) = started(PipelineConfig::default(), &mut hw);

    for _ in 0..3 {
        assert_eq!(pipeline.tick(&mut hw, &mut console, &mut sink), TickOutcome::Continue);
    }

    assert_eq!(
        sink.count(|e| matches!(e, PipelineEvent::OutputFailed(_))),
        3
    );
    assert_eq!(pipeline.stats().output_failures, 3);
    // The console sink is independent of the failing pin.
    assert_eq!(console.console().lines.len(), 3);
}

#[test]
fn configure_failure_faults_before_sampling() {
    let mut hw = MockHardware::new(2);
    hw.configure_error = Some(Error::Fatal(FatalError::PeripheralInitFailed(0x102)));
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let (mut pipeline, mut sink) = started(PipelineConfig::default(), &mut hw);

    assert_eq!(pipeline.state(), StateId::Fault);
    assert_eq!(
        pipeline.tick(&mut hw, &mut console, &mut sink),
        TickOutcome::Halted(FatalError::PeripheralInitFailed(0x102))
    );
    assert_eq!(hw.reads(), 0);
}

#[test]
fn scheduler_failure_latches_fault() {
    let mut hw = MockHardware::new(2);
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let (mut pipeline, mut sink) = started(PipelineConfig::default(), &mut hw);

    pipeline.tick(&mut hw, &mut console, &mut sink);
    pipeline.enter_fault(FatalError::SchedulerYieldFailed, &mut sink);

    assert_eq!(
        pipeline.tick(&mut hw, &mut console, &mut sink),
        TickOutcome::Halted(FatalError::SchedulerYieldFailed)
    );
    assert_eq!(pipeline.fault(), Some(FatalError::SchedulerYieldFailed));
    assert_eq!(hw.pin_writes(), vec![1]);
}

#[test]
fn first_fatal_error_wins() {
    let mut hw = MockHardware::new(2);
    let (mut pipeline, mut sink) = started(PipelineConfig::default(), &mut hw);

    pipeline.enter_fault(FatalError::SchedulerYieldFailed, &mut sink);
    pipeline.enter_fault(FatalError::SensorUnresponsive, &mut sink);

    assert_eq!(pipeline.fault(), Some(FatalError::SchedulerYieldFailed));
    assert_eq!(
        sink.count(|e| matches!(e, PipelineEvent::FaultEntered(_))),
        1
    );
}
