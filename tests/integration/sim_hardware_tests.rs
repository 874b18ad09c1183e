//! End-to-end run of the pipeline on the host simulation of the real
//! hardware adapter (GPIO bank + ADC model).

use embedded_hal::digital::PinState;
use synapsys::adapters::console::ConsoleSink;
use synapsys::adapters::hardware::HardwareAdapter;
use synapsys::app::service::{Pipeline, TickOutcome};
use synapsys::config::PipelineConfig;
use synapsys::error::{FatalError, TransientError};

use crate::mock_hw::{MockConsole, RecordingSink};

#[test]
fn simulated_board_blinks_gpio2() {
    let config = PipelineConfig::default();
    let mut hw = HardwareAdapter::new(&config).unwrap();
    let mut console = ConsoleSink::new(MockConsole::default(), true);
    let mut sink = RecordingSink::new();
    let mut pipeline = Pipeline::new(config);
    pipeline.start(&mut hw, &mut sink);

    let mut levels = Vec::new();
    for _ in 0..4 {
        assert_eq!(pipeline.tick(&mut hw, &mut console, &mut sink), TickOutcome::Continue);
        levels.push(hw.gpio().level(2));
    }

    assert_eq!(
        levels,
        vec![
            Some(PinState::High),
            Some(PinState::Low),
            Some(PinState::High),
            Some(PinState::Low)
        ]
    );
}

#[test]
fn simulated_adc_glitches_escalate() {
    let config = PipelineConfig {
        max_consecutive_read_failures: 2,
        ..PipelineConfig::default()
    };
    let mut hw = HardwareAdapter::new(&config).unwrap();
    hw.adc()
        .fail_next_reads(5, TransientError::SampleReadGlitch.into());
    let mut console = ConsoleSink::new(MockConsole::default(), false);
    let mut sink = RecordingSink::new();
    let mut pipeline = Pipeline::new(config);
    pipeline.start(&mut hw, &mut sink);

    assert_eq!(pipeline.tick(&mut hw, &mut console, &mut sink), TickOutcome::Continue);
    assert_eq!(
        pipeline.tick(&mut hw, &mut console, &mut sink),
        TickOutcome::Halted(FatalError::SensorUnresponsive)
    );
}

#[test]
fn invalid_output_pin_faults_at_start() {
    let config = PipelineConfig {
        output_pin: 48,
        ..PipelineConfig::default()
    };
    let mut hw = HardwareAdapter::new(&config).unwrap();
    let mut sink = RecordingSink::new();
    let mut pipeline = Pipeline::new(config);
    pipeline.start(&mut hw, &mut sink);

    assert_eq!(pipeline.fault(), Some(FatalError::PeripheralInitFailed(0x102)));
}
