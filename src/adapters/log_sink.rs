//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured pipeline events to
//! the ESP-IDF logger (which goes to UART in production).

use log::{debug, error, info, warn};

use crate::app::events::PipelineEvent;
use crate::app::ports::EventSink;
use crate::fsm::StateId;

/// Adapter that logs every [`PipelineEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={:?} | ticks={} passes={} | overwritten={} | \
                     read_fail={} out_fail={} | last={:?}",
                    t.state,
                    t.ticks,
                    t.passes,
                    t.samples_overwritten,
                    t.read_failures,
                    t.output_failures,
                    t.last_result,
                );
            }
            // The loop cycles Sampling -> Processing -> Output every pass.
            PipelineEvent::StateChanged { from, to } if *to != StateId::Fault => {
                debug!("STATE | {:?} -> {:?}", from, to);
            }
            PipelineEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            PipelineEvent::SampleSkipped(e) => {
                warn!("SKIP | sample not captured: {}", e);
            }
            PipelineEvent::OutputFailed(e) => {
                warn!("OUTPUT | sink failed: {}", e);
            }
            PipelineEvent::FaultEntered(e) => {
                error!("FAULT | {}, awaiting watchdog reset", e);
            }
            PipelineEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
