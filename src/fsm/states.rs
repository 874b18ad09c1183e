//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers: no closures, no
//! dynamic dispatch, no heap.
//!
//! ```text
//!  INIT ──▶ SAMPLING ──[pass due]──▶ PROCESSING
//!              ▲                         │
//!              │                    [result ready]
//!              │                         ▼
//!              └────────────────────── OUTPUT
//!
//!  Any state ──[fatal error]──▶ FAULT   (terminal)
//! ```

use super::context::PipelineContext;
use super::{StateDescriptor, StateId};
use crate::pipeline::ProcessingStage;
use log::{error, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Init
        StateDescriptor {
            id: StateId::Init,
            name: "Init",
            on_enter: Some(init_enter),
            on_exit: None,
            on_update: init_update,
        },
        // Index 1: Sampling
        StateDescriptor {
            id: StateId::Sampling,
            name: "Sampling",
            on_enter: None,
            on_exit: None,
            on_update: sampling_update,
        },
        // Index 2: Processing
        StateDescriptor {
            id: StateId::Processing,
            name: "Processing",
            on_enter: Some(processing_enter),
            on_exit: None,
            on_update: processing_update,
        },
        // Index 3: Output
        StateDescriptor {
            id: StateId::Output,
            name: "Output",
            on_enter: None,
            on_exit: Some(output_exit),
            on_update: output_update,
        },
        // Index 4: Fault
        StateDescriptor {
            id: StateId::Fault,
            name: "Fault",
            on_enter: Some(fault_enter),
            on_exit: None,
            on_update: fault_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  INIT
// ═══════════════════════════════════════════════════════════════════════════

fn init_enter(ctx: &mut PipelineContext) {
    ctx.ticks_since_pass = 0;
    ctx.result = None;
    info!(
        "INIT: stage={} period={}ms pass every {} tick(s)",
        ctx.stage.name(),
        ctx.config.tick_period_ms,
        ctx.config.process_every_ticks
    );
}

fn init_update(ctx: &mut PipelineContext) -> Option<StateId> {
    if ctx.has_fault() {
        return Some(StateId::Fault);
    }
    Some(StateId::Sampling)
}

// ═══════════════════════════════════════════════════════════════════════════
//  SAMPLING: the service has already pushed this tick's sample
// ═══════════════════════════════════════════════════════════════════════════

fn sampling_update(ctx: &mut PipelineContext) -> Option<StateId> {
    if ctx.has_fault() {
        return Some(StateId::Fault);
    }
    if ctx.pass_due() {
        return Some(StateId::Processing);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  PROCESSING: drain the ring and run the stage exactly once per pass
// ═══════════════════════════════════════════════════════════════════════════

fn processing_enter(ctx: &mut PipelineContext) {
    let batch = ctx.ring.drain();
    ctx.result = Some(ctx.stage.consume(&batch));
    ctx.ticks_since_pass = 0;
    ctx.passes = ctx.passes.saturating_add(1);
}

fn processing_update(ctx: &mut PipelineContext) -> Option<StateId> {
    if ctx.has_fault() {
        return Some(StateId::Fault);
    }
    if ctx.result.is_some() {
        Some(StateId::Output)
    } else {
        Some(StateId::Sampling)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  OUTPUT: the service emits `ctx.result` to the sinks while here
// ═══════════════════════════════════════════════════════════════════════════

fn output_update(ctx: &mut PipelineContext) -> Option<StateId> {
    if ctx.has_fault() {
        return Some(StateId::Fault);
    }
    Some(StateId::Sampling)
}

fn output_exit(ctx: &mut PipelineContext) {
    // A result is consumed once, even if no sink took it.
    ctx.result = None;
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAULT: terminal, the watchdog resets the device
// ═══════════════════════════════════════════════════════════════════════════

fn fault_enter(ctx: &mut PipelineContext) {
    ctx.result = None;
    match ctx.fault {
        Some(e) => error!("FAULT: {}, processing halted until reset", e),
        None => error!("FAULT: entered without a latched error, processing halted"),
    }
}

fn fault_update(_ctx: &mut PipelineContext) -> Option<StateId> {
    None
}
