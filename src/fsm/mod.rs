//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌────────────┬───────────┬──────────┬───────────────────┐   │
//! │  │ StateId    │ on_enter  │ on_exit  │ on_update         │   │
//! │  ├────────────┼───────────┼──────────┼───────────────────┤   │
//! │  │ Init       │ fn(ctx)   │ -        │ fn(ctx)->Option<> │   │
//! │  │ Sampling   │ -         │ -        │ fn(ctx)->Option<> │   │
//! │  │ Processing │ fn(ctx)   │ -        │ fn(ctx)->Option<> │   │
//! │  │ Output     │ -         │ fn(ctx)  │ fn(ctx)->Option<> │   │
//! │  │ Fault      │ fn(ctx)   │ -        │ fn(ctx)->Option<> │   │
//! │  └────────────┴───────────┴──────────┴───────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each step the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next.  `Fault` is terminal:
//! no transition out of it is ever executed.

pub mod context;
pub mod states;

use context::PipelineContext;
use log::{info, warn};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all loop states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Init = 0,
    Sampling = 1,
    Processing = 2,
    Output = 3,
    Fault = 4,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert a `u8` index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Fault` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Init,
            1 => Self::Sampling,
            2 => Self::Processing,
            3 => Self::Output,
            4 => Self::Fault,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Fault
            }
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Fault
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut PipelineContext);

/// Signature for the per-step update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut PipelineContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Total steps executed.
    step_count: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self {
            table,
            current: initial as usize,
            step_count: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    pub fn start(&mut self, ctx: &mut PipelineContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one step.
    pub fn step(&mut self, ctx: &mut PipelineContext) {
        self.step_count += 1;
        if let Some(next_id) = (self.table[self.current].on_update)(ctx) {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition (used to latch `Fault` regardless of
    /// what `on_update` returned).  Ignored once in `Fault`.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut PipelineContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// Total steps executed since construction.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut PipelineContext) {
        if self.current_state().is_terminal() {
            warn!(
                "FSM: refusing transition {} -> {:?}, Fault is terminal",
                self.table[self.current].name, next_id
            );
            return;
        }
        let next_idx = next_id as usize;

        log::trace!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
