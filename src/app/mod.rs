//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the rules of the sampling pipeline: FSM
//! orchestration, fault escalation and sink delivery.  All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
