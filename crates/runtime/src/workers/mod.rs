//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the solver and is the only task that mutates
//! the actor store.

mod simulation;

pub(crate) use simulation::{Request, SimulationWorker};
