//! Deterministic actor store driven by a command queue.
//!
//! `solver-core` owns a fixed-capacity buffer of [`ActorData`] records and
//! exposes a single mutation path into it: callers enqueue [`Command`]s with
//! [`Solver::add_command`], and [`Solver::update`] drains and applies them in
//! FIFO order once per tick. The store has no public mutable accessor, so every
//! write is funneled through the command transition pipeline.
pub mod command;
pub mod config;
pub mod error;
pub mod queue;
pub mod solver;
pub mod state;

pub use command::{
    Argument, ClearFlagsCommand, Command, CommandError, CommandTransition, IntegrateCommand,
    ResetCommand, SetFlagsCommand, SetPositionCommand, SetVelocityCommand, TranslateCommand,
    WriteCommand,
};
pub use config::SolverConfig;
pub use error::{ErrorSeverity, SolverError};
pub use queue::CommandQueue;
pub use solver::{
    CommandOutcome, CommandRecord, Solver, TickReport, TransitionPhase, TransitionPhaseError,
};
pub use state::{
    ActorChanges, ActorData, ActorFields, ActorFlags, ActorId, ActorStore, StoreDelta,
    StoreError, Tick, Vec3,
};
