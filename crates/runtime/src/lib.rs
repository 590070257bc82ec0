//! Runtime host for the command-buffered actor solver.
//!
//! This crate wraps [`solver_core::Solver`] in a background worker that owns it
//! exclusively, so any number of producers can enqueue commands concurrently
//! while updates still run on a single logical thread. Consumers embed
//! [`Runtime`] to drive ticks and interact with the store through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    CommandProvider, IdleProvider, Result, RuntimeError, RuntimeHandle, ScriptedProvider,
    StoreSnapshot, TickSummary,
};
pub use events::{Event, EventBus, StoreEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
