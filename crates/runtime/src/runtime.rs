//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up request/event channels, and
//! exposes a builder-based API for clients to drive the solver.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use solver_core::{ActorStore, Solver, SolverConfig};

use crate::api::{CommandProvider, Result, RuntimeError, RuntimeHandle, TickSummary};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Request, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub solver: SolverConfig,
    /// Bound of the request channel between handles and the worker.
    pub command_buffer_size: usize,
    /// Per-topic broadcast capacity.
    pub event_buffer_size: usize,
    /// Pacing of [`Runtime::run_for`].
    pub tick_interval: Duration,
}

impl RuntimeConfig {
    pub const DEFAULT_COMMAND_BUFFER_SIZE: usize = 256;
    pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 128;
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            command_buffer_size: Self::DEFAULT_COMMAND_BUFFER_SIZE,
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER_SIZE,
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Main runtime that orchestrates the solver
///
/// Runtime owns the worker and polls providers.
/// [`RuntimeHandle`] provides a cloneable façade for producers.
pub struct Runtime {
    // Shared handle (can be cloned for clients)
    handle: RuntimeHandle,

    // Command providers (injected by user), polled in registration order
    providers: Vec<Box<dyn CommandProvider>>,

    tick_interval: Duration,

    // Background worker
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across producers and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Register another command provider.
    pub fn add_provider(&mut self, provider: impl CommandProvider + 'static) {
        self.providers.push(Box::new(provider));
    }

    /// Execute a single step: poll providers, enqueue their commands, tick.
    ///
    /// Commands that producers sent through cloned handles before this call
    /// are applied ahead of provider output.
    pub async fn step(&mut self) -> Result<TickSummary> {
        if !self.providers.is_empty() {
            let snapshot = self.handle.query_store().await?;

            for provider in &self.providers {
                let commands = provider.provide_commands(&snapshot).await?;
                debug!(count = commands.len(), "Provider supplied commands");
                self.handle.add_commands(commands).await?;
            }
        }

        self.handle.tick().await
    }

    /// Run `ticks` steps, paced by the configured tick interval.
    ///
    /// Returns one summary per step. Late ticks are skipped rather than
    /// bunched up.
    pub async fn run_for(&mut self, ticks: usize) -> Result<Vec<TickSummary>> {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut summaries = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            interval.tick().await;
            summaries.push(self.step().await?);
        }

        Ok(summaries)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Stops the worker even when cloned handles are still alive; their later
    /// requests fail with [`RuntimeError::CommandChannelClosed`].
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown_worker().await?;
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    store: Option<ActorStore>,
    providers: Vec<Box<dyn CommandProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            store: None,
            providers: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed the solver with an existing store instead of default slots.
    ///
    /// The store's capacity wins over `config.solver.capacity`.
    pub fn initial_store(mut self, store: ActorStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Add a command provider (optional, repeatable)
    pub fn provider(mut self, provider: impl CommandProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Build the runtime and spawn the worker
    pub async fn build(self) -> Result<Runtime> {
        let solver = match self.store {
            Some(store) => Solver::with_store(store),
            None => Solver::new(&self.config.solver)?,
        };

        let (request_tx, request_rx) =
            mpsc::channel::<Request>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(request_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(solver, request_rx, event_bus);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            providers: self.providers,
            tick_interval: self.config.tick_interval,
            sim_worker_handle,
        })
    }
}
