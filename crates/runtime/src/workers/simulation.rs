//! Simulation worker that owns the authoritative [`solver_core::Solver`].
//!
//! Receives requests from [`RuntimeHandle`](crate::RuntimeHandle), buffers
//! commands in the solver's queue, drains them on tick and publishes events to
//! the EventBus.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use solver_core::{Command, CommandOutcome, Solver, SolverError, TickReport};

use crate::api::{StoreSnapshot, TickSummary};
use crate::events::{Event, EventBus, StoreEvent};

/// Requests that can be sent to the simulation worker
pub(crate) enum Request {
    /// Append commands to the solver queue, preserving their order.
    Enqueue { commands: Vec<Command> },
    /// Drain the queue and apply every command.
    Tick { reply: oneshot::Sender<TickSummary> },
    /// Query the current store (read-only).
    QueryStore { reply: oneshot::Sender<StoreSnapshot> },
    /// Number of commands waiting for the next tick.
    Pending { reply: oneshot::Sender<usize> },
    /// Stop the worker loop. Commands still queued are dropped.
    Shutdown,
}

/// Background task that processes solver requests.
///
/// Requests are handled one at a time in channel order, so commands sent
/// before a `Tick` request are applied by that tick and commands sent after
/// it wait for the next one.
pub(crate) struct SimulationWorker {
    solver: Solver,
    request_rx: mpsc::Receiver<Request>,
    event_bus: EventBus,
}

impl SimulationWorker {
    pub(crate) fn new(
        solver: Solver,
        request_rx: mpsc::Receiver<Request>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            capacity = solver.store().capacity(),
            "SimulationWorker initialized"
        );

        Self {
            solver,
            request_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                Some(request) = self.request_rx.recv() => {
                    if !self.handle_request(request) {
                        break;
                    }
                }
                else => break,
            }
        }

        let dropped = self.solver.pending();
        if dropped > 0 {
            warn!(dropped, "SimulationWorker stopped with commands still queued");
        }
        info!(tick = %self.solver.tick(), "SimulationWorker stopped");
    }

    /// Returns `false` when the loop should stop.
    fn handle_request(&mut self, request: Request) -> bool {
        match request {
            Request::Enqueue { commands } => {
                debug!(count = commands.len(), "Enqueueing commands");
                self.solver.add_commands(commands);
            }
            Request::Tick { reply } => {
                let summary = self.handle_tick();
                if reply.send(summary).is_err() {
                    debug!("Tick reply channel closed (caller dropped)");
                }
            }
            Request::QueryStore { reply } => {
                let snapshot = StoreSnapshot {
                    tick: self.solver.tick(),
                    store: self.solver.store().clone(),
                };
                if reply.send(snapshot).is_err() {
                    debug!("QueryStore reply channel closed (caller dropped)");
                }
            }
            Request::Pending { reply } => {
                if reply.send(self.solver.pending()).is_err() {
                    debug!("Pending reply channel closed (caller dropped)");
                }
            }
            Request::Shutdown => return false,
        }

        true
    }

    /// Runs one solver update and publishes its outcome.
    fn handle_tick(&mut self) -> TickSummary {
        let report = self.solver.update();
        self.publish_records(&report);

        let summary = TickSummary {
            tick: report.tick,
            applied: report.applied(),
            rejected: report.rejected(),
            changed_actors: report.delta.actors.len(),
            state_root: hex::encode(self.solver.store().state_root()),
        };

        if report.is_idle() {
            debug!(tick = %summary.tick, "Tick completed with empty queue");
        } else {
            info!(
                tick = %summary.tick,
                applied = summary.applied,
                rejected = summary.rejected,
                changed = summary.changed_actors,
                "Tick completed"
            );
        }

        self.event_bus.publish(Event::Tick(summary.clone()));
        summary
    }

    fn publish_records(&self, report: &TickReport) {
        for record in &report.records {
            let event = match &record.outcome {
                CommandOutcome::Applied { changed } => {
                    debug!(
                        tick = %report.tick,
                        command = record.command.as_snake_case(),
                        actor = %record.command.actor(),
                        changed = ?changed,
                        "Command applied"
                    );
                    StoreEvent::CommandApplied {
                        tick: report.tick,
                        command: record.command.clone(),
                        changed: *changed,
                    }
                }
                CommandOutcome::Rejected(error) => {
                    warn!(
                        tick = %report.tick,
                        command = record.command.as_snake_case(),
                        actor = %record.command.actor(),
                        phase = error.phase.as_str(),
                        code = error.error_code(),
                        severity = error.severity().as_str(),
                        "Command rejected: {}",
                        error.error
                    );
                    StoreEvent::CommandRejected {
                        tick: report.tick,
                        command: record.command.clone(),
                        phase: error.phase,
                        error: error.error.to_string(),
                    }
                }
            };

            self.event_bus.publish(Event::Store(event));
        }
    }
}
