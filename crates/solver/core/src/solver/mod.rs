//! Command-buffered single-writer solver.
//!
//! The [`Solver`] owns the [`ActorStore`] and the [`CommandQueue`] in front
//! of it. [`Solver::add_command`] only enqueues; [`Solver::update`] is the one
//! place where queued commands reach the store, once per tick and in FIFO
//! order.

mod errors;
mod transition;

pub use errors::{TransitionPhase, TransitionPhaseError};

use crate::command::{Command, CommandError};
use crate::config::SolverConfig;
use crate::queue::CommandQueue;
use crate::state::{ActorFields, ActorStore, StoreDelta, StoreError, Tick};

/// Result of applying one command during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandOutcome {
    /// Command passed every phase. `changed` may be empty for no-op writes.
    Applied { changed: ActorFields },

    /// Command failed a phase and the store was left as before it ran.
    Rejected(TransitionPhaseError<CommandError>),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// One drained command together with its outcome.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandRecord {
    pub command: Command,
    pub outcome: CommandOutcome,
}

/// Everything a single [`Solver::update`] did.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub tick: Tick,

    /// Drained commands in application order.
    pub records: Vec<CommandRecord>,

    /// Net change to the store across the whole tick.
    pub delta: StoreDelta,
}

impl TickReport {
    pub fn applied(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.outcome.is_applied())
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.records.len() - self.applied()
    }

    /// Rejected commands with the phase error that stopped them.
    pub fn rejections(
        &self,
    ) -> impl Iterator<Item = (&Command, &TransitionPhaseError<CommandError>)> {
        self.records.iter().filter_map(|record| match &record.outcome {
            CommandOutcome::Rejected(error) => Some((&record.command, error)),
            CommandOutcome::Applied { .. } => None,
        })
    }

    /// True when the tick drained nothing.
    pub fn is_idle(&self) -> bool {
        self.records.is_empty()
    }
}

/// Owner of the actor buffer and the only writer to it.
///
/// # Invariants
///
/// - `add_command` never touches the store.
/// - `update` drains the queue completely and applies commands in enqueue order.
/// - A rejected command does not stop the drain.
#[derive(Clone, Debug)]
pub struct Solver {
    store: ActorStore,
    queue: CommandQueue,
    tick: Tick,
}

impl Solver {
    /// Creates a solver with `config.capacity` default slots.
    pub fn new(config: &SolverConfig) -> Result<Self, StoreError> {
        Ok(Self::with_store(ActorStore::with_config(config)?))
    }

    /// Wraps a pre-seeded store.
    pub fn with_store(store: ActorStore) -> Self {
        Self {
            store,
            queue: CommandQueue::new(),
            tick: Tick::ZERO,
        }
    }

    /// Appends a command to the tail of the queue. Applied on the next `update`.
    pub fn add_command(&mut self, command: impl Into<Command>) {
        self.queue.push(command.into());
    }

    pub fn add_commands<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = Command>,
    {
        self.queue.extend(commands);
    }

    /// Drains and applies all queued commands, then advances the tick.
    ///
    /// With an empty queue the store is left untouched; the tick still
    /// advances so hosts can count frames.
    pub fn update(&mut self) -> TickReport {
        self.tick = self.tick.next();

        if self.queue.is_empty() {
            return TickReport {
                tick: self.tick,
                records: Vec::new(),
                delta: StoreDelta {
                    tick: self.tick,
                    actors: Vec::new(),
                },
            };
        }

        let before = self.store.clone();
        let mut records = Vec::with_capacity(self.queue.len());

        for command in self.queue.drain() {
            let actor = command.actor();
            let previous = self.store.get(actor).copied();

            let outcome = match transition::execute_command(&command, &mut self.store) {
                Ok(()) => {
                    let changed = match (previous, self.store.get(actor)) {
                        (Some(old), Some(new)) => ActorFields::between(&old, new),
                        _ => ActorFields::empty(),
                    };
                    CommandOutcome::Applied { changed }
                }
                Err(error) => CommandOutcome::Rejected(error),
            };

            records.push(CommandRecord { command, outcome });
        }

        let delta = StoreDelta::from_stores(self.tick, &before, &self.store);

        TickReport {
            tick: self.tick,
            records,
            delta,
        }
    }

    pub fn store(&self) -> &ActorStore {
        &self.store
    }

    /// Last completed tick. `Tick::ZERO` before the first update.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Number of commands waiting for the next update.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
