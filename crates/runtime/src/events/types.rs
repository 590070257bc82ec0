//! Event types for different topics.

use serde::{Deserialize, Serialize};

use solver_core::{ActorFields, Command, Tick, TransitionPhase};

/// Per-command notifications, published in application order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreEvent {
    /// A drained command passed every phase.
    CommandApplied {
        tick: Tick,
        command: Command,
        /// Fields of the target slot that differ from before the command.
        changed: ActorFields,
    },

    /// A drained command was skipped; the store is as before it ran.
    CommandRejected {
        tick: Tick,
        command: Command,
        phase: TransitionPhase,
        error: String,
    },
}

impl StoreEvent {
    pub fn tick(&self) -> Tick {
        match self {
            StoreEvent::CommandApplied { tick, .. } | StoreEvent::CommandRejected { tick, .. } => {
                *tick
            }
        }
    }

    pub fn command(&self) -> &Command {
        match self {
            StoreEvent::CommandApplied { command, .. }
            | StoreEvent::CommandRejected { command, .. } => command,
        }
    }
}
