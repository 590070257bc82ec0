//! Whole-slot commands.

use crate::command::{Argument, CommandError, CommandTransition, ensure_actor, slot_mut};
use crate::state::{ActorData, ActorId, ActorStore};

/// Overwrites an actor slot with a complete record.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteCommand {
    pub actor: ActorId,
    pub data: ActorData,
}

impl WriteCommand {
    pub fn new(actor: ActorId, data: ActorData) -> Self {
        Self { actor, data }
    }
}

impl CommandTransition for WriteCommand {
    fn actor(&self) -> ActorId {
        self.actor
    }

    fn pre_validate(&self, store: &ActorStore) -> Result<(), CommandError> {
        ensure_actor(store, self.actor)?;
        if !self.data.is_finite() {
            return Err(CommandError::NonFiniteArgument { field: Argument::Data });
        }
        Ok(())
    }

    fn apply(&self, store: &mut ActorStore) -> Result<(), CommandError> {
        *slot_mut(store, self.actor)? = self.data;
        Ok(())
    }
}

/// Returns an actor slot to `ActorData::default()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResetCommand {
    pub actor: ActorId,
}

impl ResetCommand {
    pub fn new(actor: ActorId) -> Self {
        Self { actor }
    }
}

impl CommandTransition for ResetCommand {
    fn actor(&self) -> ActorId {
        self.actor
    }

    fn apply(&self, store: &mut ActorStore) -> Result<(), CommandError> {
        *slot_mut(store, self.actor)? = ActorData::default();
        Ok(())
    }
}
