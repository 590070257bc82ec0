//! Flag commands.
//!
//! Flags combine as sets: `SetFlags` is a union, `ClearFlags` a difference.
//! Both are idempotent.

use crate::command::{CommandError, CommandTransition, slot_mut};
use crate::state::{ActorFlags, ActorId, ActorStore};

/// Raises the given flags on an actor, keeping the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetFlagsCommand {
    pub actor: ActorId,
    pub flags: ActorFlags,
}

impl SetFlagsCommand {
    pub fn new(actor: ActorId, flags: ActorFlags) -> Self {
        Self { actor, flags }
    }
}

impl CommandTransition for SetFlagsCommand {
    fn actor(&self) -> ActorId {
        self.actor
    }

    fn apply(&self, store: &mut ActorStore) -> Result<(), CommandError> {
        slot_mut(store, self.actor)?.flags.insert(self.flags);
        Ok(())
    }
}

/// Lowers the given flags on an actor, keeping the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClearFlagsCommand {
    pub actor: ActorId,
    pub flags: ActorFlags,
}

impl ClearFlagsCommand {
    pub fn new(actor: ActorId, flags: ActorFlags) -> Self {
        Self { actor, flags }
    }
}

impl CommandTransition for ClearFlagsCommand {
    fn actor(&self) -> ActorId {
        self.actor
    }

    fn apply(&self, store: &mut ActorStore) -> Result<(), CommandError> {
        slot_mut(store, self.actor)?.flags.remove(self.flags);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_clear() {
        let mut store = ActorStore::new(1).unwrap();
        let actor = ActorId(0);

        SetFlagsCommand::new(actor, ActorFlags::ACTIVE | ActorFlags::VISIBLE)
            .apply(&mut store)
            .unwrap();
        SetFlagsCommand::new(actor, ActorFlags::ACTIVE)
            .apply(&mut store)
            .unwrap();
        assert_eq!(
            store.get(actor).unwrap().flags,
            ActorFlags::ACTIVE | ActorFlags::VISIBLE
        );

        ClearFlagsCommand::new(actor, ActorFlags::ACTIVE | ActorFlags::SLEEPING)
            .apply(&mut store)
            .unwrap();
        assert_eq!(store.get(actor).unwrap().flags, ActorFlags::VISIBLE);
    }

    #[test]
    fn default_pre_validate_checks_slot() {
        let store = ActorStore::new(1).unwrap();

        assert!(
            SetFlagsCommand::new(ActorId(0), ActorFlags::ACTIVE)
                .pre_validate(&store)
                .is_ok()
        );
        assert!(matches!(
            ClearFlagsCommand::new(ActorId(9), ActorFlags::ACTIVE).pre_validate(&store),
            Err(CommandError::ActorNotFound { .. })
        ));
    }
}
