//! Position and velocity commands.

use crate::command::{
    Argument, CommandError, CommandTransition, ensure_actor, ensure_finite, ensure_finite_slot,
    slot_mut,
};
use crate::state::{ActorId, ActorStore, Vec3};

/// Moves an actor to an absolute position.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetPositionCommand {
    pub actor: ActorId,
    pub position: Vec3,
}

impl SetPositionCommand {
    pub fn new(actor: ActorId, position: Vec3) -> Self {
        Self { actor, position }
    }
}

impl CommandTransition for SetPositionCommand {
    fn actor(&self) -> ActorId {
        self.actor
    }

    fn pre_validate(&self, store: &ActorStore) -> Result<(), CommandError> {
        ensure_actor(store, self.actor)?;
        ensure_finite(self.position, Argument::Position)
    }

    fn apply(&self, store: &mut ActorStore) -> Result<(), CommandError> {
        slot_mut(store, self.actor)?.position = self.position;
        Ok(())
    }
}

/// Offsets an actor's position.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TranslateCommand {
    pub actor: ActorId,
    pub offset: Vec3,
}

impl TranslateCommand {
    pub fn new(actor: ActorId, offset: Vec3) -> Self {
        Self { actor, offset }
    }
}

impl CommandTransition for TranslateCommand {
    fn actor(&self) -> ActorId {
        self.actor
    }

    fn pre_validate(&self, store: &ActorStore) -> Result<(), CommandError> {
        ensure_actor(store, self.actor)?;
        ensure_finite(self.offset, Argument::Offset)
    }

    fn apply(&self, store: &mut ActorStore) -> Result<(), CommandError> {
        slot_mut(store, self.actor)?.position += self.offset;
        Ok(())
    }

    fn post_validate(&self, store: &ActorStore) -> Result<(), CommandError> {
        ensure_finite_slot(store, self.actor)
    }
}

/// Replaces an actor's velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetVelocityCommand {
    pub actor: ActorId,
    pub velocity: Vec3,
}

impl SetVelocityCommand {
    pub fn new(actor: ActorId, velocity: Vec3) -> Self {
        Self { actor, velocity }
    }
}

impl CommandTransition for SetVelocityCommand {
    fn actor(&self) -> ActorId {
        self.actor
    }

    fn pre_validate(&self, store: &ActorStore) -> Result<(), CommandError> {
        ensure_actor(store, self.actor)?;
        ensure_finite(self.velocity, Argument::Velocity)
    }

    fn apply(&self, store: &mut ActorStore) -> Result<(), CommandError> {
        slot_mut(store, self.actor)?.velocity = self.velocity;
        Ok(())
    }
}

/// Advances an actor's position by its velocity over `dt` seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegrateCommand {
    pub actor: ActorId,
    pub dt: f32,
}

impl IntegrateCommand {
    pub fn new(actor: ActorId, dt: f32) -> Self {
        Self { actor, dt }
    }
}

impl CommandTransition for IntegrateCommand {
    fn actor(&self) -> ActorId {
        self.actor
    }

    fn pre_validate(&self, store: &ActorStore) -> Result<(), CommandError> {
        ensure_actor(store, self.actor)?;
        if !self.dt.is_finite() || self.dt < 0.0 {
            return Err(CommandError::InvalidTimeStep);
        }
        Ok(())
    }

    fn apply(&self, store: &mut ActorStore) -> Result<(), CommandError> {
        let slot = slot_mut(store, self.actor)?;
        slot.position += slot.velocity * self.dt;
        Ok(())
    }

    fn post_validate(&self, store: &ActorStore) -> Result<(), CommandError> {
        ensure_finite_slot(store, self.actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ActorData;

    fn store() -> ActorStore {
        ActorStore::new(2).unwrap()
    }

    #[test]
    fn set_position_overwrites() {
        let mut store = store();
        let cmd = SetPositionCommand::new(ActorId(1), Vec3::new(1.0, 2.0, 3.0));

        cmd.pre_validate(&store).unwrap();
        cmd.apply(&mut store).unwrap();

        assert_eq!(store.get(ActorId(1)).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(*store.get(ActorId(0)).unwrap(), ActorData::default());
    }

    #[test]
    fn set_position_rejects_missing_actor_and_nan() {
        let store = store();

        assert_eq!(
            SetPositionCommand::new(ActorId(2), Vec3::ZERO).pre_validate(&store),
            Err(CommandError::ActorNotFound {
                actor: ActorId(2),
                capacity: 2
            })
        );
        assert_eq!(
            SetPositionCommand::new(ActorId(0), Vec3::new(f32::NAN, 0.0, 0.0))
                .pre_validate(&store),
            Err(CommandError::NonFiniteArgument {
                field: Argument::Position
            })
        );
    }

    #[test]
    fn translate_accumulates() {
        let mut store = store();
        let cmd = TranslateCommand::new(ActorId(0), Vec3::new(0.5, 0.0, -1.0));

        cmd.apply(&mut store).unwrap();
        cmd.apply(&mut store).unwrap();
        cmd.post_validate(&store).unwrap();

        assert_eq!(store.get(ActorId(0)).unwrap().position, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn translate_overflow_fails_post_validation() {
        let mut store = store();
        let big = Vec3::new(f32::MAX, 0.0, 0.0);
        let cmd = TranslateCommand::new(ActorId(0), big);

        cmd.apply(&mut store).unwrap();
        cmd.pre_validate(&store).unwrap();
        cmd.apply(&mut store).unwrap();

        assert_eq!(
            cmd.post_validate(&store),
            Err(CommandError::NonFiniteResult { actor: ActorId(0) })
        );
    }

    #[test]
    fn integrate_uses_velocity() {
        let mut store = store();
        SetVelocityCommand::new(ActorId(1), Vec3::new(2.0, 0.0, 4.0))
            .apply(&mut store)
            .unwrap();

        let cmd = IntegrateCommand::new(ActorId(1), 0.5);
        cmd.pre_validate(&store).unwrap();
        cmd.apply(&mut store).unwrap();

        assert_eq!(store.get(ActorId(1)).unwrap().position, Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn integrate_rejects_bad_time_step() {
        let store = store();

        for dt in [-0.1, f32::NAN, f32::INFINITY] {
            assert_eq!(
                IntegrateCommand::new(ActorId(0), dt).pre_validate(&store),
                Err(CommandError::InvalidTimeStep)
            );
        }
        assert!(IntegrateCommand::new(ActorId(0), 0.0).pre_validate(&store).is_ok());
    }
}
