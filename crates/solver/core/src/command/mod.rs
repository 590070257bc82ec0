//! Deferred mutation requests.
//!
//! Every change to the [`ActorStore`] is expressed as a [`Command`]. The enum
//! is closed: each variant wraps a small struct implementing
//! [`CommandTransition`], and the solver dispatches on the variant.
//!
//! # Module Structure
//!
//! - `error`: [`CommandError`]
//! - `kinds::motion`: position and velocity commands
//! - `kinds::flags`: flag set/clear commands
//! - `kinds::slot`: whole-slot write and reset

pub mod error;
pub mod kinds;

pub use error::{Argument, CommandError};
pub use kinds::{
    ClearFlagsCommand, IntegrateCommand, ResetCommand, SetFlagsCommand, SetPositionCommand,
    SetVelocityCommand, TranslateCommand, WriteCommand,
};

use crate::state::{ActorData, ActorFlags, ActorId, ActorStore, Vec3};

/// Defines how a concrete command variant mutates the store.
///
/// The solver drives every transition as `pre_validate` → `apply` →
/// `post_validate`. A failing `pre_validate` leaves the store untouched; a
/// failing `post_validate` has its slot restored by the solver.
pub trait CommandTransition {
    /// Slot the command targets.
    fn actor(&self) -> ActorId;

    /// Validates pre-conditions using the store **before** mutation.
    ///
    /// The default only checks that the target slot exists.
    fn pre_validate(&self, store: &ActorStore) -> Result<(), CommandError> {
        ensure_actor(store, self.actor())
    }

    /// Applies the command. Implementations may assume `pre_validate` passed.
    fn apply(&self, store: &mut ActorStore) -> Result<(), CommandError>;

    /// Validates post-conditions using the store **after** mutation.
    fn post_validate(&self, _store: &ActorStore) -> Result<(), CommandError> {
        Ok(())
    }
}

/// Top-level command enum accepted by the queue.
#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    SetPosition(SetPositionCommand),
    Translate(TranslateCommand),
    SetVelocity(SetVelocityCommand),
    Integrate(IntegrateCommand),
    SetFlags(SetFlagsCommand),
    ClearFlags(ClearFlagsCommand),
    Write(WriteCommand),
    Reset(ResetCommand),
}

impl Command {
    pub fn set_position(actor: ActorId, position: Vec3) -> Self {
        SetPositionCommand::new(actor, position).into()
    }

    pub fn translate(actor: ActorId, offset: Vec3) -> Self {
        TranslateCommand::new(actor, offset).into()
    }

    pub fn set_velocity(actor: ActorId, velocity: Vec3) -> Self {
        SetVelocityCommand::new(actor, velocity).into()
    }

    pub fn integrate(actor: ActorId, dt: f32) -> Self {
        IntegrateCommand::new(actor, dt).into()
    }

    pub fn set_flags(actor: ActorId, flags: ActorFlags) -> Self {
        SetFlagsCommand::new(actor, flags).into()
    }

    pub fn clear_flags(actor: ActorId, flags: ActorFlags) -> Self {
        ClearFlagsCommand::new(actor, flags).into()
    }

    pub fn write(actor: ActorId, data: ActorData) -> Self {
        WriteCommand::new(actor, data).into()
    }

    pub fn reset(actor: ActorId) -> Self {
        ResetCommand::new(actor).into()
    }

    /// Slot this command targets.
    pub fn actor(&self) -> ActorId {
        match self {
            Command::SetPosition(cmd) => cmd.actor(),
            Command::Translate(cmd) => cmd.actor(),
            Command::SetVelocity(cmd) => cmd.actor(),
            Command::Integrate(cmd) => cmd.actor(),
            Command::SetFlags(cmd) => cmd.actor(),
            Command::ClearFlags(cmd) => cmd.actor(),
            Command::Write(cmd) => cmd.actor(),
            Command::Reset(cmd) => cmd.actor(),
        }
    }

    /// Returns the snake_case name of the variant, for logs and event keys.
    pub fn as_snake_case(&self) -> &'static str {
        self.into()
    }
}

macro_rules! impl_from_command {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Command {
                fn from(command: $ty) -> Self {
                    Self::$variant(command)
                }
            }
        )*
    };
}

impl_from_command!(
    SetPosition(SetPositionCommand),
    Translate(TranslateCommand),
    SetVelocity(SetVelocityCommand),
    Integrate(IntegrateCommand),
    SetFlags(SetFlagsCommand),
    ClearFlags(ClearFlagsCommand),
    Write(WriteCommand),
    Reset(ResetCommand),
);

pub(crate) fn ensure_actor(store: &ActorStore, actor: ActorId) -> Result<(), CommandError> {
    if store.contains(actor) {
        Ok(())
    } else {
        Err(CommandError::ActorNotFound {
            actor,
            capacity: store.capacity(),
        })
    }
}

pub(crate) fn ensure_finite(value: Vec3, field: Argument) -> Result<(), CommandError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CommandError::NonFiniteArgument { field })
    }
}

/// Shared post-condition: the target slot holds only finite values.
pub(crate) fn ensure_finite_slot(store: &ActorStore, actor: ActorId) -> Result<(), CommandError> {
    match store.get(actor) {
        Some(data) if data.is_finite() => Ok(()),
        Some(_) => Err(CommandError::NonFiniteResult { actor }),
        None => Err(CommandError::ActorNotFound {
            actor,
            capacity: store.capacity(),
        }),
    }
}

/// Mutable slot lookup for `apply` implementations.
pub(crate) fn slot_mut(
    store: &mut ActorStore,
    actor: ActorId,
) -> Result<&mut ActorData, CommandError> {
    let capacity = store.capacity();
    store
        .slot_mut(actor)
        .ok_or(CommandError::ActorNotFound { actor, capacity })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_names_are_snake_case() {
        assert_eq!(
            Command::set_position(ActorId(0), Vec3::ZERO).as_snake_case(),
            "set_position"
        );
        assert_eq!(
            Command::clear_flags(ActorId(0), ActorFlags::ACTIVE).as_snake_case(),
            "clear_flags"
        );
        assert_eq!(Command::reset(ActorId(3)).as_snake_case(), "reset");
    }

    #[test]
    fn actor_routes_through_variant() {
        assert_eq!(Command::integrate(ActorId(5), 0.5).actor(), ActorId(5));
        assert_eq!(
            Command::write(ActorId(2), ActorData::default()).actor(),
            ActorId(2)
        );
    }
}
