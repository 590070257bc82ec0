//! Command transition dispatch and execution logic.

use crate::command::{Command, CommandError, CommandTransition};
use crate::state::ActorStore;

use super::errors::{TransitionPhase, TransitionPhaseError};

/// Runs a transition through the three-phase pipeline.
///
/// The target slot is captured before `apply` and written back if `apply` or
/// `post_validate` fails, so a rejected command never leaves a partial write.
#[inline]
fn drive_transition<T>(
    transition: &T,
    store: &mut ActorStore,
) -> Result<(), TransitionPhaseError<CommandError>>
where
    T: CommandTransition,
{
    transition
        .pre_validate(store)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let actor = transition.actor();
    let saved = store.get(actor).copied();

    let outcome = transition
        .apply(store)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))
        .and_then(|()| {
            transition
                .post_validate(store)
                .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))
        });

    if outcome.is_err()
        && let (Some(saved), Some(slot)) = (saved, store.slot_mut(actor))
    {
        *slot = saved;
    }

    outcome
}

/// Routes a command to its transition.
pub(super) fn execute_command(
    command: &Command,
    store: &mut ActorStore,
) -> Result<(), TransitionPhaseError<CommandError>> {
    match command {
        Command::SetPosition(transition) => drive_transition(transition, store),
        Command::Translate(transition) => drive_transition(transition, store),
        Command::SetVelocity(transition) => drive_transition(transition, store),
        Command::Integrate(transition) => drive_transition(transition, store),
        Command::SetFlags(transition) => drive_transition(transition, store),
        Command::ClearFlags(transition) => drive_transition(transition, store),
        Command::Write(transition) => drive_transition(transition, store),
        Command::Reset(transition) => drive_transition(transition, store),
    }
}
