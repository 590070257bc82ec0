//! Command validation errors.

use crate::error::{ErrorSeverity, SolverError};
use crate::state::ActorId;

/// Command argument named in validation errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Argument {
    Position,
    Offset,
    Velocity,
    Data,
}

impl Argument {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Offset => "offset",
            Self::Velocity => "velocity",
            Self::Data => "data",
        }
    }
}

impl core::fmt::Display for Argument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors a command can raise in any phase of its transition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    /// Target slot is outside the store.
    #[error("actor {actor} is outside the store (capacity {capacity})")]
    ActorNotFound { actor: ActorId, capacity: usize },

    /// A vector argument contains NaN or infinity.
    #[error("{field} must be finite")]
    NonFiniteArgument { field: Argument },

    /// Integration step is negative, NaN or infinite.
    #[error("time step must be finite and non-negative")]
    InvalidTimeStep,

    /// Applying the command produced a non-finite record.
    #[error("actor {actor} ended in a non-finite state")]
    NonFiniteResult { actor: ActorId },
}

impl SolverError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        use CommandError::*;
        match self {
            ActorNotFound { .. } | NonFiniteArgument { .. } | InvalidTimeStep => {
                ErrorSeverity::Validation
            }
            // Overflow depends on the slot's current contents, so the same
            // command may succeed once the slot changes.
            NonFiniteResult { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        use CommandError::*;
        match self {
            ActorNotFound { .. } => "COMMAND_ACTOR_NOT_FOUND",
            NonFiniteArgument { .. } => "COMMAND_NON_FINITE_ARGUMENT",
            InvalidTimeStep => "COMMAND_INVALID_TIME_STEP",
            NonFiniteResult { .. } => "COMMAND_NON_FINITE_RESULT",
        }
    }
}
