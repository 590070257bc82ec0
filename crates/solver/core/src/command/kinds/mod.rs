//! Concrete command variants.

mod flags;
mod motion;
mod slot;

pub use flags::{ClearFlagsCommand, SetFlagsCommand};
pub use motion::{IntegrateCommand, SetPositionCommand, SetVelocityCommand, TranslateCommand};
pub use slot::{ResetCommand, WriteCommand};
