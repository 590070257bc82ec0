//! FIFO buffer of pending commands.

use std::collections::VecDeque;

use crate::command::Command;

/// Commands waiting for the next tick, in insertion order.
///
/// Unbounded. Back-pressure, if any, belongs to the host that feeds it.
#[derive(Clone, Debug, Default)]
pub struct CommandQueue {
    commands: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            commands: VecDeque::new(),
        }
    }

    /// Appends a command to the tail.
    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn extend<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = Command>,
    {
        self.commands.extend(commands);
    }

    /// Removes every queued command, yielding them head first.
    ///
    /// Only the commands present at the time of the call are taken.
    pub fn drain(&mut self) -> impl Iterator<Item = Command> {
        std::mem::take(&mut self.commands).into_iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Queued commands, head first.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}
