//! Asynchronous abstraction for sourcing commands.
//!
//! Runtime users plug in [`CommandProvider`] implementations so every step can
//! pull commands from input devices, scripted fixtures, replays or AI.
use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use solver_core::Command;

use super::errors::Result;
use super::handle::StoreSnapshot;

/// Trait for providing commands based on the current store.
///
/// Providers are polled once per [`Runtime::step`](crate::Runtime::step), in
/// registration order, before the tick runs.
#[async_trait]
pub trait CommandProvider: Send + Sync {
    /// Commands to enqueue for the upcoming tick.
    ///
    /// # Arguments
    /// * `snapshot` - Read-only copy of the store after the last tick
    async fn provide_commands(&self, snapshot: &StoreSnapshot) -> Result<Vec<Command>>;
}

/// A provider that never issues commands.
/// Useful for testing or as a placeholder.
pub struct IdleProvider;

#[async_trait]
impl CommandProvider for IdleProvider {
    async fn provide_commands(&self, _snapshot: &StoreSnapshot) -> Result<Vec<Command>> {
        Ok(Vec::new())
    }
}

/// Replays pre-recorded batches, one batch per step.
///
/// Once the script runs out it behaves like [`IdleProvider`].
pub struct ScriptedProvider {
    batches: Mutex<VecDeque<Vec<Command>>>,
}

impl ScriptedProvider {
    pub fn new(batches: impl IntoIterator<Item = Vec<Command>>) -> Self {
        Self {
            batches: Mutex::new(batches.into_iter().collect()),
        }
    }

    /// Batches not yet handed out.
    pub async fn remaining(&self) -> usize {
        self.batches.lock().await.len()
    }
}

#[async_trait]
impl CommandProvider for ScriptedProvider {
    async fn provide_commands(&self, _snapshot: &StoreSnapshot) -> Result<Vec<Command>> {
        Ok(self.batches.lock().await.pop_front().unwrap_or_default())
    }
}
