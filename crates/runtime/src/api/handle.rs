//! Cloneable façade for issuing requests to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! enqueueing commands, ticking the solver or streaming events from specific
//! topics. It is the only way producers reach the store.
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};

use solver_core::{ActorStore, Command, Tick};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Request;

/// Outcome of one tick as reported to clients and on [`Topic::Tick`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    pub tick: Tick,
    /// Commands that passed every transition phase.
    pub applied: usize,
    /// Commands skipped because a phase failed.
    pub rejected: usize,
    /// Slots whose contents differ from the start of the tick.
    pub changed_actors: usize,
    /// Hex-encoded SHA-256 state root after the tick.
    pub state_root: String,
}

/// Read-only copy of the store taken between ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    /// Last completed tick.
    pub tick: Tick,
    pub store: ActorStore,
}

/// Client-facing handle to interact with the runtime.
#[derive(Clone)]
pub struct RuntimeHandle {
    request_tx: mpsc::Sender<Request>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(request_tx: mpsc::Sender<Request>, event_bus: EventBus) -> Self {
        Self {
            request_tx,
            event_bus,
        }
    }

    /// Enqueue a command for the next tick.
    ///
    /// Waits for room in the command buffer. Commands sent from one task are
    /// applied in the order they were sent.
    pub async fn add_command(&self, command: impl Into<Command>) -> Result<()> {
        self.send(Request::Enqueue {
            commands: vec![command.into()],
        })
        .await
    }

    /// Enqueue several commands as one contiguous batch.
    ///
    /// Commands from other producers cannot interleave with the batch.
    pub async fn add_commands(&self, commands: impl IntoIterator<Item = Command>) -> Result<()> {
        let commands: Vec<Command> = commands.into_iter().collect();
        if commands.is_empty() {
            return Ok(());
        }

        self.send(Request::Enqueue { commands }).await
    }

    /// Enqueue without waiting; fails fast when the buffer is full.
    pub fn try_add_command(&self, command: impl Into<Command>) -> Result<()> {
        self.request_tx
            .try_send(Request::Enqueue {
                commands: vec![command.into()],
            })
            .map_err(|error| match error {
                mpsc::error::TrySendError::Full(_) => RuntimeError::CommandBufferFull,
                mpsc::error::TrySendError::Closed(_) => RuntimeError::CommandChannelClosed,
            })
    }

    /// Drain and apply every command enqueued so far.
    pub async fn tick(&self) -> Result<TickSummary> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Request::Tick { reply: reply_tx }).await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Query the current store (read-only snapshot).
    pub async fn query_store(&self) -> Result<StoreSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Request::QueryStore { reply: reply_tx }).await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Number of commands waiting for the next tick.
    pub async fn pending(&self) -> Result<usize> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Request::Pending { reply: reply_tx }).await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from a specific topic.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut ticks = handle.subscribe(Topic::Tick);
    /// while let Ok(event) = ticks.recv().await {
    ///     // Handle tick summaries
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) async fn shutdown_worker(&self) -> Result<()> {
        self.send(Request::Shutdown).await
    }

    async fn send(&self, request: Request) -> Result<()> {
        self.request_tx
            .send(request)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
