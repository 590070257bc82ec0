//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, store construction and command
//! providers so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use solver_core::StoreError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker command buffer is full")]
    CommandBufferFull,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("failed to build actor store")]
    Store(#[from] StoreError),

    #[error("command provider failed: {0}")]
    Provider(String),
}
