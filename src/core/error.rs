//! Error types for simulator components.

use thiserror::Error;

/// Errors produced by the ledger, queues, scheduler and simulator.
///
/// A refused admission is not an error: `ResourceLedger::request` reports it
/// as `Ok(None)`.
#[derive(Debug, Error)]
pub enum SimError {
    /// A component was constructed with unusable parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Two resource vectors with different resource-type counts were combined.
    #[error("resource vector length mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Resource-type count of the left-hand / ledger vector.
        expected: usize,
        /// Resource-type count of the offending vector.
        actual: usize,
    },
    /// A subtraction would have produced a negative resource count.
    #[error("resource vector underflow")]
    ResourceUnderflow,
    /// An addition would have overflowed a resource count.
    #[error("resource vector overflow")]
    ResourceOverflow,
    /// The queue backend lost its peer end.
    #[error("handoff queue closed")]
    QueueClosed,
    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[from] std::io::Error),
    /// A worker thread panicked before finishing.
    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
