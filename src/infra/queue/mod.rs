//! Bounded handoff queue backends.
//!
//! Producers block in `push` while the queue is full and the consumer blocks
//! in `pop` while it is empty. Items come out in FIFO order and the queue
//! never holds more than its capacity.

#[cfg(not(target_arch = "wasm32"))]
pub mod channel;
pub mod ring;

#[cfg(not(target_arch = "wasm32"))]
pub use channel::ChannelQueue;
pub use ring::RingQueue;

use crate::core::SimError;

/// Blocking bounded FIFO shared between producers and one consumer.
pub trait HandoffQueue<T>: Send + Sync {
    /// Append `item`, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns `SimError::QueueClosed` if the backend lost its consumer end.
    fn push(&self, item: T) -> Result<(), SimError>;

    /// Remove the oldest item, blocking while the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns `SimError::QueueClosed` if the backend lost its producer end.
    fn pop(&self) -> Result<T, SimError>;

    /// Append without blocking; hands the item back if the queue is full.
    fn try_push(&self, item: T) -> Result<(), T>;

    /// Remove the oldest item without blocking.
    fn try_pop(&self) -> Option<T>;

    /// Configured capacity.
    fn capacity(&self) -> usize;

    /// Current occupancy; may be stale under concurrent access.
    fn size(&self) -> usize;

    /// True when no item is queued.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

pub(crate) fn check_capacity(capacity: usize) -> Result<(), SimError> {
    if capacity == 0 {
        return Err(SimError::InvalidConfiguration(
            "queue capacity must be greater than 0".into(),
        ));
    }
    Ok(())
}
