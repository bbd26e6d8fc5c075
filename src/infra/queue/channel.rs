//! Handoff queue backed by a bounded crossbeam channel.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};

use super::{check_capacity, HandoffQueue};
use crate::core::SimError;

/// Bounded FIFO built on `crossbeam_channel::bounded`.
///
/// The queue owns both channel ends, so the channel cannot disconnect while
/// the queue is alive.
pub struct ChannelQueue<T> {
    capacity: usize,
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> ChannelQueue<T> {
    /// Create a queue holding at most `capacity` items.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfiguration` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, SimError> {
        check_capacity(capacity)?;
        let (tx, rx) = bounded(capacity);
        Ok(Self { capacity, tx, rx })
    }
}

impl<T: Send> HandoffQueue<T> for ChannelQueue<T> {
    fn push(&self, item: T) -> Result<(), SimError> {
        self.tx.send(item).map_err(|_| SimError::QueueClosed)
    }

    fn pop(&self) -> Result<T, SimError> {
        self.rx.recv().map_err(|_| SimError::QueueClosed)
    }

    fn try_push(&self, item: T) -> Result<(), T> {
        self.tx.try_send(item).map_err(|e| match e {
            TrySendError::Full(item) | TrySendError::Disconnected(item) => item,
        })
    }

    fn try_pop(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(item) => Some(item),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn size(&self) -> usize {
        self.rx.len()
    }
}
