//! Ring buffer guarded by a mutex, with one condvar per blocking direction.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use super::{check_capacity, HandoffQueue};
use crate::core::SimError;

/// Fixed-capacity FIFO with blocking push/pop.
///
/// `not_full` wakes producers waiting for a free slot and `not_empty` wakes
/// the consumer waiting for an item; together they count free and filled
/// slots the way a pair of semaphores would.
pub struct RingQueue<T> {
    capacity: usize,
    slots: Mutex<VecDeque<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> RingQueue<T> {
    /// Create a queue holding at most `capacity` items.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfiguration` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, SimError> {
        check_capacity(capacity)?;
        Ok(Self {
            capacity,
            slots: Mutex::new(VecDeque::with_capacity(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        })
    }
}

impl<T: Send> HandoffQueue<T> for RingQueue<T> {
    fn push(&self, item: T) -> Result<(), SimError> {
        let mut slots = self.slots.lock();
        self.not_full
            .wait_while(&mut slots, |s| s.len() >= self.capacity);
        slots.push_back(item);
        drop(slots);
        self.not_empty.notify_one();
        Ok(())
    }

    fn pop(&self) -> Result<T, SimError> {
        let mut slots = self.slots.lock();
        loop {
            if let Some(item) = slots.pop_front() {
                drop(slots);
                self.not_full.notify_one();
                return Ok(item);
            }
            self.not_empty.wait(&mut slots);
        }
    }

    fn try_push(&self, item: T) -> Result<(), T> {
        let mut slots = self.slots.lock();
        if slots.len() >= self.capacity {
            return Err(item);
        }
        slots.push_back(item);
        drop(slots);
        self.not_empty.notify_one();
        Ok(())
    }

    fn try_pop(&self) -> Option<T> {
        let item = self.slots.lock().pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn size(&self) -> usize {
        self.slots.lock().len()
    }
}
