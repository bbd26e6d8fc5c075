//! Infrastructure adapters for the process handoff queue.

pub mod queue;

#[cfg(not(target_arch = "wasm32"))]
pub use queue::ChannelQueue;
pub use queue::{HandoffQueue, RingQueue};
