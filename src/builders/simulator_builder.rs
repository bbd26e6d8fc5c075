//! Builders to construct a simulator and its queue backend from configuration.

use crate::config::{QueueBackendConfig, SimulationConfig};
use crate::core::{Process, ResourceLedger, SimError, Simulator};
#[cfg(not(target_arch = "wasm32"))]
use crate::infra::queue::ChannelQueue;
use crate::infra::queue::{HandoffQueue, RingQueue};

/// Build the handoff queue backend selected in `cfg`.
///
/// # Errors
///
/// Returns `SimError::InvalidConfiguration` for a zero capacity or a backend
/// unavailable on this target.
pub fn build_queue(cfg: &SimulationConfig) -> Result<Box<dyn HandoffQueue<Process>>, SimError> {
    match cfg.queue {
        QueueBackendConfig::Ring => Ok(Box::new(RingQueue::new(cfg.buffer_capacity)?)),
        #[cfg(not(target_arch = "wasm32"))]
        QueueBackendConfig::Channel => Ok(Box::new(ChannelQueue::new(cfg.buffer_capacity)?)),
        #[cfg(target_arch = "wasm32")]
        QueueBackendConfig::Channel => Err(SimError::InvalidConfiguration(
            "channel queue backend is not available on wasm32".into(),
        )),
    }
}

/// Validate `cfg` and build a simulator with the synthetic workload.
///
/// # Errors
///
/// Returns `SimError::InvalidConfiguration` if the configuration is invalid.
pub fn build_simulator(cfg: &SimulationConfig) -> Result<Simulator, SimError> {
    cfg.validate()
        .map_err(|e| SimError::InvalidConfiguration(format!("config invalid: {e}")))?;

    let ledger = ResourceLedger::new(cfg.initial_available.clone())?;
    let queue = build_queue(cfg)?;
    tracing::debug!(
        buffer_capacity = cfg.buffer_capacity,
        backend = ?cfg.queue,
        resource_types = ledger.resource_types(),
        "simulator built"
    );
    Ok(Simulator::new(cfg.clone(), ledger, queue))
}
