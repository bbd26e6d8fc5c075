//! Tests for builder modules

use kernel_admission_sim::builders::{build_queue, build_simulator};
use kernel_admission_sim::config::{QueueBackendConfig, SimulationConfig};
use kernel_admission_sim::core::SimError;

#[test]
fn test_build_queue_backends() {
    let ring = build_queue(&SimulationConfig::new().with_buffer_capacity(3)).unwrap();
    assert_eq!(ring.capacity(), 3);
    assert!(ring.is_empty());

    let channel = build_queue(
        &SimulationConfig::new()
            .with_buffer_capacity(7)
            .with_queue(QueueBackendConfig::Channel),
    )
    .unwrap();
    assert_eq!(channel.capacity(), 7);
}

#[test]
fn test_build_simulator_defaults() {
    let sim = build_simulator(&SimulationConfig::default()).unwrap();
    assert_eq!(sim.config().buffer_capacity, 5);

    let state = sim.display_state();
    assert_eq!(state.total, state.available);
    assert_eq!(state.available.as_slice(), &[3, 3, 2]);
    assert!(state.ready.is_empty());
    assert!(state.blocked.is_empty());
}

#[test]
fn test_build_simulator_rejects_invalid_config() {
    let result = build_simulator(&SimulationConfig::new().with_quantum(0));
    match result {
        Err(SimError::InvalidConfiguration(msg)) => assert!(msg.starts_with("config invalid")),
        other => panic!("expected invalid configuration, got {:?}", other.err()),
    }
}
