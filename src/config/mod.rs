//! Configuration models for the simulator and its queue backend.

pub mod simulation;

pub use simulation::{parse_counts, QueueBackendConfig, SimulationConfig};
