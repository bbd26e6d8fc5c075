//! Builders to construct simulators from configuration.

pub mod simulator_builder;

pub use simulator_builder::{build_queue, build_simulator};
