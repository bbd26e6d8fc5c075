//! # Kernel Admission Sim
//!
//! A slice of an operating-system kernel: concurrent process arrival,
//! deadlock-avoiding resource admission and CPU scheduling with statistics.
//!
//! ## Pipeline
//!
//! ```text
//! producers -> HandoffQueue -> consumer -> ResourceLedger::request
//!           -> ready | blocked -> ProcessScheduler::run(ready)
//!           -> ResourceLedger::release(ready) -> retry blocked
//! ```
//!
//! - **`ResourceLedger`**: Banker's algorithm. A process claims its full
//!   maximum need at once; the claim is granted only if the resulting state is
//!   safe, and a refusal leaves the ledger untouched.
//! - **`HandoffQueue`**: bounded FIFO with blocking push/pop, backed by a
//!   mutex-guarded ring (`RingQueue`) or a crossbeam channel (`ChannelQueue`).
//! - **`ProcessScheduler`**: non-preemptive priority for up to five processes,
//!   round-robin beyond that.
//! - **`Simulator`**: runs episodes end to end.
//!
//! ## Example
//!
//! ```rust
//! use kernel_admission_sim::builders::build_simulator;
//! use kernel_admission_sim::config::SimulationConfig;
//! use kernel_admission_sim::core::Process;
//!
//! let sim = build_simulator(&SimulationConfig::new().with_push_delay_ms(0))?;
//! sim.add_process(Process::new(1, 0, 4, 2, [1, 0, 0]))?;
//! sim.add_process(Process::new(2, 0, 2, 1, [0, 1, 1]))?;
//!
//! let report = sim.start()?;
//! assert_eq!(report.schedule.gantt[0].pid, 2);
//! assert!(report.still_blocked.is_empty());
//! # Ok::<(), kernel_admission_sim::core::SimError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Builders to construct simulators from configuration.
pub mod builders;
/// Configuration models for the simulator and queue backends.
pub mod config;
/// Core components: resources, ledger, scheduler, orchestrator.
pub mod core;
/// Infrastructure adapters for the handoff queue.
pub mod infra;
/// Shared utilities.
pub mod util;
