//! Process records and synthetic process generation.

use serde::{Deserialize, Serialize};

use crate::core::ResourceVector;

/// Process identifier. Unique while the process is live.
pub type Pid = i64;

/// Pid reserved for the end-of-stream marker.
pub const SENTINEL_PID: Pid = -1;

/// A process flowing through intake, admission and scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Process identifier.
    pub pid: Pid,
    /// Clock tick at which the process becomes runnable.
    pub arrival_time: u64,
    /// Total CPU time the process needs.
    pub burst_time: u64,
    /// Burst minus work already executed.
    pub remaining_time: u64,
    /// Lower number = more urgent.
    pub priority: u32,
    /// Total resources the process will ever hold simultaneously.
    pub max_need: ResourceVector,
    /// First dispatch time, set by the scheduler.
    pub start_time: Option<u64>,
    /// Completion time, set by the scheduler.
    pub finish_time: Option<u64>,
}

impl Process {
    /// Create a process that has not run yet.
    pub fn new(
        pid: Pid,
        arrival_time: u64,
        burst_time: u64,
        priority: u32,
        max_need: impl Into<ResourceVector>,
    ) -> Self {
        Self {
            pid,
            arrival_time,
            burst_time,
            remaining_time: burst_time,
            priority,
            max_need: max_need.into(),
            start_time: None,
            finish_time: None,
        }
    }

    /// End-of-stream marker pushed once after every producer has finished.
    pub fn sentinel() -> Self {
        Self::new(SENTINEL_PID, 0, 0, 0, ResourceVector::default())
    }

    /// True for the end-of-stream marker.
    pub const fn is_sentinel(&self) -> bool {
        self.pid == SENTINEL_PID
    }
}

/// Source of processes for producer threads.
pub trait ProcessGenerator: Send + Sync {
    /// Build the `sequence`-th process of one producer, claiming
    /// `resource_types` kinds of resources.
    fn generate(&self, pid: Pid, sequence: usize, resource_types: usize) -> Process;
}

/// Deterministic workload derived from the pid alone.
///
/// `burst = pid % 7 + 1`, `priority = pid % 5 + 1`, arrival is the position
/// within the producer's batch and claim component `j` is `(pid + j) % 3`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticWorkload;

const CLAIM_MODULUS: i64 = 3;

impl ProcessGenerator for SyntheticWorkload {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn generate(&self, pid: Pid, sequence: usize, resource_types: usize) -> Process {
        let burst = pid.rem_euclid(7) as u64 + 1;
        let priority = pid.rem_euclid(5) as u32 + 1;
        let claim: Vec<u32> = (0..resource_types as i64)
            .map(|j| (pid + j).rem_euclid(CLAIM_MODULUS) as u32)
            .collect();
        Process::new(pid, sequence as u64, burst, priority, claim)
    }
}
