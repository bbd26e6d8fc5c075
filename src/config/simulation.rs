//! Simulation configuration structures.

use std::env;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, DEFAULT_QUANTUM};

/// Handoff queue backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueBackendConfig {
    /// Mutex-guarded ring buffer with condvars.
    #[default]
    Ring,
    /// Bounded crossbeam channel.
    Channel,
}

impl FromStr for QueueBackendConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ring" => Ok(Self::Ring),
            "channel" => Ok(Self::Channel),
            other => Err(format!("unknown queue backend `{other}`")),
        }
    }
}

/// Parameters of one simulator instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Capacity of the handoff queue.
    pub buffer_capacity: usize,
    /// Producer threads spawned in threaded mode.
    pub producers: usize,
    /// Processes each producer synthesizes.
    pub processes_per_producer: usize,
    /// Ledger capacity per resource type.
    pub initial_available: Vec<u32>,
    /// Round-robin time slice.
    pub quantum: u32,
    /// Pause between two pushes of one producer, in milliseconds.
    pub push_delay_ms: u64,
    /// Handoff queue backend.
    pub queue: QueueBackendConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 5,
            producers: 2,
            processes_per_producer: 5,
            initial_available: vec![3, 3, 2],
            quantum: DEFAULT_QUANTUM,
            push_delay_ms: 80,
            queue: QueueBackendConfig::Ring,
        }
    }
}

impl SimulationConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handoff queue capacity.
    #[must_use]
    pub const fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set the number of producer threads.
    #[must_use]
    pub const fn with_producers(mut self, producers: usize) -> Self {
        self.producers = producers;
        self
    }

    /// Set how many processes each producer synthesizes.
    #[must_use]
    pub const fn with_processes_per_producer(mut self, count: usize) -> Self {
        self.processes_per_producer = count;
        self
    }

    /// Set the ledger capacity.
    #[must_use]
    pub fn with_initial_available(mut self, available: impl Into<Vec<u32>>) -> Self {
        self.initial_available = available.into();
        self
    }

    /// Set the round-robin quantum.
    #[must_use]
    pub const fn with_quantum(mut self, quantum: u32) -> Self {
        self.quantum = quantum;
        self
    }

    /// Set the producer push delay.
    #[must_use]
    pub const fn with_push_delay_ms(mut self, delay_ms: u64) -> Self {
        self.push_delay_ms = delay_ms;
        self
    }

    /// Select the queue backend.
    #[must_use]
    pub const fn with_queue(mut self, queue: QueueBackendConfig) -> Self {
        self.queue = queue;
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.buffer_capacity == 0 {
            return Err("buffer_capacity must be greater than 0".into());
        }
        if self.initial_available.is_empty() {
            return Err("initial_available must not be empty".into());
        }
        if self.quantum == 0 {
            return Err("quantum must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the defaults overridden by `SIM_*`
    /// environment variables, loading a `.env` file first if present.
    ///
    /// # Errors
    ///
    /// Fails if a variable cannot be parsed or the result is invalid.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();

        if let Some(v) = env_parse("SIM_BUFFER_CAPACITY")? {
            cfg.buffer_capacity = v;
        }
        if let Some(v) = env_parse("SIM_PRODUCERS")? {
            cfg.producers = v;
        }
        if let Some(v) = env_parse("SIM_PROCESSES_PER_PRODUCER")? {
            cfg.processes_per_producer = v;
        }
        if let Some(v) = env_parse("SIM_QUANTUM")? {
            cfg.quantum = v;
        }
        if let Some(v) = env_parse("SIM_PUSH_DELAY_MS")? {
            cfg.push_delay_ms = v;
        }
        if let Ok(raw) = env::var("SIM_QUEUE_BACKEND") {
            cfg.queue = raw.parse().map_err(anyhow::Error::msg)?;
        }
        if let Ok(raw) = env::var("SIM_AVAILABLE") {
            cfg.initial_available = parse_counts(&raw)
                .with_context(|| format!("SIM_AVAILABLE=`{raw}` is not a comma list"))?;
        }

        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}

fn env_parse<T>(key: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value for {key}: `{raw}`")),
        Err(_) => Ok(None),
    }
}

/// Parse `"3, 3, 2"` into resource counts.
///
/// # Errors
///
/// Fails on any non-numeric entry.
pub fn parse_counts(raw: &str) -> AppResult<Vec<u32>> {
    raw.split(',')
        .map(|part| part.trim().parse::<u32>().map_err(anyhow::Error::from))
        .collect()
}
