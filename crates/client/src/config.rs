//! Client configuration loaded from the process environment.
use std::env;
use std::str::FromStr;
use std::time::Duration;

use runtime::RuntimeConfig;
use solver_core::SolverConfig;

/// Settings for one `multigate` session.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Number of actor slots.
    pub capacity: usize,
    /// Steps to run before printing the final summary.
    pub ticks: usize,
    /// Concurrent producer tasks.
    pub producers: usize,
    pub tick_interval: Duration,
    /// Request channel bound between producers and the worker.
    pub command_buffer: usize,
    pub log_to_file: bool,
    pub session_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            capacity: SolverConfig::DEFAULT_CAPACITY,
            ticks: 120,
            producers: 4,
            tick_interval: RuntimeConfig::DEFAULT_TICK_INTERVAL,
            command_buffer: RuntimeConfig::DEFAULT_COMMAND_BUFFER_SIZE,
            log_to_file: false,
            session_id: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SOLVER_CAPACITY` - Actor slots, clamped to `1..=MAX_ACTORS` (default: 64)
    /// - `SOLVER_TICKS` - Steps to run (default: 120)
    /// - `SOLVER_PRODUCERS` - Concurrent producer tasks, at least 1 (default: 4)
    /// - `SOLVER_TICK_INTERVAL_MS` - Milliseconds between steps (default: 16)
    /// - `SOLVER_COMMAND_BUFFER` - Request channel bound, at least 1 (default: 256)
    /// - `SOLVER_LOG_TO_FILE` - Also write logs to the session directory (default: false)
    /// - `SOLVER_SESSION_ID` - Session directory name (default: timestamp)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(capacity) = parse::<usize>(&lookup, "SOLVER_CAPACITY") {
            config.capacity = capacity.clamp(1, SolverConfig::MAX_ACTORS);
        }

        if let Some(ticks) = parse::<usize>(&lookup, "SOLVER_TICKS") {
            config.ticks = ticks;
        }

        if let Some(producers) = parse::<usize>(&lookup, "SOLVER_PRODUCERS") {
            config.producers = producers.max(1);
        }

        if let Some(millis) = parse::<u64>(&lookup, "SOLVER_TICK_INTERVAL_MS") {
            config.tick_interval = Duration::from_millis(millis.max(1));
        }

        if let Some(size) = parse::<usize>(&lookup, "SOLVER_COMMAND_BUFFER") {
            config.command_buffer = size.max(1);
        }

        if let Some(enable) = parse::<bool>(&lookup, "SOLVER_LOG_TO_FILE") {
            config.log_to_file = enable;
        } else if lookup("SOLVER_LOG_TO_FILE").is_some() {
            // Also accept just setting the variable without value as "true"
            config.log_to_file = true;
        }

        config.session_id = lookup("SOLVER_SESSION_ID").filter(|id| !id.trim().is_empty());

        config
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            solver: SolverConfig::with_capacity(self.capacity),
            command_buffer_size: self.command_buffer,
            tick_interval: self.tick_interval,
            ..RuntimeConfig::default()
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
{
    lookup(key)?.trim().parse().ok()
}
