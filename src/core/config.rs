/*!
 * Profiler Configuration
 *
 * Session sizing, with env overrides for the hosting process
 */

use super::errors::{ProfilerError, ProfilerResult};
use super::limits::{
    DEFAULT_HISTORY_CAPACITY, DEFAULT_INTAKE_CAPACITY, DEFAULT_SAMPLE_INTERVAL,
    MAX_HISTORY_CAPACITY, MIN_SAMPLE_INTERVAL,
};
use std::time::Duration;

/// Env var overriding the ring capacity
pub const ENV_HISTORY_CAPACITY: &str = "HEAPSCOPE_HISTORY_CAPACITY";
/// Env var overriding the sample interval, in milliseconds
pub const ENV_SAMPLE_INTERVAL_MS: &str = "HEAPSCOPE_SAMPLE_INTERVAL_MS";
/// Env var overriding the sampler intake depth
pub const ENV_INTAKE_CAPACITY: &str = "HEAPSCOPE_INTAKE_CAPACITY";

/// Sizing applied to every tracking session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilerConfig {
    /// Samples retained per session
    pub history_capacity: usize,
    /// Time between samples
    pub sample_interval: Duration,
    /// Sampler → ring manager queue depth
    pub intake_capacity: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            intake_capacity: DEFAULT_INTAKE_CAPACITY,
        }
    }
}

impl ProfilerConfig {
    /// Configuration with the given history depth and interval
    pub const fn new(history_capacity: usize, sample_interval: Duration) -> Self {
        Self {
            history_capacity,
            sample_interval,
            intake_capacity: DEFAULT_INTAKE_CAPACITY,
        }
    }

    /// One second of history at 10Hz
    pub const fn fine_grained() -> Self {
        Self::new(10, Duration::from_millis(100))
    }

    /// Ten minutes of history at 1Hz
    pub const fn long_window() -> Self {
        Self::new(600, Duration::from_secs(1))
    }

    pub fn with_intake_capacity(mut self, intake_capacity: usize) -> Self {
        self.intake_capacity = intake_capacity;
        self
    }

    /// Span of time the full ring covers
    pub fn window(&self) -> Duration {
        self.sample_interval
            .saturating_mul(self.history_capacity.min(u32::MAX as usize) as u32)
    }

    pub fn validate(&self) -> ProfilerResult<()> {
        if self.history_capacity == 0 {
            return Err(ProfilerError::InvalidConfig(
                "history_capacity must be at least 1".into(),
            ));
        }
        if self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ProfilerError::InvalidConfig(format!(
                "history_capacity {} exceeds maximum {}",
                self.history_capacity, MAX_HISTORY_CAPACITY
            )));
        }
        if self.sample_interval < MIN_SAMPLE_INTERVAL {
            return Err(ProfilerError::InvalidConfig(format!(
                "sample_interval must be at least {:?}",
                MIN_SAMPLE_INTERVAL
            )));
        }
        if self.intake_capacity == 0 {
            return Err(ProfilerError::InvalidConfig(
                "intake_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Defaults, overridden by any `HEAPSCOPE_*` variables that are set
    pub fn from_env() -> ProfilerResult<Self> {
        let mut config = Self::default();

        if let Some(capacity) = env_number(ENV_HISTORY_CAPACITY)? {
            config.history_capacity = capacity as usize;
        }
        if let Some(interval_ms) = env_number(ENV_SAMPLE_INTERVAL_MS)? {
            config.sample_interval = Duration::from_millis(interval_ms);
        }
        if let Some(intake) = env_number(ENV_INTAKE_CAPACITY)? {
            config.intake_capacity = intake as usize;
        }

        config.validate()?;
        Ok(config)
    }
}

fn env_number(key: &str) -> ProfilerResult<Option<u64>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ProfilerError::InvalidConfig(format!("{}={:?}: {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}
