//! Notification job queue configuration.

use serde::{Deserialize, Serialize};

/// Durable job queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum execution attempts per job (initial attempt included).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i32,
    /// Base delay in milliseconds for exponential retry backoff.
    #[serde(default = "default_backoff_base")]
    pub backoff_base_ms: u64,
    /// How long completed jobs are retained before cleanup, in seconds.
    #[serde(default = "default_completed_ttl")]
    pub completed_ttl_seconds: u64,
    /// How many failed jobs to retain (oldest evicted first).
    #[serde(default = "default_failed_keep")]
    pub failed_keep: i64,
    /// Active jobs whose claim is older than this are considered stalled
    /// and returned to the waiting state.
    #[serde(default = "default_stalled_threshold")]
    pub stalled_threshold_seconds: u64,
}

impl QueueConfig {
    /// Backoff delay before the given retry, in milliseconds.
    ///
    /// `attempt` is the number of attempts already made; the delay doubles
    /// with each retry (2s, 4s, 8s, ...).
    pub fn backoff_delay_ms(&self, attempt: i32) -> u64 {
        let exponent = attempt.saturating_sub(1).clamp(0, 16) as u32;
        self.backoff_base_ms.saturating_mul(1u64 << exponent)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base(),
            completed_ttl_seconds: default_completed_ttl(),
            failed_keep: default_failed_keep(),
            stalled_threshold_seconds: default_stalled_threshold(),
        }
    }
}

fn default_max_attempts() -> i32 {
    3
}

fn default_backoff_base() -> u64 {
    2000
}

fn default_completed_ttl() -> u64 {
    3600
}

fn default_failed_keep() -> i64 {
    1000
}

fn default_stalled_threshold() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_per_retry() {
        let config = QueueConfig::default();
        assert_eq!(config.backoff_delay_ms(1), 2000);
        assert_eq!(config.backoff_delay_ms(2), 4000);
        assert_eq!(config.backoff_delay_ms(3), 8000);
    }

    #[test]
    fn test_backoff_never_underflows_on_zero_attempts() {
        let config = QueueConfig::default();
        assert_eq!(config.backoff_delay_ms(0), 2000);
    }

    #[test]
    fn test_defaults_match_delivery_policy() {
        let config = QueueConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.backoff_base_ms, 2000);
        assert_eq!(config.completed_ttl_seconds, 3600);
        assert_eq!(config.failed_keep, 1000);
    }
}
