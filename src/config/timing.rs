// ABOUTME: Poll cadences and budgets for discovery, readiness, and status polling.
// ABOUTME: Durations are written in humantime form such as 10s or 5m.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::poll::PollSchedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_discovery_interval", with = "humantime_serde")]
    pub discovery_interval: Duration,

    #[serde(default = "default_discovery_timeout", with = "humantime_serde")]
    pub discovery_timeout: Duration,

    #[serde(default = "default_readiness_interval", with = "humantime_serde")]
    pub readiness_interval: Duration,

    #[serde(default = "default_readiness_timeout", with = "humantime_serde")]
    pub readiness_timeout: Duration,

    /// Wait after the first in-progress status.
    #[serde(default = "default_status_wait", with = "humantime_serde")]
    pub status_wait: Duration,

    /// Added to the wait after every further in-progress status.
    #[serde(default = "default_status_backoff", with = "humantime_serde")]
    pub status_backoff: Duration,

    /// Status polling is unbounded unless this is set.
    #[serde(default, with = "humantime_serde")]
    pub status_timeout: Option<Duration>,
}

fn default_discovery_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_discovery_timeout() -> Duration {
    Duration::from_secs(180)
}

fn default_readiness_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_readiness_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_status_wait() -> Duration {
    Duration::from_secs(30)
}

fn default_status_backoff() -> Duration {
    Duration::from_secs(15)
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            discovery_interval: default_discovery_interval(),
            discovery_timeout: default_discovery_timeout(),
            readiness_interval: default_readiness_interval(),
            readiness_timeout: default_readiness_timeout(),
            status_wait: default_status_wait(),
            status_backoff: default_status_backoff(),
            status_timeout: None,
        }
    }
}

impl TimingConfig {
    pub fn discovery_schedule(&self) -> PollSchedule {
        PollSchedule::fixed(self.discovery_interval, self.discovery_timeout)
    }

    pub fn readiness_schedule(&self) -> PollSchedule {
        PollSchedule::fixed(self.readiness_interval, self.readiness_timeout)
    }

    pub fn status_schedule(&self) -> PollSchedule {
        PollSchedule::linear(self.status_wait, self.status_backoff).with_timeout(self.status_timeout)
    }

    /// Reject settings that would make a poll loop spin without waiting.
    pub fn validate(&self) -> Result<(), String> {
        let intervals = [
            ("discovery_interval", self.discovery_interval),
            ("readiness_interval", self.readiness_interval),
            ("status_wait", self.status_wait),
        ];
        for (name, value) in intervals {
            if value.is_zero() {
                return Err(format!("timing.{} must be greater than zero", name));
            }
        }
        if self.status_timeout.is_some_and(|t| t.is_zero()) {
            return Err("timing.status_timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}
