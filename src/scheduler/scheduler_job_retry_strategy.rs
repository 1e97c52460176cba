use serde_derive::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

/// Defines how failed trigger firings are retried. `max_attempts` counts all attempts including
/// the first one, so the strategy with `max_attempts = 3` submits a job at most three times.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Hash, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(tag = "type")]
pub enum SchedulerJobRetryStrategy {
    /// The job will be retried with a constant interval (1s -> 1s -> 1s).
    #[serde(rename_all = "camelCase")]
    Constant {
        #[serde_as(as = "DurationMilliSeconds<u64>")]
        interval: Duration,
        max_attempts: u32,
    },
    /// The job will be retried with an exponential interval (1s -> 2s -> 4s -> 8s).
    #[serde(rename_all = "camelCase")]
    Exponential {
        #[serde_as(as = "DurationMilliSeconds<u64>")]
        initial_interval: Duration,
        multiplier: u32,
        #[serde_as(as = "DurationMilliSeconds<u64>")]
        max_interval: Duration,
        max_attempts: u32,
    },
    /// The job will be retried with a linear interval (1s -> 2s -> 3s).
    #[serde(rename_all = "camelCase")]
    Linear {
        #[serde_as(as = "DurationMilliSeconds<u64>")]
        initial_interval: Duration,
        #[serde_as(as = "DurationMilliSeconds<u64>")]
        increment: Duration,
        #[serde_as(as = "DurationMilliSeconds<u64>")]
        max_interval: Duration,
        max_attempts: u32,
    },
}

impl SchedulerJobRetryStrategy {
    /// Calculates the interval to wait after the specified (zero-based) failed attempt.
    pub fn interval(&self, attempt: u32) -> Duration {
        match self {
            Self::Constant { interval, .. } => *interval,
            Self::Exponential {
                initial_interval,
                multiplier,
                max_interval,
                ..
            } => multiplier
                .checked_pow(attempt)
                .and_then(|multiplier| initial_interval.checked_mul(multiplier))
                .map(|interval| interval.min(*max_interval))
                .unwrap_or(*max_interval),
            Self::Linear {
                initial_interval,
                increment,
                max_interval,
                ..
            } => increment
                .checked_mul(attempt)
                .and_then(|increment| initial_interval.checked_add(increment))
                .map(|interval| interval.min(*max_interval))
                .unwrap_or(*max_interval),
        }
    }

    /// Returns the maximum number of attempts.
    pub fn max_attempts(&self) -> u32 {
        match self {
            Self::Constant { max_attempts, .. }
            | Self::Exponential { max_attempts, .. }
            | Self::Linear { max_attempts, .. } => *max_attempts,
        }
    }
}

impl Default for SchedulerJobRetryStrategy {
    fn default() -> Self {
        Self::Exponential {
            initial_interval: Duration::from_secs(30),
            multiplier: 2,
            max_interval: Duration::from_secs(600),
            max_attempts: 3,
        }
    }
}
