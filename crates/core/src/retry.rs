// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy and timeout options applied to activity invocations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exponential backoff policy for a single activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(with = "duration_ms")]
    pub initial_interval: Duration,
    pub backoff_coefficient: f64,
    #[serde(with = "duration_ms")]
    pub maximum_interval: Duration,
    pub maximum_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            backoff_coefficient: 2.0,
            maximum_interval: Duration::from_secs(60),
            maximum_attempts: 3,
        }
    }
}

impl RetryPolicy {
    /// No retries: a single attempt.
    pub fn none() -> Self {
        Self { maximum_attempts: 1, ..Self::default() }
    }

    /// Delay before the attempt following `attempt` (1-based), capped at
    /// `maximum_interval`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = self.backoff_coefficient.powi(attempt.saturating_sub(1) as i32);
        let delay = self.initial_interval.mul_f64(factor.max(0.0));
        delay.min(self.maximum_interval)
    }
}

/// Per-invocation activity options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityOptions {
    #[serde(with = "duration_ms")]
    pub start_to_close_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ActivityOptions {
    fn default() -> Self {
        Self {
            start_to_close_timeout: Duration::from_secs(5 * 60),
            retry: RetryPolicy::default(),
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
        duration.as_millis().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
