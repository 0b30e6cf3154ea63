// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rollout strategies and the global failure budget.

use serde::{Deserialize, Serialize};

/// How the fleet is traversed.
///
/// An unrecognized tag on the wire deserializes to `Parallel`, matching
/// the coordinator's default dispatch branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    Parallel,
    Sequential,
    Rolling,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Parallel => "Parallel",
            StrategyKind::Sequential => "Sequential",
            StrategyKind::Rolling => "Rolling",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StrategyKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StrategyKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "Sequential" => StrategyKind::Sequential,
            "Rolling" => StrategyKind::Rolling,
            _ => StrategyKind::Parallel,
        })
    }
}

/// Strategy plus the knobs that shape it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloutStrategy {
    #[serde(rename = "type", default)]
    pub kind: StrategyKind,
    /// Servers per batch (Rolling only). 0 is treated as 1.
    #[serde(default)]
    pub batch_size: u32,
    /// Pause between batches (Rolling only).
    #[serde(default)]
    pub batch_delay_seconds: u64,
    /// Global failure budget. Negative disables the budget entirely.
    #[serde(default)]
    pub max_failures: i32,
}

impl RolloutStrategy {
    pub fn parallel(max_failures: i32) -> Self {
        Self {
            kind: StrategyKind::Parallel,
            batch_size: 0,
            batch_delay_seconds: 0,
            max_failures,
        }
    }

    pub fn sequential(max_failures: i32) -> Self {
        Self {
            kind: StrategyKind::Sequential,
            ..Self::parallel(max_failures)
        }
    }

    pub fn rolling(batch_size: u32, batch_delay_seconds: u64, max_failures: i32) -> Self {
        Self {
            kind: StrategyKind::Rolling,
            batch_size,
            batch_delay_seconds,
            max_failures,
        }
    }

    /// Batch size with the zero-means-one rule applied.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1) as usize
    }

    /// Whether `failures` breaches the budget.
    pub fn budget_exceeded(&self, failures: u32) -> bool {
        self.max_failures >= 0 && i64::from(failures) > i64::from(self.max_failures)
    }
}

impl Default for RolloutStrategy {
    fn default() -> Self {
        Self::parallel(0)
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
