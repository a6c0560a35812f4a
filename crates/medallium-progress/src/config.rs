//! Tunables for progress analytics.
//!
//! These values correspond to the `progress` key of `medallium.yaml`. The
//! [`ProgressConfig`] struct bundles every tunable so callers (the engine
//! facade, tests) can override defaults.

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

/// Configuration for streak bucketing and milestone suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressConfig {
    /// Offset from UTC, in minutes, used to bucket unlocks into calendar
    /// days (default: 0).
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Total-count thresholds offered as next milestones.
    #[serde(default = "default_count_milestones")]
    pub count_milestones: Vec<u32>,

    /// How many unmet count thresholds to consider (default: 2).
    #[serde(default = "default_count_milestone_lookahead")]
    pub count_milestone_lookahead: usize,

    /// Maximum number of next milestones reported (default: 3).
    #[serde(default = "default_max_next_milestones")]
    pub max_next_milestones: usize,

    /// Number of recent unlocks included in stats (default: 5).
    #[serde(default = "default_recent_unlocks")]
    pub recent_unlocks: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            count_milestones: default_count_milestones(),
            count_milestone_lookahead: default_count_milestone_lookahead(),
            max_next_milestones: default_max_next_milestones(),
            recent_unlocks: default_recent_unlocks(),
        }
    }
}

impl ProgressConfig {
    /// The configured offset, falling back to UTC when out of range.
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

fn default_count_milestones() -> Vec<u32> {
    vec![10, 25, 50, 75, 100, 150, 200, 250, 300, 400, 500]
}

const fn default_count_milestone_lookahead() -> usize {
    2
}

const fn default_max_next_milestones() -> usize {
    3
}

const fn default_recent_unlocks() -> usize {
    5
}
