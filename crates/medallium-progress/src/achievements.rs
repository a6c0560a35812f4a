//! Achievement registry and evaluator.
//!
//! The registry is a fixed, ordered list of authored achievements built once
//! at startup. Each evaluation pass visits only achievements that are still
//! locked; an unlocked achievement is never re-evaluated or revoked, even if
//! its criterion would no longer hold.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use medallium_types::{AchievementId, AchievementProgress, AchievementTier, Reward};

use crate::context::EvaluationContext;
use crate::criteria::Criterion;
use crate::error::ProgressError;

/// Achievement progress keyed by achievement id.
pub type AchievementProgressMap = BTreeMap<AchievementId, AchievementProgress>;

/// Name and description shown for a hidden achievement until it unlocks.
pub const HIDDEN_PLACEHOLDER: &str = "???";

/// An authored milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable identifier.
    pub id: AchievementId,
    /// Display name.
    pub name: String,
    /// How to unlock it.
    #[serde(default)]
    pub description: String,
    /// Rarity tier.
    pub tier: AchievementTier,
    /// Hidden achievements are not described until unlocked.
    #[serde(default)]
    pub hidden: bool,
    /// The unlock predicate.
    pub criterion: Criterion,
    /// Reward granted on claim.
    #[serde(default)]
    pub reward: Reward,
}

impl Achievement {
    /// Display name, masked while a hidden achievement is locked.
    pub fn display_name(&self, unlocked: bool) -> &str {
        if self.hidden && !unlocked {
            HIDDEN_PLACEHOLDER
        } else {
            &self.name
        }
    }

    /// Description, masked while a hidden achievement is locked.
    pub fn display_description(&self, unlocked: bool) -> &str {
        if self.hidden && !unlocked {
            HIDDEN_PLACEHOLDER
        } else {
            &self.description
        }
    }
}

// ---------------------------------------------------------------------------
// AchievementRegistry
// ---------------------------------------------------------------------------

/// The validated, immutable list of achievements, in authored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementRegistry {
    achievements: Vec<Achievement>,
}

impl AchievementRegistry {
    /// Validate and freeze a list of achievements.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::InvalidDefinition`] for a duplicate id.
    pub fn new(achievements: Vec<Achievement>) -> Result<Self, ProgressError> {
        let mut ids = BTreeSet::new();
        for achievement in &achievements {
            if !ids.insert(&achievement.id) {
                return Err(ProgressError::InvalidDefinition {
                    id: achievement.id.to_string(),
                    reason: "duplicate achievement id".to_owned(),
                });
            }
        }
        Ok(Self { achievements })
    }

    /// Look up one achievement.
    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id.as_str() == id)
    }

    /// All achievements, in authored order.
    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter()
    }

    /// Number of achievements.
    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Run one evaluation pass.
///
/// Every locked achievement whose criterion holds is unlocked and stamped
/// with `now`; its reward stays unclaimed. Returns the newly unlocked ids
/// in registry order.
pub fn evaluate(
    registry: &AchievementRegistry,
    ctx: &EvaluationContext<'_>,
    progress: &mut AchievementProgressMap,
    now: DateTime<Utc>,
) -> Vec<AchievementId> {
    let mut unlocked = Vec::new();
    for achievement in registry.iter() {
        let entry = progress
            .entry(achievement.id.clone())
            .or_insert_with(|| AchievementProgress::not_started(achievement.id.clone()));
        if entry.unlocked {
            continue;
        }
        if achievement.criterion.is_met(ctx) {
            entry.unlocked = true;
            entry.unlocked_at = Some(now);
            info!(
                achievement_id = %achievement.id,
                tier = ?achievement.tier,
                "achievement unlocked"
            );
            unlocked.push(achievement.id.clone());
        }
    }
    unlocked
}

/// Synthesize "not started" progress for every registered achievement
/// absent from `progress`. Returns how many entries were added.
pub fn hydrate(registry: &AchievementRegistry, progress: &mut AchievementProgressMap) -> usize {
    let mut added = 0_usize;
    for achievement in registry.iter() {
        if !progress.contains_key(&achievement.id) {
            progress.insert(
                achievement.id.clone(),
                AchievementProgress::not_started(achievement.id.clone()),
            );
            added = added.saturating_add(1);
        }
    }
    added
}
