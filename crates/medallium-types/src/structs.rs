//! Core data model structs.
//!
//! Catalog items and authored definitions are immutable once loaded.
//! Progress records ([`CircleProgress`], [`AchievementProgress`]) are created
//! once per definition with "not started" defaults and mutated in place by
//! the engine afterwards.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calendar::CalendarDay;
use crate::enums::{CategoryKind, CosmeticKind, MilestoneTarget, PointsEntryType, RewardSource};
use crate::ids::{AchievementId, CircleId, EntryId, ItemId};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A catalog entry. Owned by the external catalog provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CollectibleItem {
    /// Stable catalog identifier.
    pub id: ItemId,
    /// Display name. Circles reference members by this name.
    pub name: String,
    /// Tribe the item belongs to.
    pub tribe: String,
    /// Game the item first appeared in.
    pub game: String,
    /// Rank letter.
    pub rank: String,
    /// Elemental attribute, when the item has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
}

impl CollectibleItem {
    /// The item's value for a category, if it has one.
    pub fn category(&self, kind: CategoryKind) -> Option<&str> {
        match kind {
            CategoryKind::Tribe => Some(&self.tribe),
            CategoryKind::Game => Some(&self.game),
            CategoryKind::Rank => Some(&self.rank),
            CategoryKind::Element => self.element.as_deref(),
        }
    }
}

/// One entry of the unlock ledger. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UnlockRecord {
    /// The unlocked item.
    pub item_id: ItemId,
    /// The item's display name at unlock time.
    pub item_name: String,
    /// When the item was first unlocked.
    pub unlocked_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

/// Reward payload attached to a circle or achievement.
///
/// Every component is optional and independent. Cosmetic components name
/// the id to unlock in the store owning that [`CosmeticKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Reward {
    /// Points credited to the wallet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u64>,
    /// Background to unlock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Music track to unlock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_track: Option<String>,
    /// Avatar frame to unlock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
    /// Profile title to unlock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Badge to unlock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl Reward {
    /// The cosmetic id for one kind, if this reward grants it.
    pub fn cosmetic(&self, kind: CosmeticKind) -> Option<&str> {
        match kind {
            CosmeticKind::Background => self.background.as_deref(),
            CosmeticKind::MusicTrack => self.music_track.as_deref(),
            CosmeticKind::Frame => self.frame.as_deref(),
            CosmeticKind::Title => self.title.as_deref(),
            CosmeticKind::Badge => self.badge.as_deref(),
        }
    }

    /// Whether the reward grants nothing at all.
    pub fn is_empty(&self) -> bool {
        self.points.is_none()
            && CosmeticKind::ALL
                .iter()
                .all(|kind| self.cosmetic(*kind).is_none())
    }
}

// ---------------------------------------------------------------------------
// Circles
// ---------------------------------------------------------------------------

/// An authored, named subset of catalog items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CircleDefinition {
    /// Stable circle identifier.
    pub id: CircleId,
    /// Display name.
    pub name: String,
    /// Member item names. Non-empty; order is irrelevant.
    pub members: Vec<String>,
    /// Reward for completing the circle.
    #[serde(default)]
    pub reward: Reward,
}

/// Derived completion state of one circle plus its claim fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CircleProgress {
    /// The circle this record tracks.
    pub circle_id: CircleId,
    /// Member names currently unlocked, in definition order.
    #[serde(default)]
    pub unlocked_members: Vec<String>,
    /// Rounded completion percentage (0--100).
    #[serde(default)]
    pub percent: u8,
    /// Whether every member is unlocked.
    #[serde(default)]
    pub completed: bool,
    /// When the circle first became complete: the unlock time of its last
    /// member, not the time of the recompute that noticed it. Never changes
    /// once set.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Whether the completion reward has been granted.
    #[serde(default)]
    pub reward_claimed: bool,
    /// When the completion reward was granted.
    #[serde(default)]
    pub reward_claimed_at: Option<DateTime<Utc>>,
}

impl CircleProgress {
    /// Default "not started" progress for a circle.
    pub const fn not_started(circle_id: CircleId) -> Self {
        Self {
            circle_id,
            unlocked_members: Vec::new(),
            percent: 0,
            completed: false,
            completed_at: None,
            reward_claimed: false,
            reward_claimed_at: None,
        }
    }

    /// Whether the reward can be claimed right now.
    pub const fn is_claimable(&self) -> bool {
        self.completed && !self.reward_claimed
    }
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

/// Unlock and claim state of one achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AchievementProgress {
    /// The achievement this record tracks.
    pub achievement_id: AchievementId,
    /// Whether the milestone has been reached. Never reverts.
    #[serde(default)]
    pub unlocked: bool,
    /// When the milestone was reached.
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
    /// Whether the reward has been granted.
    #[serde(default)]
    pub reward_claimed: bool,
    /// When the reward was granted.
    #[serde(default)]
    pub reward_claimed_at: Option<DateTime<Utc>>,
}

impl AchievementProgress {
    /// Default "not started" progress for an achievement.
    pub const fn not_started(achievement_id: AchievementId) -> Self {
        Self {
            achievement_id,
            unlocked: false,
            unlocked_at: None,
            reward_claimed: false,
            reward_claimed_at: None,
        }
    }

    /// Whether the reward can be claimed right now.
    pub const fn is_claimable(&self) -> bool {
        self.unlocked && !self.reward_claimed
    }
}

// ---------------------------------------------------------------------------
// External aggregate stats
// ---------------------------------------------------------------------------

/// Puzzle statistics supplied by the game subsystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameStats {
    /// Total puzzles played.
    #[serde(default)]
    pub games_played: u64,
    /// Total puzzles solved.
    #[serde(default)]
    pub games_won: u64,
    /// Daily puzzles solved.
    #[serde(default)]
    pub daily_wins: u64,
    /// Puzzles solved on the first guess.
    #[serde(default)]
    pub first_try_wins: u64,
    /// Current daily puzzle streak.
    #[serde(default)]
    pub daily_streak: u64,
    /// Best daily puzzle streak.
    #[serde(default)]
    pub best_daily_streak: u64,
}

/// Economy statistics supplied by the wallet subsystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EconomyStats {
    /// Lifetime points earned.
    #[serde(default)]
    pub total_points_earned: u64,
    /// Lifetime points spent.
    #[serde(default)]
    pub total_points_spent: u64,
    /// Shop purchases made.
    #[serde(default)]
    pub items_purchased: u64,
}

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

/// One line of the append-only points ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PointsEntry {
    /// Entry identifier.
    pub id: EntryId,
    /// Earn or spend.
    pub entry_type: PointsEntryType,
    /// Amount moved. Always positive.
    pub amount: u64,
    /// What produced or consumed the points.
    pub source: RewardSource,
    /// Free-form note shown in the history view.
    pub note: String,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// Completion counts for one category value (e.g. tribe "Brave").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CategoryStats {
    /// Catalog items with this value.
    pub total: u32,
    /// Unlocked items with this value.
    pub unlocked: u32,
    /// Rounded completion percentage (0--100).
    pub percentage: u8,
}

/// A suggested goal close to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NextMilestone {
    /// What the milestone tracks.
    pub target: MilestoneTarget,
    /// Display text.
    pub label: String,
    /// Current count toward the goal.
    pub current: u32,
    /// Count required.
    pub goal: u32,
    /// `goal - current`.
    pub remaining: u32,
}

/// Aggregate analytics returned by `get_stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CollectionStats {
    /// Items in the catalog.
    pub total_items: u32,
    /// Items unlocked.
    pub unlocked_items: u32,
    /// Rounded overall completion percentage.
    pub completion_percentage: u8,
    /// Consecutive active days ending today or yesterday.
    pub current_streak: u32,
    /// Longest run of consecutive active days.
    pub best_streak: u32,
    /// Distinct days with at least one unlock.
    pub active_days: u32,
    /// Most recent active day.
    pub last_active_day: Option<CalendarDay>,
    /// Earliest unlock.
    pub first_unlock_at: Option<DateTime<Utc>>,
    /// Latest unlock.
    pub last_unlock_at: Option<DateTime<Utc>>,
    /// Newest unlocks first.
    pub recent_unlocks: Vec<UnlockRecord>,
    /// Per-category breakdown keyed by category value.
    pub by_category: BTreeMap<CategoryKind, BTreeMap<String, CategoryStats>>,
    /// Circles completed.
    pub circles_completed: u32,
    /// Circles defined.
    pub circles_total: u32,
    /// Achievements unlocked.
    pub achievements_unlocked: u32,
    /// Achievements defined.
    pub achievements_total: u32,
    /// Rewards ready to claim (circles and achievements).
    pub claimable_rewards: u32,
    /// Nearest goals, closest first.
    pub next_milestones: Vec<NextMilestone>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> CollectibleItem {
        CollectibleItem {
            id: ItemId::from("jibanyan"),
            name: "Jibanyan".to_owned(),
            tribe: "Charming".to_owned(),
            game: "Yo-kai Watch".to_owned(),
            rank: "B".to_owned(),
            element: None,
        }
    }

    #[test]
    fn item_category_lookup() {
        let jibanyan = item();
        assert_eq!(jibanyan.category(CategoryKind::Tribe), Some("Charming"));
        assert_eq!(jibanyan.category(CategoryKind::Rank), Some("B"));
        assert_eq!(jibanyan.category(CategoryKind::Element), None);
    }

    #[test]
    fn empty_reward_detection() {
        assert!(Reward::default().is_empty());
        let reward = Reward {
            badge: Some("paws".to_owned()),
            ..Reward::default()
        };
        assert!(!reward.is_empty());
        assert_eq!(reward.cosmetic(CosmeticKind::Badge), Some("paws"));
    }

    #[test]
    fn progress_defaults_are_not_claimable() {
        assert!(!CircleProgress::not_started(CircleId::from("c")).is_claimable());
        assert!(!AchievementProgress::not_started(AchievementId::from("a")).is_claimable());
    }

    #[test]
    fn progress_blob_tolerates_missing_fields() {
        let parsed: Result<CircleProgress, _> =
            serde_json::from_str(r#"{"circle_id":"nyan-gang","percent":50}"#);
        assert!(parsed.is_ok());
        if let Ok(progress) = parsed {
            assert_eq!(progress.percent, 50);
            assert!(!progress.completed);
            assert!(progress.completed_at.is_none());
        }
    }

    #[test]
    fn reward_omits_absent_components() {
        let reward = Reward {
            points: Some(100),
            ..Reward::default()
        };
        let json = serde_json::to_string(&reward).ok();
        assert_eq!(json.as_deref(), Some(r#"{"points":100}"#));
    }
}
