//! Enumeration types for the Medallium collection engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{AchievementId, CircleId};

// ---------------------------------------------------------------------------
// Catalog categories
// ---------------------------------------------------------------------------

/// A category attribute of a collectible item.
///
/// Every catalog item carries a tribe, a source game and a rank; the element
/// is optional (some items have none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CategoryKind {
    /// The tribe the item belongs to (e.g. "Brave", "Charming").
    Tribe,
    /// The game the item first appeared in.
    Game,
    /// The rank letter (E through S).
    Rank,
    /// The elemental attribute, if any.
    Element,
}

impl CategoryKind {
    /// Every category kind, in display order.
    pub const ALL: [Self; 4] = [Self::Tribe, Self::Game, Self::Rank, Self::Element];

    /// Lowercase label used in logs and milestone text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tribe => "tribe",
            Self::Game => "game",
            Self::Rank => "rank",
            Self::Element => "element",
        }
    }
}

// ---------------------------------------------------------------------------
// Cosmetics
// ---------------------------------------------------------------------------

/// One category of non-gameplay reward, each owned by its own store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CosmeticKind {
    /// Page background.
    Background,
    /// Music track for the jukebox.
    MusicTrack,
    /// Avatar frame.
    Frame,
    /// Profile title.
    Title,
    /// Profile badge.
    Badge,
}

impl CosmeticKind {
    /// Every cosmetic kind, in application order.
    pub const ALL: [Self; 5] = [
        Self::Background,
        Self::MusicTrack,
        Self::Frame,
        Self::Title,
        Self::Badge,
    ];
}

// ---------------------------------------------------------------------------
// Externally supplied statistics
// ---------------------------------------------------------------------------

/// A numeric statistic supplied by the puzzle or economy subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum StatKind {
    /// Total puzzles played (daily and infinite).
    GamesPlayed,
    /// Total puzzles solved.
    GamesWon,
    /// Daily puzzles solved.
    DailyWins,
    /// Puzzles solved on the first guess.
    FirstTryWins,
    /// Current consecutive-day daily puzzle streak.
    DailyStreak,
    /// Best ever daily puzzle streak.
    BestDailyStreak,
    /// Current consecutive-day collection streak.
    CollectionStreak,
    /// Best ever collection streak.
    BestCollectionStreak,
    /// Lifetime points earned.
    TotalPointsEarned,
    /// Lifetime points spent in the shop.
    TotalPointsSpent,
    /// Shop purchases made.
    ItemsPurchased,
}

// ---------------------------------------------------------------------------
// Achievement tiers
// ---------------------------------------------------------------------------

/// Achievement tier determining rarity and presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AchievementTier {
    /// Easy, early-game milestones.
    Bronze,
    /// Milestones requiring some dedication.
    Silver,
    /// Rare milestones.
    Gold,
    /// Mastery milestones.
    Platinum,
}

// ---------------------------------------------------------------------------
// Reward sources and milestones
// ---------------------------------------------------------------------------

/// What produced a wallet credit.
///
/// Also serves as the idempotency key for reward application: a wallet
/// credits each source at most once.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RewardSource {
    /// Completion reward of a circle.
    Circle(CircleId),
    /// Reward of an achievement.
    Achievement(AchievementId),
    /// Any other earning (puzzle wins, daily bonus), tagged by the caller.
    Other(String),
}

impl RewardSource {
    /// Short tag stored in the earning ledger.
    pub fn tag(&self) -> String {
        match self {
            Self::Circle(id) => format!("circle:{id}"),
            Self::Achievement(id) => format!("achievement:{id}"),
            Self::Other(tag) => tag.clone(),
        }
    }
}

/// What a suggested next milestone tracks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MilestoneTarget {
    /// Reaching a total unlocked-item count.
    TotalCount,
    /// Completing every item of a tribe.
    Tribe(String),
    /// Completing every item of a game.
    Game(String),
}

/// Direction of a points-ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PointsEntryType {
    /// Points credited to the wallet.
    Earn,
    /// Points debited by a shop purchase.
    Spend,
}
