//! The collection engine facade.
//!
//! [`CollectionEngine`] owns one player's progress and orchestrates the
//! pure engines of `medallium-progress`: an unlock appends to the ledger,
//! the affected circles are recomputed, locked achievements are
//! re-evaluated, and each changed slot is written back to the
//! [`ProgressStore`].
//!
//! # Error surface
//!
//! The boolean/option operations (`unlock_item`, `claim_circle_reward`,
//! `claim_achievement_reward`, `has_claimable_reward`) never fail: unknown
//! ids and invalid claims come back as `None`/`false`. The `try_` variants
//! return the underlying [`ProgressError`] for callers that want to know
//! why. Store failures are logged and never undo in-memory progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use medallium_ledger::UnlockLedger;
use medallium_progress::achievements::{self, AchievementProgressMap, AchievementRegistry};
use medallium_progress::circles::{self, CircleBook, CircleProgressMap};
use medallium_progress::rewards::{self, ClaimReceipt, RewardSinks};
use medallium_progress::stats::{self, StatsInputs};
use medallium_progress::{Catalog, EvaluationContext, ProgressConfig, ProgressError, streaks};
use medallium_types::{
    AchievementId, AchievementTier, CalendarDay, CircleId, CollectionStats, EconomyStats,
    GameStats, ItemId, Reward, RewardSource,
};

use crate::clock::Clock;
use crate::config::MedalliumConfig;
use crate::data::{self, DataError};
use crate::store::{self, ProgressStore, StoreError, StoreSlot};

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What [`CollectionEngine::load`] found and repaired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Unlocked items in the loaded ledger.
    pub ledger_entries: usize,
    /// Circles synthesized with "not started" progress.
    pub circles_hydrated: usize,
    /// Achievements synthesized with "not started" progress.
    pub achievements_hydrated: usize,
    /// Circles that became complete during the load recompute.
    pub circles_completed: Vec<CircleId>,
    /// Achievements that unlocked during the load evaluation.
    pub achievements_unlocked: Vec<AchievementId>,
}

/// Result of unlocking one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockOutcome {
    /// The item.
    pub item_id: ItemId,
    /// `false` when the item was already owned (nothing changed).
    pub newly_unlocked: bool,
    /// Circles this unlock completed.
    pub circles_completed: Vec<CircleId>,
    /// Achievements this unlock satisfied.
    pub achievements_unlocked: Vec<AchievementId>,
}

/// A reward that is ready to claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimableReward {
    /// The circle or achievement.
    pub source: RewardSource,
    /// Display name.
    pub name: String,
    /// What claiming grants.
    pub reward: Reward,
}

/// An achievement as shown to the player, with hidden ones masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementView {
    /// Stable identifier.
    pub id: AchievementId,
    /// Name, or a placeholder while hidden and locked.
    pub name: String,
    /// Description, or a placeholder while hidden and locked.
    pub description: String,
    /// Rarity tier.
    pub tier: AchievementTier,
    /// Whether the achievement is unlocked.
    pub unlocked: bool,
    /// When it unlocked.
    pub unlocked_at: Option<DateTime<Utc>>,
    /// Whether its reward was claimed.
    pub reward_claimed: bool,
}

// ---------------------------------------------------------------------------
// CollectionEngine
// ---------------------------------------------------------------------------

/// One player's collection progress.
#[derive(Debug)]
pub struct CollectionEngine {
    config: ProgressConfig,
    catalog: Catalog,
    book: CircleBook,
    registry: AchievementRegistry,
    ledger: UnlockLedger,
    circles: CircleProgressMap,
    achievements: AchievementProgressMap,
    game_stats: GameStats,
    economy: EconomyStats,
    store: Box<dyn ProgressStore>,
    clock: Box<dyn Clock>,
}

impl CollectionEngine {
    /// Create an engine with empty progress. Call [`Self::load`] to read
    /// the store.
    pub fn new(
        config: ProgressConfig,
        catalog: Catalog,
        book: CircleBook,
        registry: AchievementRegistry,
        store: Box<dyn ProgressStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            config,
            catalog,
            book,
            registry,
            ledger: UnlockLedger::new(),
            circles: CircleProgressMap::new(),
            achievements: AchievementProgressMap::new(),
            game_stats: GameStats::default(),
            economy: EconomyStats::default(),
            store,
            clock,
        }
    }

    /// Create an engine from a full configuration, loading the authored
    /// data it names (or the built-in data).
    ///
    /// # Errors
    ///
    /// Returns [`DataError`] if the authored data cannot be read or is
    /// invalid.
    pub fn from_config(
        config: &MedalliumConfig,
        catalog: Catalog,
        store: Box<dyn ProgressStore>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, DataError> {
        let book = data::load_circles(&config.data)?;
        let registry = data::load_achievements(&config.data)?;
        info!(
            items = catalog.len(),
            circles = book.len(),
            achievements = registry.len(),
            "collection engine created"
        );
        Ok(Self::new(
            config.progress.clone(),
            catalog,
            book,
            registry,
            store,
            clock,
        ))
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    fn read_slot(&self, slot: StoreSlot) -> Option<String> {
        match self.store.load(slot) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(slot = %slot, error = %err, "failed to read progress blob, starting fresh");
                None
            }
        }
    }

    /// Load every slot from the store, hydrate missing registry entries,
    /// then run a full recompute.
    ///
    /// Corrupt or unreadable blobs are replaced by fresh defaults.
    pub fn load(&mut self) -> LoadReport {
        self.ledger = store::decode_or_default(
            StoreSlot::Ledger,
            self.read_slot(StoreSlot::Ledger).as_deref(),
        );
        self.circles = store::decode_or_default(
            StoreSlot::Circles,
            self.read_slot(StoreSlot::Circles).as_deref(),
        );
        self.achievements = store::decode_or_default(
            StoreSlot::Achievements,
            self.read_slot(StoreSlot::Achievements).as_deref(),
        );

        let circles_hydrated = circles::hydrate(&self.book, &mut self.circles);
        let achievements_hydrated = achievements::hydrate(&self.registry, &mut self.achievements);
        let circles_completed = self.recompute_circles();
        let achievements_unlocked = self.recompute_achievements();

        let report = LoadReport {
            ledger_entries: self.ledger.count(),
            circles_hydrated,
            achievements_hydrated,
            circles_completed,
            achievements_unlocked,
        };
        info!(
            ledger_entries = report.ledger_entries,
            circles_hydrated = report.circles_hydrated,
            achievements_hydrated = report.achievements_hydrated,
            "progress loaded"
        );
        report
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn persist(&mut self, slot: StoreSlot) -> Result<(), StoreError> {
        let blob = match slot {
            StoreSlot::Ledger => store::encode(&self.ledger)?,
            StoreSlot::Circles => store::encode(&self.circles)?,
            StoreSlot::Achievements => store::encode(&self.achievements)?,
        };
        self.store.save(slot, &blob)
    }

    fn persist_logged(&mut self, slot: StoreSlot) {
        if let Err(err) = self.persist(slot) {
            error!(slot = %slot, error = %err, "failed to persist progress");
        }
    }

    // -----------------------------------------------------------------------
    // Unlocks and recompute
    // -----------------------------------------------------------------------

    fn today(&self) -> CalendarDay {
        self.clock.today(self.config.offset())
    }

    /// Unlock a catalog item and propagate the change.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::UnknownItem`] if `item_id` is not in the
    /// catalog.
    pub fn try_unlock_item(&mut self, item_id: &str) -> Result<UnlockOutcome, ProgressError> {
        let Some(item) = self.catalog.get(item_id) else {
            debug!(item_id, "unlock rejected: unknown item");
            return Err(ProgressError::UnknownItem(item_id.to_owned()));
        };
        let item_name = item.name.clone();
        let newly_unlocked = self.ledger.unlock(item, self.clock.now());
        if !newly_unlocked {
            return Ok(UnlockOutcome {
                item_id: item_id.into(),
                newly_unlocked,
                circles_completed: Vec::new(),
                achievements_unlocked: Vec::new(),
            });
        }
        self.persist_logged(StoreSlot::Ledger);

        let next = circles::recompute_for_item(&self.book, &self.ledger, &self.circles, &item_name);
        let circles_completed = circles::newly_completed(&self.circles, &next);
        if next != self.circles {
            self.circles = next;
            self.persist_logged(StoreSlot::Circles);
        }
        let achievements_unlocked = self.recompute_achievements();

        Ok(UnlockOutcome {
            item_id: item_id.into(),
            newly_unlocked,
            circles_completed,
            achievements_unlocked,
        })
    }

    /// Unlock a catalog item. Returns `None` for an unknown id.
    pub fn unlock_item(&mut self, item_id: &str) -> Option<UnlockOutcome> {
        self.try_unlock_item(item_id).ok()
    }

    /// Full recompute of every circle. Returns newly completed circles.
    pub fn recompute_circles(&mut self) -> Vec<CircleId> {
        let next = circles::recompute(&self.book, &self.ledger, &self.circles);
        let completed = circles::newly_completed(&self.circles, &next);
        if next != self.circles {
            self.circles = next;
            self.persist_logged(StoreSlot::Circles);
        }
        completed
    }

    /// Evaluate every locked achievement. Returns newly unlocked ones.
    pub fn recompute_achievements(&mut self) -> Vec<AchievementId> {
        let now = self.clock.now();
        let today = self.today();
        let ctx = EvaluationContext {
            ledger: &self.ledger,
            catalog: &self.catalog,
            book: &self.book,
            circles: &self.circles,
            game_stats: &self.game_stats,
            economy: &self.economy,
            streaks: streaks::summarize(self.ledger.timestamps(), self.config.offset(), today),
        };
        let before = self.achievements.clone();
        let unlocked = achievements::evaluate(&self.registry, &ctx, &mut self.achievements, now);
        if self.achievements != before {
            self.persist_logged(StoreSlot::Achievements);
        }
        unlocked
    }

    /// Replace the puzzle statistics and re-evaluate achievements.
    pub fn record_game_stats(&mut self, stats: GameStats) -> Vec<AchievementId> {
        self.game_stats = stats;
        self.recompute_achievements()
    }

    /// Replace the economy statistics and re-evaluate achievements.
    pub fn record_economy_stats(&mut self, stats: EconomyStats) -> Vec<AchievementId> {
        self.economy = stats;
        self.recompute_achievements()
    }

    // -----------------------------------------------------------------------
    // Claims
    // -----------------------------------------------------------------------

    /// Claim a completed circle's reward into `sinks`.
    ///
    /// The claimed flag is persisted after every component was applied. A
    /// failed save is logged and the claim still counts.
    ///
    /// # Errors
    ///
    /// See [`rewards::claim_circle`].
    pub fn try_claim_circle_reward(
        &mut self,
        id: &str,
        sinks: &mut RewardSinks<'_>,
    ) -> Result<ClaimReceipt, ProgressError> {
        let now = self.clock.now();
        let receipt = rewards::claim_circle(&self.book, &mut self.circles, id, sinks, now)?;
        self.persist_logged(StoreSlot::Circles);
        Ok(receipt)
    }

    /// Claim a completed circle's reward. `false` for any invalid attempt.
    pub fn claim_circle_reward(&mut self, id: &str, sinks: &mut RewardSinks<'_>) -> bool {
        self.try_claim_circle_reward(id, sinks).is_ok()
    }

    /// Claim an unlocked achievement's reward into `sinks`.
    ///
    /// # Errors
    ///
    /// See [`rewards::claim_achievement`].
    pub fn try_claim_achievement_reward(
        &mut self,
        id: &str,
        sinks: &mut RewardSinks<'_>,
    ) -> Result<ClaimReceipt, ProgressError> {
        let now = self.clock.now();
        let receipt =
            rewards::claim_achievement(&self.registry, &mut self.achievements, id, sinks, now)?;
        self.persist_logged(StoreSlot::Achievements);
        Ok(receipt)
    }

    /// Claim an unlocked achievement's reward. `false` for any invalid
    /// attempt.
    pub fn claim_achievement_reward(&mut self, id: &str, sinks: &mut RewardSinks<'_>) -> bool {
        self.try_claim_achievement_reward(id, sinks).is_ok()
    }

    /// Whether `id` names a defined circle or achievement with an
    /// unclaimed reward.
    pub fn has_claimable_reward(&self, id: &str) -> bool {
        let circle = self.book.get(id).is_some()
            && self.circles.get(id).is_some_and(|p| p.is_claimable());
        let achievement = self.registry.get(id).is_some()
            && self.achievements.get(id).is_some_and(|p| p.is_claimable());
        circle || achievement
    }

    /// Every reward ready to claim: circles first, then achievements, each
    /// in authored order.
    pub fn claimable_rewards(&self) -> Vec<ClaimableReward> {
        let circles = self
            .book
            .iter()
            .filter(|d| self.circles.get(&d.id).is_some_and(|p| p.is_claimable()))
            .map(|d| ClaimableReward {
                source: RewardSource::Circle(d.id.clone()),
                name: d.name.clone(),
                reward: d.reward.clone(),
            });
        let achievements = self
            .registry
            .iter()
            .filter(|a| self.achievements.get(&a.id).is_some_and(|p| p.is_claimable()))
            .map(|a| ClaimableReward {
                source: RewardSource::Achievement(a.id.clone()),
                name: a.name.clone(),
                reward: a.reward.clone(),
            });
        circles.chain(achievements).collect()
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Aggregate analytics for the current state.
    pub fn get_stats(&self) -> CollectionStats {
        stats::collection_stats(&StatsInputs {
            config: &self.config,
            catalog: &self.catalog,
            ledger: &self.ledger,
            book: &self.book,
            circles: &self.circles,
            registry: &self.registry,
            achievements: &self.achievements,
            today: self.today(),
        })
    }

    /// Every achievement in registry order, hidden ones masked.
    pub fn achievement_views(&self) -> Vec<AchievementView> {
        self.registry
            .iter()
            .map(|a| {
                let progress = self.achievements.get(&a.id);
                let unlocked = progress.is_some_and(|p| p.unlocked);
                AchievementView {
                    id: a.id.clone(),
                    name: a.display_name(unlocked).to_owned(),
                    description: a.display_description(unlocked).to_owned(),
                    tier: a.tier,
                    unlocked,
                    unlocked_at: progress.and_then(|p| p.unlocked_at),
                    reward_claimed: progress.is_some_and(|p| p.reward_claimed),
                }
            })
            .collect()
    }

    /// The unlock ledger.
    pub const fn ledger(&self) -> &UnlockLedger {
        &self.ledger
    }

    /// Circle progress.
    pub const fn circles(&self) -> &CircleProgressMap {
        &self.circles
    }

    /// Achievement progress.
    pub const fn achievements(&self) -> &AchievementProgressMap {
        &self.achievements
    }

    /// Circle definitions.
    pub const fn circle_book(&self) -> &CircleBook {
        &self.book
    }

    /// Achievement registry.
    pub const fn registry(&self) -> &AchievementRegistry {
        &self.registry
    }

    /// The item catalog.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current puzzle statistics.
    pub const fn game_stats(&self) -> &GameStats {
        &self.game_stats
    }

    /// Current economy statistics.
    pub const fn economy_stats(&self) -> &EconomyStats {
        &self.economy
    }
}
