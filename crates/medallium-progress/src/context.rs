//! The read-only snapshot every achievement criterion is evaluated against.

use medallium_ledger::UnlockLedger;
use medallium_types::{CategoryKind, EconomyStats, GameStats, StatKind};

use crate::catalog::Catalog;
use crate::circles::{CircleBook, CircleProgressMap};
use crate::streaks::StreakSummary;

/// Aggregate player state passed to every criterion evaluation.
///
/// Everything is borrowed immutably, so evaluation cannot mutate state.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Unlocked items.
    pub ledger: &'a UnlockLedger,
    /// Full item catalog.
    pub catalog: &'a Catalog,
    /// Circles currently defined. Progress entries for other ids are
    /// ignored.
    pub book: &'a CircleBook,
    /// Current circle progress.
    pub circles: &'a CircleProgressMap,
    /// Puzzle statistics.
    pub game_stats: &'a GameStats,
    /// Wallet statistics.
    pub economy: &'a EconomyStats,
    /// Collection streaks derived from the ledger.
    pub streaks: StreakSummary,
}

impl EvaluationContext<'_> {
    /// Current value of an external or derived statistic.
    pub fn stat(&self, stat: StatKind) -> u64 {
        match stat {
            StatKind::GamesPlayed => self.game_stats.games_played,
            StatKind::GamesWon => self.game_stats.games_won,
            StatKind::DailyWins => self.game_stats.daily_wins,
            StatKind::FirstTryWins => self.game_stats.first_try_wins,
            StatKind::DailyStreak => self.game_stats.daily_streak,
            StatKind::BestDailyStreak => self.game_stats.best_daily_streak,
            StatKind::CollectionStreak => u64::from(self.streaks.current),
            StatKind::BestCollectionStreak => u64::from(self.streaks.best),
            StatKind::TotalPointsEarned => self.economy.total_points_earned,
            StatKind::TotalPointsSpent => self.economy.total_points_spent,
            StatKind::ItemsPurchased => self.economy.items_purchased,
        }
    }

    /// Number of unlocked items.
    pub fn unlocked_count(&self) -> usize {
        self.ledger.count()
    }

    /// Number of unlocked catalog items whose `kind` equals `value`.
    ///
    /// Ledger entries for items missing from the catalog are ignored.
    pub fn unlocked_in(&self, kind: CategoryKind, value: &str) -> usize {
        self.ledger
            .all()
            .filter_map(|record| self.catalog.get(record.item_id.as_str()))
            .filter(|item| item.category(kind) == Some(value))
            .count()
    }

    /// Whether the defined circle `id` is completed.
    pub fn circle_completed(&self, id: &str) -> bool {
        self.book.get(id).is_some()
            && self.circles.get(id).is_some_and(|progress| progress.completed)
    }

    /// Number of completed circles that are still defined.
    pub fn circles_completed(&self) -> usize {
        self.book
            .iter()
            .filter_map(|definition| self.circles.get(&definition.id))
            .filter(|progress| progress.completed)
            .count()
    }
}
