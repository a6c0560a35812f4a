//! Collection analytics: per-category completion, next milestones, and the
//! aggregate [`CollectionStats`] snapshot.

use std::collections::BTreeMap;

use medallium_ledger::UnlockLedger;
use medallium_types::{
    CalendarDay, CategoryKind, CategoryStats, CollectionStats, MilestoneTarget, NextMilestone,
};

use crate::achievements::{AchievementProgressMap, AchievementRegistry};
use crate::catalog::Catalog;
use crate::circles::{CircleBook, CircleProgressMap};
use crate::config::ProgressConfig;
use crate::streaks;

/// `round(100 * part / whole)`, half away from zero, clamped to 100.
///
/// Returns 0 when `whole` is 0.
pub fn rounded_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = u128::try_from(part).unwrap_or(u128::MAX);
    let whole = u128::try_from(whole).unwrap_or(u128::MAX);
    let scaled = part
        .saturating_mul(200)
        .saturating_add(whole)
        .checked_div(whole.saturating_mul(2))
        .unwrap_or(0);
    u8::try_from(scaled.min(100)).unwrap_or(100)
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Category breakdown
// ---------------------------------------------------------------------------

/// Completion per category value, for every [`CategoryKind`].
///
/// Only catalog items count; ledger entries for unknown items are ignored.
pub fn category_stats(
    catalog: &Catalog,
    ledger: &UnlockLedger,
) -> BTreeMap<CategoryKind, BTreeMap<String, CategoryStats>> {
    let mut breakdown = BTreeMap::new();
    for kind in CategoryKind::ALL {
        let mut unlocked: BTreeMap<&str, usize> = BTreeMap::new();
        for value in ledger
            .all()
            .filter_map(|record| catalog.get(record.item_id.as_str()))
            .filter_map(|item| item.category(kind))
        {
            let count = unlocked.entry(value).or_insert(0);
            *count = count.saturating_add(1);
        }

        let per_value: BTreeMap<String, CategoryStats> = catalog
            .totals_by(kind)
            .into_iter()
            .map(|(value, total)| {
                let have = unlocked.get(value).copied().unwrap_or(0);
                (
                    value.to_owned(),
                    CategoryStats {
                        total: to_u32(total),
                        unlocked: to_u32(have),
                        percentage: rounded_percent(have, total),
                    },
                )
            })
            .collect();
        breakdown.insert(kind, per_value);
    }
    breakdown
}

// ---------------------------------------------------------------------------
// Next milestones
// ---------------------------------------------------------------------------

fn count_milestones(
    config: &ProgressConfig,
    unlocked: u32,
    catalog_size: u32,
) -> Vec<NextMilestone> {
    let mut thresholds = config.count_milestones.clone();
    thresholds.sort_unstable();
    thresholds.dedup();
    thresholds
        .into_iter()
        .filter(|goal| *goal > unlocked && *goal <= catalog_size)
        .take(config.count_milestone_lookahead)
        .map(|goal| NextMilestone {
            target: MilestoneTarget::TotalCount,
            label: format!("Unlock {goal} items"),
            current: unlocked,
            goal,
            remaining: goal.saturating_sub(unlocked),
        })
        .collect()
}

/// The incomplete value of one category closest to completion.
///
/// Ties on remaining count go to the alphabetically first value.
fn nearest_incomplete(
    per_value: Option<&BTreeMap<String, CategoryStats>>,
) -> Option<(&str, CategoryStats)> {
    per_value?
        .iter()
        .filter(|(_, stats)| stats.unlocked < stats.total)
        .min_by_key(|(_, stats)| stats.total.saturating_sub(stats.unlocked))
        .map(|(value, stats)| (value.as_str(), *stats))
}

const fn category_milestone(
    target: MilestoneTarget,
    label: String,
    stats: CategoryStats,
) -> NextMilestone {
    NextMilestone {
        target,
        label,
        current: stats.unlocked,
        goal: stats.total,
        remaining: stats.total.saturating_sub(stats.unlocked),
    }
}

/// Nearest goals: the next unmet total-count thresholds plus the
/// incomplete tribe and the incomplete game closest to completion, sorted
/// by remaining amount and capped at `config.max_next_milestones`.
pub fn next_milestones(
    config: &ProgressConfig,
    catalog: &Catalog,
    ledger: &UnlockLedger,
    breakdown: &BTreeMap<CategoryKind, BTreeMap<String, CategoryStats>>,
) -> Vec<NextMilestone> {
    let mut milestones = count_milestones(config, to_u32(ledger.count()), to_u32(catalog.len()));

    if let Some((tribe, stats)) = nearest_incomplete(breakdown.get(&CategoryKind::Tribe)) {
        milestones.push(category_milestone(
            MilestoneTarget::Tribe(tribe.to_owned()),
            format!("Complete the {tribe} tribe"),
            stats,
        ));
    }
    if let Some((game, stats)) = nearest_incomplete(breakdown.get(&CategoryKind::Game)) {
        milestones.push(category_milestone(
            MilestoneTarget::Game(game.to_owned()),
            format!("Complete {game}"),
            stats,
        ));
    }

    milestones.sort_by(|a, b| {
        a.remaining
            .cmp(&b.remaining)
            .then_with(|| a.target.cmp(&b.target))
    });
    milestones.truncate(config.max_next_milestones);
    milestones
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// Everything [`collection_stats`] reads.
#[derive(Debug, Clone, Copy)]
pub struct StatsInputs<'a> {
    /// Analytics tunables.
    pub config: &'a ProgressConfig,
    /// Item catalog.
    pub catalog: &'a Catalog,
    /// Unlocked items.
    pub ledger: &'a UnlockLedger,
    /// Circle definitions.
    pub book: &'a CircleBook,
    /// Circle progress.
    pub circles: &'a CircleProgressMap,
    /// Achievement registry.
    pub registry: &'a AchievementRegistry,
    /// Achievement progress.
    pub achievements: &'a AchievementProgressMap,
    /// The current local calendar day.
    pub today: CalendarDay,
}

/// Build the aggregate analytics snapshot.
pub fn collection_stats(inputs: &StatsInputs<'_>) -> CollectionStats {
    let StatsInputs {
        config,
        catalog,
        ledger,
        book,
        circles,
        registry,
        achievements,
        today,
    } = *inputs;

    let streak = streaks::summarize(ledger.timestamps(), config.offset(), today);
    let by_category = category_stats(catalog, ledger);
    let next_milestones = next_milestones(config, catalog, ledger, &by_category);

    let known_circles = || book.iter().filter_map(|d| circles.get(&d.id));
    let known_achievements = || registry.iter().filter_map(|a| achievements.get(&a.id));

    let circles_completed = known_circles().filter(|p| p.completed).count();
    let achievements_unlocked = known_achievements().filter(|p| p.unlocked).count();
    let claimable = known_circles()
        .filter(|p| p.is_claimable())
        .count()
        .saturating_add(known_achievements().filter(|p| p.is_claimable()).count());

    let unlocked_items = catalog
        .items()
        .filter(|item| ledger.is_unlocked(item.id.as_str()))
        .count();

    CollectionStats {
        total_items: to_u32(catalog.len()),
        unlocked_items: to_u32(unlocked_items),
        completion_percentage: rounded_percent(unlocked_items, catalog.len()),
        current_streak: streak.current,
        best_streak: streak.best,
        active_days: streak.active_days,
        last_active_day: streak.last_active_day,
        first_unlock_at: ledger.first_unlock_at(),
        last_unlock_at: ledger.last_unlock_at(),
        recent_unlocks: ledger
            .recent(config.recent_unlocks)
            .into_iter()
            .cloned()
            .collect(),
        by_category,
        circles_completed: to_u32(circles_completed),
        circles_total: to_u32(book.len()),
        achievements_unlocked: to_u32(achievements_unlocked),
        achievements_total: to_u32(registry.len()),
        claimable_rewards: to_u32(claimable),
        next_milestones,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use medallium_types::{CollectibleItem, ItemId};

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn item(id: &str, tribe: &str, game: &str) -> CollectibleItem {
        CollectibleItem {
            id: ItemId::from(id),
            name: id.to_owned(),
            tribe: tribe.to_owned(),
            game: game.to_owned(),
            rank: "C".to_owned(),
            element: Some("Wind".to_owned()),
        }
    }

    fn brave_catalog() -> Vec<CollectibleItem> {
        (0..10)
            .map(|n| item(&format!("brave-{n}"), "Brave", "Yo-kai Watch"))
            .chain((0..3).map(|n| item(&format!("eerie-{n}"), "Eerie", "Yo-kai Watch 2")))
            .collect()
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(4, 10), 40);
        assert_eq!(rounded_percent(3, 3), 100);
        assert_eq!(rounded_percent(0, 0), 0);
    }

    #[test]
    fn tribe_breakdown_counts_unlocked() {
        let items = brave_catalog();
        let catalog = Catalog::from_items(items.clone());
        let mut ledger = UnlockLedger::new();
        for brave in items.iter().take(4) {
            ledger.unlock(brave, t0());
        }

        let breakdown = category_stats(&catalog, &ledger);
        let brave = breakdown
            .get(&CategoryKind::Tribe)
            .and_then(|tribes| tribes.get("Brave"))
            .copied();
        assert_eq!(
            brave,
            Some(CategoryStats {
                total: 10,
                unlocked: 4,
                percentage: 40
            })
        );
        let wind = breakdown
            .get(&CategoryKind::Element)
            .and_then(|elements| elements.get("Wind"))
            .copied();
        assert_eq!(wind.map(|s| s.total), Some(13));
    }

    #[test]
    fn unknown_ledger_items_are_ignored() {
        let catalog = Catalog::from_items(brave_catalog());
        let mut ledger = UnlockLedger::new();
        ledger.unlock(&item("ghost", "Brave", "Yo-kai Watch"), t0());
        let breakdown = category_stats(&catalog, &ledger);
        let brave = breakdown
            .get(&CategoryKind::Tribe)
            .and_then(|tribes| tribes.get("Brave"))
            .map(|s| s.unlocked);
        assert_eq!(brave, Some(0));
    }

    #[test]
    fn next_milestones_sorted_and_capped() {
        let items = brave_catalog();
        let catalog = Catalog::from_items(items.clone());
        let mut ledger = UnlockLedger::new();
        for unlocked in items.iter().take(8) {
            ledger.unlock(unlocked, t0());
        }
        let config = ProgressConfig::default();
        let breakdown = category_stats(&catalog, &ledger);
        let milestones = next_milestones(&config, &catalog, &ledger, &breakdown);

        // Brave: 2 left; count 10: 2 left; Yo-kai Watch 2: 3 left.
        // The count threshold of 25 exceeds the 13-item catalog.
        let remaining: Vec<u32> = milestones.iter().map(|m| m.remaining).collect();
        assert_eq!(remaining, vec![2, 2, 3]);
        assert_eq!(milestones.first().map(|m| &m.target), Some(&MilestoneTarget::TotalCount));
        assert!(
            milestones
                .iter()
                .any(|m| m.target == MilestoneTarget::Tribe("Brave".to_owned()))
        );
        assert!(milestones.len() <= config.max_next_milestones);
    }

    #[test]
    fn aggregate_snapshot() {
        let items = brave_catalog();
        let catalog = Catalog::from_items(items.clone());
        let mut ledger = UnlockLedger::new();
        for (n, unlocked) in items.iter().take(3).enumerate() {
            let offset = Duration::days(i64::try_from(n).unwrap_or(0));
            ledger.unlock(unlocked, t0() + offset);
        }
        let config = ProgressConfig::default();
        let book = CircleBook::default();
        let registry = AchievementRegistry::default();
        let circles = CircleProgressMap::new();
        let achievements = AchievementProgressMap::new();
        let today = CalendarDay::from_ymd(2024, 1, 3);
        assert!(today.is_some());
        let Some(today) = today else { return };

        let stats = collection_stats(&StatsInputs {
            config: &config,
            catalog: &catalog,
            ledger: &ledger,
            book: &book,
            circles: &circles,
            registry: &registry,
            achievements: &achievements,
            today,
        });
        assert_eq!(stats.total_items, 13);
        assert_eq!(stats.unlocked_items, 3);
        assert_eq!(stats.completion_percentage, 23);
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.best_streak, 3);
        assert_eq!(stats.active_days, 3);
        assert_eq!(stats.recent_unlocks.len(), 3);
        assert_eq!(stats.first_unlock_at, Some(t0()));
        assert_eq!(stats.claimable_rewards, 0);
    }
}
