//! Declarative achievement criteria.
//!
//! A [`Criterion`] is plain authored data. [`Criterion::is_met`] is a pure
//! function of the [`EvaluationContext`]: no counters, no caching, no
//! mutation, so the evaluator may call it any number of times.

use serde::{Deserialize, Serialize};

use medallium_types::{CategoryKind, CircleId, StatKind};

use crate::context::EvaluationContext;

/// A milestone predicate over aggregate player state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Criterion {
    /// At least `count` items unlocked.
    CollectedAtLeast {
        /// Required item count.
        count: u32,
    },

    /// Every catalog item with this category value unlocked.
    ///
    /// Never met for a value with no catalog items.
    CategoryComplete {
        /// Category kind.
        kind: CategoryKind,
        /// Category value, e.g. a tribe name.
        value: String,
    },

    /// At least `count` items with this category value unlocked.
    CategoryAtLeast {
        /// Category kind.
        kind: CategoryKind,
        /// Category value.
        value: String,
        /// Required item count.
        count: u32,
    },

    /// At least `count` items unlocked in every listed value at once.
    AllCategoriesAtLeast {
        /// Category kind.
        kind: CategoryKind,
        /// Values that must all reach the threshold.
        values: Vec<String>,
        /// Required item count per value.
        count: u32,
    },

    /// One specific circle completed.
    CircleCompleted {
        /// The circle.
        circle: CircleId,
    },

    /// At least `count` circles completed.
    CirclesCompleted {
        /// Required circle count.
        count: u32,
    },

    /// An external or derived statistic reached a threshold.
    StatAtLeast {
        /// The statistic.
        stat: StatKind,
        /// Required value.
        threshold: u64,
    },

    /// Every nested criterion met.
    AllOf {
        /// Nested criteria.
        criteria: Vec<Self>,
    },

    /// At least one nested criterion met.
    AnyOf {
        /// Nested criteria.
        criteria: Vec<Self>,
    },
}

impl Criterion {
    /// Evaluate against a snapshot.
    pub fn is_met(&self, ctx: &EvaluationContext<'_>) -> bool {
        match self {
            Self::CollectedAtLeast { count } => at_least(ctx.unlocked_count(), *count),
            Self::CategoryComplete { kind, value } => {
                let total = ctx.catalog.count_in(*kind, value);
                total > 0 && ctx.unlocked_in(*kind, value) >= total
            }
            Self::CategoryAtLeast { kind, value, count } => {
                at_least(ctx.unlocked_in(*kind, value), *count)
            }
            Self::AllCategoriesAtLeast {
                kind,
                values,
                count,
            } => values
                .iter()
                .all(|value| at_least(ctx.unlocked_in(*kind, value), *count)),
            Self::CircleCompleted { circle } => ctx.circle_completed(circle.as_str()),
            Self::CirclesCompleted { count } => at_least(ctx.circles_completed(), *count),
            Self::StatAtLeast { stat, threshold } => ctx.stat(*stat) >= *threshold,
            Self::AllOf { criteria } => criteria.iter().all(|c| c.is_met(ctx)),
            Self::AnyOf { criteria } => criteria.iter().any(|c| c.is_met(ctx)),
        }
    }
}

fn at_least(actual: usize, required: u32) -> bool {
    usize::try_from(required).is_ok_and(|required| actual >= required)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use medallium_ledger::UnlockLedger;
    use medallium_types::{
        CircleDefinition, CircleProgress, CollectibleItem, EconomyStats, GameStats, ItemId, Reward,
    };

    use super::*;
    use crate::catalog::Catalog;
    use crate::circles::{CircleBook, CircleProgressMap};
    use crate::streaks::StreakSummary;

    fn item(id: &str, tribe: &str) -> CollectibleItem {
        CollectibleItem {
            id: ItemId::from(id),
            name: id.to_owned(),
            tribe: tribe.to_owned(),
            game: "Yo-kai Watch".to_owned(),
            rank: "E".to_owned(),
            element: None,
        }
    }

    struct Fixture {
        ledger: UnlockLedger,
        catalog: Catalog,
        book: CircleBook,
        circles: CircleProgressMap,
        game_stats: GameStats,
        economy: EconomyStats,
    }

    impl Fixture {
        fn new() -> Self {
            let items = vec![
                item("b1", "Brave"),
                item("b2", "Brave"),
                item("s1", "Shady"),
                item("s2", "Shady"),
                item("s3", "Shady"),
            ];
            let mut ledger = UnlockLedger::new();
            for unlocked in items.iter().take(3) {
                ledger.unlock(unlocked, Utc::now());
            }
            let book = CircleBook::new(vec![CircleDefinition {
                id: CircleId::from("done"),
                name: "Done".to_owned(),
                members: vec!["b1".to_owned()],
                reward: Reward::default(),
            }])
            .unwrap_or_default();
            let mut circles = CircleProgressMap::new();
            for id in ["done", "retired"] {
                circles.insert(
                    CircleId::from(id),
                    CircleProgress {
                        completed: true,
                        ..CircleProgress::not_started(CircleId::from(id))
                    },
                );
            }
            Self {
                ledger,
                catalog: Catalog::from_items(items),
                book,
                circles,
                game_stats: GameStats {
                    games_won: 12,
                    ..GameStats::default()
                },
                economy: EconomyStats {
                    total_points_earned: 900,
                    ..EconomyStats::default()
                },
            }
        }

        fn ctx(&self) -> EvaluationContext<'_> {
            EvaluationContext {
                ledger: &self.ledger,
                catalog: &self.catalog,
                book: &self.book,
                circles: &self.circles,
                game_stats: &self.game_stats,
                economy: &self.economy,
                streaks: StreakSummary {
                    current: 4,
                    best: 6,
                    ..StreakSummary::default()
                },
            }
        }
    }

    fn tribe(value: &str) -> String {
        value.to_owned()
    }

    #[test]
    fn cardinality_threshold() {
        let fx = Fixture::new();
        assert!(Criterion::CollectedAtLeast { count: 3 }.is_met(&fx.ctx()));
        assert!(!Criterion::CollectedAtLeast { count: 4 }.is_met(&fx.ctx()));
    }

    #[test]
    fn category_completion() {
        let fx = Fixture::new();
        let brave = Criterion::CategoryComplete {
            kind: CategoryKind::Tribe,
            value: tribe("Brave"),
        };
        let shady = Criterion::CategoryComplete {
            kind: CategoryKind::Tribe,
            value: tribe("Shady"),
        };
        let empty = Criterion::CategoryComplete {
            kind: CategoryKind::Tribe,
            value: tribe("Enma"),
        };
        assert!(brave.is_met(&fx.ctx()));
        assert!(!shady.is_met(&fx.ctx()));
        assert!(!empty.is_met(&fx.ctx()));
    }

    #[test]
    fn composite_category_threshold() {
        let fx = Fixture::new();
        let one_each = Criterion::AllCategoriesAtLeast {
            kind: CategoryKind::Tribe,
            values: vec![tribe("Brave"), tribe("Shady")],
            count: 1,
        };
        let two_each = Criterion::AllCategoriesAtLeast {
            kind: CategoryKind::Tribe,
            values: vec![tribe("Brave"), tribe("Shady")],
            count: 2,
        };
        assert!(one_each.is_met(&fx.ctx()));
        assert!(!two_each.is_met(&fx.ctx()));
    }

    #[test]
    fn external_stats_and_streaks() {
        let fx = Fixture::new();
        let won = Criterion::StatAtLeast {
            stat: StatKind::GamesWon,
            threshold: 10,
        };
        let rich = Criterion::StatAtLeast {
            stat: StatKind::TotalPointsEarned,
            threshold: 1000,
        };
        let streak = Criterion::StatAtLeast {
            stat: StatKind::BestCollectionStreak,
            threshold: 6,
        };
        assert!(won.is_met(&fx.ctx()));
        assert!(!rich.is_met(&fx.ctx()));
        assert!(streak.is_met(&fx.ctx()));
    }

    #[test]
    fn circles_and_combinators() {
        let fx = Fixture::new();
        let done = Criterion::CircleCompleted {
            circle: CircleId::from("done"),
        };
        let missing = Criterion::CircleCompleted {
            circle: CircleId::from("missing"),
        };
        assert!(done.is_met(&fx.ctx()));
        assert!(!missing.is_met(&fx.ctx()));
        assert!(Criterion::CirclesCompleted { count: 1 }.is_met(&fx.ctx()));
        assert!(
            Criterion::AnyOf {
                criteria: vec![missing.clone(), done.clone()]
            }
            .is_met(&fx.ctx())
        );
        assert!(
            !Criterion::AllOf {
                criteria: vec![missing, done]
            }
            .is_met(&fx.ctx())
        );
    }

    #[test]
    fn circles_missing_from_the_book_do_not_count() {
        let fx = Fixture::new();
        let retired = Criterion::CircleCompleted {
            circle: CircleId::from("retired"),
        };
        assert!(!retired.is_met(&fx.ctx()));
        assert_eq!(fx.ctx().circles_completed(), 1);
        assert!(!Criterion::CirclesCompleted { count: 2 }.is_met(&fx.ctx()));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let fx = Fixture::new();
        let criterion = Criterion::CollectedAtLeast { count: 2 };
        let first = criterion.is_met(&fx.ctx());
        for _ in 0..10 {
            assert_eq!(criterion.is_met(&fx.ctx()), first);
        }
        assert_eq!(fx.ledger.count(), 3);
    }

    #[test]
    fn deserializes_tagged_form() {
        let parsed: Result<Criterion, _> = serde_json::from_str(
            r#"{"type":"category_at_least","kind":"tribe","value":"Brave","count":2}"#,
        );
        assert_eq!(
            parsed.ok(),
            Some(Criterion::CategoryAtLeast {
                kind: CategoryKind::Tribe,
                value: tribe("Brave"),
                count: 2,
            })
        );
    }
}
