//! End-to-end tests for the `CollectionEngine` facade.
//!
//! Every test drives the engine through its public operations with a
//! `MemoryStore`, a `FixedClock`, and the in-memory wallet and cosmetic
//! stores from `medallium-ledger`.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use medallium_core::{
    CollectionEngine, FixedClock, MedalliumConfig, MemoryStore, StoreSlot, UnlockOutcome,
};
use medallium_ledger::{CosmeticCollection, CosmeticStore, PointsLedger};
use medallium_progress::rewards::RewardSinks;
use medallium_progress::{Catalog, ErrorKind, HIDDEN_PLACEHOLDER, ProgressError};
use medallium_types::{
    AchievementId, CategoryKind, CircleId, CollectibleItem, CosmeticKind, EconomyStats, ItemId,
    RewardSource,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().unwrap()
}

fn item(id: &str, name: &str, tribe: &str, rank: &str) -> CollectibleItem {
    CollectibleItem {
        id: ItemId::from(id),
        name: name.to_owned(),
        tribe: tribe.to_owned(),
        game: "Yo-kai Watch".to_owned(),
        rank: rank.to_owned(),
        element: None,
    }
}

fn catalog() -> Catalog {
    Catalog::from_items(vec![
        item("komasan", "Komasan", "Charming", "D"),
        item("komajiro", "Komajiro", "Charming", "C"),
        item("jibanyan", "Jibanyan", "Charming", "B"),
        item("whisper", "Whisper", "Slippery", "D"),
        item("usapyon", "USApyon", "Charming", "B"),
        item("walkappa", "Walkappa", "Mysterious", "C"),
        item("appak", "Appak", "Mysterious", "B"),
        item("supyo", "Supyo", "Mysterious", "A"),
        item("gargaros", "Gargaros", "Brave", "S"),
        item("ogralus", "Ogralus", "Brave", "S"),
    ])
}

struct Harness {
    engine: CollectionEngine,
    store: MemoryStore,
    clock: FixedClock,
}

fn harness_with(store: MemoryStore) -> Harness {
    let clock = FixedClock::new(t0());
    let mut engine = CollectionEngine::from_config(
        &MedalliumConfig::default(),
        catalog(),
        Box::new(store.clone()),
        Box::new(clock.clone()),
    )
    .unwrap();
    engine.load();
    Harness {
        engine,
        store,
        clock,
    }
}

fn harness() -> Harness {
    harness_with(MemoryStore::new())
}

struct Sinks {
    wallet: PointsLedger,
    backgrounds: CosmeticCollection,
    music_tracks: CosmeticCollection,
    frames: CosmeticCollection,
    titles: CosmeticCollection,
    badges: CosmeticCollection,
}

impl Sinks {
    const fn new() -> Self {
        Self {
            wallet: PointsLedger::new(),
            backgrounds: CosmeticCollection::new(CosmeticKind::Background),
            music_tracks: CosmeticCollection::new(CosmeticKind::MusicTrack),
            frames: CosmeticCollection::new(CosmeticKind::Frame),
            titles: CosmeticCollection::new(CosmeticKind::Title),
            badges: CosmeticCollection::new(CosmeticKind::Badge),
        }
    }

    fn sinks(&mut self) -> RewardSinks<'_> {
        RewardSinks {
            wallet: &mut self.wallet,
            backgrounds: &mut self.backgrounds,
            music_tracks: &mut self.music_tracks,
            frames: &mut self.frames,
            titles: &mut self.titles,
            badges: &mut self.badges,
        }
    }
}

fn unlock(h: &mut Harness, id: &str) -> UnlockOutcome {
    h.engine.unlock_item(id).unwrap()
}

// ---------------------------------------------------------------------------
// Unlocks
// ---------------------------------------------------------------------------

#[test]
fn unlocking_twice_is_a_no_op() {
    let mut h = harness();
    let first = unlock(&mut h, "jibanyan");
    assert!(first.newly_unlocked);

    h.clock.advance(Duration::hours(5));
    let second = unlock(&mut h, "jibanyan");
    assert!(!second.newly_unlocked);
    assert!(second.circles_completed.is_empty());
    assert!(second.achievements_unlocked.is_empty());

    assert_eq!(h.engine.ledger().count(), 1);
    assert_eq!(
        h.engine.ledger().get("jibanyan").unwrap().unlocked_at,
        t0()
    );
}

#[test]
fn unknown_item_is_rejected_without_side_effects() {
    let mut h = harness();
    let saves = h.store.save_count();
    assert!(h.engine.unlock_item("not-a-yokai").is_none());

    let err = h.engine.try_unlock_item("not-a-yokai").unwrap_err();
    assert!(matches!(err, ProgressError::UnknownItem(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(h.engine.ledger().is_empty());
    assert_eq!(h.store.save_count(), saves);
}

#[test]
fn first_unlock_satisfies_first_achievement() {
    let mut h = harness();
    let outcome = unlock(&mut h, "whisper");
    assert!(
        outcome
            .achievements_unlocked
            .iter()
            .any(|id| id.as_str() == "first-friend")
    );
    assert!(h.engine.has_claimable_reward("first-friend"));
}

// ---------------------------------------------------------------------------
// Circles
// ---------------------------------------------------------------------------

#[test]
fn circle_completes_and_keeps_its_stamp() {
    let mut h = harness();
    let circle = CircleId::from("komasan-brothers");

    unlock(&mut h, "komasan");
    let progress = &h.engine.circles()[&circle];
    assert_eq!(progress.percent, 50);
    assert!(!progress.completed);
    assert!(progress.completed_at.is_none());

    h.clock.advance(Duration::hours(1));
    let outcome = unlock(&mut h, "komajiro");
    assert_eq!(outcome.circles_completed, vec![circle.clone()]);
    let completed_at = h.engine.circles()[&circle].completed_at;
    assert_eq!(completed_at, Some(t0() + Duration::hours(1)));

    h.clock.advance(Duration::days(2));
    unlock(&mut h, "gargaros");
    h.engine.recompute_circles();
    let progress = &h.engine.circles()[&circle];
    assert_eq!(progress.percent, 100);
    assert!(progress.completed);
    assert_eq!(progress.completed_at, completed_at);
}

#[test]
fn incremental_and_full_recompute_agree() {
    let mut h = harness();
    for id in ["komasan", "whisper", "komajiro", "jibanyan", "usapyon", "appak"] {
        h.clock.advance(Duration::minutes(7));
        unlock(&mut h, id);
    }
    let incremental = h.engine.circles().clone();

    // A fresh engine reading only the ledger rebuilds circles from scratch.
    let replay = MemoryStore::new();
    replay.put(StoreSlot::Ledger, h.store.get(StoreSlot::Ledger).unwrap());
    let fresh = harness_with(replay);

    assert_eq!(fresh.engine.circles(), &incremental);
    assert!(incremental[&CircleId::from("whisper-watch")].completed);
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

#[test]
fn unlocked_achievements_are_never_revoked() {
    let mut h = harness();
    let unlocked = h.engine.record_economy_stats(EconomyStats {
        total_points_earned: 2_000,
        total_points_spent: 1_200,
        items_purchased: 6,
    });
    assert!(unlocked.iter().any(|id| id.as_str() == "big-spender"));
    let stamped = h.engine.achievements()[&AchievementId::from("big-spender")].unlocked_at;

    h.clock.advance(Duration::days(1));
    let again = h.engine.record_economy_stats(EconomyStats::default());
    assert!(again.is_empty());
    let progress = &h.engine.achievements()[&AchievementId::from("big-spender")];
    assert!(progress.unlocked);
    assert_eq!(progress.unlocked_at, stamped);
}

#[test]
fn hidden_achievements_are_masked_until_unlocked() {
    let h = harness();
    let views = h.engine.achievement_views();
    let hidden = views
        .iter()
        .find(|v| v.id.as_str() == "week-of-friends")
        .unwrap();
    assert_eq!(hidden.name, HIDDEN_PLACEHOLDER);
    assert_eq!(hidden.description, HIDDEN_PLACEHOLDER);

    let visible = views
        .iter()
        .find(|v| v.id.as_str() == "first-friend")
        .unwrap();
    assert_eq!(visible.name, "First Friend");
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

#[test]
fn circle_reward_is_granted_exactly_once() {
    let mut h = harness();
    let mut sinks = Sinks::new();
    unlock(&mut h, "komasan");
    unlock(&mut h, "komajiro");
    assert!(h.engine.has_claimable_reward("komasan-brothers"));

    h.clock.advance(Duration::minutes(3));
    assert!(h.engine.claim_circle_reward("komasan-brothers", &mut sinks.sinks()));
    assert_eq!(sinks.wallet.balance(), 50);
    assert!(sinks.music_tracks.is_unlocked("track-springdale-shrine"));
    let progress = &h.engine.circles()[&CircleId::from("komasan-brothers")];
    assert!(progress.reward_claimed);
    assert_eq!(progress.reward_claimed_at, Some(t0() + Duration::minutes(3)));
    assert_eq!(sinks.wallet.entries()[0].created_at, t0() + Duration::minutes(3));

    let entries = sinks.wallet.len();
    assert!(!h.engine.claim_circle_reward("komasan-brothers", &mut sinks.sinks()));
    let err = h
        .engine
        .try_claim_circle_reward("komasan-brothers", &mut sinks.sinks())
        .unwrap_err();
    assert!(matches!(err, ProgressError::AlreadyClaimed(_)));
    assert_eq!(sinks.wallet.len(), entries);
    assert_eq!(sinks.wallet.balance(), 50);
    assert!(!h.engine.has_claimable_reward("komasan-brothers"));
}

#[test]
fn invalid_claims_return_false() {
    let mut h = harness();
    let mut sinks = Sinks::new();
    unlock(&mut h, "komasan");

    assert!(!h.engine.claim_circle_reward("komasan-brothers", &mut sinks.sinks()));
    assert!(!h.engine.claim_circle_reward("no-such-circle", &mut sinks.sinks()));
    assert!(!h.engine.claim_achievement_reward("collector-100", &mut sinks.sinks()));
    assert!(!h.engine.claim_achievement_reward("no-such-achievement", &mut sinks.sinks()));
    assert!(!h.engine.has_claimable_reward("no-such-circle"));

    let err = h
        .engine
        .try_claim_circle_reward("no-such-circle", &mut sinks.sinks())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let err = h
        .engine
        .try_claim_circle_reward("komasan-brothers", &mut sinks.sinks())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);

    assert!(sinks.wallet.is_empty());
}

#[test]
fn claimable_rewards_lists_circles_then_achievements() {
    let mut h = harness();
    let mut sinks = Sinks::new();
    unlock(&mut h, "komasan");
    unlock(&mut h, "komajiro");

    let claimable = h.engine.claimable_rewards();
    let sources: Vec<RewardSource> = claimable.iter().map(|c| c.source.clone()).collect();
    assert_eq!(
        sources,
        vec![
            RewardSource::Circle("komasan-brothers".into()),
            RewardSource::Achievement("first-friend".into()),
        ]
    );

    assert!(h.engine.claim_achievement_reward("first-friend", &mut sinks.sinks()));
    assert_eq!(h.engine.claimable_rewards().len(), 1);
    assert_eq!(sinks.wallet.balance(), 10);
}

#[test]
fn claim_survives_a_failed_save() {
    let mut h = harness();
    let mut sinks = Sinks::new();
    unlock(&mut h, "komasan");
    unlock(&mut h, "komajiro");

    h.store.set_fail_saves(true);
    assert!(h.engine.claim_circle_reward("komasan-brothers", &mut sinks.sinks()));
    assert!(h.engine.circles()[&CircleId::from("komasan-brothers")].reward_claimed);
    assert!(!h.engine.claim_circle_reward("komasan-brothers", &mut sinks.sinks()));
    assert_eq!(sinks.wallet.balance(), 50);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn progress_survives_a_reload() {
    let mut h = harness();
    let mut sinks = Sinks::new();
    unlock(&mut h, "komasan");
    unlock(&mut h, "komajiro");
    assert!(h.engine.claim_circle_reward("komasan-brothers", &mut sinks.sinks()));

    let mut reloaded = harness_with(h.store.clone());
    assert_eq!(reloaded.engine.ledger().count(), 2);
    assert_eq!(reloaded.engine.circles(), h.engine.circles());
    assert_eq!(reloaded.engine.achievements(), h.engine.achievements());
    assert!(
        !reloaded
            .engine
            .claim_circle_reward("komasan-brothers", &mut sinks.sinks())
    );
    assert_eq!(sinks.wallet.balance(), 50);
}

#[test]
fn corrupt_blobs_are_downgraded_to_fresh_state() {
    let store = MemoryStore::new();
    store.put(StoreSlot::Ledger, "definitely not json");
    store.put(StoreSlot::Circles, "{\"nyan-clan\": 42");
    store.put(StoreSlot::Achievements, "[]");

    let h = harness_with(store);
    assert!(h.engine.ledger().is_empty());
    assert_eq!(h.engine.circles().len(), h.engine.circle_book().len());
    assert_eq!(h.engine.achievements().len(), h.engine.registry().len());
    assert!(h.engine.circles().values().all(|p| !p.completed));
}

#[test]
fn hydrate_is_strictly_additive() {
    let store = MemoryStore::new();
    store.put(
        StoreSlot::Circles,
        r#"{"retired-circle": {"circle_id": "retired-circle", "unlocked_members": [],
            "percent": 0, "completed": false, "reward_claimed": false}}"#,
    );
    let h = harness_with(store);

    let book_len = h.engine.circle_book().len();
    assert_eq!(h.engine.circles().len(), book_len + 1);
    assert!(h.engine.circles().contains_key("retired-circle"));
    assert!(h.engine.circles().contains_key("nyan-clan"));
}

fn completed_circle_blob(ids: &[&str]) -> String {
    let entries: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#""{id}": {{"circle_id": "{id}", "unlocked_members": [], "percent": 100,
                    "completed": true, "completed_at": "2023-06-01T00:00:00Z",
                    "reward_claimed": false}}"#
            )
        })
        .collect();
    format!("{{{}}}", entries.join(","))
}

#[test]
fn retired_circles_do_not_unlock_achievements() {
    let store = MemoryStore::new();
    store.put(
        StoreSlot::Circles,
        &completed_circle_blob(&["retired-a", "retired-b", "retired-c"]),
    );
    let h = harness_with(store);

    assert!(h.engine.ledger().is_empty());
    assert!(!h.engine.achievements()[&AchievementId::from("circle-trio")].unlocked);
    assert!(h.engine.achievements().values().all(|p| !p.unlocked));
    assert_eq!(h.engine.get_stats().circles_completed, 0);
}

#[test]
fn retired_entries_are_not_claimable() {
    let store = MemoryStore::new();
    store.put(StoreSlot::Circles, &completed_circle_blob(&["retired-circle"]));
    store.put(
        StoreSlot::Achievements,
        r#"{"retired-achievement": {"achievement_id": "retired-achievement",
            "unlocked": true, "unlocked_at": "2023-06-01T00:00:00Z",
            "reward_claimed": false}}"#,
    );
    let mut h = harness_with(store);
    let mut sinks = Sinks::new();
    assert!(h.engine.circles().contains_key("retired-circle"));
    assert!(h.engine.achievements().contains_key("retired-achievement"));

    assert!(!h.engine.has_claimable_reward("retired-circle"));
    assert!(!h.engine.has_claimable_reward("retired-achievement"));
    assert!(h.engine.claimable_rewards().is_empty());
    assert_eq!(h.engine.get_stats().claimable_rewards, 0);
    assert!(!h.engine.claim_circle_reward("retired-circle", &mut sinks.sinks()));
    assert!(
        !h.engine
            .claim_achievement_reward("retired-achievement", &mut sinks.sinks())
    );
    assert!(sinks.wallet.is_empty());
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[test]
fn stats_reflect_collection_and_streaks() {
    let mut h = harness();
    unlock(&mut h, "komasan");
    h.clock.advance(Duration::days(1));
    unlock(&mut h, "komajiro");
    unlock(&mut h, "whisper");
    h.clock.advance(Duration::days(1));
    unlock(&mut h, "gargaros");

    let stats = h.engine.get_stats();
    assert_eq!(stats.total_items, 10);
    assert_eq!(stats.unlocked_items, 4);
    assert_eq!(stats.completion_percentage, 40);
    assert_eq!(stats.current_streak, 3);
    assert_eq!(stats.best_streak, 3);
    assert_eq!(stats.active_days, 3);
    assert_eq!(stats.first_unlock_at, Some(t0()));
    assert_eq!(stats.recent_unlocks[0].item_id.as_str(), "gargaros");
    assert_eq!(stats.circles_completed, 1);
    assert_eq!(stats.circles_total, 6);
    assert_eq!(stats.achievements_total, 16);
    assert!(stats.claimable_rewards >= 2);

    let charming = &stats.by_category[&CategoryKind::Tribe]["Charming"];
    assert_eq!((charming.total, charming.unlocked), (4, 2));
    assert!(stats.next_milestones.len() <= 3);

    h.clock.advance(Duration::days(3));
    let later = h.engine.get_stats();
    assert_eq!(later.current_streak, 0);
    assert_eq!(later.best_streak, 3);
}
