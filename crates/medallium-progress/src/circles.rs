//! Circle progress engine.
//!
//! A circle is an authored, named subset of catalog items. Its progress is
//! a pure function of its definition and the unlock ledger; only the claim
//! fields and the first completion timestamp carry over from prior state.
//!
//! # Full vs incremental recompute
//!
//! [`recompute`] rebuilds every circle (used at load). [`recompute_for_item`]
//! rebuilds only the circles containing a newly unlocked item (used on a
//! single unlock). Both paths run the same per-circle function and stamp
//! `completed_at` from the ledger itself (the unlock time of the member
//! that completed the circle), so they converge to identical maps for the
//! same final ledger regardless of the order or timing of the calls.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use tracing::info;

use medallium_ledger::UnlockLedger;
use medallium_types::{CircleDefinition, CircleId, CircleProgress};

use crate::error::ProgressError;
use crate::stats::rounded_percent;

/// Circle progress keyed by circle id.
pub type CircleProgressMap = BTreeMap<CircleId, CircleProgress>;

// ---------------------------------------------------------------------------
// CircleBook
// ---------------------------------------------------------------------------

/// The validated, immutable set of circle definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircleBook {
    definitions: Vec<CircleDefinition>,
}

impl CircleBook {
    /// Validate and freeze a list of definitions.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::InvalidDefinition`] for a duplicate circle
    /// id, an empty member list, or a member listed twice.
    pub fn new(definitions: Vec<CircleDefinition>) -> Result<Self, ProgressError> {
        let mut ids = BTreeSet::new();
        for definition in &definitions {
            if !ids.insert(&definition.id) {
                return Err(invalid(definition, "duplicate circle id"));
            }
            if definition.members.is_empty() {
                return Err(invalid(definition, "circle has no members"));
            }
            let unique: BTreeSet<&str> = definition.members.iter().map(String::as_str).collect();
            if unique.len() != definition.members.len() {
                return Err(invalid(definition, "member listed more than once"));
            }
        }
        Ok(Self { definitions })
    }

    /// Look up one definition.
    pub fn get(&self, id: &str) -> Option<&CircleDefinition> {
        self.definitions.iter().find(|d| d.id.as_str() == id)
    }

    /// All definitions, in authored order.
    pub fn iter(&self) -> impl Iterator<Item = &CircleDefinition> {
        self.definitions.iter()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether no circles are defined.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions that list `item_name` as a member.
    pub fn containing<'a>(
        &'a self,
        item_name: &'a str,
    ) -> impl Iterator<Item = &'a CircleDefinition> + 'a {
        self.definitions
            .iter()
            .filter(move |d| d.members.iter().any(|m| m == item_name))
    }
}

fn invalid(definition: &CircleDefinition, reason: &str) -> ProgressError {
    ProgressError::InvalidDefinition {
        id: definition.id.to_string(),
        reason: reason.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Recompute
// ---------------------------------------------------------------------------

/// Unlock time per unlocked item name. With several items sharing a name,
/// the earliest unlock wins.
fn unlock_times(ledger: &UnlockLedger) -> BTreeMap<&str, DateTime<Utc>> {
    let mut times: BTreeMap<&str, DateTime<Utc>> = BTreeMap::new();
    for record in ledger.all() {
        times
            .entry(record.item_name.as_str())
            .and_modify(|t| *t = (*t).min(record.unlocked_at))
            .or_insert(record.unlocked_at);
    }
    times
}

fn progress_with(
    definition: &CircleDefinition,
    times: &BTreeMap<&str, DateTime<Utc>>,
    prior: Option<&CircleProgress>,
) -> CircleProgress {
    let unlocked_members: Vec<String> = definition
        .members
        .iter()
        .filter(|m| times.contains_key(m.as_str()))
        .cloned()
        .collect();
    let total = definition.members.len();
    let completed = total > 0 && unlocked_members.len() == total;

    // Latest member unlock time, independent of when the recompute runs.
    let reached_at = || {
        definition
            .members
            .iter()
            .filter_map(|m| times.get(m.as_str()).copied())
            .max()
    };
    let completed_at = match prior {
        Some(p) if p.completed => p.completed_at.or_else(reached_at),
        _ if completed => reached_at(),
        _ => None,
    };

    CircleProgress {
        circle_id: definition.id.clone(),
        percent: rounded_percent(unlocked_members.len(), total),
        unlocked_members,
        completed,
        completed_at,
        reward_claimed: prior.is_some_and(|p| p.reward_claimed),
        reward_claimed_at: prior.and_then(|p| p.reward_claimed_at),
    }
}

/// Compute the progress of one circle.
pub fn progress_for(
    definition: &CircleDefinition,
    ledger: &UnlockLedger,
    prior: Option<&CircleProgress>,
) -> CircleProgress {
    progress_with(definition, &unlock_times(ledger), prior)
}

/// Recompute every circle in `book`.
///
/// Entries in `prior` for ids no longer in the book are kept untouched.
pub fn recompute(
    book: &CircleBook,
    ledger: &UnlockLedger,
    prior: &CircleProgressMap,
) -> CircleProgressMap {
    let times = unlock_times(ledger);
    let mut next = prior.clone();
    for definition in book.iter() {
        let progress = progress_with(definition, &times, prior.get(&definition.id));
        next.insert(definition.id.clone(), progress);
    }
    next
}

/// Recompute only the circles affected by unlocking `item_name`.
///
/// Circles that contain the item are rebuilt. Circles missing from
/// `prior` are rebuilt too so the result never depends on whether `prior`
/// was hydrated. Everything else is copied.
pub fn recompute_for_item(
    book: &CircleBook,
    ledger: &UnlockLedger,
    prior: &CircleProgressMap,
    item_name: &str,
) -> CircleProgressMap {
    let times = unlock_times(ledger);
    let mut next = prior.clone();
    for definition in book.iter() {
        let affected = !prior.contains_key(&definition.id)
            || definition.members.iter().any(|m| m == item_name);
        if affected {
            let progress = progress_with(definition, &times, prior.get(&definition.id));
            next.insert(definition.id.clone(), progress);
        }
    }
    next
}

/// Ids of circles complete in `next` but not in `prior`, in id order.
pub fn newly_completed(prior: &CircleProgressMap, next: &CircleProgressMap) -> Vec<CircleId> {
    let ids: Vec<CircleId> = next
        .values()
        .filter(|p| p.completed)
        .filter(|p| !prior.get(&p.circle_id).is_some_and(|old| old.completed))
        .map(|p| p.circle_id.clone())
        .collect();
    for id in &ids {
        info!(circle_id = %id, "circle completed");
    }
    ids
}

/// Synthesize "not started" progress for every defined circle absent from
/// `progress`. Returns how many entries were added.
pub fn hydrate(book: &CircleBook, progress: &mut CircleProgressMap) -> usize {
    let mut added = 0_usize;
    for definition in book.iter() {
        if !progress.contains_key(&definition.id) {
            progress.insert(
                definition.id.clone(),
                CircleProgress::not_started(definition.id.clone()),
            );
            added = added.saturating_add(1);
        }
    }
    added
}
