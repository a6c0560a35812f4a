//! The unlock ledger: which collectible items a player owns, and since when.
//!
//! # Design
//!
//! - **Append-only**: records are never modified or removed.
//! - **Unique keys**: one record per item id; re-unlocking is a no-op that
//!   keeps the first timestamp.
//! - **Passive**: the ledger never triggers recomputation itself. The caller
//!   orchestrates circle and achievement passes after an unlock.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use medallium_types::{CollectibleItem, ItemId, UnlockRecord};

/// The player's set of unlocked items (the "Medallium").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockLedger {
    /// Records keyed by item id.
    records: BTreeMap<ItemId, UnlockRecord>,
}

impl UnlockLedger {
    /// Create a new empty ledger.
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Rebuild a ledger from previously persisted records.
    ///
    /// When the input holds several records for one item, the earliest
    /// unlock wins.
    pub fn from_records(records: impl IntoIterator<Item = UnlockRecord>) -> Self {
        let mut ledger = Self::new();
        for record in records {
            match ledger.records.get(&record.item_id) {
                Some(existing) if existing.unlocked_at <= record.unlocked_at => {}
                _ => {
                    ledger.records.insert(record.item_id.clone(), record);
                }
            }
        }
        ledger
    }

    /// Add `item` to the ledger, stamped with `at`.
    ///
    /// Returns `true` when the item was newly added and `false` when it was
    /// already present, in which case nothing changes.
    pub fn unlock(&mut self, item: &CollectibleItem, at: DateTime<Utc>) -> bool {
        if self.records.contains_key(&item.id) {
            debug!(item_id = %item.id, "item already unlocked, ignoring");
            return false;
        }
        self.records.insert(
            item.id.clone(),
            UnlockRecord {
                item_id: item.id.clone(),
                item_name: item.name.clone(),
                unlocked_at: at,
            },
        );
        true
    }

    /// Whether the item with `id` is unlocked.
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// The record for one item, if unlocked.
    pub fn get(&self, id: &str) -> Option<&UnlockRecord> {
        self.records.get(id)
    }

    /// All records, ordered by item id.
    pub fn all(&self) -> impl Iterator<Item = &UnlockRecord> {
        self.records.values()
    }

    /// Number of distinct unlocked items.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been unlocked yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Names of every unlocked item.
    pub fn unlocked_names(&self) -> BTreeSet<&str> {
        self.records.values().map(|r| r.item_name.as_str()).collect()
    }

    /// Unlock timestamps, one per item.
    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.records.values().map(|r| r.unlocked_at)
    }

    /// The `limit` most recent unlocks, newest first.
    ///
    /// Ties on timestamp are broken by item id so the order is stable.
    pub fn recent(&self, limit: usize) -> Vec<&UnlockRecord> {
        let mut records: Vec<&UnlockRecord> = self.records.values().collect();
        records.sort_by(|a, b| {
            b.unlocked_at
                .cmp(&a.unlocked_at)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        records.truncate(limit);
        records
    }

    /// Timestamp of the earliest unlock.
    pub fn first_unlock_at(&self) -> Option<DateTime<Utc>> {
        self.timestamps().min()
    }

    /// Timestamp of the latest unlock.
    pub fn last_unlock_at(&self) -> Option<DateTime<Utc>> {
        self.timestamps().max()
    }
}
