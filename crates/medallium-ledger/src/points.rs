//! The points wallet: an append-only earning and spending ledger.
//!
//! Reward application credits points through the [`Wallet`] trait. The
//! in-memory [`PointsLedger`] implementation treats circle and achievement
//! sources as idempotency keys, so a claim retried after a partial failure
//! never credits the same reward twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use medallium_types::{EconomyStats, EntryId, PointsEntry, PointsEntryType, RewardSource};

use crate::LedgerError;

// ---------------------------------------------------------------------------
// Wallet trait
// ---------------------------------------------------------------------------

/// The subsystem that owns the player's points.
pub trait Wallet {
    /// Credit `amount` points earned from `source`, stamped `at`.
    ///
    /// Returns `Ok(true)` when the points were credited and `Ok(false)` when
    /// the wallet had already credited this source.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the credit cannot be recorded.
    fn add_points(
        &mut self,
        amount: u64,
        source: &RewardSource,
        note: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, LedgerError>;
}

// ---------------------------------------------------------------------------
// PointsLedger
// ---------------------------------------------------------------------------

/// In-memory append-only points ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsLedger {
    /// All entries, in insertion order.
    entries: Vec<PointsEntry>,
}

impl PointsLedger {
    /// Create a new empty ledger.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Return the number of entries.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the ledger has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return all entries, in insertion order.
    pub fn entries(&self) -> &[PointsEntry] {
        &self.entries
    }

    /// Whether an earn entry exists for `source`.
    pub fn has_credit_for(&self, source: &RewardSource) -> bool {
        self.entries
            .iter()
            .any(|e| e.entry_type == PointsEntryType::Earn && &e.source == source)
    }

    /// Record earned points.
    ///
    /// Circle and achievement sources are credited at most once; a repeat
    /// returns `Ok(None)` and appends nothing. [`RewardSource::Other`]
    /// earnings are always appended.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroAmount`] if `amount` is zero, or
    /// [`LedgerError::ArithmeticOverflow`] if lifetime earnings would
    /// overflow.
    pub fn credit(
        &mut self,
        amount: u64,
        source: RewardSource,
        note: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<&PointsEntry>, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if !matches!(source, RewardSource::Other(_)) && self.has_credit_for(&source) {
            debug!(source = %source.tag(), "points already credited for source");
            return Ok(None);
        }
        self.total_earned()
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow {
                context: "lifetime earnings",
            })?;

        self.entries.push(PointsEntry {
            id: EntryId::new(),
            entry_type: PointsEntryType::Earn,
            amount,
            source,
            note: note.to_owned(),
            created_at: at,
        });
        self.entries
            .last()
            .map(Some)
            .ok_or(LedgerError::InternalError("failed to retrieve entry after append"))
    }

    /// Record a shop purchase.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroAmount`] if `amount` is zero, or
    /// [`LedgerError::InsufficientPoints`] if the balance is too low.
    pub fn spend(
        &mut self,
        amount: u64,
        tag: &str,
        note: &str,
        at: DateTime<Utc>,
    ) -> Result<&PointsEntry, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let available = self.balance();
        if amount > available {
            return Err(LedgerError::InsufficientPoints {
                requested: amount,
                available,
            });
        }

        self.entries.push(PointsEntry {
            id: EntryId::new(),
            entry_type: PointsEntryType::Spend,
            amount,
            source: RewardSource::Other(tag.to_owned()),
            note: note.to_owned(),
            created_at: at,
        });
        self.entries
            .last()
            .ok_or(LedgerError::InternalError("failed to retrieve entry after append"))
    }

    /// Lifetime points earned.
    pub fn total_earned(&self) -> u64 {
        self.sum(PointsEntryType::Earn)
    }

    /// Lifetime points spent.
    pub fn total_spent(&self) -> u64 {
        self.sum(PointsEntryType::Spend)
    }

    /// Spendable balance.
    pub fn balance(&self) -> u64 {
        self.total_earned().saturating_sub(self.total_spent())
    }

    /// Economy aggregates consumed by achievement criteria.
    pub fn economy_stats(&self) -> EconomyStats {
        let purchases = self
            .entries
            .iter()
            .filter(|e| e.entry_type == PointsEntryType::Spend)
            .count();
        EconomyStats {
            total_points_earned: self.total_earned(),
            total_points_spent: self.total_spent(),
            items_purchased: u64::try_from(purchases).unwrap_or(u64::MAX),
        }
    }

    fn sum(&self, entry_type: PointsEntryType) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.entry_type == entry_type)
            .fold(0_u64, |acc, e| acc.saturating_add(e.amount))
    }
}

impl Wallet for PointsLedger {
    fn add_points(
        &mut self,
        amount: u64,
        source: &RewardSource,
        note: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, LedgerError> {
        Ok(self.credit(amount, source.clone(), note, at)?.is_some())
    }
}
