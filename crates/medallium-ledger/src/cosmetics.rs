//! Cosmetic reward stores.
//!
//! Each cosmetic category (backgrounds, music tracks, frames, titles,
//! badges) is owned by an independent store. The only operation reward
//! application needs is the idempotent [`CosmeticStore::unlock`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use medallium_types::CosmeticKind;

use crate::LedgerError;

/// A store owning one category of cosmetic unlocks.
pub trait CosmeticStore {
    /// Unlock `id`.
    ///
    /// Returns `Ok(true)` if newly granted and `Ok(false)` if it was already
    /// owned.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the grant cannot be recorded.
    fn unlock(&mut self, id: &str) -> Result<bool, LedgerError>;

    /// Whether `id` is owned.
    fn is_unlocked(&self, id: &str) -> bool;
}

/// In-memory set-backed cosmetic store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmeticCollection {
    /// Which cosmetic category this store owns.
    kind: CosmeticKind,
    /// Owned cosmetic ids.
    #[serde(default)]
    unlocked: BTreeSet<String>,
}

impl CosmeticCollection {
    /// Create an empty store for `kind`.
    pub const fn new(kind: CosmeticKind) -> Self {
        Self {
            kind,
            unlocked: BTreeSet::new(),
        }
    }

    /// The category this store owns.
    pub const fn kind(&self) -> CosmeticKind {
        self.kind
    }

    /// Owned ids, sorted.
    pub fn owned(&self) -> impl Iterator<Item = &str> {
        self.unlocked.iter().map(String::as_str)
    }

    /// Number of owned cosmetics.
    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    /// Whether nothing is owned.
    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }
}

impl CosmeticStore for CosmeticCollection {
    fn unlock(&mut self, id: &str) -> Result<bool, LedgerError> {
        let granted = self.unlocked.insert(id.to_owned());
        if !granted {
            debug!(kind = ?self.kind, id, "cosmetic already owned");
        }
        Ok(granted)
    }

    fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }
}
