//! Ledgers and reward stores for the Medallium collection engine.
//!
//! # Architecture
//!
//! The ledger crate provides three modules:
//!
//! - [`unlocks`] -- The [`UnlockLedger`]: append-only record of owned items.
//! - [`points`] -- The [`PointsLedger`] wallet and the [`Wallet`] trait.
//! - [`cosmetics`] -- The [`CosmeticCollection`] store and the
//!   [`CosmeticStore`] trait.
//!
//! # Idempotency
//!
//! Everything here is safe to repeat:
//!
//! - Unlocking an owned item is a no-op that keeps the original timestamp.
//! - Crediting points for a circle or achievement source that was already
//!   credited is a no-op.
//! - Unlocking an owned cosmetic returns `Ok(false)` and grants nothing.
//!
//! Reward application relies on these properties so that a claim retried
//! after a partial failure can never double-grant.
//!
//! # Usage
//!
//! ```
//! use chrono::Utc;
//! use medallium_ledger::UnlockLedger;
//! use medallium_types::{CollectibleItem, ItemId};
//!
//! let jibanyan = CollectibleItem {
//!     id: ItemId::from("jibanyan"),
//!     name: "Jibanyan".to_owned(),
//!     tribe: "Charming".to_owned(),
//!     game: "Yo-kai Watch".to_owned(),
//!     rank: "B".to_owned(),
//!     element: Some("Fire".to_owned()),
//! };
//!
//! let mut ledger = UnlockLedger::new();
//! assert!(ledger.unlock(&jibanyan, Utc::now()));
//! assert!(!ledger.unlock(&jibanyan, Utc::now()));
//! assert_eq!(ledger.count(), 1);
//! ```

pub mod cosmetics;
pub mod points;
pub mod unlocks;

// Re-export primary types at crate root.
pub use cosmetics::{CosmeticCollection, CosmeticStore};
pub use points::{PointsLedger, Wallet};
pub use unlocks::UnlockLedger;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording wallet entries or cosmetic grants.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Amount must be strictly positive.
    #[error("points amount must be non-zero")]
    ZeroAmount,

    /// A spend exceeded the available balance.
    #[error("insufficient points: wanted {requested} but balance is {available}")]
    InsufficientPoints {
        /// Points the caller attempted to spend.
        requested: u64,
        /// Current balance.
        available: u64,
    },

    /// A running total would overflow.
    #[error("arithmetic overflow in points ledger: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: &'static str,
    },

    /// A store could not make a change durable.
    #[error("{store} could not be persisted: {reason}")]
    Persistence {
        /// Which store failed.
        store: &'static str,
        /// The underlying failure.
        reason: String,
    },

    /// An internal error that should not occur in normal operation.
    #[error("internal ledger error: {0}")]
    InternalError(&'static str),
}
