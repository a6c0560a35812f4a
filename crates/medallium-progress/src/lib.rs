//! Progress engines for the Medallium collection game.
//!
//! # Architecture
//!
//! Everything in this crate is a pure function of the unlock ledger plus a
//! little carried-over state (claim flags, first completion stamps):
//!
//! - [`catalog`] -- The static item [`Catalog`] and its provider seam.
//! - [`circles`] -- Circle definitions and progress recompute.
//! - [`criteria`] -- Declarative achievement [`Criterion`] trees.
//! - [`achievements`] -- The [`AchievementRegistry`] and the monotonic
//!   evaluator.
//! - [`rewards`] -- Exactly-once reward claims into wallet and cosmetic
//!   stores.
//! - [`streaks`] -- Calendar-day bucketing and streak figures.
//! - [`stats`] -- Category breakdowns, next milestones, and the
//!   aggregate [`CollectionStats`](medallium_types::CollectionStats).
//!
//! # Claim protocol
//!
//! A claim validates the target before touching any sink, applies the
//! reward, and only then sets the claimed flag. A retry after a failed
//! grant is therefore safe, and the idempotent sinks of `medallium-ledger`
//! absorb the repeat of anything that already landed.

pub mod achievements;
pub mod catalog;
pub mod circles;
pub mod config;
pub mod context;
pub mod criteria;
pub mod error;
pub mod rewards;
pub mod stats;
pub mod streaks;

// Re-export primary types at crate root.
pub use achievements::{
    Achievement, AchievementProgressMap, AchievementRegistry, HIDDEN_PLACEHOLDER,
};
pub use catalog::{Catalog, CatalogProvider};
pub use circles::{CircleBook, CircleProgressMap};
pub use config::ProgressConfig;
pub use context::EvaluationContext;
pub use criteria::Criterion;
pub use error::{ErrorKind, ProgressError};
pub use rewards::{ClaimReceipt, CosmeticGrant, RewardSinks};
pub use stats::{StatsInputs, collection_stats, rounded_percent};
pub use streaks::StreakSummary;
