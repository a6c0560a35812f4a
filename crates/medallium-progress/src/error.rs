//! Error types for the medallium-progress crate.
//!
//! Every failure a UI flow can provoke (probing an unknown id, claiming a
//! reward twice) is an expected business outcome. The engine facade turns
//! these into `false`/`None` results; [`ProgressError::kind`] tells callers
//! which category a failure belongs to.

use medallium_ledger::LedgerError;
use medallium_types::{AchievementId, CircleId, CosmeticKind, RewardSource};

/// Broad category of a [`ProgressError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An id that does not exist in the catalog or authored registries.
    Validation,
    /// The target exists but is not in a state that allows the operation.
    State,
    /// A reward component could not be applied.
    Reward,
    /// Authored data is malformed.
    Definition,
}

/// Errors that can occur during progress operations.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// No circle with this id is defined.
    #[error("unknown circle: {0}")]
    UnknownCircle(CircleId),

    /// No achievement with this id is defined.
    #[error("unknown achievement: {0}")]
    UnknownAchievement(AchievementId),

    /// The item id is not in the catalog.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// A claim was attempted before the circle was completed.
    #[error("circle {0} is not completed")]
    CircleNotCompleted(CircleId),

    /// A claim was attempted before the achievement was unlocked.
    #[error("achievement {0} is not unlocked")]
    AchievementLocked(AchievementId),

    /// The reward was already granted.
    #[error("reward for {} already claimed", .0.tag())]
    AlreadyClaimed(RewardSource),

    /// Wallet credit failed while applying a reward.
    #[error("wallet error: {source}")]
    Wallet {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },

    /// A cosmetic store failed to record a grant.
    #[error("could not grant {kind:?} {id}: {source}")]
    Cosmetic {
        /// Which store.
        kind: CosmeticKind,
        /// Cosmetic id.
        id: String,
        /// The underlying store error.
        source: LedgerError,
    },

    /// An authored circle or achievement failed validation.
    #[error("invalid definition {id}: {reason}")]
    InvalidDefinition {
        /// The offending definition id.
        id: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ProgressError {
    /// Classify the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownCircle(_) | Self::UnknownAchievement(_) | Self::UnknownItem(_) => {
                ErrorKind::Validation
            }
            Self::CircleNotCompleted(_) | Self::AchievementLocked(_) | Self::AlreadyClaimed(_) => {
                ErrorKind::State
            }
            Self::Wallet { .. } | Self::Cosmetic { .. } => ErrorKind::Reward,
            Self::InvalidDefinition { .. } => ErrorKind::Definition,
        }
    }
}
