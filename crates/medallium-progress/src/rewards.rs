//! Reward claims.
//!
//! A claim converts a completed circle's or unlocked achievement's reward
//! into actual grants. The sequence is fixed:
//!
//! 1. Reject unknown ids, targets not yet reached, and targets already
//!    claimed, before touching any subsystem.
//! 2. Apply every reward component through the owning subsystem's
//!    idempotent primitive.
//! 3. Set the claimed flag and timestamp.
//!
//! Every component in step 2 is attempted even if an earlier one fails. If
//! any failed, the flag is not set and the claim may be retried; components
//! applied the first time are no-ops the second time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use medallium_ledger::{CosmeticStore, Wallet};
use medallium_types::{CircleId, CosmeticKind, Reward, RewardSource};

use crate::achievements::{AchievementProgressMap, AchievementRegistry};
use crate::circles::{CircleBook, CircleProgressMap};
use crate::error::ProgressError;

/// The subsystems reward components are forwarded to.
pub struct RewardSinks<'a> {
    /// Points wallet.
    pub wallet: &'a mut dyn Wallet,
    /// Background store.
    pub backgrounds: &'a mut dyn CosmeticStore,
    /// Music track store.
    pub music_tracks: &'a mut dyn CosmeticStore,
    /// Avatar frame store.
    pub frames: &'a mut dyn CosmeticStore,
    /// Profile title store.
    pub titles: &'a mut dyn CosmeticStore,
    /// Badge store.
    pub badges: &'a mut dyn CosmeticStore,
}

impl<'a> RewardSinks<'a> {
    /// The store owning one cosmetic kind.
    pub fn store_mut(&mut self, kind: CosmeticKind) -> &mut (dyn CosmeticStore + 'a) {
        match kind {
            CosmeticKind::Background => &mut *self.backgrounds,
            CosmeticKind::MusicTrack => &mut *self.music_tracks,
            CosmeticKind::Frame => &mut *self.frames,
            CosmeticKind::Title => &mut *self.titles,
            CosmeticKind::Badge => &mut *self.badges,
        }
    }
}

/// Outcome of one cosmetic component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmeticGrant {
    /// Which store.
    pub kind: CosmeticKind,
    /// Cosmetic id.
    pub id: String,
    /// `false` when the player already owned it.
    pub newly_granted: bool,
}

/// Everything a successful claim applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    /// What was claimed.
    pub source: RewardSource,
    /// Points newly credited (0 when none, or when already credited).
    pub points_credited: u64,
    /// Cosmetic components, in application order.
    pub cosmetics: Vec<CosmeticGrant>,
}

/// Apply every present component of `reward`, stamping credits `now`.
///
/// All components are attempted; the first failure is returned after the
/// rest have run.
///
/// # Errors
///
/// Returns [`ProgressError::Wallet`] if the wallet rejects the credit, or
/// [`ProgressError::Cosmetic`] if a cosmetic store cannot record a grant.
pub fn apply_reward(
    reward: &Reward,
    source: &RewardSource,
    note: &str,
    now: DateTime<Utc>,
    sinks: &mut RewardSinks<'_>,
) -> Result<ClaimReceipt, ProgressError> {
    let mut first_error = None;
    let mut points_credited = 0_u64;
    if let Some(points) = reward.points.filter(|p| *p > 0) {
        match sinks.wallet.add_points(points, source, note, now) {
            Ok(true) => points_credited = points,
            Ok(false) => {}
            Err(err) => {
                warn!(source = %source.tag(), error = %err, "points credit failed");
                first_error = Some(ProgressError::from(err));
            }
        }
    }

    let mut cosmetics = Vec::new();
    for kind in CosmeticKind::ALL {
        let Some(id) = reward.cosmetic(kind) else {
            continue;
        };
        match sinks.store_mut(kind).unlock(id) {
            Ok(newly_granted) => cosmetics.push(CosmeticGrant {
                kind,
                id: id.to_owned(),
                newly_granted,
            }),
            Err(err) => {
                warn!(source = %source.tag(), ?kind, id, error = %err, "cosmetic grant failed");
                if first_error.is_none() {
                    first_error = Some(ProgressError::Cosmetic {
                        kind,
                        id: id.to_owned(),
                        source: err,
                    });
                }
            }
        }
    }

    if let Some(err) = first_error {
        return Err(err);
    }
    Ok(ClaimReceipt {
        source: source.clone(),
        points_credited,
        cosmetics,
    })
}

/// Claim the completion reward of circle `id`.
///
/// # Errors
///
/// - [`ProgressError::UnknownCircle`] if no such circle is defined.
/// - [`ProgressError::AlreadyClaimed`] if the reward was already granted.
/// - [`ProgressError::CircleNotCompleted`] if the circle is incomplete.
/// - [`ProgressError::Wallet`] or [`ProgressError::Cosmetic`] if applying
///   the reward failed; the claim is left unclaimed and may be retried.
pub fn claim_circle(
    book: &CircleBook,
    progress: &mut CircleProgressMap,
    id: &str,
    sinks: &mut RewardSinks<'_>,
    now: DateTime<Utc>,
) -> Result<ClaimReceipt, ProgressError> {
    let circle_id = CircleId::from(id);
    let definition = book
        .get(id)
        .ok_or_else(|| ProgressError::UnknownCircle(circle_id.clone()))?;
    let source = RewardSource::Circle(circle_id.clone());

    let entry = progress
        .get_mut(id)
        .ok_or_else(|| ProgressError::CircleNotCompleted(circle_id.clone()))?;
    if entry.reward_claimed {
        debug!(circle_id = %circle_id, "circle reward already claimed");
        return Err(ProgressError::AlreadyClaimed(source));
    }
    if !entry.completed {
        debug!(circle_id = %circle_id, percent = entry.percent, "circle not completed");
        return Err(ProgressError::CircleNotCompleted(circle_id));
    }

    let note = format!("Completed circle: {}", definition.name);
    let receipt = apply_reward(&definition.reward, &source, &note, now, sinks)?;

    entry.reward_claimed = true;
    entry.reward_claimed_at = Some(now);
    info!(
        circle_id = %circle_id,
        points = receipt.points_credited,
        cosmetics = receipt.cosmetics.len(),
        "circle reward claimed"
    );
    Ok(receipt)
}

/// Claim the reward of achievement `id`.
///
/// # Errors
///
/// - [`ProgressError::UnknownAchievement`] if no such achievement exists.
/// - [`ProgressError::AlreadyClaimed`] if the reward was already granted.
/// - [`ProgressError::AchievementLocked`] if it is not unlocked yet.
/// - [`ProgressError::Wallet`] or [`ProgressError::Cosmetic`] if applying
///   the reward failed; the claim is left unclaimed and may be retried.
pub fn claim_achievement(
    registry: &AchievementRegistry,
    progress: &mut AchievementProgressMap,
    id: &str,
    sinks: &mut RewardSinks<'_>,
    now: DateTime<Utc>,
) -> Result<ClaimReceipt, ProgressError> {
    let achievement = registry
        .get(id)
        .ok_or_else(|| ProgressError::UnknownAchievement(id.into()))?;
    let source = RewardSource::Achievement(achievement.id.clone());

    let entry = progress
        .get_mut(id)
        .ok_or_else(|| ProgressError::AchievementLocked(achievement.id.clone()))?;
    if entry.reward_claimed {
        debug!(achievement_id = %achievement.id, "achievement reward already claimed");
        return Err(ProgressError::AlreadyClaimed(source));
    }
    if !entry.unlocked {
        debug!(achievement_id = %achievement.id, "achievement still locked");
        return Err(ProgressError::AchievementLocked(achievement.id.clone()));
    }

    let note = format!("Achievement: {}", achievement.name);
    let receipt = apply_reward(&achievement.reward, &source, &note, now, sinks)?;

    entry.reward_claimed = true;
    entry.reward_claimed_at = Some(now);
    info!(
        achievement_id = %achievement.id,
        points = receipt.points_credited,
        cosmetics = receipt.cosmetics.len(),
        "achievement reward claimed"
    );
    Ok(receipt)
}
