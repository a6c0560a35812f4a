//! The player's reward sinks, loaded from a save directory.

use std::path::Path;

use serde::Serialize;

use medallium_core::StoreError;
use medallium_ledger::{CosmeticCollection, PointsLedger};
use medallium_progress::RewardSinks;
use medallium_types::{CosmeticKind, EconomyStats};

use crate::file_store::Persisted;

/// Wallet plus one cosmetic store per [`CosmeticKind`], each written
/// through to its own file.
#[derive(Debug)]
pub struct Profile {
    wallet: Persisted<PointsLedger>,
    backgrounds: Persisted<CosmeticCollection>,
    music_tracks: Persisted<CosmeticCollection>,
    frames: Persisted<CosmeticCollection>,
    titles: Persisted<CosmeticCollection>,
    badges: Persisted<CosmeticCollection>,
}

const fn file_name(kind: CosmeticKind) -> &'static str {
    match kind {
        CosmeticKind::Background => "backgrounds.json",
        CosmeticKind::MusicTrack => "music_tracks.json",
        CosmeticKind::Frame => "frames.json",
        CosmeticKind::Title => "titles.json",
        CosmeticKind::Badge => "badges.json",
    }
}

fn open_cosmetics(
    dir: &Path,
    kind: CosmeticKind,
) -> Result<Persisted<CosmeticCollection>, StoreError> {
    Persisted::open(dir.join(file_name(kind)), || CosmeticCollection::new(kind))
}

impl Profile {
    /// Load every sink from `dir`. Missing files start empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a file exists but cannot be read.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            wallet: Persisted::open(dir.join("wallet.json"), PointsLedger::new)?,
            backgrounds: open_cosmetics(dir, CosmeticKind::Background)?,
            music_tracks: open_cosmetics(dir, CosmeticKind::MusicTrack)?,
            frames: open_cosmetics(dir, CosmeticKind::Frame)?,
            titles: open_cosmetics(dir, CosmeticKind::Title)?,
            badges: open_cosmetics(dir, CosmeticKind::Badge)?,
        })
    }

    /// Borrow every sink for a claim.
    pub fn sinks(&mut self) -> RewardSinks<'_> {
        RewardSinks {
            wallet: &mut self.wallet,
            backgrounds: &mut self.backgrounds,
            music_tracks: &mut self.music_tracks,
            frames: &mut self.frames,
            titles: &mut self.titles,
            badges: &mut self.badges,
        }
    }

    /// Economy aggregates derived from the wallet.
    pub fn economy_stats(&self) -> EconomyStats {
        self.wallet.get().economy_stats()
    }

    /// A serializable summary of balances and owned cosmetics.
    pub fn summary(&self) -> WalletSummary {
        let cosmetics = [
            &self.backgrounds,
            &self.music_tracks,
            &self.frames,
            &self.titles,
            &self.badges,
        ]
        .into_iter()
        .map(|store| OwnedCosmetics {
            kind: store.get().kind(),
            ids: store.get().owned().map(str::to_owned).collect(),
        })
        .collect();
        let wallet = self.wallet.get();
        WalletSummary {
            balance: wallet.balance(),
            total_earned: wallet.total_earned(),
            total_spent: wallet.total_spent(),
            entries: wallet.len(),
            cosmetics,
        }
    }
}

/// Owned cosmetics of one kind.
#[derive(Debug, Clone, Serialize)]
pub struct OwnedCosmetics {
    /// Which store.
    pub kind: CosmeticKind,
    /// Owned ids, sorted.
    pub ids: Vec<String>,
}

/// Wallet and cosmetic totals for display.
#[derive(Debug, Clone, Serialize)]
pub struct WalletSummary {
    /// Spendable points.
    pub balance: u64,
    /// Lifetime points earned.
    pub total_earned: u64,
    /// Lifetime points spent.
    pub total_spent: u64,
    /// Number of wallet entries.
    pub entries: usize,
    /// Owned cosmetics per store.
    pub cosmetics: Vec<OwnedCosmetics>,
}
