//! Shared type definitions for the Medallium collection engine.
//!
//! This crate is the single source of truth for the data model shared by
//! the ledger, progress and core crates. Types flow to `TypeScript` via
//! `ts-rs` for the web front end.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers for items, circles, achievements, entries
//! - [`enums`] -- Category, cosmetic, stat and tier enumerations
//! - [`structs`] -- Catalog, progress, reward and analytics structs
//! - [`calendar`] -- [`CalendarDay`], the date type used for streaks

pub mod calendar;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use calendar::CalendarDay;
pub use enums::{
    AchievementTier, CategoryKind, CosmeticKind, MilestoneTarget, PointsEntryType, RewardSource,
    StatKind,
};
pub use ids::{AchievementId, CircleId, EntryId, ItemId};
pub use structs::{
    AchievementProgress, CategoryStats, CircleDefinition, CircleProgress, CollectibleItem,
    CollectionStats, EconomyStats, GameStats, NextMilestone, PointsEntry, Reward, UnlockRecord,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::ItemId::export_all();
        let _ = crate::ids::CircleId::export_all();
        let _ = crate::ids::AchievementId::export_all();
        let _ = crate::ids::EntryId::export_all();

        // Enums
        let _ = crate::enums::CategoryKind::export_all();
        let _ = crate::enums::CosmeticKind::export_all();
        let _ = crate::enums::StatKind::export_all();
        let _ = crate::enums::AchievementTier::export_all();
        let _ = crate::enums::RewardSource::export_all();
        let _ = crate::enums::MilestoneTarget::export_all();
        let _ = crate::enums::PointsEntryType::export_all();

        // Structs
        let _ = crate::calendar::CalendarDay::export_all();
        let _ = crate::structs::CollectibleItem::export_all();
        let _ = crate::structs::UnlockRecord::export_all();
        let _ = crate::structs::Reward::export_all();
        let _ = crate::structs::CircleDefinition::export_all();
        let _ = crate::structs::CircleProgress::export_all();
        let _ = crate::structs::AchievementProgress::export_all();
        let _ = crate::structs::GameStats::export_all();
        let _ = crate::structs::EconomyStats::export_all();
        let _ = crate::structs::PointsEntry::export_all();
        let _ = crate::structs::CategoryStats::export_all();
        let _ = crate::structs::NextMilestone::export_all();
        let _ = crate::structs::CollectionStats::export_all();
    }
}
