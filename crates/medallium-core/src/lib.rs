//! Orchestration layer for the Medallium collection engine.
//!
//! # Architecture
//!
//! - [`config`] -- YAML configuration ([`MedalliumConfig`]).
//! - [`clock`] -- The [`Clock`] seam ([`SystemClock`], [`FixedClock`]).
//! - [`store`] -- Opaque blob persistence ([`ProgressStore`],
//!   [`MemoryStore`]) with corrupt-blob downgrade.
//! - [`data`] -- Built-in circles and achievements.
//! - [`engine`] -- The [`CollectionEngine`] facade.
//!
//! # Usage
//!
//! ```
//! use medallium_core::{CollectionEngine, MedalliumConfig, MemoryStore, SystemClock};
//! use medallium_progress::Catalog;
//!
//! let engine = CollectionEngine::from_config(
//!     &MedalliumConfig::default(),
//!     Catalog::default(),
//!     Box::new(MemoryStore::new()),
//!     Box::new(SystemClock),
//! );
//! assert!(engine.is_ok());
//! ```

pub mod clock;
pub mod config;
pub mod data;
pub mod engine;
pub mod store;

// Re-export primary types at crate root.
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, DataConfig, LoggingConfig, MedalliumConfig};
pub use data::DataError;
pub use engine::{AchievementView, ClaimableReward, CollectionEngine, LoadReport, UnlockOutcome};
pub use store::{MemoryStore, ProgressStore, StoreError, StoreSlot};
