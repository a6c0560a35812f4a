//! Directory-backed persistence.
//!
//! A save directory holds one JSON file per progress slot
//! (`ledger.json`, `circles.json`, `achievements.json`) plus one file per
//! reward sink (`wallet.json`, `backgrounds.json`, ...). Every write goes
//! to a temporary file first and is renamed into place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use medallium_core::{ProgressStore, StoreError, StoreSlot};
use medallium_ledger::{CosmeticCollection, CosmeticStore, LedgerError, PointsLedger, Wallet};
use medallium_types::RewardSource;

/// Write `contents` to `path` through a temporary sibling file.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

// ---------------------------------------------------------------------------
// DirStore
// ---------------------------------------------------------------------------

/// A [`ProgressStore`] keeping each slot in `<dir>/<slot>.json`.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// A store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The file backing `slot`.
    pub fn path_for(&self, slot: StoreSlot) -> PathBuf {
        self.dir.join(format!("{}.json", slot.key()))
    }
}

impl ProgressStore for DirStore {
    fn load(&self, slot: StoreSlot) -> Result<Option<String>, StoreError> {
        Ok(read_optional(&self.path_for(slot))?)
    }

    fn save(&mut self, slot: StoreSlot, blob: &str) -> Result<(), StoreError> {
        Ok(write_atomic(&self.path_for(slot), blob)?)
    }
}

// ---------------------------------------------------------------------------
// Persisted sinks
// ---------------------------------------------------------------------------

/// A value mirrored to a JSON file after every change.
///
/// Reward sinks are written through as soon as a component lands, so the
/// grant is durable before the engine persists the claimed flag. A grant
/// that cannot be written is undone and reported, which fails the claim.
#[derive(Debug, Clone)]
pub struct Persisted<T> {
    path: PathBuf,
    value: T,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Load `path`, falling back to `default()` when the file is missing
    /// or corrupt.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>, default: impl FnOnce() -> T) -> Result<Self, StoreError> {
        let path = path.into();
        let value = match read_optional(&path)? {
            None => default(),
            Some(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "corrupt save file, resetting");
                default()
            }),
        };
        Ok(Self { path, value })
    }

    /// The current value.
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Write the current value to disk.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    pub fn save(&self) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(&self.value)?;
        Ok(write_atomic(&self.path, &contents)?)
    }
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + Clone + PartialEq,
{
    /// Apply `change` and write the result to disk if it changed anything.
    /// If the write fails the value is rolled back, so a retry repeats the
    /// change.
    fn apply_durably<R>(
        &mut self,
        store: &'static str,
        change: impl FnOnce(&mut T) -> Result<R, LedgerError>,
    ) -> Result<R, LedgerError> {
        let before = self.value.clone();
        let result = change(&mut self.value)?;
        if self.value == before {
            return Ok(result);
        }
        if let Err(err) = self.save() {
            error!(path = %self.path.display(), store, error = %err, "failed to persist grant");
            self.value = before;
            return Err(LedgerError::Persistence {
                store,
                reason: err.to_string(),
            });
        }
        Ok(result)
    }
}

impl Wallet for Persisted<PointsLedger> {
    fn add_points(
        &mut self,
        amount: u64,
        source: &RewardSource,
        note: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, LedgerError> {
        self.apply_durably("wallet", |wallet| wallet.add_points(amount, source, note, at))
    }
}

impl CosmeticStore for Persisted<CosmeticCollection> {
    fn unlock(&mut self, id: &str) -> Result<bool, LedgerError> {
        self.apply_durably("cosmetics", |store| store.unlock(id))
    }

    fn is_unlocked(&self, id: &str) -> bool {
        self.value.is_unlocked(id)
    }
}
