//! Persisted progress blobs.
//!
//! The engine keeps three independent JSON blobs (one per [`StoreSlot`])
//! and never assumes anything about where they live. A blob that fails to
//! decode is downgraded to a fresh default with a warning rather than
//! surfaced to the caller.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Errors that can occur when reading or writing persisted blobs.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("store I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A value could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The independently persisted pieces of player progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreSlot {
    /// The unlock ledger.
    Ledger,
    /// Circle progress map.
    Circles,
    /// Achievement progress map.
    Achievements,
}

impl StoreSlot {
    /// Every slot, in load order.
    pub const ALL: [Self; 3] = [Self::Ledger, Self::Circles, Self::Achievements];

    /// Stable storage key.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Ledger => "ledger",
            Self::Circles => "circles",
            Self::Achievements => "achievements",
        }
    }
}

impl fmt::Display for StoreSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Opaque load/save of serialized progress blobs.
pub trait ProgressStore: fmt::Debug + Send {
    /// Read the blob for `slot`, or `None` if nothing was saved yet.
    fn load(&self, slot: StoreSlot) -> Result<Option<String>, StoreError>;

    /// Replace the blob for `slot`.
    fn save(&mut self, slot: StoreSlot, blob: &str) -> Result<(), StoreError>;
}

/// Decode a blob, falling back to `T::default()` when it is absent or
/// unparseable.
pub fn decode_or_default<T>(slot: StoreSlot, blob: Option<&str>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(blob) = blob else {
        debug!(slot = %slot, "no saved blob, starting fresh");
        return T::default();
    };
    match serde_json::from_str(blob) {
        Ok(value) => value,
        Err(err) => {
            warn!(slot = %slot, error = %err, "corrupt progress blob, resetting to defaults");
            T::default()
        }
    }
}

/// Serialize a value into a blob.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryState {
    blobs: BTreeMap<StoreSlot, String>,
    saves: u64,
    fail_saves: bool,
}

/// An in-memory store.
///
/// Clones share the same contents, so a test can hand one handle to the
/// engine and inspect or corrupt the blobs through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> Result<R, StoreError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_poisoned| StoreError::Unavailable("memory store lock poisoned".to_owned()))?;
        Ok(f(&mut guard))
    }

    /// Overwrite a blob directly, bypassing failure injection.
    pub fn put(&self, slot: StoreSlot, blob: impl Into<String>) {
        let blob = blob.into();
        let _stored = self.with_state(|state| state.blobs.insert(slot, blob));
    }

    /// The current blob for `slot`.
    pub fn get(&self, slot: StoreSlot) -> Option<String> {
        self.with_state(|state| state.blobs.get(&slot).cloned())
            .ok()
            .flatten()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> u64 {
        self.with_state(|state| state.saves).unwrap_or(0)
    }

    /// Make every subsequent save fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        let _updated = self.with_state(|state| state.fail_saves = fail);
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, slot: StoreSlot) -> Result<Option<String>, StoreError> {
        self.with_state(|state| state.blobs.get(&slot).cloned())
    }

    fn save(&mut self, slot: StoreSlot, blob: &str) -> Result<(), StoreError> {
        self.with_state(|state| {
            if state.fail_saves {
                return Err(StoreError::Unavailable(format!("save of {slot} rejected")));
            }
            state.blobs.insert(slot, blob.to_owned());
            state.saves = state.saves.saturating_add(1);
            Ok(())
        })?
    }
}
