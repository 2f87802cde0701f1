//! Persisted playback snapshot and the stores that hold it.
//!
//! The browser build keeps the snapshot in local storage under a single key.
//! Tests swap in `MemoryStore`, which holds the same raw JSON in process.

use crate::error::{Result, SerenadeError};
use serde::{Deserialize, Serialize};
#[cfg(test)]
use std::cell::{Cell, RefCell};
#[cfg(test)]
use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{errors::StorageError, LocalStorage, Storage};

/// Playback state for resuming after a reload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    #[serde(default)]
    pub track_index: usize,
    #[serde(default)]
    pub current_time: f64, // seconds
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default = "default_volume")]
    pub volume: f64,
}

fn default_volume() -> f64 {
    0.5
}

impl PlaybackState {
    /// Rejects records no live session could have written.
    pub fn validate(self) -> Result<Self> {
        if !self.current_time.is_finite() || self.current_time < 0.0 {
            return Err(SerenadeError::CorruptState(format!(
                "currentTime {} out of range",
                self.current_time
            )));
        }
        if !self.volume.is_finite() || !(0.0..=1.0).contains(&self.volume) {
            return Err(SerenadeError::CorruptState(format!(
                "volume {} out of range",
                self.volume
            )));
        }
        Ok(self)
    }
}

/// Key-value persistence for the playback snapshot.
pub trait StateStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<PlaybackState>>;
    fn save(&self, state: &PlaybackState) -> Result<()>;
}

/// Browser local storage under a fixed key.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[cfg(target_arch = "wasm32")]
impl StateStore for LocalStore {
    fn load(&self) -> Result<Option<PlaybackState>> {
        match LocalStorage::get::<PlaybackState>(&self.key) {
            Ok(state) => Ok(Some(state)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(StorageError::SerdeError(err)) => Err(SerenadeError::CorruptState(err.to_string())),
            Err(err) => Err(SerenadeError::StorageUnavailable(err.to_string())),
        }
    }

    fn save(&self, state: &PlaybackState) -> Result<()> {
        LocalStorage::set(&self.key, state)
            .map_err(|e| SerenadeError::StorageUnavailable(e.to_string()))
    }
}

/// In-process store holding raw JSON strings, like local storage does.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    key: String,
    entries: RefCell<HashMap<String, String>>,
    unavailable: Cell<bool>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Plant a raw value under the store's key.
    pub fn put_raw(&self, value: impl Into<String>) {
        self.entries
            .borrow_mut()
            .insert(self.key.clone(), value.into());
    }

    pub fn raw(&self) -> Option<String> {
        self.entries.borrow().get(&self.key).cloned()
    }

    /// Make every read and write fail, as a disabled or full storage would.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }
}

#[cfg(test)]
impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<PlaybackState>> {
        if self.unavailable.get() {
            return Err(SerenadeError::StorageUnavailable(
                "storage disabled".to_string(),
            ));
        }
        let Some(raw) = self.raw() else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| SerenadeError::CorruptState(e.to_string()))
    }

    fn save(&self, state: &PlaybackState) -> Result<()> {
        if self.unavailable.get() {
            return Err(SerenadeError::StorageUnavailable(
                "storage disabled".to_string(),
            ));
        }
        let json =
            serde_json::to_string(state).map_err(|e| SerenadeError::CorruptState(e.to_string()))?;
        self.put_raw(json);
        Ok(())
    }
}
