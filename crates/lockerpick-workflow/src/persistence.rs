//! Durable storage for the locker picked so far.
//!
//! A single key ([`SELECTION_KEY`]) holds the serialized [`Locker`]. There is
//! no versioning and no expiry; the workflow clears the entry at the start of
//! every resolution cycle.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lockerpick_core::Locker;

use crate::error::PersistenceError;

/// Key under which the selected locker is stored.
pub const SELECTION_KEY: &str = "lockerData";

/// Key/value store for the selected locker.
///
/// Calls are synchronous local operations. Writing replaces any prior value.
pub trait SelectionStore: Send + Sync {
    /// Returns the stored locker, or `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the backing store cannot be read or
    /// holds an undecodable entry.
    fn read(&self) -> Result<Option<Locker>, PersistenceError>;

    /// Stores `locker`, replacing any previous selection.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the backing store cannot be written.
    fn write(&self, locker: &Locker) -> Result<(), PersistenceError>;

    /// Removes the stored selection. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the backing store cannot be written.
    fn clear(&self) -> Result<(), PersistenceError>;
}

/// Process-local store, used by tests and by hosts without durable storage.
#[derive(Debug, Default)]
pub struct InMemorySelectionStore {
    slot: Mutex<Option<Locker>>,
}

impl InMemorySelectionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `locker`.
    #[must_use]
    pub fn with_selection(locker: Locker) -> Self {
        Self {
            slot: Mutex::new(Some(locker)),
        }
    }
}

impl SelectionStore for InMemorySelectionStore {
    fn read(&self) -> Result<Option<Locker>, PersistenceError> {
        let slot = self.slot.lock().map_err(|_| PersistenceError::Poisoned)?;
        Ok(slot.clone())
    }

    fn write(&self, locker: &Locker) -> Result<(), PersistenceError> {
        let mut slot = self.slot.lock().map_err(|_| PersistenceError::Poisoned)?;
        *slot = Some(locker.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        let mut slot = self.slot.lock().map_err(|_| PersistenceError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

/// JSON-file key/value store that survives process restarts.
///
/// The file holds a JSON object; only [`SELECTION_KEY`] is touched, other
/// keys are preserved. Writes go to a sibling temp file first and are
/// renamed into place.
#[derive(Debug)]
pub struct FileSelectionStore {
    path: PathBuf,
}

impl FileSelectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn load(&self) -> Result<BTreeMap<String, serde_json::Value>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(self.io_err(e)),
        }
    }

    /// Like [`Self::load`], but an undecodable file yields an empty map
    /// flagged as needing a rewrite, so a damaged store never blocks a pick.
    fn load_for_update(
        &self,
    ) -> Result<(BTreeMap<String, serde_json::Value>, bool), PersistenceError> {
        match self.load() {
            Ok(entries) => Ok((entries, false)),
            Err(PersistenceError::Json(err)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "selection file is not a JSON object, overwriting"
                );
                Ok((BTreeMap::new(), true))
            }
            Err(err) => Err(err),
        }
    }

    fn save(
        &self,
        entries: &BTreeMap<String, serde_json::Value>,
    ) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let body = serde_json::to_vec_pretty(entries)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, body).map_err(|e| self.io_err(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            self.io_err(e)
        })
    }
}

impl SelectionStore for FileSelectionStore {
    fn read(&self) -> Result<Option<Locker>, PersistenceError> {
        let mut entries = self.load()?;
        entries
            .remove(SELECTION_KEY)
            .map(serde_json::from_value)
            .transpose()
            .map_err(PersistenceError::from)
    }

    fn write(&self, locker: &Locker) -> Result<(), PersistenceError> {
        let (mut entries, _) = self.load_for_update()?;
        entries.insert(SELECTION_KEY.to_string(), serde_json::to_value(locker)?);
        self.save(&entries)?;
        tracing::debug!(
            locker_id = %locker.id,
            path = %self.path.display(),
            "locker selection saved"
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        let (mut entries, repair) = self.load_for_update()?;
        if entries.remove(SELECTION_KEY).is_none() && !repair {
            return Ok(());
        }
        self.save(&entries)
    }
}
