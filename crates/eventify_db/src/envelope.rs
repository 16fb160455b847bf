//! Versioned envelope around every stored collection
//!
//! Collections are written as
//!
//! ```json
//! {"schemaVersion": 1, "revision": 7, "payload": [ ... ]}
//! ```
//!
//! A bare JSON array (the unversioned layout older data uses) is read as
//! schema version 0, revision 0, and is rewritten as an envelope on the
//! next commit.

use crate::error::StoreError;
use crate::store::StoreHandle;
use eventify_config::ConcurrencyMode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// The schema version this build writes.
pub const SCHEMA_VERSION: u32 = 1;

/// Schema version reported for bare-array values.
pub const LEGACY_SCHEMA_VERSION: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub schema_version: u32,
    #[serde(default)]
    pub revision: u64,
    pub payload: T,
}

/// The decoded contents of a collection at a given revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    pub schema_version: u32,
    pub revision: u64,
    pub items: Vec<T>,
}

impl<T> Snapshot<T> {
    /// The snapshot of a key that was never written.
    pub fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            revision: 0,
            items: Vec::new(),
        }
    }
}

fn corrupted(key: &str, message: impl ToString) -> StoreError {
    StoreError::Corrupted {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Decode a stored value into a snapshot.
///
/// # Errors
///
/// [`StoreError::Corrupted`] for anything that is neither a bare array nor
/// an envelope of `T`, and [`StoreError::UnsupportedSchema`] for envelopes
/// from a newer schema.
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<Snapshot<T>, StoreError> {
    let value: Value = serde_json::from_str(raw).map_err(|err| corrupted(key, err))?;
    match value {
        Value::Array(_) => {
            let items = serde_json::from_value(value).map_err(|err| corrupted(key, err))?;
            Ok(Snapshot {
                schema_version: LEGACY_SCHEMA_VERSION,
                revision: 0,
                items,
            })
        }
        Value::Object(ref map) => {
            let version = map
                .get("schemaVersion")
                .and_then(Value::as_u64)
                .ok_or_else(|| corrupted(key, "missing schemaVersion"))?;
            let version = u32::try_from(version).map_err(|_| StoreError::UnsupportedSchema {
                key: key.to_string(),
                version: u32::MAX,
            })?;
            if version > SCHEMA_VERSION {
                return Err(StoreError::UnsupportedSchema {
                    key: key.to_string(),
                    version,
                });
            }
            let envelope: Envelope<Vec<T>> =
                serde_json::from_value(value).map_err(|err| corrupted(key, err))?;
            Ok(Snapshot {
                schema_version: envelope.schema_version,
                revision: envelope.revision,
                items: envelope.payload,
            })
        }
        _ => Err(corrupted(key, "expected an array or an envelope object")),
    }
}

/// Read only the revision of a stored value, without decoding the payload.
fn stored_revision(key: &str, raw: &str) -> Result<u64, StoreError> {
    let value: Value = serde_json::from_str(raw).map_err(|err| corrupted(key, err))?;
    match value {
        Value::Array(_) => Ok(0),
        Value::Object(map) => Ok(map.get("revision").and_then(Value::as_u64).unwrap_or(0)),
        _ => Err(corrupted(key, "expected an array or an envelope object")),
    }
}

/// Encode items as a current-schema envelope.
pub fn encode<T: Serialize>(revision: u64, items: &[T]) -> Result<String, StoreError> {
    let envelope = Envelope {
        schema_version: SCHEMA_VERSION,
        revision,
        payload: items,
    };
    serde_json::to_string(&envelope).map_err(|err| StoreError::Serialization(err.to_string()))
}

/// One typed collection stored under one key.
///
/// Reads and writes go through [`load`](Self::load) and
/// [`commit`](Self::commit); every call checks the store's availability
/// first and fails with [`StoreError::Unavailable`] when it has none.
pub struct JsonCollection<T> {
    store: StoreHandle,
    key: String,
    mode: ConcurrencyMode,
    _items: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key.clone(),
            mode: self.mode,
            _items: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for JsonCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonCollection")
            .field("key", &self.key)
            .field("mode", &self.mode)
            .finish()
    }
}

impl<T: Serialize + DeserializeOwned> JsonCollection<T> {
    pub fn new(store: StoreHandle, key: impl Into<String>, mode: ConcurrencyMode) -> Self {
        Self {
            store,
            key: key.into(),
            mode,
            _items: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Explicit capability check.
    pub fn ensure_available(&self) -> Result<(), StoreError> {
        if self.store.is_available() {
            Ok(())
        } else {
            debug!("Store unavailable for '{}'", self.key);
            Err(StoreError::Unavailable)
        }
    }

    /// Read the collection; `None` if the key was never written.
    pub fn load(&self) -> Result<Option<Snapshot<T>>, StoreError> {
        self.ensure_available()?;
        match self.store.get(&self.key)? {
            None => Ok(None),
            Some(raw) => decode(&self.key, &raw).map(Some).inspect_err(|err| {
                warn!("Failed to read collection '{}': {}", self.key, err);
            }),
        }
    }

    /// Read the collection, treating a missing key as empty.
    pub fn load_or_empty(&self) -> Result<Snapshot<T>, StoreError> {
        Ok(self.load()?.unwrap_or_else(Snapshot::empty))
    }

    /// Replace the whole collection, based on the snapshot at `base_revision`.
    ///
    /// In [`ConcurrencyMode::Optimistic`] the write only lands if the stored
    /// value is still the one at `base_revision`; the check and the write are
    /// one [`compare_and_set`](crate::store::KeyValueStore::compare_and_set),
    /// so a writer that slips in between fails this call with
    /// [`StoreError::StaleRevision`]. Returns the new revision.
    pub fn commit(&self, base_revision: u64, items: &[T]) -> Result<u64, StoreError> {
        self.ensure_available()?;
        let revision = base_revision
            .checked_add(1)
            .ok_or_else(|| corrupted(&self.key, "revision overflow"))?;
        let raw = encode(revision, items)?;

        match self.mode {
            ConcurrencyMode::LastWriteWins => self.store.set(&self.key, &raw)?,
            ConcurrencyMode::Optimistic => {
                let current = self.store.get(&self.key)?;
                let found = self.revision_of(current.as_deref())?;
                if found != base_revision {
                    return Err(self.stale(base_revision, found));
                }
                if !self.store.compare_and_set(&self.key, current, &raw)? {
                    let found = self.revision_of(self.store.get(&self.key)?.as_deref())?;
                    return Err(self.stale(base_revision, found));
                }
            }
        }
        debug!(
            "Committed {} item(s) to '{}' at revision {}",
            items.len(),
            self.key,
            revision
        );
        Ok(revision)
    }

    fn revision_of(&self, raw: Option<&str>) -> Result<u64, StoreError> {
        raw.map_or(Ok(0), |raw| stored_revision(&self.key, raw))
    }

    fn stale(&self, expected: u64, found: u64) -> StoreError {
        warn!(
            "Rejected stale write to '{}': based on revision {}, store is at {}",
            self.key, expected, found
        );
        StoreError::StaleRevision {
            key: self.key.clone(),
            expected,
            found,
        }
    }

    /// Drop the stored value entirely.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.ensure_available()?;
        self.store.remove(&self.key)
    }
}
