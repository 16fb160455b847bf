//! Repository for favorited event ids
//!
//! Stored as a JSON array of ids with set semantics. Ids are not checked
//! against the catalog; filtering stale ids is the display layer's job.

use crate::envelope::JsonCollection;
use crate::error::StoreError;
use crate::store::StoreHandle;
use eventify_config::{ConcurrencyMode, StorageConfig};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// The favorites service
#[derive(Debug, Clone)]
pub struct FavoritesRepository {
    collection: JsonCollection<String>,
}

impl FavoritesRepository {
    pub fn new(store: StoreHandle, key: impl Into<String>, mode: ConcurrencyMode) -> Self {
        Self {
            collection: JsonCollection::new(store, key, mode),
        }
    }

    pub fn from_config(store: StoreHandle, config: &StorageConfig) -> Self {
        Self::new(store, config.keys.favorites.clone(), config.concurrency)
    }

    pub fn key(&self) -> &str {
        self.collection.key()
    }

    /// All favorited ids. Duplicates in the stored array collapse here.
    pub fn get_all(&self) -> Result<BTreeSet<String>, StoreError> {
        let ids: BTreeSet<String> = self.collection.load_or_empty()?.items.into_iter().collect();
        debug!("Loaded {} favorites", ids.len());
        Ok(ids)
    }

    pub fn is_favorite(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .collection
            .load_or_empty()?
            .items
            .iter()
            .any(|favorite| favorite == id))
    }

    /// Flip membership of `id`.
    ///
    /// Returns `true` if the id is now a favorite, `false` if it was removed.
    pub fn toggle(&self, id: &str) -> Result<bool, StoreError> {
        let snapshot = self.collection.load_or_empty()?;
        let mut ids = snapshot.items;
        let was_favorite = ids.iter().any(|favorite| favorite == id);
        if was_favorite {
            ids.retain(|favorite| favorite != id);
        } else {
            ids.push(id.to_string());
        }
        self.collection.commit(snapshot.revision, &ids)?;

        let now_favorite = !was_favorite;
        info!(
            "Favorite {} {}",
            id,
            if now_favorite { "added" } else { "removed" }
        );
        Ok(now_favorite)
    }

    /// Drop the stored favorites entirely.
    pub fn reset(&self) -> Result<(), StoreError> {
        warn!("Resetting '{}'", self.key());
        self.collection.reset()
    }
}
