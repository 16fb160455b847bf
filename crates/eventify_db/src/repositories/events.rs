//! Repository for the event catalog
//!
//! Owns the canonical, ordered list of events. The list is seeded with the
//! demo catalog the first time it is read from an empty store, and new
//! events are prepended, so storage order is most-recently-created first.
//!
//! No validation happens here: callers pass events that already satisfy the
//! creation form's rules.

use crate::envelope::{JsonCollection, Snapshot};
use crate::error::StoreError;
use crate::seed;
use crate::store::StoreHandle;
use eventify_common::{Event, EventCategory};
use eventify_config::{ConcurrencyMode, StorageConfig};
use tracing::{debug, info, warn};

/// The event catalog service
#[derive(Debug, Clone)]
pub struct EventRepository {
    collection: JsonCollection<Event>,
}

impl EventRepository {
    /// Create a repository over `store`, using `key` for the catalog.
    pub fn new(store: StoreHandle, key: impl Into<String>, mode: ConcurrencyMode) -> Self {
        Self {
            collection: JsonCollection::new(store, key, mode),
        }
    }

    /// Create a repository using the key and concurrency mode from the configuration.
    pub fn from_config(store: StoreHandle, config: &StorageConfig) -> Self {
        Self::new(store, config.keys.events.clone(), config.concurrency)
    }

    pub fn key(&self) -> &str {
        self.collection.key()
    }

    /// The seed catalog, without touching storage.
    ///
    /// Useful for rendering when the store is unavailable.
    pub fn defaults() -> Vec<Event> {
        seed::default_events()
    }

    /// Load the catalog, seeding it if the key has never been written.
    fn snapshot(&self) -> Result<Snapshot<Event>, StoreError> {
        if let Some(snapshot) = self.collection.load()? {
            return Ok(snapshot);
        }

        let defaults = Self::defaults();
        match self.collection.commit(0, &defaults) {
            Ok(revision) => {
                info!("Seeded '{}' with {} default events", self.key(), defaults.len());
                Ok(Snapshot {
                    schema_version: crate::envelope::SCHEMA_VERSION,
                    revision,
                    items: defaults,
                })
            }
            // someone else seeded in between; use their copy
            Err(StoreError::StaleRevision { .. }) => {
                warn!("Concurrent seeding of '{}', re-reading", self.key());
                Ok(self.collection.load_or_empty()?)
            }
            Err(err) => Err(err),
        }
    }

    /// All events, in storage order.
    pub fn get_all(&self) -> Result<Vec<Event>, StoreError> {
        let events = self.snapshot()?.items;
        debug!("Loaded {} events", events.len());
        Ok(events)
    }

    /// Find an event by id.
    pub fn get_by_id(&self, id: &str) -> Result<Option<Event>, StoreError> {
        Ok(self.get_all()?.into_iter().find(|event| event.id == id))
    }

    /// All events of one category, in storage order.
    pub fn get_by_category(&self, category: EventCategory) -> Result<Vec<Event>, StoreError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|event| event.category == category)
            .collect())
    }

    /// Prepend an event to the catalog.
    pub fn add(&self, event: Event) -> Result<(), StoreError> {
        let snapshot = self.snapshot()?;
        let mut events = snapshot.items;
        let id = event.id.clone();
        events.insert(0, event);
        self.collection.commit(snapshot.revision, &events)?;
        info!("Added event {}", id);
        Ok(())
    }

    /// Replace the first event whose id matches.
    ///
    /// Returns `false` (and writes nothing) if no event has that id.
    pub fn update(&self, event: Event) -> Result<bool, StoreError> {
        let snapshot = self.snapshot()?;
        let mut events = snapshot.items;
        let Some(slot) = events.iter_mut().find(|existing| existing.id == event.id) else {
            debug!("Update of unknown event {} ignored", event.id);
            return Ok(false);
        };
        let id = event.id.clone();
        *slot = event;
        self.collection.commit(snapshot.revision, &events)?;
        info!("Updated event {}", id);
        Ok(true)
    }

    /// Remove every event with this id.
    ///
    /// Returns how many entries were removed; 0 means nothing was written.
    pub fn delete(&self, id: &str) -> Result<usize, StoreError> {
        let snapshot = self.snapshot()?;
        let mut events = snapshot.items;
        let before = events.len();
        events.retain(|event| event.id != id);
        let removed = before - events.len();
        if removed == 0 {
            debug!("Delete of unknown event {} ignored", id);
            return Ok(0);
        }
        self.collection.commit(snapshot.revision, &events)?;
        info!("Deleted event {} ({} removed)", id, removed);
        Ok(removed)
    }

    /// Drop the stored catalog; the next read seeds it again.
    pub fn reset(&self) -> Result<(), StoreError> {
        warn!("Resetting '{}'", self.key());
        self.collection.reset()
    }
}
