//! The `Eventify` facade
//!
//! Coordinates the three storage services the way the pages of the app
//! do: browsing the catalog, creating and deleting events (retracting a
//! deleted event from the favorites), favoriting and registering.

use crate::query::{apply_query, paginate, CatalogQuery, Page, Pager};
use crate::validation::{validate_event_draft, validate_registration_form, EventDraft, RegistrationForm};
use chrono::{DateTime, NaiveDate, Utc};
use eventify_common::{not_found, Event, EventifyError, Registration};
use eventify_config::{AppConfig, CatalogConfig, StorageConfig};
use eventify_db::{Repositories, StoreFactory, StoreHandle};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOutcome {
    pub registration: Registration,
    /// The same e-mail was already registered for this event before this call
    pub duplicate: bool,
}

/// Page-level operations over one store.
#[derive(Debug, Clone)]
pub struct Eventify {
    repos: Repositories,
    catalog: CatalogConfig,
}

impl Eventify {
    pub fn new(store: StoreHandle, storage: &StorageConfig, catalog: CatalogConfig) -> Self {
        Self {
            repos: Repositories::new(store, storage),
            catalog,
        }
    }

    /// Build the store described by `config` and the facade over it.
    pub fn from_config(config: &AppConfig) -> Result<Self, EventifyError> {
        let store = StoreFactory::new().from_app_config(config)?;
        Ok(Self::new(store, &config.storage, config.catalog.clone()))
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    pub fn catalog_config(&self) -> &CatalogConfig {
        &self.catalog
    }

    /// A fresh browsing state using the configured page size.
    pub fn pager(&self) -> Pager {
        Pager::new(self.catalog.page_size)
    }

    /// Read the catalog, apply `query` and return page `page`.
    pub fn browse(&self, query: &CatalogQuery, page: usize) -> Result<Page<Event>, EventifyError> {
        let events = self.repos.events.get_all()?;
        let filtered = apply_query(&events, query);
        Ok(paginate(&filtered, page, self.catalog.page_size))
    }

    /// Read the catalog and return the page the pager is on.
    pub fn browse_with(&self, pager: &Pager) -> Result<Page<Event>, EventifyError> {
        Ok(pager.current(&self.repos.events.get_all()?))
    }

    pub fn event(&self, id: &str) -> Result<Option<Event>, EventifyError> {
        Ok(self.repos.events.get_by_id(id)?)
    }

    /// Validate `draft` and prepend the resulting event to the catalog.
    pub fn create_event(&self, draft: &EventDraft, today: NaiveDate) -> Result<Event, EventifyError> {
        let event = validate_event_draft(draft, today, Utc::now(), &self.catalog.placeholder_image)?;
        self.repos.events.add(event.clone())?;
        info!("Created event {} '{}'", event.id, event.name);
        Ok(event)
    }

    /// Replace the event with the same id. Returns `false` if there is none.
    pub fn update_event(&self, event: Event) -> Result<bool, EventifyError> {
        Ok(self.repos.events.update(event)?)
    }

    /// Delete an event and retract it from the favorites.
    ///
    /// Returns the number of catalog entries removed. The two collections
    /// are written one after the other; if the retraction fails the event
    /// stays deleted and the error is returned. Calling this again for the
    /// same id is safe: it removes nothing and retries the retraction.
    pub fn delete_event(&self, id: &str) -> Result<usize, EventifyError> {
        let removed = self.repos.events.delete(id)?;
        self.retract_favorite(id).inspect_err(|err| {
            warn!(
                "Deleted event {} but could not retract it from favorites: {}",
                id, err
            );
        })?;
        Ok(removed)
    }

    fn retract_favorite(&self, id: &str) -> Result<(), EventifyError> {
        // toggle is a flip, so only call it for a current favorite
        if self.repos.favorites.is_favorite(id)? {
            self.repos.favorites.toggle(id)?;
            info!("Retracted deleted event {} from favorites", id);
        }
        Ok(())
    }

    pub fn toggle_favorite(&self, id: &str) -> Result<bool, EventifyError> {
        Ok(self.repos.favorites.toggle(id)?)
    }

    pub fn is_favorite(&self, id: &str) -> Result<bool, EventifyError> {
        Ok(self.repos.favorites.is_favorite(id)?)
    }

    /// Favorited events in catalog order. Ids with no event are skipped.
    pub fn favorite_events(&self) -> Result<Vec<Event>, EventifyError> {
        let ids = self.repos.favorites.get_all()?;
        Ok(self
            .repos
            .events
            .get_all()?
            .into_iter()
            .filter(|event| ids.contains(&event.id))
            .collect())
    }

    /// Register the attendee described by `form` for `event_id`.
    ///
    /// A repeated registration is still recorded; the outcome flags it.
    ///
    /// # Errors
    ///
    /// [`EventifyError::NotFoundError`] if the event does not exist,
    /// [`EventifyError::ValidationError`] if the form is rejected, or the
    /// storage failure that prevented the write.
    pub fn register(
        &self,
        event_id: &str,
        form: &RegistrationForm,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome, EventifyError> {
        let event = self
            .repos
            .events
            .get_by_id(event_id)?
            .ok_or_else(|| not_found(format!("event {event_id}")))?;
        let attendee = validate_registration_form(form)?;

        let duplicate = self
            .repos
            .registrations
            .is_registered(&event.id, &attendee.email)?;
        if duplicate {
            warn!("{} is already registered for event {}", attendee.email, event.id);
        }

        let registration = Registration::snapshot(Uuid::new_v4().to_string(), &event, attendee, now);
        self.repos.registrations.add(registration.clone())?;

        Ok(RegistrationOutcome {
            registration,
            duplicate,
        })
    }

    pub fn registrations(&self) -> Result<Vec<Registration>, EventifyError> {
        Ok(self.repos.registrations.get_all()?)
    }

    pub fn registrations_for(&self, email: &str) -> Result<Vec<Registration>, EventifyError> {
        Ok(self.repos.registrations.get_by_email(email)?)
    }

    /// Discard the collection stored under `key` so the next read starts fresh.
    ///
    /// Only the three configured keys can be reset.
    pub fn reset_corrupted(&self, key: &str) -> Result<(), EventifyError> {
        if key == self.repos.events.key() {
            self.repos.events.reset()?;
        } else if key == self.repos.favorites.key() {
            self.repos.favorites.reset()?;
        } else if key == self.repos.registrations.key() {
            self.repos.registrations.reset()?;
        } else {
            return Err(not_found(format!("store key '{key}'")));
        }
        warn!("Reset store '{}' after corruption", key);
        Ok(())
    }
}
