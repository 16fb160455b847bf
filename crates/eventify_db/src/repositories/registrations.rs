//! Repository for registrations
//!
//! An append-only log. Nothing is deduplicated: callers that want to warn
//! about a repeated signup check [`RegistrationRepository::is_registered`]
//! before calling [`RegistrationRepository::add`].

use crate::envelope::JsonCollection;
use crate::error::StoreError;
use crate::store::StoreHandle;
use eventify_common::Registration;
use eventify_config::{ConcurrencyMode, StorageConfig};
use tracing::{debug, info, warn};

/// The registration service
#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    collection: JsonCollection<Registration>,
}

impl RegistrationRepository {
    pub fn new(store: StoreHandle, key: impl Into<String>, mode: ConcurrencyMode) -> Self {
        Self {
            collection: JsonCollection::new(store, key, mode),
        }
    }

    pub fn from_config(store: StoreHandle, config: &StorageConfig) -> Self {
        Self::new(store, config.keys.registrations.clone(), config.concurrency)
    }

    pub fn key(&self) -> &str {
        self.collection.key()
    }

    /// All registrations, in the order they were added.
    pub fn get_all(&self) -> Result<Vec<Registration>, StoreError> {
        let registrations = self.collection.load_or_empty()?.items;
        debug!("Loaded {} registrations", registrations.len());
        Ok(registrations)
    }

    /// Append a registration.
    pub fn add(&self, registration: Registration) -> Result<(), StoreError> {
        let snapshot = self.collection.load_or_empty()?;
        let mut registrations = snapshot.items;
        info!(
            "Registering {} for event {}",
            registration.user_email, registration.event_id
        );
        registrations.push(registration);
        self.collection.commit(snapshot.revision, &registrations)?;
        Ok(())
    }

    /// Registrations made with exactly this e-mail (case-sensitive).
    pub fn get_by_email(&self, email: &str) -> Result<Vec<Registration>, StoreError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|registration| registration.user_email == email)
            .collect())
    }

    /// Registrations for one event.
    pub fn get_by_event(&self, event_id: &str) -> Result<Vec<Registration>, StoreError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|registration| registration.event_id == event_id)
            .collect())
    }

    /// Whether this e-mail already registered for this event.
    pub fn is_registered(&self, event_id: &str, email: &str) -> Result<bool, StoreError> {
        Ok(self
            .get_all()?
            .iter()
            .any(|registration| registration.event_id == event_id && registration.user_email == email))
    }

    /// Drop the stored registration log entirely.
    pub fn reset(&self) -> Result<(), StoreError> {
        warn!("Resetting '{}'", self.key());
        self.collection.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::sync::Arc;

    fn repository() -> RegistrationRepository {
        RegistrationRepository::new(
            Arc::new(MemoryStore::new()),
            "eventify-registrations",
            ConcurrencyMode::Optimistic,
        )
    }

    fn registration(id: &str, event_id: &str, email: &str) -> Registration {
        Registration {
            id: id.to_string(),
            event_id: event_id.to_string(),
            event_name: "Workshop de Fotografia".to_string(),
            event_date: NaiveDate::from_ymd_opt(2024, 4, 20).unwrap(),
            event_image: "/placeholder.svg?height=300&width=400".to_string(),
            user_name: "Ana".to_string(),
            user_email: email.to_string(),
            user_phone: "11 99999-0000".to_string(),
            registration_date: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_is_registered_after_add() {
        let repo = repository();
        assert!(!repo.is_registered("2", "a@b.com").unwrap());

        repo.add(registration("r1", "2", "a@b.com")).unwrap();

        assert!(repo.is_registered("2", "a@b.com").unwrap());
        assert!(!repo.is_registered("3", "a@b.com").unwrap());
        assert!(!repo.is_registered("2", "other@b.com").unwrap());
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let repo = repository();
        repo.add(registration("r1", "2", "a@b.com")).unwrap();
        repo.add(registration("r2", "5", "c@d.com")).unwrap();
        repo.add(registration("r3", "2", "a@b.com")).unwrap();

        let ids: Vec<String> = repo.get_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["r1", "r2", "r3"]);
        assert_eq!(repo.get_by_email("a@b.com").unwrap().len(), 2);
        assert_eq!(repo.get_by_event("5").unwrap()[0].id, "r2");
    }

    #[test]
    fn test_email_match_is_case_sensitive() {
        let repo = repository();
        repo.add(registration("r1", "2", "a@b.com")).unwrap();

        assert!(repo.get_by_email("A@B.COM").unwrap().is_empty());
        assert!(!repo.is_registered("2", "A@b.com").unwrap());
    }

    #[test]
    fn test_reads_registrations_written_by_the_browser_app() {
        let store: StoreHandle = Arc::new(MemoryStore::new());
        store
            .set(
                "eventify-registrations",
                r#"[{"id":"1710000000000","eventId":"3","eventName":"Workshop de Design UX/UI",
                    "eventDate":"2024-03-25","eventImage":"/placeholder.svg?height=300&width=400",
                    "userName":"Bia","userEmail":"bia@x.com","userPhone":"(11) 98888-7777",
                    "registrationDate":"2024-03-09T16:00:00.000Z"}]"#,
            )
            .unwrap();
        let repo = RegistrationRepository::new(
            store,
            "eventify-registrations",
            ConcurrencyMode::Optimistic,
        );

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].user_phone, "(11) 98888-7777");
        assert!(repo.is_registered("3", "bia@x.com").unwrap());
    }
}
