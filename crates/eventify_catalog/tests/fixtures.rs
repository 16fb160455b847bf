// Shared helpers for the catalog integration tests

use chrono::{NaiveDate, TimeZone, Utc};
use eventify_catalog::{EventDraft, Eventify, RegistrationForm};
use eventify_common::EventCategory;
use eventify_config::{AppConfig, StorageBackend};
use eventify_db::{MemoryStore, StoreHandle};
use std::sync::Arc;

pub fn memory_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    config
}

/// A facade over a fresh in-memory store, plus the store itself.
pub fn eventify() -> (Eventify, StoreHandle) {
    let config = memory_config();
    let store: StoreHandle = Arc::new(MemoryStore::new());
    let eventify = Eventify::new(store.clone(), &config.storage, config.catalog.clone());
    (eventify, store)
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

pub fn registered_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap()
}

pub fn draft(name: &str) -> EventDraft {
    EventDraft {
        name: name.to_string(),
        description: "Encontro mensal para quem gosta de tabuleiro.".to_string(),
        category: Some(EventCategory::Workshops),
        date: Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
        location: "Biblioteca Central".to_string(),
        available_spots: Some(40),
        image: None,
    }
}

pub fn form(email: &str) -> RegistrationForm {
    RegistrationForm {
        name: "Ana Souza".to_string(),
        email: email.to_string(),
        phone: "(11) 98888-7777".to_string(),
    }
}
