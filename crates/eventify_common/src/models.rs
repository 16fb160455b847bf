// --- File: crates/eventify_common/src/models.rs ---

// Data structures shared by the storage services and the catalog layer.
// Field names and category slugs are the persisted wire format, so the
// serde attributes here must not change without a schema version bump.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of event categories.
///
/// Serialized with the slugs used by the stored catalog
/// (`tecnologia`, `musica`, `workshops`, `esportes`, `arte`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventCategory {
    #[serde(rename = "tecnologia")]
    Technology,
    #[serde(rename = "musica")]
    Music,
    #[serde(rename = "workshops")]
    Workshops,
    #[serde(rename = "esportes")]
    Sports,
    #[serde(rename = "arte")]
    Art,
}

impl EventCategory {
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Technology,
        EventCategory::Music,
        EventCategory::Workshops,
        EventCategory::Sports,
        EventCategory::Art,
    ];

    /// The stored slug of this category.
    pub fn slug(self) -> &'static str {
        match self {
            EventCategory::Technology => "tecnologia",
            EventCategory::Music => "musica",
            EventCategory::Workshops => "workshops",
            EventCategory::Sports => "esportes",
            EventCategory::Art => "arte",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Error returned when a string is not a known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for EventCategory {
    type Err = UnknownCategory;

    /// Accepts the stored slug or the English variant name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "tecnologia" | "technology" => Ok(EventCategory::Technology),
            "musica" | "music" => Ok(EventCategory::Music),
            "workshops" => Ok(EventCategory::Workshops),
            "esportes" | "sports" => Ok(EventCategory::Sports),
            "arte" | "art" => Ok(EventCategory::Art),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// A catalog entry.
///
/// Field bounds (name length, future date, spot count) are enforced by the
/// creation form before an `Event` is built, never by the storage services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Opaque identifier, immutable once created
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: EventCategory,
    /// Calendar date, stored as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub location: String,
    /// 0 means sold out
    pub available_spots: u32,
    pub image: String,
}

impl Event {
    pub fn is_sold_out(&self) -> bool {
        self.available_spots == 0
    }
}

/// A user's signup for an event.
///
/// The `event_*` fields are a snapshot taken when the registration was made
/// and are never refreshed from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub event_image: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub registration_date: DateTime<Utc>,
}

/// The user-supplied part of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attendee {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Registration {
    /// Builds a registration, copying the event fields it snapshots.
    pub fn snapshot(
        id: impl Into<String>,
        event: &Event,
        attendee: Attendee,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            event_id: event.id.clone(),
            event_name: event.name.clone(),
            event_date: event.date,
            event_image: event.image.clone(),
            user_name: attendee.name,
            user_email: attendee.email,
            user_phone: attendee.phone,
            registration_date: registered_at,
        }
    }
}
