//! Form validation for new events and registrations
//!
//! The storage services trust their input. Everything user-typed passes
//! through here first, and every rejected field is reported at once.

use chrono::{DateTime, NaiveDate, Utc};
use eventify_common::{Attendee, Event, EventCategory, EventifyError, FieldError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

static IMAGE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$").expect("image url regex")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s()+-]+$").expect("phone regex"));

pub const NAME_LENGTH: (usize, usize) = (3, 100);
pub const DESCRIPTION_LENGTH: (usize, usize) = (20, 1000);
pub const LOCATION_LENGTH: (usize, usize) = (5, 200);
pub const SPOTS_RANGE: (u32, u32) = (1, 10_000);
pub const ATTENDEE_NAME_MIN: usize = 2;

/// The event creation form, as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub name: String,
    pub description: String,
    pub category: Option<EventCategory>,
    pub date: Option<NaiveDate>,
    pub location: String,
    pub available_spots: Option<u32>,
    /// Blank means "use the placeholder"
    #[serde(default)]
    pub image: Option<String>,
}

/// The registration form, as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

fn check_length(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    label: &str,
    value: &str,
    (min, max): (usize, usize),
) {
    let length = value.chars().count();
    if length == 0 {
        errors.push(FieldError::new(field, format!("{label} is required")));
    } else if length < min {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at least {min} characters"),
        ));
    } else if length > max {
        errors.push(FieldError::new(
            field,
            format!("{label} must be at most {max} characters"),
        ));
    }
}

/// Generate an id of the form `event_<millis>_<9 alphanumerics>`.
pub fn generate_event_id(now: DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("event_{}_{}", now.timestamp_millis(), suffix)
}

/// Validate a draft and build the event it describes.
///
/// Text fields are trimmed before their length is checked and before they
/// are stored. `today` is the earliest allowed date. A blank image is
/// replaced by `placeholder`.
///
/// # Errors
///
/// Returns [`EventifyError::ValidationError`] listing every rejected field.
pub fn validate_event_draft(
    draft: &EventDraft,
    today: NaiveDate,
    now: DateTime<Utc>,
    placeholder: &str,
) -> Result<Event, EventifyError> {
    let mut errors = Vec::new();

    let name = draft.name.trim();
    let description = draft.description.trim();
    let location = draft.location.trim();
    let image = draft.image.as_deref().map(str::trim).unwrap_or_default();

    check_length(&mut errors, "name", "Name", name, NAME_LENGTH);
    check_length(
        &mut errors,
        "description",
        "Description",
        description,
        DESCRIPTION_LENGTH,
    );
    check_length(&mut errors, "location", "Location", location, LOCATION_LENGTH);

    if draft.category.is_none() {
        errors.push(FieldError::new("category", "Category is required"));
    }

    match draft.date {
        None => errors.push(FieldError::new("date", "Date is required")),
        Some(date) if date < today => errors.push(FieldError::new(
            "date",
            "Date must be today or in the future",
        )),
        Some(_) => {}
    }

    match draft.available_spots {
        None => errors.push(FieldError::new("availableSpots", "Available spots are required")),
        Some(spots) if spots < SPOTS_RANGE.0 => errors.push(FieldError::new(
            "availableSpots",
            format!("Must have at least {} spot", SPOTS_RANGE.0),
        )),
        Some(spots) if spots > SPOTS_RANGE.1 => errors.push(FieldError::new(
            "availableSpots",
            format!("At most {} spots", SPOTS_RANGE.1),
        )),
        Some(_) => {}
    }

    if !image.is_empty() && !IMAGE_URL_RE.is_match(image) {
        errors.push(FieldError::new("image", "Invalid image URL"));
    }

    // all fields were checked above; these only fail alongside a pushed error
    let (Some(category), Some(date), Some(available_spots), true) = (
        draft.category,
        draft.date,
        draft.available_spots,
        errors.is_empty(),
    ) else {
        debug!("Rejected event draft with {} field errors", errors.len());
        return Err(EventifyError::ValidationError(errors));
    };

    Ok(Event {
        id: generate_event_id(now),
        name: name.to_string(),
        description: description.to_string(),
        category,
        date,
        location: location.to_string(),
        available_spots,
        image: if image.is_empty() {
            placeholder.to_string()
        } else {
            image.to_string()
        },
    })
}

/// Validate a registration form and turn it into an attendee.
///
/// # Errors
///
/// Returns [`EventifyError::ValidationError`] listing every rejected field.
pub fn validate_registration_form(form: &RegistrationForm) -> Result<Attendee, EventifyError> {
    let mut errors = Vec::new();

    let name = form.name.trim();
    let email = form.email.trim();
    let phone = form.phone.trim();

    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if name.chars().count() < ATTENDEE_NAME_MIN {
        errors.push(FieldError::new(
            "name",
            format!("Name must be at least {ATTENDEE_NAME_MIN} characters"),
        ));
    }

    if email.is_empty() {
        errors.push(FieldError::new("email", "E-mail is required"));
    } else if !EMAIL_RE.is_match(email) {
        errors.push(FieldError::new("email", "Invalid e-mail"));
    }

    if phone.is_empty() {
        errors.push(FieldError::new("phone", "Phone is required"));
    } else if !PHONE_RE.is_match(phone) {
        errors.push(FieldError::new("phone", "Invalid phone number"));
    }

    if !errors.is_empty() {
        debug!("Rejected registration form with {} field errors", errors.len());
        return Err(EventifyError::ValidationError(errors));
    }

    Ok(Attendee {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    })
}
