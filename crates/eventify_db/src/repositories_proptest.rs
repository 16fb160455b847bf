#[cfg(test)]
mod tests {
    use crate::repositories::{EventRepository, FavoritesRepository};
    use crate::seed::SEED_COUNT;
    use crate::store::{MemoryStore, StoreHandle};
    use chrono::NaiveDate;
    use eventify_common::{Event, EventCategory};
    use eventify_config::ConcurrencyMode;
    use proptest::prelude::*;
    use std::sync::Arc;

    // Helper function to build an event with the given id
    fn make_event(id: &str, category_index: usize, day: u32) -> Event {
        Event {
            id: id.to_string(),
            name: format!("Generated {id}"),
            description: "Generated for property testing".to_string(),
            category: EventCategory::ALL[category_index % EventCategory::ALL.len()],
            date: NaiveDate::from_ymd_opt(2030, 1, day.clamp(1, 28)).unwrap(),
            location: "Test venue".to_string(),
            available_spots: 5,
            image: "/placeholder.svg?height=300&width=400".to_string(),
        }
    }

    fn fresh_store() -> StoreHandle {
        Arc::new(MemoryStore::new())
    }

    proptest! {
        // Adds accumulate on top of the seed, and every added id is found
        #[test]
        fn test_adds_accumulate_on_seed(
            ids in proptest::collection::hash_set("[a-z]{1,6}_new", 0..12),
            category in 0..5usize,
        ) {
            let repo = EventRepository::new(fresh_store(), "events", ConcurrencyMode::Optimistic);
            for id in &ids {
                repo.add(make_event(id, category, 1)).unwrap();
            }

            prop_assert_eq!(repo.get_all().unwrap().len(), ids.len() + SEED_COUNT);
            for id in &ids {
                prop_assert!(repo.get_by_id(id).unwrap().is_some());
            }
        }

        // Delete followed by lookup never finds the id, added or not
        #[test]
        fn test_delete_then_lookup_is_absent(
            id in "[0-9a-z]{1,4}",
            add_first in any::<bool>(),
        ) {
            let repo = EventRepository::new(fresh_store(), "events", ConcurrencyMode::Optimistic);
            if add_first {
                repo.add(make_event(&id, 0, 3)).unwrap();
            }
            repo.delete(&id).unwrap();

            prop_assert!(repo.get_by_id(&id).unwrap().is_none());
        }

        // Update with an existing id replaces exactly one entry
        #[test]
        fn test_update_keeps_length(id in "[a-z]{3}", spots in 0..10_000u32) {
            let repo = EventRepository::new(fresh_store(), "events", ConcurrencyMode::Optimistic);
            repo.add(make_event(&id, 1, 2)).unwrap();
            let before = repo.get_all().unwrap().len();

            let mut changed = make_event(&id, 1, 2);
            changed.available_spots = spots;
            prop_assert!(repo.update(changed).unwrap());

            let after = repo.get_all().unwrap();
            prop_assert_eq!(after.len(), before);
            prop_assert_eq!(after.iter().filter(|e| e.available_spots == spots && e.id == id).count(), 1);
        }

        // Toggling twice always returns true then false and leaves no favorite
        #[test]
        fn test_toggle_pairs_cancel_out(
            id in "[0-9]{1,3}",
            others in proptest::collection::vec("[a-z]{2}", 0..5),
        ) {
            let repo = FavoritesRepository::new(fresh_store(), "favorites", ConcurrencyMode::Optimistic);
            for other in &others {
                repo.toggle(other).unwrap();
            }
            let before = repo.get_all().unwrap();

            prop_assert!(repo.toggle(&id).unwrap());
            prop_assert!(!repo.toggle(&id).unwrap());
            prop_assert!(!repo.is_favorite(&id).unwrap());
            prop_assert_eq!(repo.get_all().unwrap(), before);
        }
    }
}
