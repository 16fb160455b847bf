#[cfg(test)]
mod tests {
    use crate::query::{apply_query, paginate, CatalogQuery, CategoryFilter, SortBy};
    use chrono::NaiveDate;
    use eventify_common::{Event, EventCategory};
    use proptest::prelude::*;

    // Strategy producing a small event with a random name, category and date
    fn event_strategy() -> impl Strategy<Value = Event> {
        (
            "[a-zA-Z ]{1,12}",
            0..EventCategory::ALL.len(),
            1..=28u32,
            0..500u32,
        )
            .prop_map(|(name, category, day, spots)| Event {
                id: format!("{name}-{day}"),
                name,
                description: "Generated for property testing".to_string(),
                category: EventCategory::ALL[category],
                date: NaiveDate::from_ymd_opt(2031, 2, day).unwrap(),
                location: "Generated venue".to_string(),
                available_spots: spots,
                image: String::new(),
            })
    }

    fn query_strategy() -> impl Strategy<Value = CatalogQuery> {
        (
            prop_oneof![
                Just(CategoryFilter::All),
                (0..EventCategory::ALL.len())
                    .prop_map(|i| CategoryFilter::Only(EventCategory::ALL[i])),
            ],
            "[a-z ]{0,3}",
            any::<bool>(),
        )
            .prop_map(|(category, search_term, by_name)| CatalogQuery {
                category,
                search_term,
                sort_by: if by_name { SortBy::Name } else { SortBy::Date },
            })
    }

    proptest! {
        // The same input always produces the same output
        #[test]
        fn test_query_is_deterministic(
            events in proptest::collection::vec(event_strategy(), 0..30),
            query in query_strategy(),
        ) {
            prop_assert_eq!(apply_query(&events, &query), apply_query(&events, &query));
        }

        // Results are a subset of the input that all satisfy the category filter
        #[test]
        fn test_results_respect_filter(
            events in proptest::collection::vec(event_strategy(), 0..30),
            query in query_strategy(),
        ) {
            let result = apply_query(&events, &query);
            prop_assert!(result.len() <= events.len());
            for event in &result {
                prop_assert!(query.category.matches(event));
                prop_assert!(events.contains(event));
            }
        }

        // Date sort is ascending
        #[test]
        fn test_date_sort_is_ascending(events in proptest::collection::vec(event_strategy(), 0..30)) {
            let result = apply_query(&events, &CatalogQuery::default());
            prop_assert_eq!(result.len(), events.len());
            for pair in result.windows(2) {
                prop_assert!(pair[0].date <= pair[1].date);
            }
        }

        // Concatenating every page gives back the whole list
        #[test]
        fn test_pages_cover_the_list(
            events in proptest::collection::vec(event_strategy(), 0..40),
            page_size in 1..10usize,
        ) {
            let total = paginate(&events, 1, page_size).total_pages;
            let mut joined = Vec::new();
            for page in 1..=total {
                let slice = paginate(&events, page, page_size);
                prop_assert!(slice.items.len() <= page_size);
                joined.extend(slice.items);
            }
            prop_assert_eq!(joined, events);
        }
    }
}
