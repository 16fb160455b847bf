//! The catalog query engine
//!
//! A pure pipeline over a slice of events: category filter, then search,
//! then sort. Pagination is a separate step so callers can page any
//! filtered list.

use crate::collation::collate;
use eventify_common::{Event, EventCategory};
use eventify_config::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which categories a query keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(EventCategory),
}

impl CategoryFilter {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => event.category == *category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = eventify_common::UnknownCategory;

    /// `"all"` selects every category; anything else must be a category slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(category) => write!(f, "{category}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Ascending calendar date
    #[default]
    Date,
    /// Ascending name, locale-style
    Name,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortBy::Date),
            "name" => Ok(SortBy::Name),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Filter and sort settings for the catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogQuery {
    pub category: CategoryFilter,
    pub search_term: String,
    pub sort_by: SortBy,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

fn matches_search(event: &Event, needle: &str) -> bool {
    event.name.to_lowercase().contains(needle)
        || event.description.to_lowercase().contains(needle)
        || event.location.to_lowercase().contains(needle)
}

/// Apply `query` to `events`, returning a new list.
///
/// The input is never modified. Sorting is stable, so events that compare
/// equal keep their storage order.
pub fn apply_query(events: &[Event], query: &CatalogQuery) -> Vec<Event> {
    let needle = query.search_term.trim().to_lowercase();

    let mut filtered: Vec<Event> = events
        .iter()
        .filter(|event| query.category.matches(event))
        .filter(|event| needle.is_empty() || matches_search(event, &needle))
        .cloned()
        .collect();

    match query.sort_by {
        SortBy::Date => filtered.sort_by_key(|event| event.date),
        SortBy::Name => filtered.sort_by(|a, b| collate(&a.name, &b.name)),
    }

    debug!(
        "Query {} / '{}' / {:?} kept {} of {} events",
        query.category,
        needle,
        query.sort_by,
        filtered.len(),
        events.len()
    );
    filtered
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Number of pages needed for `total_items`; zero items need zero pages.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Slice out page `page` (1-based) of `items`.
///
/// Page 0 is read as page 1. A page past the end is empty. A page size of
/// 0 falls back to the default size.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    let start = (page - 1).saturating_mul(page_size);
    let page_items = if start >= items.len() {
        Vec::new()
    } else {
        let end = start.saturating_add(page_size).min(items.len());
        items[start..end].to_vec()
    };

    Page {
        items: page_items,
        page,
        page_size,
        total_items: items.len(),
        total_pages: total_pages(items.len(), page_size),
    }
}

/// Browsing state for the catalog view: the current query and page.
///
/// Any change to the query sends the user back to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    query: CatalogQuery,
    page: usize,
    page_size: usize,
}

impl Pager {
    /// A page size of 0 falls back to the default size, as in [`paginate`].
    pub fn new(page_size: usize) -> Self {
        Self {
            query: CatalogQuery::default(),
            page: 1,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.query.category = category;
        self.page = 1;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.query.search_term = term.into();
        self.page = 1;
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.query.sort_by = sort_by;
        self.page = 1;
    }

    /// Jump to `page`, clamped to `1..=total_pages` (or 1 if there are none).
    pub fn go_to(&mut self, page: usize, total_items: usize) {
        let last = total_pages(total_items, self.page_size).max(1);
        self.page = page.clamp(1, last);
    }

    pub fn next(&mut self, total_items: usize) {
        self.go_to(self.page.saturating_add(1), total_items);
    }

    pub fn previous(&mut self, total_items: usize) {
        self.go_to(self.page.saturating_sub(1), total_items);
    }

    /// Run the query over `events` and return the current page.
    pub fn current(&self, events: &[Event]) -> Page<Event> {
        paginate(&apply_query(events, &self.query), self.page, self.page_size)
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
