use anyhow::Result;
use tracing::info;

use crate::api::PropertyApi;
use crate::models::{DashboardData, Property, PropertyKind};

pub const PAGE_SIZE: usize = 10;

/// The one in-memory copy of the dashboard data and the property list.
/// Views read it; every mutation goes through the methods here.
#[derive(Debug, Default)]
pub struct Store {
    dashboard: DashboardData,
    properties: Vec<Property>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dashboard(&self) -> &DashboardData {
        &self.dashboard
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Full refetch of both the dashboard and the listing set, the same
    /// repopulation every successful submission triggers.
    pub async fn refresh(&mut self, api: &dyn PropertyApi) -> Result<()> {
        self.dashboard = api.fetch_dashboard().await?;
        self.properties = api.fetch_all().await?;
        info!(count = self.properties.len(), "store refreshed");
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.properties.len();
        self.properties.retain(|p| p.id != id);
        self.properties.len() != before
    }

    pub fn replace(&mut self, id: &str, updated: Property) -> bool {
        match self.properties.iter_mut().find(|p| p.id == id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Deletes on the API first; the local copy only drops the entry
    /// once the remote delete succeeded.
    pub async fn delete(&mut self, api: &dyn PropertyApi, id: &str, kind: PropertyKind) -> Result<()> {
        api.delete(id, kind).await?;
        self.remove(id);
        Ok(())
    }
}

/// One page of filtered results.
#[derive(Debug)]
pub struct Page<'a> {
    pub items: Vec<&'a Property>,
    pub page: usize,
    pub total_pages: usize,
}

/// Search/filter/pagination state for the listing view.
///
/// A property matches the query when it is a case-insensitive substring
/// of the kind, city, or list type; the kind filter is exact. Changing
/// either resets to page 1; an out-of-range page request is a no-op.
#[derive(Debug, Clone)]
pub struct ListView {
    search: String,
    filter: Option<PropertyKind>,
    page: usize,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    /// Starts on page 1 with no query and no kind filter.
    pub fn new() -> Self {
        Self { search: String::new(), filter: None, page: 1 }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.page = 1;
    }

    pub fn set_filter(&mut self, kind: Option<PropertyKind>) {
        self.filter = kind;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize, properties: &[Property]) {
        let total = self.total_pages(properties);
        if page >= 1 && page <= total {
            self.page = page;
        }
    }

    fn matches(&self, property: &Property) -> bool {
        let query = self.search.to_lowercase();
        let matches_search = query.is_empty()
            || property
                .property_type
                .display_name()
                .to_lowercase()
                .contains(&query)
            || property
                .city
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&query)
            || property
                .list_type
                .display_name()
                .to_lowercase()
                .contains(&query);
        let matches_kind = self
            .filter
            .map(|kind| property.property_type == kind)
            .unwrap_or(true);
        matches_search && matches_kind
    }

    /// Matching properties in their original relative order.
    pub fn filtered<'a>(&self, properties: &'a [Property]) -> Vec<&'a Property> {
        properties.iter().filter(|p| self.matches(p)).collect()
    }

    pub fn total_pages(&self, properties: &[Property]) -> usize {
        self.filtered(properties).len().div_ceil(PAGE_SIZE)
    }

    /// The current page slice of the filtered set.
    pub fn page_of<'a>(&self, properties: &'a [Property]) -> Page<'a> {
        let filtered = self.filtered(properties);
        let total_pages = filtered.len().div_ceil(PAGE_SIZE);
        let start = self.page.saturating_sub(1) * PAGE_SIZE;
        let items = filtered
            .into_iter()
            .skip(start)
            .take(PAGE_SIZE)
            .collect();
        Page { items, page: self.page, total_pages }
    }
}
