//! List presentation over a collection snapshot: search, filters, sort and
//! pagination.

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

use serde::Serialize;
use serde_json::Value;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::model::entity::{Entity, EntityId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    fn admits(self, status: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => status,
            Self::Inactive => !status,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sort {
    /// Backend order.
    #[default]
    Insertion,
    LabelAsc,
    LabelDesc,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery {
    /// Case-insensitive substring of the label.
    pub search: Option<String>,
    pub status: StatusFilter,
    pub parent: Option<EntityId>,
    /// Equality filters on extra fields (`branch_state = 2`).
    pub fields: Vec<(String, Value)>,
    pub sort: Sort,
    /// 1-based; clamped into range.
    pub page: usize,
    pub per_page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: StatusFilter::All,
            parent: None,
            fields: Vec::new(),
            sort: Sort::Insertion,
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One rendered page. `first`/`last` are 1-based row numbers ("Showing 1 to
/// 50 of 120"), both zero when nothing matches.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageView {
    pub items: Vec<Entity>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub first: usize,
    pub last: usize,
}

impl ListQuery {
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        if !self.status.admits(entity.status) {
            return false;
        }
        if let Some(parent) = self.parent
            && entity.parent != Some(parent)
        {
            return false;
        }
        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|needle| !needle.is_empty())
            && !entity.label.to_lowercase().contains(&needle.to_lowercase())
        {
            return false;
        }
        self.fields
            .iter()
            .all(|(field, expected)| entity.extra.get(field).is_some_and(|actual| loosely_equal(actual, expected)))
    }

    #[must_use]
    pub fn apply(&self, entities: &[Entity]) -> PageView {
        let mut matched: Vec<&Entity> = entities.iter().filter(|entity| self.matches(entity)).collect();
        match self.sort {
            Sort::Insertion => {}
            Sort::LabelAsc => matched.sort_by_key(|entity| entity.label.to_lowercase()),
            Sort::LabelDesc => {
                matched.sort_by_key(|entity| entity.label.to_lowercase());
                matched.reverse();
            }
        }

        let per_page = self.per_page.max(1);
        let total = matched.len();
        let total_pages = total.div_ceil(per_page).max(1);
        let page = self.page.clamp(1, total_pages);
        let start = (page - 1) * per_page;
        let items: Vec<Entity> = matched.into_iter().skip(start).take(per_page).cloned().collect();
        let (first, last) = if items.is_empty() { (0, 0) } else { (start + 1, start + items.len()) };

        PageView { items, page, per_page, total, total_pages, first, last }
    }
}

/// `2` matches `"2"`; otherwise plain JSON equality.
fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match (actual, expected) {
        (Value::Number(number), Value::String(text)) | (Value::String(text), Value::Number(number)) => {
            number.to_string() == text.trim()
        }
        _ => false,
    }
}
