//! Table state holders: pagination and row selection.

use std::ops::Range;

use indexmap::IndexMap;

use crate::constants::{DEFAULT_PAGE_SIZE, PAGE_SIZES};

/// Page size and current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_size: usize,
    pub page_index: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page_index: 0,
        }
    }

    /// Number of pages for `total` rows. An empty table still has one page.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Row indices visible on the current page.
    pub fn page_range(&self, total: usize) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    /// Pull the page index back inside the table after it shrank.
    pub fn clamp(&mut self, total: usize) {
        self.page_index = self.page_index.min(self.page_count(total) - 1);
    }

    /// Returns `true` if the page changed.
    pub fn next_page(&mut self, total: usize) -> bool {
        if self.page_index + 1 < self.page_count(total) {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Returns `true` if the page changed.
    pub fn prev_page(&mut self) -> bool {
        if self.page_index > 0 {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn first_page(&mut self) {
        self.page_index = 0;
    }

    pub fn last_page(&mut self, total: usize) {
        self.page_index = self.page_count(total) - 1;
    }

    /// Step to the next size in [`PAGE_SIZES`] and go back to the first page.
    /// A size not in the list moves to the smallest one.
    pub fn cycle_page_size(&mut self) {
        let next = PAGE_SIZES
            .iter()
            .position(|&s| s == self.page_size)
            .map(|i| (i + 1) % PAGE_SIZES.len())
            .unwrap_or(0);
        self.page_size = PAGE_SIZES[next];
        self.page_index = 0;
    }
}

/// Alert id → selected, in the order rows were first touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    rows: IndexMap<String, bool>,
}

impl RowSelection {
    pub fn is_selected(&self, id: &str) -> bool {
        self.rows.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: &str, selected: bool) {
        if selected {
            self.rows.insert(id.to_string(), true);
        } else {
            // Deselected rows leave the map, keeping the order of the rest
            self.rows.shift_remove(id);
        }
    }

    pub fn toggle(&mut self, id: &str) {
        let selected = self.is_selected(id);
        self.set(id, !selected);
    }

    /// Select every id if any of them is unselected, otherwise deselect all.
    pub fn toggle_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str> + Clone) {
        let all_selected = ids.clone().into_iter().all(|id| self.is_selected(id));
        for id in ids {
            self.set(id, !all_selected);
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Ids currently selected, in insertion order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        !self.rows.values().any(|s| *s)
    }
}
