use std::ops::Range;

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Number of consecutive page links shown around the current page.
const PAGE_WINDOW: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("items per page must be greater than zero")]
    ZeroPageSize,
}

/// Number of pages needed for `total_items`; zero for an empty collection.
pub fn total_pages(total_items: usize, items_per_page: usize) -> usize {
    total_items.div_ceil(items_per_page)
}

/// Page links to render: first, last and a window around `current_page`.
/// `None` marks a collapsed gap.
fn get_pages(total_pages: usize, current_page: usize, window: usize) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let current_page = current_page.clamp(1, last_page);
    let span = window.max(1) - 1;

    let mid_end = (current_page.saturating_sub(span / 2).max(1) + span).min(last_page);
    let mid_start = mid_end.saturating_sub(span).max(1);

    let mut pages = Vec::new();

    if mid_start > 1 {
        pages.push(Some(1));
    }
    if mid_start > 2 {
        pages.push(None);
    }
    pages.extend((mid_start..=mid_end).map(Some));
    if mid_end + 1 < last_page {
        pages.push(None);
    }
    if mid_end < last_page {
        pages.push(Some(last_page));
    }

    pages
}

/// Current page and page size of a list view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    items_per_page: usize,
}

impl PageState {
    pub fn new(items_per_page: usize) -> Result<Self, PaginationError> {
        if items_per_page == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self {
            current_page: 1,
            items_per_page,
        })
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_pages(total_items, self.items_per_page)
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Keeps the current page inside `[1, max(1, total_pages)]`.
    pub fn clamp(&mut self, total_items: usize) {
        let last = self.total_pages(total_items).max(1);
        self.current_page = self.current_page.clamp(1, last);
    }

    /// Moves to `page` when it exists. Returns whether the page changed.
    pub fn set_page(&mut self, page: usize, total_items: usize) -> bool {
        if page < 1 || page > self.total_pages(total_items) {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Index range of the current page within a collection of `total_items`.
    pub fn window(&self, total_items: usize) -> Range<usize> {
        let start = ((self.current_page - 1) * self.items_per_page).min(total_items);
        let end = (start + self.items_per_page).min(total_items);
        start..end
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        let pages = get_pages(total_pages, current_page, PAGE_WINDOW);

        Self {
            items,
            pages,
            page: current_page,
            total_pages,
        }
    }
}
