//! Pagination of in-memory lists
//!
//! Page numbers are 1-indexed. Requested pages outside `[1, total_pages]` are
//! clamped and the clamped value is written back into the caller's state.

use serde::{Deserialize, Serialize};

/// Pagination settings for one list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub items_per_page: usize,
    pub max_visible_pages: usize,
    pub show_first_last: bool,
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            items_per_page: 12,
            max_visible_pages: 5,
            show_first_last: true,
            page_size_options: vec![6, 12, 24, 48],
        }
    }
}

/// Per-list state kept in the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub current_page: usize,
    pub items_per_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: 12,
        }
    }
}

impl PageState {
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page;
    }

    /// Change page size; always returns to the first page
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.current_page = 1;
    }
}

/// One page of a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items_per_page: usize,
}

impl<T> Page<'_, T> {
    /// 1-indexed inclusive range of items shown, for "Showing X-Y of Z"
    ///
    /// Returns `(0, 0)` for an empty list.
    pub fn item_range(&self) -> (usize, usize) {
        if self.total_items == 0 {
            return (0, 0);
        }
        let start = (self.current_page - 1) * self.items_per_page + 1;
        let end = (self.current_page * self.items_per_page).min(self.total_items);
        (start, end)
    }
}

/// Number of pages for `total_items`; an empty list still has one page
pub fn total_pages(total_items: usize, items_per_page: usize) -> usize {
    let per_page = items_per_page.max(1);
    total_items.div_ceil(per_page).max(1)
}

/// Slice out the current page, clamping the page number in `state`
pub fn paginate<'a, T>(items: &'a [T], state: &mut PageState) -> Page<'a, T> {
    let per_page = state.items_per_page.max(1);
    let total_pages = total_pages(items.len(), per_page);
    let current_page = state.current_page.max(1).min(total_pages);
    state.current_page = current_page;

    let start = ((current_page - 1) * per_page).min(items.len());
    let end = (start + per_page).min(items.len());

    Page {
        items: &items[start..end],
        current_page,
        total_pages,
        total_items: items.len(),
        items_per_page: per_page,
    }
}

/// One control in the pagination bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageButton {
    Prev(usize),
    Page { number: usize, current: bool },
    Ellipsis,
    Next(usize),
}

/// Controls to render for `current` of `total` pages
pub fn page_buttons(current: usize, total: usize, config: &PaginationConfig) -> Vec<PageButton> {
    let mut buttons = Vec::new();
    if total <= 1 {
        return buttons;
    }
    let current = current.clamp(1, total);

    let max_visible = config.max_visible_pages.max(1);
    let half = max_visible / 2;
    let mut start = current.saturating_sub(half).max(1);
    let end = total.min(start + max_visible - 1);
    // Near the end the window is short; slide it left
    if end - start < max_visible - 1 {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }

    if current > 1 {
        buttons.push(PageButton::Prev(current - 1));
    }

    if config.show_first_last && start > 1 {
        buttons.push(PageButton::Page {
            number: 1,
            current: false,
        });
        if start > 2 {
            buttons.push(PageButton::Ellipsis);
        }
    }

    for number in start..=end {
        buttons.push(PageButton::Page {
            number,
            current: number == current,
        });
    }

    if config.show_first_last && end < total {
        if end < total - 1 {
            buttons.push(PageButton::Ellipsis);
        }
        buttons.push(PageButton::Page {
            number: total,
            current: false,
        });
    }

    if current < total {
        buttons.push(PageButton::Next(current + 1));
    }

    buttons
}
