use serde::Serialize;

/// Navigation state for one offset/limit window over a counted list.
///
/// `current_page` is 1-based for display; `page_index` inputs are 0-based.
/// `visible` is the 1-based inclusive row range shown ("Showing X to Y"),
/// `None` when the list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub offset: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
    pub visible: Option<(u64, u64)>,
}

/// Map a requested page index onto navigation state.
///
/// `limit` must be positive; `total = 0` yields zero pages with both
/// navigation flags off no matter which index was requested.
pub fn compute_window(page_index: u64, limit: u64, total: u64) -> PageWindow {
    let total_pages = total.div_ceil(limit);
    let offset = page_index * limit;
    let current_page = page_index + 1;

    let visible = if total == 0 || offset >= total {
        None
    } else {
        Some((offset + 1, (offset + limit).min(total)))
    };

    PageWindow {
        offset,
        current_page,
        total_pages,
        has_next: current_page < total_pages,
        has_prev: total_pages > 0 && current_page > 1,
        visible,
    }
}

impl PageWindow {
    /// Page index for the previous page, or `None` at the lower boundary.
    /// Out-of-range navigation is a silent no-op, not an error.
    pub fn prev_page_index(&self) -> Option<u64> {
        if self.has_prev {
            Some(self.current_page - 2)
        } else {
            None
        }
    }

    /// Page index for the next page, or `None` at the upper boundary.
    pub fn next_page_index(&self) -> Option<u64> {
        if self.has_next {
            Some(self.current_page)
        } else {
            None
        }
    }
}

/// Query-parameter value for a page index. Page 1 is the canonical default
/// and is never encoded, so URLs for the first page stay stable.
pub fn page_query_value(page_index: u64) -> Option<String> {
    if page_index == 0 {
        None
    } else {
        Some((page_index + 1).to_string())
    }
}
