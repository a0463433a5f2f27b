//! Page/offset arithmetic shared by the paginated listings.

use serde::{Deserialize, Serialize};

/// Window into a result set: records to skip and total page count.
///
/// Pages are 1-indexed; `offset` is the zero-indexed count of records before
/// the page's first record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub offset: usize,
    pub page_count: usize,
}

/// Compute the window for `page` over `total_count` records.
///
/// `page` values below 1 fall back to 1 (missing or non-numeric page input
/// at the boundary arrives here as 0). A `page_size` of 0 is a caller bug
/// and is normalized to 1 rather than dividing by zero. The offset is
/// clamped so it never exceeds `total_count`.
pub fn paginate(total_count: usize, page_size: usize, page: usize) -> PageWindow {
    let page_size = page_size.max(1);
    let page = page.max(1);

    PageWindow {
        offset: page_size.saturating_mul(page - 1).min(total_count),
        page_count: total_count.div_ceil(page_size),
    }
}
