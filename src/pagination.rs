// =============================================================================
// Table pagination
// =============================================================================
//
// Stateless: every request carries its own page index and size and slices a
// freshly fetched, newest-first row list.
// =============================================================================

use serde::Serialize;

use crate::error::DashboardError;
use crate::types::{OhlcvRow, TABLE_COLUMNS};

/// One page of table rows plus the bookkeeping the table widget needs.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub columns: [&'static str; 7],
    pub page_current: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub page_count: usize,
    pub rows: Vec<OhlcvRow>,
}

/// Return `rows[page * size .. (page + 1) * size]`, clipped to the input.
///
/// A page past the end is empty rather than an error. `page_size` must lie in
/// `1..=max_page_size`.
pub fn paginate(
    rows: &[OhlcvRow],
    page_current: usize,
    page_size: usize,
    max_page_size: usize,
) -> Result<Page, DashboardError> {
    if page_size == 0 || page_size > max_page_size {
        return Err(DashboardError::InvalidPageSize {
            size: page_size,
            max: max_page_size,
        });
    }

    let total_rows = rows.len();
    let start = page_current.saturating_mul(page_size).min(total_rows);
    let end = start.saturating_add(page_size).min(total_rows);

    Ok(Page {
        columns: TABLE_COLUMNS,
        page_current,
        page_size,
        total_rows,
        page_count: total_rows.div_ceil(page_size),
        rows: rows[start..end].to_vec(),
    })
}
