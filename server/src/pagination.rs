//! Offset pagination with the classic `current_page`/`last_page` envelope.

use serde::Serialize;

/// Fixed page size for every list endpoint.
pub const PER_PAGE: i64 = 10;

/// One page of results, serialized as the `data` member of a list response.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub current_page: i64,
    pub data: Vec<T>,
    pub last_page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, current_page: i64, total: i64) -> Self {
        Self {
            current_page,
            data,
            last_page: last_page(total),
            per_page: PER_PAGE,
            total,
        }
    }
}

/// Parse a raw `?page=` value; anything unusable becomes page 1.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|p| p.parse::<i64>().ok()).unwrap_or(1).max(1)
}

/// Saturates so absurd page numbers land on an empty page instead of
/// overflowing.
pub fn offset(page: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(PER_PAGE)
}

/// At least 1 even when there are no rows, so an empty listing still reads
/// as "page 1 of 1".
fn last_page(total: i64) -> i64 {
    ((total + PER_PAGE - 1) / PER_PAGE).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_page_clamps_bad_input() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("7")), 7);
    }

    #[test]
    fn offsets_step_by_page_size() {
        assert_eq!(offset(1), 0);
        assert_eq!(offset(2), 10);
        assert_eq!(offset(4), 30);
    }

    #[test]
    fn offset_saturates_instead_of_overflowing() {
        assert_eq!(offset(i64::MAX), i64::MAX);
        assert_eq!(offset(i64::MAX / PER_PAGE), (i64::MAX / PER_PAGE - 1) * PER_PAGE);
    }

    #[test]
    fn last_page_rounds_up_and_never_drops_below_one() {
        assert_eq!(Page::<()>::new(vec![], 1, 0).last_page, 1);
        assert_eq!(Page::<()>::new(vec![], 1, 10).last_page, 1);
        assert_eq!(Page::<()>::new(vec![], 1, 11).last_page, 2);
        assert_eq!(Page::<()>::new(vec![], 1, 25).last_page, 3);
    }
}
