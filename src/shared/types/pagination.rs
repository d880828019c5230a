/// Listings shown per results page.
pub const PAGE_SIZE: u32 = 25;

/// Normalizes a raw `page` query value: absent, non-numeric or
/// non-positive values fall back to the first page.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// Paginated response wrapper
#[derive(Debug)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

/// Row offset of the first item on `page` (1-based).
pub fn page_offset(page: u32, limit: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page: PaginatedResult<i32> = PaginatedResult::new(vec![], 30, 1, PAGE_SIZE);
        assert_eq!(page.total_pages, 2);

        let page: PaginatedResult<i32> = PaginatedResult::new(vec![], 25, 1, PAGE_SIZE);
        assert_eq!(page.total_pages, 1);

        let page: PaginatedResult<i32> = PaginatedResult::new(vec![], 0, 1, PAGE_SIZE);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn invalid_pages_fall_back_to_first() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("3")), 3);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(page_offset(1, PAGE_SIZE), 0);
        assert_eq!(page_offset(2, PAGE_SIZE), 25);
    }
}
