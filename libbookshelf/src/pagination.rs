//! Client-side pagination over the full result list

/// Default number of books per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 1-based page cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Pagination {
    /// A page size of zero is treated as one
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Back to page 1
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Move forward unless already on the last page
    pub fn next(&mut self, total: usize) {
        if self.page < self.total_pages(total) {
            self.page += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Pull the cursor back onto the last page if the list shrank
    pub fn clamp(&mut self, total: usize) {
        self.page = self.page.min(self.total_pages(total)).max(1);
    }

    fn start(&self, total: usize) -> usize {
        let last_page = self.total_pages(total).max(1);
        (self.page.min(last_page) - 1) * self.page_size
    }

    /// The items shown on the current page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.start(items.len()).min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    /// Index into the full list of the first item on this page
    pub fn offset(&self, total: usize) -> usize {
        self.start(total)
    }

    /// "Showing a-b of n results", or `None` when there is nothing to show
    pub fn summary(&self, total: usize) -> Option<String> {
        if total == 0 {
            return None;
        }
        let start = self.start(total);
        let end = (start + self.page_size).min(total);
        Some(format!("Showing {}-{} of {} results", start + 1, end, total))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let pages = Pagination::default();
        assert_eq!(pages.total_pages(0), 0);
        assert_eq!(pages.total_pages(10), 1);
        assert_eq!(pages.total_pages(11), 2);
    }

    #[test]
    fn test_slice_and_summary() {
        let items: Vec<usize> = (0..23).collect();
        let mut pages = Pagination::default();

        assert_eq!(pages.slice(&items), &items[0..10]);
        assert_eq!(pages.summary(items.len()).unwrap(), "Showing 1-10 of 23 results");

        pages.next(items.len());
        pages.next(items.len());
        assert_eq!(pages.page(), 3);
        assert_eq!(pages.slice(&items), &items[20..23]);
        assert_eq!(pages.summary(items.len()).unwrap(), "Showing 21-23 of 23 results");

        pages.next(items.len());
        assert_eq!(pages.page(), 3);
    }

    #[test]
    fn test_prev_stops_at_first_page() {
        let mut pages = Pagination::default();
        pages.prev();
        assert_eq!(pages.page(), 1);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut pages = Pagination::new(5);
        pages.next(20);
        pages.next(20);
        pages.next(20);
        assert_eq!(pages.page(), 4);

        pages.clamp(7);
        assert_eq!(pages.page(), 2);

        pages.clamp(0);
        assert_eq!(pages.page(), 1);
    }

    #[test]
    fn test_empty_list() {
        let pages = Pagination::default();
        let items: Vec<u8> = Vec::new();
        assert!(pages.slice(&items).is_empty());
        assert!(pages.summary(0).is_none());
    }

    #[test]
    fn test_zero_page_size_is_one() {
        assert_eq!(Pagination::new(0).page_size(), 1);
    }
}
