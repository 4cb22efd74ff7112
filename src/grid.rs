//! Paginated content grid.
//!
//! The grid only tracks the current page. Resetting it when the underlying
//! collection changes is the caller's job.

/// Cards per page (4 columns x 3 rows)
pub const PAGE_SIZE: usize = 12;

pub const EMPTY_MESSAGE: &str = "No content found. Add some content to get started!";

/// Current page over an ordered collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}

/// What the grid shows for the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridView<'a, T> {
    /// Empty collection: show the empty-state message, no controls
    Empty,
    Page(GridPage<'a, T>),
}

/// One page of items plus metadata for the controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPage<'a, T> {
    pub items: &'a [T],
    /// 1-based
    pub page: usize,
    pub page_count: usize,
}

impl<T> GridPage<'_, T> {
    /// Controls are only drawn for more than one page
    pub fn show_controls(&self) -> bool {
        self.page_count > 1
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

/// ceil(len / page_size)
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

impl Paginator {
    pub fn new() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    /// Start on a given page (clamped on the next navigation or view)
    pub fn at_page(mut self, page: usize) -> Self {
        self.current_page = page.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Move forward, clamped to the last page
    pub fn next(&mut self, len: usize) -> usize {
        let last = page_count(len, self.page_size).max(1);
        self.current_page = (self.current_page + 1).min(last);
        self.current_page
    }

    /// Move back, clamped to page 1
    pub fn previous(&mut self) -> usize {
        self.current_page = self.current_page.saturating_sub(1).max(1);
        self.current_page
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Slice out the current page
    pub fn view<'a, T>(&self, items: &'a [T]) -> GridView<'a, T> {
        if items.is_empty() {
            return GridView::Empty;
        }

        let page_count = page_count(items.len(), self.page_size);
        let page = self.current_page.clamp(1, page_count);
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());

        GridView::Page(GridPage {
            items: &items[start..end],
            page,
            page_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, PAGE_SIZE), 0);
        assert_eq!(page_count(1, PAGE_SIZE), 1);
        assert_eq!(page_count(12, PAGE_SIZE), 1);
        assert_eq!(page_count(13, PAGE_SIZE), 2);
        assert_eq!(page_count(25, PAGE_SIZE), 3);
    }

    #[test]
    fn test_empty_collection() {
        let items: Vec<u32> = Vec::new();
        let mut paginator = Paginator::new();
        assert_eq!(paginator.view(&items), GridView::Empty);

        // Navigation on an empty grid stays on page 1
        assert_eq!(paginator.next(items.len()), 1);
        assert_eq!(paginator.previous(), 1);
    }

    #[test]
    fn test_navigation_clamps() {
        let items: Vec<u32> = (0..25).collect();
        let mut paginator = Paginator::new();

        assert_eq!(paginator.previous(), 1);
        assert_eq!(paginator.next(items.len()), 2);
        assert_eq!(paginator.next(items.len()), 3);
        assert_eq!(paginator.next(items.len()), 3);

        let GridView::Page(page) = paginator.view(&items) else {
            panic!("expected a page");
        };
        assert_eq!(page.items, &[24]);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_count, 3);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_first_page_slice() {
        let items: Vec<u32> = (0..13).collect();
        let GridView::Page(page) = Paginator::new().view(&items) else {
            panic!("expected a page");
        };
        assert_eq!(page.items.len(), 12);
        assert_eq!(page.items[0], 0);
        assert!(page.show_controls());
    }

    #[test]
    fn test_single_page_hides_controls() {
        let items = [1, 2, 3];
        let GridView::Page(page) = Paginator::new().view(&items) else {
            panic!("expected a page");
        };
        assert!(!page.show_controls());
    }

    #[test]
    fn test_out_of_range_page_is_clamped_in_view() {
        let items: Vec<u32> = (0..5).collect();
        let GridView::Page(page) = Paginator::new().at_page(9).view(&items) else {
            panic!("expected a page");
        };
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 5);
    }
}
