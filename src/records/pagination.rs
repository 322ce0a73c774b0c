//! Page window over the filtered record list

/// Rows per page unless the caller picks another size
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered for selection
pub const PAGE_SIZE_CHOICES: [usize; 3] = [10, 25, 50];

/// One-based page cursor over a list whose length the caller supplies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `item_count` items, at least 1
    pub fn page_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.page_size).max(1)
    }

    /// Jump to a page, clamped into the valid range
    pub fn set_page(&mut self, page: usize, item_count: usize) {
        self.page = page.clamp(1, self.page_count(item_count));
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self, item_count: usize) -> bool {
        self.page < self.page_count(item_count)
    }

    pub fn prev_page(&mut self) {
        if self.can_prev() {
            self.page -= 1;
        }
    }

    pub fn next_page(&mut self, item_count: usize) {
        if self.can_next(item_count) {
            self.page += 1;
        }
    }

    /// Change the page size and return to the first page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Pull the current page back into range after the list shrank
    pub fn clamp(&mut self, item_count: usize) {
        self.page = self.page.min(self.page_count(item_count));
    }

    /// Move back one page when the page's only row is about to go away,
    /// so the view never lands on an empty page
    pub fn step_back_if_page_emptied(&mut self, visible_on_page: usize) {
        if visible_on_page == 1 && self.page > 1 {
            self.page -= 1;
        }
    }

    /// The current page's window of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.page - 1) * self.page_size;
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}
