//! Pagination controllers for list pages
//!
//! Two strategies exist side by side. [`ServerWindow`] asks the backend for
//! one window at a time; [`ClientSlice`] fetches the full set once and slices
//! it in memory. Both reset to the first page when the window size or the
//! filter term changes.

/// Server-windowed pagination: `{pageSize, offset}` is sent to the backend
/// and exactly what comes back is displayed.
///
/// The backend returns no authoritative total, so "more pages" is a
/// best-effort signal: true exactly when the last window came back full.
#[derive(Debug, Clone)]
pub struct ServerWindow {
    page: usize,
    page_size: usize,
    filter: String,
    more_likely: bool,
}

impl ServerWindow {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size,
            filter: String::new(),
            more_likely: false,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The offset to request for the current page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    /// Record how many rows the backend returned for the current window.
    pub fn record_rows(&mut self, returned: usize) {
        self.more_likely = returned == self.page_size;
    }

    pub fn more_pages_likely(&self) -> bool {
        self.more_likely
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.filter = term.into();
        self.page = 1;
    }
}

/// Client-sliced pagination: the full set is fetched once, filtered and
/// sliced in memory.
pub struct ClientSlice<T> {
    items: Vec<T>,
    filtered: Vec<T>,
    matcher: Box<dyn Fn(&T, &str) -> bool + Send + Sync>,
    filter: String,
    page: usize,
    page_size: usize,
}

impl<T: Clone> ClientSlice<T> {
    pub fn new(
        items: Vec<T>,
        page_size: usize,
        matcher: impl Fn(&T, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        let filtered = items.clone();
        Self {
            items,
            filtered,
            matcher: Box::new(matcher),
            filter: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size)
    }

    /// The rows visible on the current page.
    pub fn page_items(&self) -> &[T] {
        let start = ((self.page - 1) * self.page_size).min(self.filtered.len());
        let end = (start + self.page_size).min(self.filtered.len());
        &self.filtered[start..end]
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Recompute the filtered set and reset to the first page.
    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.filter = term.into();
        self.filtered = if self.filter.is_empty() {
            self.items.clone()
        } else {
            self.items
                .iter()
                .filter(|item| (self.matcher)(item, &self.filter))
                .cloned()
                .collect()
        };
        self.page = 1;
    }

    /// Replace the underlying set, reapplying the current filter.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        let filter = std::mem::take(&mut self.filter);
        self.set_filter(filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_window_signals_more_pages() {
        let mut window = ServerWindow::new(10);
        window.record_rows(10);
        assert!(window.more_pages_likely());

        window.record_rows(7);
        assert!(!window.more_pages_likely());
    }

    #[test]
    fn offset_follows_page() {
        let mut window = ServerWindow::new(25);
        assert_eq!(window.offset(), 0);
        window.next_page();
        assert_eq!(window.offset(), 25);
        window.next_page();
        assert_eq!(window.offset(), 50);
        window.prev_page();
        assert_eq!(window.offset(), 25);
    }

    #[test]
    fn page_size_change_resets_to_first_page() {
        let mut window = ServerWindow::new(10);
        window.set_page(4);
        window.set_page_size(50);
        assert_eq!(window.page(), 1);
        assert_eq!(window.page_size(), 50);
    }

    #[test]
    fn filter_change_resets_to_first_page() {
        let mut window = ServerWindow::new(10);
        window.set_page(3);
        window.set_filter("person");
        assert_eq!(window.page(), 1);
        assert_eq!(window.filter(), "person");
    }

    fn sliced() -> ClientSlice<String> {
        let items: Vec<String> = (1..=23).map(|i| format!("row-{i}")).collect();
        ClientSlice::new(items, 10, |item, term| item.contains(term))
    }

    #[test]
    fn slices_by_page() {
        let mut slice = sliced();
        assert_eq!(slice.total_pages(), 3);
        assert_eq!(slice.page_items().len(), 10);

        slice.set_page(3);
        assert_eq!(slice.page_items().len(), 3);
        assert_eq!(slice.page_items()[0], "row-21");
    }

    #[test]
    fn filtering_recomputes_and_resets_page() {
        let mut slice = sliced();
        slice.set_page(2);
        slice.set_filter("row-1");

        // row-1 and row-10..row-19
        assert_eq!(slice.page(), 1);
        assert_eq!(slice.filtered_count(), 11);
        assert!(slice.filtered_count() <= slice.total_count());
    }

    #[test]
    fn clearing_the_filter_restores_everything() {
        let mut slice = sliced();
        slice.set_filter("row-2");
        slice.set_filter("");
        assert_eq!(slice.filtered_count(), slice.total_count());
    }

    #[test]
    fn empty_set_has_zero_pages() {
        let slice: ClientSlice<String> = ClientSlice::new(Vec::new(), 10, |_, _| true);
        assert_eq!(slice.total_pages(), 0);
        assert!(slice.page_items().is_empty());
    }

    #[test]
    fn set_page_clamps_to_range() {
        let mut slice = sliced();
        slice.set_page(99);
        assert_eq!(slice.page(), 3);
        slice.set_page(0);
        assert_eq!(slice.page(), 1);
    }
}
