//! Offset pagination over a fixed page size.
//!
//! `has_more` is derived from the exact total returned by count-capable
//! queries, not from whether the last page came back full; an exact
//! multiple of the page size therefore never costs an extra empty fetch.

/// Rows per page everywhere recipes are listed.
pub const PAGE_SIZE: u64 = 12;

/// Offset of a 1-based page number.
pub fn page_offset(page: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * PAGE_SIZE
}

/// Number of pages needed for `total` rows.
pub fn page_count(total: u64) -> u32 {
    total.div_ceil(PAGE_SIZE) as u32
}

/// An accumulating result list with load-more semantics: appending
/// grows the in-memory list, while a filter or category change replaces
/// it and resets to page 1.
#[derive(Debug)]
pub struct Feed<T> {
    items: Vec<T>,
    page: u32,
    total: u64,
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Feed<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            total: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Exact total reported by the last load.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Last loaded page, 0 before the first load.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Whether another page exists: loaded-so-far strictly below the
    /// exact total.
    pub fn has_more(&self) -> bool {
        (self.items.len() as u64) < self.total
    }

    /// The page a load-more should request next.
    pub fn next_page(&self) -> u32 {
        self.page + 1
    }

    /// Replace the list with page 1 of a fresh query.
    pub fn replace(&mut self, items: Vec<T>, total: u64) {
        self.items = items;
        self.page = 1;
        self.total = total;
    }

    /// Append a further page to the list.
    pub fn append(&mut self, items: Vec<T>, total: u64) {
        self.items.extend(items);
        self.page += 1;
        self.total = total;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.page = 0;
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(2), 12);
        assert_eq!(page_offset(0), 0);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(12), 1);
        assert_eq!(page_count(13), 2);
    }

    #[test]
    fn test_has_more_uses_exact_total() {
        let mut feed = Feed::new();
        feed.replace((0..12).collect(), 24);
        assert!(feed.has_more());

        // A full page that exhausts the total is the end; no extra
        // empty fetch is needed to discover it.
        feed.append((0..12).collect(), 24);
        assert!(!feed.has_more());
        assert_eq!(feed.page(), 2);
    }

    #[test]
    fn test_short_page_is_the_end() {
        let mut feed = Feed::new();
        feed.replace((0..5).collect(), 5);
        assert!(!feed.has_more());
    }

    #[test]
    fn test_replace_resets_load_more_state() {
        let mut feed = Feed::new();
        feed.replace((0..12).collect(), 30);
        feed.append((0..12).collect(), 30);
        assert_eq!(feed.items().len(), 24);

        feed.replace((0..3).collect(), 3);
        assert_eq!(feed.items().len(), 3);
        assert_eq!(feed.page(), 1);
        assert!(!feed.has_more());
    }
}
