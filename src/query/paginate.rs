//! Fixed-size pagination over an ordered sequence

use serde::{Deserialize, Serialize};

/// A 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub index: usize,
    pub size: usize,
}

impl Page {
    /// Create a page request
    pub fn new(index: usize, size: usize) -> Self {
        Self { index, size }
    }

    /// First page with the given size
    pub fn first(size: usize) -> Self {
        Self::new(1, size)
    }

    /// Slice `items` to this page
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        paginate_data(items, self.index, self.size)
    }
}

/// Return the items of page `page` (1-based)
///
/// Pages past the end, and page 0, are empty rather than an error.
/// `page_size` must be positive; zero yields an empty page.
///
/// # Arguments
/// * `items` - Ordered sequence
/// * `page` - 1-based page index
/// * `page_size` - Items per page
///
/// # Returns
/// * `Vec<T>` - The slice `[(page-1)*size, page*size)` clamped to the input
pub fn paginate_data<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    if page == 0 || page_size == 0 {
        return Vec::new();
    }

    let Some(start) = (page - 1).checked_mul(page_size) else {
        return Vec::new();
    };
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(items.len());
    items[start..end].to_vec()
}

/// Number of pages needed for `total` items
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}
