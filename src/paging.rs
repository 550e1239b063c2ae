//! Sort Order and Page Window
//!
//! Listing parameters are validated when they are built, so a `PageRequest`
//! that reaches a store is always usable. Invalid values are rejected, never
//! clamped.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Page size used when the caller does not give one
pub const PAGE_SIZE_DEFAULT: usize = 10;

/// Offset used when the caller does not give one
pub const PAGE_FROM_DEFAULT: usize = 0;

// =============================================================================
// Types
// =============================================================================

/// Direction to sort a listing by date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl From<&str> for SortOrder {
    /// `asc`/`ascending` (any case) sort oldest first; anything else newest first
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Self::Ascending,
            _ => Self::Descending,
        }
    }
}

/// A validated `size`/`from` window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    size: usize,
    from: usize,
}

impl PageRequest {
    /// Validate raw listing parameters.
    ///
    /// `size` must be positive, `from` must be non-negative.
    pub fn new(size: i64, from: i64) -> StoreResult<Self> {
        if size <= 0 {
            return Err(StoreError::validation("size", "size must be greater than zero"));
        }
        if from < 0 {
            return Err(StoreError::validation("from", "from must not be negative"));
        }

        Ok(Self {
            size: usize::try_from(size).unwrap_or(usize::MAX),
            from: usize::try_from(from).unwrap_or(usize::MAX),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn offset(&self) -> usize {
        self.from
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            size: PAGE_SIZE_DEFAULT,
            from: PAGE_FROM_DEFAULT,
        }
    }
}

/// Sort `items` by `key` (ties broken by `id`), then cut out the page window
pub fn paginate<T, K, F, I>(
    mut items: Vec<T>,
    order: SortOrder,
    page: PageRequest,
    key: F,
    id: I,
) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
    I: Fn(&T) -> u64,
{
    items.sort_by(|a, b| key(a).cmp(&key(b)).then_with(|| id(a).cmp(&id(b))));
    if order == SortOrder::Descending {
        items.reverse();
    }

    items
        .into_iter()
        .skip(page.from)
        .take(page.size)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(size: i64, from: i64) -> PageRequest {
        PageRequest::new(size, from).unwrap()
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!(SortOrder::from("asc"), SortOrder::Ascending);
        assert_eq!(SortOrder::from("Ascending"), SortOrder::Ascending);
        assert_eq!(SortOrder::from("DESC"), SortOrder::Descending);
        assert_eq!(SortOrder::default(), SortOrder::Descending);

        // Unknown values fall back to newest first
        assert_eq!(SortOrder::from("sideways"), SortOrder::Descending);
        assert_eq!(SortOrder::from(""), SortOrder::Descending);
    }

    #[test]
    fn test_page_request_validation() {
        assert!(matches!(
            PageRequest::new(0, 0),
            Err(StoreError::Validation { ref field, .. }) if field == "size"
        ));
        assert!(matches!(
            PageRequest::new(5, -1),
            Err(StoreError::Validation { ref field, .. }) if field == "from"
        ));

        let page = window(3, 7);
        assert_eq!((page.size(), page.offset()), (3, 7));
        assert_eq!(PageRequest::default(), window(10, 0));
    }

    #[test]
    fn test_paginate_orders_and_windows() {
        // (id, date)
        let items = vec![(1u64, 30), (2, 10), (3, 20)];

        let asc = paginate(items.clone(), SortOrder::Ascending, window(2, 0), |i| i.1, |i| i.0);
        assert_eq!(asc, vec![(2, 10), (3, 20)]);

        let desc = paginate(items.clone(), SortOrder::Descending, window(2, 0), |i| i.1, |i| i.0);
        assert_eq!(desc, vec![(1, 30), (3, 20)]);

        let skipped = paginate(items.clone(), SortOrder::Ascending, window(10, 2), |i| i.1, |i| i.0);
        assert_eq!(skipped, vec![(1, 30)]);

        let past_end = paginate(items, SortOrder::Ascending, window(10, 5), |i| i.1, |i| i.0);
        assert!(past_end.is_empty());
    }

    #[test]
    fn test_paginate_ties_use_id() {
        let items = vec![(3u64, 5), (1, 5), (2, 5)];
        let asc = paginate(items.clone(), SortOrder::Ascending, window(10, 0), |i| i.1, |i| i.0);
        assert_eq!(asc.iter().map(|i| i.0).collect::<Vec<_>>(), vec![1, 2, 3]);

        let desc = paginate(items, SortOrder::Descending, window(10, 0), |i| i.1, |i| i.0);
        assert_eq!(desc.iter().map(|i| i.0).collect::<Vec<_>>(), vec![3, 2, 1]);
    }
}
