//! Page-number pagination envelope primitives.
//!
//! Endpoints that return lists wrap them in [`Paginated`], carrying the data
//! slice alongside a [`Pagination`] descriptor. Totals are always computed
//! over the filtered set the caller paginated, never over a wider
//! collection, so `total_pages == ceil(total_items / page_size)` holds for
//! every response.
//!
//! [`PageRequest`] validates inbound page coordinates once at the edge;
//! downstream code can then rely on `page >= 1` and `page_size >= 1`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Default page size applied when a request does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Validation failures raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are one-based; zero is not addressable.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A zero page size would make every total-pages computation divide by
    /// zero.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// Validated one-based page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::new(2, 25).expect("valid request");
    /// assert_eq!(request.page(), 2);
    /// assert_eq!(request.page_size(), 25);
    /// assert!(PageRequest::new(0, 25).is_err());
    /// ```
    pub fn new(page: u32, page_size: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if page_size == 0 {
            return Err(PageRequestError::ZeroPageSize);
        }
        Ok(Self { page, page_size })
    }

    /// First page with the given size.
    pub fn first(page_size: u32) -> Result<Self, PageRequestError> {
        Self::new(1, page_size)
    }

    /// One-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items per page.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Zero-based offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.page_size as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Descriptor accompanying every paginated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// One-based page number the data slice was cut from.
    pub page: u32,
    /// Requested page size; the data slice may be shorter.
    pub page_size: u32,
    /// Number of items in the filtered set, not just this page.
    pub total_items: u64,
    /// `ceil(total_items / page_size)`.
    pub total_pages: u64,
}

impl Pagination {
    /// Compute the descriptor for a filtered set of `total_items` items.
    #[must_use]
    pub fn for_total(request: PageRequest, total_items: u64) -> Self {
        Self {
            page: request.page(),
            page_size: request.page_size(),
            total_items,
            total_pages: total_items.div_ceil(u64::from(request.page_size())),
        }
    }

    /// Whether a page after this one exists.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    /// Whether a page before this one exists.
    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}

/// A page of data plus its [`Pagination`] descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// The items on the requested page; at most `pagination.page_size` long.
    pub data: Vec<T>,
    /// Totals over the filtered set the page was cut from.
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    /// Cut the requested page out of an already filtered and sorted set.
    ///
    /// An out-of-range page yields an empty data sequence with a
    /// still-correct descriptor rather than an error.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, Paginated};
    ///
    /// let request = PageRequest::new(2, 3).expect("valid request");
    /// let page = Paginated::cut(vec![1, 2, 3, 4, 5], request);
    /// assert_eq!(page.data, vec![4, 5]);
    /// assert_eq!(page.pagination.total_items, 5);
    /// assert_eq!(page.pagination.total_pages, 2);
    /// ```
    #[must_use]
    pub fn cut(items: Vec<T>, request: PageRequest) -> Self {
        let total_items = items.len() as u64;
        let data: Vec<T> = items
            .into_iter()
            .skip(request.offset())
            .take(request.page_size() as usize)
            .collect();
        Self {
            data,
            pagination: Pagination::for_total(request, total_items),
        }
    }

    /// Map the data items while keeping the descriptor intact.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request(page: u32, page_size: u32) -> PageRequest {
        PageRequest::new(page, page_size).expect("valid page request")
    }

    #[rstest]
    #[case(0, 10, PageRequestError::ZeroPage)]
    #[case(1, 0, PageRequestError::ZeroPageSize)]
    #[case(0, 0, PageRequestError::ZeroPage)]
    fn rejects_zero_coordinates(
        #[case] page: u32,
        #[case] page_size: u32,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, page_size), Err(expected));
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 7, 14)]
    fn offset_is_zero_based(#[case] page: u32, #[case] page_size: u32, #[case] expected: usize) {
        assert_eq!(request(page, page_size).offset(), expected);
    }

    #[rstest]
    // data.len() == min(page_size, max(0, total - (page-1)*page_size))
    #[case(1, 10, 55, 10, 6)]
    #[case(6, 10, 55, 5, 6)]
    #[case(7, 10, 55, 0, 6)]
    #[case(1, 55, 55, 55, 1)]
    #[case(1, 10, 0, 0, 0)]
    fn cut_length_and_totals(
        #[case] page: u32,
        #[case] page_size: u32,
        #[case] total: usize,
        #[case] expected_len: usize,
        #[case] expected_pages: u64,
    ) {
        let items: Vec<usize> = (0..total).collect();
        let result = Paginated::cut(items, request(page, page_size));
        assert_eq!(result.data.len(), expected_len);
        assert_eq!(result.pagination.total_items, total as u64);
        assert_eq!(result.pagination.total_pages, expected_pages);
        assert_eq!(result.pagination.page, page);
        assert_eq!(result.pagination.page_size, page_size);
    }

    #[test]
    fn cut_preserves_order_within_the_page() {
        let result = Paginated::cut(vec!["a", "b", "c", "d"], request(2, 2));
        assert_eq!(result.data, vec!["c", "d"]);
    }

    #[rstest]
    #[case(1, 6, false, true)]
    #[case(3, 6, true, true)]
    #[case(6, 6, true, false)]
    fn page_navigation_flags(
        #[case] page: u32,
        #[case] total_pages: u64,
        #[case] previous: bool,
        #[case] next: bool,
    ) {
        let pagination = Pagination {
            page,
            page_size: 10,
            total_items: total_pages * 10,
            total_pages,
        };
        assert_eq!(pagination.has_previous_page(), previous);
        assert_eq!(pagination.has_next_page(), next);
    }

    #[test]
    fn serialises_camel_case() {
        let page = Paginated::cut(vec![1u32], request(1, 10));
        let value = serde_json::to_value(&page).expect("serialise page");
        assert!(value.get("pagination").is_some());
        let descriptor = value.get("pagination").expect("descriptor");
        assert_eq!(descriptor.get("pageSize").and_then(|v| v.as_u64()), Some(10));
        assert_eq!(
            descriptor.get("totalItems").and_then(|v| v.as_u64()),
            Some(1)
        );
    }
}
