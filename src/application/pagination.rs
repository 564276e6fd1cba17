//! Shared offset pagination helpers.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Ordering applied to a sorted scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Resolve a caller-supplied direction: `asc` in any letter case sorts
    /// ascending, every other value (misspellings included) sorts descending.
    pub fn parse_lenient(value: &str) -> Self {
        if value.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Validated request for one page of a sorted collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page_no: u32,
    page_size: NonZeroU32,
    sort_field: String,
    direction: SortDirection,
}

impl PageRequest {
    pub fn new(
        page_no: u32,
        page_size: u32,
        sort_field: impl Into<String>,
        direction: SortDirection,
    ) -> Result<Self, PaginationError> {
        let page_size = NonZeroU32::new(page_size).ok_or(PaginationError::ZeroPageSize)?;
        Ok(Self {
            page_no,
            page_size,
            sort_field: sort_field.into(),
            direction,
        })
    }

    pub fn page_no(&self) -> u32 {
        self.page_no
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.get()
    }

    pub fn sort_field(&self) -> &str {
        &self.sort_field
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Number of elements preceding this page in the sorted collection.
    pub fn offset(&self) -> usize {
        (self.page_no as usize).saturating_mul(self.page_size.get() as usize)
    }
}

/// One page of content plus the metadata describing where it sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub content: Vec<T>,
    pub page_no: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub last: bool,
}

impl<T> PageResult<T> {
    /// Cut the requested page out of an already sorted collection.
    pub fn from_sorted(items: Vec<T>, request: &PageRequest) -> Self {
        let total_elements = items.len() as u64;
        let content: Vec<T> = items
            .into_iter()
            .skip(request.offset())
            .take(request.page_size() as usize)
            .collect();
        Self::with_total(content, request, total_elements)
    }

    /// Assemble a page whose content was sliced elsewhere.
    pub fn with_total(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let page_size = request.page_size();
        let total_pages =
            u32::try_from(total_elements.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX);
        let last = request.page_no().saturating_add(1) >= total_pages;

        Self {
            content,
            page_no: request.page_no(),
            page_size,
            total_elements,
            total_pages,
            last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page_no: u32, page_size: u32) -> PageRequest {
        PageRequest::new(page_no, page_size, "id", SortDirection::Asc).expect("valid request")
    }

    #[test]
    fn lenient_direction_only_recognises_asc() {
        assert_eq!(SortDirection::parse_lenient("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse_lenient("ASC"), SortDirection::Asc);
        assert_eq!(SortDirection::parse_lenient("aSc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse_lenient("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse_lenient("banana"), SortDirection::Desc);
        assert_eq!(SortDirection::parse_lenient(""), SortDirection::Desc);
        assert_eq!(SortDirection::parse_lenient(" asc"), SortDirection::Desc);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = PageRequest::new(0, 0, "id", SortDirection::Asc).unwrap_err();
        assert_eq!(err, PaginationError::ZeroPageSize);
    }

    #[test]
    fn middle_page_reports_totals() {
        let page = PageResult::from_sorted((1..=5).collect::<Vec<i32>>(), &request(1, 2));
        assert_eq!(page.content, vec![3, 4]);
        assert_eq!(page.page_no, 1);
        assert_eq!(page.page_size, 2);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert!(!page.last);
    }

    #[test]
    fn final_partial_page_is_last() {
        let page = PageResult::from_sorted((1..=5).collect::<Vec<i32>>(), &request(2, 2));
        assert_eq!(page.content, vec![5]);
        assert!(page.last);
    }

    #[test]
    fn page_past_the_end_is_empty_and_last() {
        let page = PageResult::from_sorted((1..=5).collect::<Vec<i32>>(), &request(7, 2));
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.last);
    }

    #[test]
    fn empty_collection_has_no_pages() {
        let page = PageResult::from_sorted(Vec::<i32>::new(), &request(0, 10));
        assert_eq!(page.total_pages, 0);
        assert!(page.last);
    }
}
